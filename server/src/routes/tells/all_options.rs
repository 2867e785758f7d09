use std::collections::HashSet;

use actix_web::web::{block, Data, Json, Path};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GeneratedOption, OptionKind, Player, Selection},
    DbPool,
};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
pub struct TellChoice {
    pub id: i32,
    pub text: String,
    pub number: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuspectOptions {
    pub id: i32,
    pub name: String,
    pub team: i32,
    pub options: Vec<TellChoice>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AllOptionsResponse {
    pub players: Vec<SuspectOptions>,
}

/// Everyone else who has committed to a tell, with the options they chose from. This is
/// what a guesser picks from.
pub async fn all_options(
    pool: Data<DbPool>,
    player_id: Path<i32>,
) -> Result<Json<AllOptionsResponse>, Error> {
    let player_id = player_id.into_inner();

    let (players, options) = block(move || {
        let conn = get_conn(&pool)?;
        let with_tell: HashSet<i32> = Selection::player_ids(&conn, OptionKind::Tell)?
            .into_iter()
            .collect();
        let players: Vec<Player> = Player::find_all(&conn)?
            .into_iter()
            .filter(|p| p.id != player_id && with_tell.contains(&p.id))
            .collect();
        let options = GeneratedOption::find_all(&conn, OptionKind::Tell)?;
        Ok::<_, Error>((players, options))
    })
    .await??;

    let players = players
        .into_iter()
        .map(|player| SuspectOptions {
            options: options
                .iter()
                .filter(|o| o.player_id == player.id)
                .map(|o| TellChoice {
                    id: o.id,
                    text: o.option_text.clone(),
                    number: o.option_number,
                })
                .collect(),
            id: player.id,
            name: player.name,
            team: player.team_number,
        })
        .collect();

    Ok(Json(AllOptionsResponse { players }))
}
