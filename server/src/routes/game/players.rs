use std::collections::HashSet;

use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{OptionKind, Player, Selection},
    DbPool,
};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GamePlayer {
    pub id: i32,
    pub name: String,
    pub team: i32,
    pub is_logged_in: bool,
    pub has_tell: bool,
    pub has_mission: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct GamePlayersResponse {
    pub players: Vec<GamePlayer>,
}

pub async fn players(pool: Data<DbPool>) -> Result<Json<GamePlayersResponse>, Error> {
    let (players, tells, missions) = block(move || {
        let conn = get_conn(&pool)?;
        let players = Player::find_all(&conn)?;
        let tells: HashSet<i32> = Selection::player_ids(&conn, OptionKind::Tell)?
            .into_iter()
            .collect();
        let missions: HashSet<i32> = Selection::player_ids(&conn, OptionKind::Mission)?
            .into_iter()
            .collect();
        Ok::<_, Error>((players, tells, missions))
    })
    .await??;

    let players = players
        .into_iter()
        .map(|player| GamePlayer {
            has_tell: tells.contains(&player.id),
            has_mission: missions.contains(&player.id),
            id: player.id,
            name: player.name,
            team: player.team_number,
            is_logged_in: player.is_logged_in,
        })
        .collect();

    Ok(Json(GamePlayersResponse { players }))
}
