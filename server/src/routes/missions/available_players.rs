use std::collections::HashSet;

use actix_web::web::{block, Data, Json, Path};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{MissionCompletion, Player},
    DbPool,
};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
pub struct AvailablePlayer {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AvailablePlayersResponse {
    pub players: Vec<AvailablePlayer>,
}

/// Players the mission has not been completed with yet.
pub async fn available_players(
    pool: Data<DbPool>,
    player_id: Path<i32>,
) -> Result<Json<AvailablePlayersResponse>, Error> {
    let player_id = player_id.into_inner();

    let players = block(move || {
        let conn = get_conn(&pool)?;
        let done: HashSet<i32> = MissionCompletion::find_by_player(&conn, player_id)?
            .into_iter()
            .map(|c| c.involved_player_id)
            .collect();

        let players: Vec<AvailablePlayer> = Player::find_all(&conn)?
            .into_iter()
            .filter(|p| p.id != player_id && !done.contains(&p.id))
            .map(|p| AvailablePlayer {
                id: p.id,
                name: p.name,
            })
            .collect();
        Ok::<_, Error>(players)
    })
    .await??;

    Ok(Json(AvailablePlayersResponse { players }))
}
