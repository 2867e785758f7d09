use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};

use db::{get_conn, models::Player, DbPool};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
pub struct RosterEntry {
    pub id: i32,
    pub name: String,
    pub team: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RosterResponse {
    pub players: Vec<RosterEntry>,
}

/// The login screen's name list.
pub async fn players(pool: Data<DbPool>) -> Result<Json<RosterResponse>, Error> {
    let players = block(move || {
        let conn = get_conn(&pool)?;
        Player::find_all(&conn)
    })
    .await??;

    Ok(Json(RosterResponse {
        players: players
            .into_iter()
            .map(|player| RosterEntry {
                id: player.id,
                name: player.name,
                team: player.team_number,
            })
            .collect(),
    }))
}
