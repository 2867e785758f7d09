use actix_web::web::{block, Data, Json, Path};
use serde::{Deserialize, Serialize};

use db::{get_conn, models::Player, DbPool};
use errors::Error;

use super::PlayerSummary;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player: Option<PlayerSummary>,
}

/// An unknown or logged out player is simply not in session.
pub async fn session(
    pool: Data<DbPool>,
    player_id: Path<i32>,
) -> Result<Json<SessionResponse>, Error> {
    let player_id = player_id.into_inner();
    let player = block(move || {
        let conn = get_conn(&pool)?;
        match Player::find_by_id(&conn, player_id) {
            Ok(player) => Ok(Some(player)),
            Err(Error::NotFound(_)) => Ok(None),
            Err(err) => Err(err),
        }
    })
    .await??;

    let res = match player {
        Some(player) if player.is_logged_in => SessionResponse {
            logged_in: true,
            player: Some(player.into()),
        },
        _ => SessionResponse {
            logged_in: false,
            player: None,
        },
    };

    Ok(Json(res))
}
