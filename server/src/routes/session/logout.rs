use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};

use db::{get_conn, models::Player, DbPool};
use errors::Error;

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub player_id: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SuccessResponse {
    pub success: bool,
}

pub async fn logout(
    pool: Data<DbPool>,
    params: Json<LogoutRequest>,
) -> Result<Json<SuccessResponse>, Error> {
    block(move || {
        let conn = get_conn(&pool)?;
        Player::log_out(&conn, params.player_id)
    })
    .await??;

    Ok(Json(SuccessResponse { success: true }))
}
