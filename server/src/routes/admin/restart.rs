use actix_web::web::{block, Data, Json};

use db::{get_conn, models::GameState, DbPool};
use errors::Error;

use super::AdminResponse;

pub async fn restart(pool: Data<DbPool>) -> Result<Json<AdminResponse>, Error> {
    block(move || {
        let conn = get_conn(&pool)?;
        GameState::reset(&conn)
    })
    .await??;

    warn!("Game restarted, all game data cleared");

    Ok(Json(AdminResponse { success: true }))
}
