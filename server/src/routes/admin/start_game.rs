use actix_web::web::{block, Data, Json};

use db::{get_conn, models::GameState, DbPool};
use errors::Error;
use generator::ContentGenerator;

use super::AdminResponse;
use crate::handlers::judge_team_names;

/// Starts the game, then settles the team names. A judging failure does not undo the
/// start; the admin can re-run it from the prizes page.
pub async fn start_game(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
) -> Result<Json<AdminResponse>, Error> {
    let start_pool = pool.clone();
    block(move || {
        let conn = get_conn(&start_pool)?;
        GameState::start(&conn)
    })
    .await??;

    info!("Game started");

    match judge_team_names(pool, generator).await {
        Ok(judgement) => info!("Picked {} team names", judgement.winners.len()),
        Err(err) => error!("Team name judging failed - {}", err),
    }

    Ok(Json(AdminResponse { success: true }))
}
