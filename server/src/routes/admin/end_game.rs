use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};

use db::{get_conn, models::GameState, DbPool};
use errors::Error;
use generator::ContentGenerator;

use crate::handlers::{generate_fun_awards, judge_guesses};

#[derive(Debug, Deserialize, Serialize)]
pub struct EndGameResponse {
    pub success: bool,
    pub graded: usize,
    pub ungraded: usize,
}

/// Ends the game, grades the guesses and hands out the fun awards before replying, so
/// the prizes page is complete as soon as this returns.
pub async fn end_game(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
) -> Result<Json<EndGameResponse>, Error> {
    let end_pool = pool.clone();
    block(move || {
        let conn = get_conn(&end_pool)?;
        GameState::end(&conn)
    })
    .await??;

    info!("Game ended, judging guesses");

    let summary = judge_guesses(pool.clone(), generator.clone()).await?;

    let awards = generate_fun_awards(pool, generator).await?;
    info!("Handed out {} fun awards", awards.len());

    Ok(Json(EndGameResponse {
        success: true,
        graded: summary.graded,
        ungraded: summary.ungraded,
    }))
}
