use actix_web::web::{Data, Json};

use db::DbPool;
use errors::Error;
use generator::ContentGenerator;

use crate::handlers::{self, TeamNameJudgement};

/// Re-runs team name judging on demand, for when it failed at game start or players
/// changed their suggestions afterwards.
pub async fn judge_team_names(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
) -> Result<Json<TeamNameJudgement>, Error> {
    let judgement = handlers::judge_team_names(pool, generator).await?;
    Ok(Json(judgement))
}
