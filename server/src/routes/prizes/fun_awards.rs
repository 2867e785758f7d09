use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};

use db::{get_conn, DbPool};
use errors::Error;
use generator::FunAward;

use super::finished_state;

#[derive(Debug, Deserialize, Serialize)]
pub struct FunAwardsResponse {
    pub awards: Vec<FunAward>,
}

/// The awards written when the game ended. Never regenerated here.
pub async fn fun_awards(pool: Data<DbPool>) -> Result<Json<FunAwardsResponse>, Error> {
    let awards = block(move || {
        let conn = get_conn(&pool)?;
        Ok::<_, Error>(finished_state(&conn)?.fun_awards::<FunAward>())
    })
    .await??;

    Ok(Json(FunAwardsResponse { awards }))
}
