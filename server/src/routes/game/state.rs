use std::collections::BTreeMap;

use actix_web::web::{block, Data, Json};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use db::{get_conn, models::GameState, DbPool};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GameStateResponse {
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    /// team number -> winning name
    pub team_names: BTreeMap<i32, String>,
}

pub async fn state(pool: Data<DbPool>) -> Result<Json<GameStateResponse>, Error> {
    let state = block(move || {
        let conn = get_conn(&pool)?;
        GameState::get(&conn)
    })
    .await??;

    let team_names = state
        .team_name_winners()
        .into_iter()
        .map(|winner| (winner.team, winner.suggestion))
        .collect();

    Ok(Json(GameStateResponse {
        status: state.status,
        started_at: state.started_at,
        ended_at: state.ended_at,
        team_names,
    }))
}
