use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GameState, GameStatus, MissionCompletion, Player},
    DbPool,
};
use errors::Error;

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub player_id: i32,
    pub involved_player_id: i32,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteResponse {
    pub success: bool,
    pub total_completions: i64,
}

pub async fn complete(
    pool: Data<DbPool>,
    params: Json<CompleteRequest>,
) -> Result<Json<CompleteResponse>, Error> {
    let total_completions = block(move || {
        let conn = get_conn(&pool)?;

        if GameState::get(&conn)?.status()? != GameStatus::Active {
            return Err(Error::BadRequest(
                "Mission completions are only allowed during an active game".to_string(),
            ));
        }

        Player::find_by_id(&conn, params.player_id)?;
        Player::find_by_id(&conn, params.involved_player_id)?;
        MissionCompletion::create(&conn, params.player_id, params.involved_player_id)?;
        MissionCompletion::count_by_player(&conn, params.player_id)
    })
    .await??;

    Ok(Json(CompleteResponse {
        success: true,
        total_completions,
    }))
}
