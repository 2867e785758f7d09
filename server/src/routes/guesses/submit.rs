use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use db::{
    get_conn,
    models::{GameState, Guess, Player},
    DbPool,
};
use errors::Error;

use crate::validate::{not_blank, validate};

#[derive(Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmitGuessRequest {
    pub guesser_id: i32,
    pub target_player_id: i32,
    #[validate(custom(function = "not_blank", message = "Guess text is required"))]
    pub guess_text: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SubmitGuessResponse {
    pub success: bool,
}

/// Guesses stay open through setup and the active game, and close once it is finished.
pub async fn submit(
    pool: Data<DbPool>,
    params: Json<SubmitGuessRequest>,
) -> Result<Json<SubmitGuessResponse>, Error> {
    validate(&params)?;

    block(move || {
        let conn = get_conn(&pool)?;

        if GameState::get(&conn)?.is_finished() {
            return Err(Error::BadRequest(
                "The game is over, guesses are closed".to_string(),
            ));
        }

        Player::find_by_id(&conn, params.guesser_id)?;
        Player::find_by_id(&conn, params.target_player_id)?;
        Guess::submit(
            &conn,
            params.guesser_id,
            params.target_player_id,
            params.guess_text.trim(),
        )
    })
    .await??;

    Ok(Json(SubmitGuessResponse { success: true }))
}
