use actix_web::web::{block, Data, Json, Path};
use serde::{Deserialize, Serialize};

use db::{get_conn, models::Guess, DbPool};
use errors::Error;

/// Only the text. Who made the guess is never revealed here.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnonymousGuess {
    pub guess_text: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct AboutMeResponse {
    pub guesses: Vec<AnonymousGuess>,
}

pub async fn about_me(
    pool: Data<DbPool>,
    player_id: Path<i32>,
) -> Result<Json<AboutMeResponse>, Error> {
    let player_id = player_id.into_inner();

    let guesses = block(move || {
        let conn = get_conn(&pool)?;
        Guess::find_by_target(&conn, player_id)
    })
    .await??;

    Ok(Json(AboutMeResponse {
        guesses: guesses
            .into_iter()
            .map(|guess| AnonymousGuess {
                guess_text: guess.free_text_guess,
            })
            .collect(),
    }))
}
