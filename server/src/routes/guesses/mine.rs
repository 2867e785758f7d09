use std::collections::HashMap;

use actix_web::web::{block, Data, Json, Path};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{Guess, Player},
    DbPool,
};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MyGuess {
    pub id: i32,
    pub target_player_id: i32,
    pub target_player_name: String,
    pub guess_text: String,
    pub guessed_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct MyGuessesResponse {
    pub guesses: Vec<MyGuess>,
}

/// Guesses the player made, by target name.
pub async fn mine(
    pool: Data<DbPool>,
    player_id: Path<i32>,
) -> Result<Json<MyGuessesResponse>, Error> {
    let player_id = player_id.into_inner();

    let (guesses, names) = block(move || {
        let conn = get_conn(&pool)?;
        let guesses = Guess::find_by_guesser(&conn, player_id)?;
        let names: HashMap<i32, String> = Player::find_all(&conn)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        Ok::<_, Error>((guesses, names))
    })
    .await??;

    let mut guesses: Vec<MyGuess> = guesses
        .into_iter()
        .map(|guess| MyGuess {
            target_player_name: names
                .get(&guess.target_player_id)
                .cloned()
                .unwrap_or_default(),
            id: guess.id,
            target_player_id: guess.target_player_id,
            guess_text: guess.free_text_guess,
            guessed_at: guess.guessed_at,
            updated_at: guess.updated_at,
        })
        .collect();
    guesses.sort_by(|a, b| a.target_player_name.cmp(&b.target_player_name));

    Ok(Json(MyGuessesResponse { guesses }))
}
