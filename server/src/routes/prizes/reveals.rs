use std::collections::HashMap;

use actix_web::web::{block, Data, Json};
use diesel::SqliteConnection;
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GeneratedOption, Guess, OptionKind, Player, Selection},
    DbPool,
};
use errors::Error;

use super::finished_state;
use crate::handlers::mission_counts;

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TellReveal {
    pub player_id: i32,
    pub player_name: String,
    pub tell_text: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissionReveal {
    pub player_id: i32,
    pub player_name: String,
    pub mission_text: Option<String>,
    pub image_url: Option<String>,
    pub completion_count: i64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GuessReveal {
    pub guesser_name: String,
    pub target_name: String,
    pub guessed_text: String,
    pub matched_option_text: Option<String>,
    pub actual_tell_text: Option<String>,
    pub ai_reasoning: Option<String>,
    pub judge_status: String,
    pub is_correct: bool,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct RevealsResponse {
    pub tells: Vec<TellReveal>,
    pub missions: Vec<MissionReveal>,
    pub guesses: Vec<GuessReveal>,
}

fn load_reveals(conn: &SqliteConnection) -> Result<RevealsResponse, Error> {
    let players = Player::find_all(conn)?;
    let names: HashMap<i32, String> = players.iter().map(|p| (p.id, p.name.clone())).collect();
    let tells: HashMap<i32, (Selection, GeneratedOption)> =
        Selection::find_all(conn, OptionKind::Tell)?
            .into_iter()
            .map(|(selection, option)| (selection.player_id, (selection, option)))
            .collect();
    let missions: HashMap<i32, (Selection, GeneratedOption)> =
        Selection::find_all(conn, OptionKind::Mission)?
            .into_iter()
            .map(|(selection, option)| (selection.player_id, (selection, option)))
            .collect();
    let option_texts: HashMap<i32, String> = GeneratedOption::find_all(conn, OptionKind::Tell)?
        .into_iter()
        .map(|o| (o.id, o.option_text))
        .collect();
    let completions = mission_counts(conn)?;

    let tell_reveals = players
        .iter()
        .map(|player| {
            let tell = tells.get(&player.id);
            TellReveal {
                player_id: player.id,
                player_name: player.name.clone(),
                tell_text: tell.map(|(_, option)| option.option_text.clone()),
                image_url: tell.and_then(|(selection, _)| selection.image_url.clone()),
            }
        })
        .collect();

    let mission_reveals = players
        .iter()
        .map(|player| {
            let mission = missions.get(&player.id);
            MissionReveal {
                player_id: player.id,
                player_name: player.name.clone(),
                mission_text: mission.map(|(_, option)| option.option_text.clone()),
                image_url: mission.and_then(|(selection, _)| selection.image_url.clone()),
                completion_count: completions.get(&player.id).copied().unwrap_or(0),
            }
        })
        .collect();

    let name_of = |id: i32| names.get(&id).cloned().unwrap_or_default();
    let mut guess_reveals: Vec<GuessReveal> = Guess::find_all(conn)?
        .into_iter()
        .map(|guess| {
            let actual = tells.get(&guess.target_player_id);
            GuessReveal {
                guesser_name: name_of(guess.guesser_id),
                target_name: name_of(guess.target_player_id),
                matched_option_text: guess
                    .matched_option_id
                    .and_then(|id| option_texts.get(&id).cloned()),
                actual_tell_text: actual.map(|(_, option)| option.option_text.clone()),
                is_correct: guess.is_correct(actual.map(|(selection, _)| selection.option_id)),
                ai_reasoning: guess.ai_reasoning.clone(),
                judge_status: guess.judge_status.clone(),
                guessed_text: guess.free_text_guess,
            }
        })
        .collect();
    guess_reveals.sort_by(|a, b| {
        a.target_name
            .cmp(&b.target_name)
            .then_with(|| a.guesser_name.cmp(&b.guesser_name))
    });

    Ok(RevealsResponse {
        tells: tell_reveals,
        missions: mission_reveals,
        guesses: guess_reveals,
    })
}

pub async fn reveals(pool: Data<DbPool>) -> Result<Json<RevealsResponse>, Error> {
    let res = block(move || {
        let conn = get_conn(&pool)?;
        finished_state(&conn)?;
        load_reveals(&conn)
    })
    .await??;

    Ok(Json(res))
}
