use actix_web::web::{block, Data};
use diesel::SqliteConnection;

use db::{
    get_conn,
    models::{GameState, GeneratedOption, Guess, OptionKind, Player, Selection},
    DbPool,
};
use errors::Error;
use generator::{ContentGenerator, FunAward, FunAwardSubject};

use crate::handlers::mission_counts;

fn award_subjects(conn: &SqliteConnection) -> Result<Vec<FunAwardSubject>, Error> {
    let players = Player::find_all(conn)?;
    let guesses = Guess::find_all(conn)?;
    let tells = Selection::find_all(conn, OptionKind::Tell)?;
    let missions = Selection::find_all(conn, OptionKind::Mission)?;
    let completions = mission_counts(conn)?;

    let selected = |selections: &[(Selection, GeneratedOption)], player: i32| {
        selections
            .iter()
            .find(|(selection, _)| selection.player_id == player)
            .map(|(selection, option)| (selection.option_id, option.option_text.clone()))
    };

    Ok(players
        .iter()
        .map(|player| {
            let tell = selected(&tells, player.id);
            let made: Vec<&Guess> = guesses.iter().filter(|g| g.guesser_id == player.id).collect();
            let correct = made
                .iter()
                .filter(|g| {
                    let target_tell = selected(&tells, g.target_player_id).map(|(id, _)| id);
                    g.is_correct(target_tell)
                })
                .count();
            let wrong_against = guesses
                .iter()
                .filter(|g| {
                    g.target_player_id == player.id && g.is_wrong(tell.as_ref().map(|(id, _)| *id))
                })
                .count();

            FunAwardSubject {
                name: player.name.clone(),
                tell: tell.map(|(_, text)| text),
                mission: selected(&missions, player.id).map(|(_, text)| text),
                guesses_made: made.len(),
                correct_guesses: correct,
                wrong_guesses_against: wrong_against,
                mission_completions: completions.get(&player.id).copied().unwrap_or(0) as usize,
            }
        })
        .collect())
}

/// Writes playful awards for every player. A generator failure is logged and leaves the
/// awards empty; it never fails the caller.
pub async fn generate_fun_awards(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
) -> Result<Vec<FunAward>, Error> {
    let load_pool = pool.clone();
    let subjects = block(move || {
        let conn = get_conn(&load_pool)?;
        award_subjects(&conn)
    })
    .await??;

    if subjects.is_empty() {
        return Ok(Vec::new());
    }

    let awards = match generator::generate_fun_awards(generator.get_ref(), &subjects).await {
        Ok(awards) => awards,
        Err(err) => {
            error!("Could not generate fun awards - {}", err);
            return Ok(Vec::new());
        }
    };

    let stored = awards.clone();
    block(move || {
        let conn = get_conn(&pool)?;
        GameState::set_fun_awards(&conn, &stored)
    })
    .await??;

    Ok(awards)
}
