use std::collections::HashMap;

use actix_web::web::{block, Data};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GeneratedOption, Guess, JudgeStatus, OptionKind, Player},
    DbPool,
};
use errors::Error;
use generator::{ContentGenerator, OptionCandidate};

use crate::handlers::selected_tell_ids;

pub const NO_TELL_REASONING: &str =
    "This player never selected a tell, so there was nothing to match.";

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct JudgingSummary {
    pub graded: usize,
    pub ungraded: usize,
}

struct JudgingBatch {
    guesses: Vec<Guess>,
    names: HashMap<i32, String>,
    options: HashMap<i32, Vec<OptionCandidate>>,
    selected_tells: HashMap<i32, i32>,
}

enum Outcome {
    Graded(Option<i32>, String),
    Ungraded(String),
}

/// Grades every guess that is not graded yet. A failure on one guess marks it ungraded
/// and the rest of the batch carries on.
pub async fn judge_guesses(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
) -> Result<JudgingSummary, Error> {
    let load_pool = pool.clone();
    let batch = block(move || {
        let conn = get_conn(&load_pool)?;

        let guesses: Vec<Guess> = Guess::find_all(&conn)?
            .into_iter()
            .filter(|guess| guess.status() != JudgeStatus::Graded)
            .collect();
        let names = Player::find_all(&conn)?
            .into_iter()
            .map(|player| (player.id, player.name))
            .collect();

        let mut options: HashMap<i32, Vec<OptionCandidate>> = HashMap::new();
        for option in GeneratedOption::find_all(&conn, OptionKind::Tell)? {
            options
                .entry(option.player_id)
                .or_default()
                .push(OptionCandidate {
                    id: option.id,
                    text: option.option_text,
                });
        }

        Ok::<_, Error>(JudgingBatch {
            guesses,
            names,
            options,
            selected_tells: selected_tell_ids(&conn)?,
        })
    })
    .await??;

    let mut summary = JudgingSummary::default();

    for guess in batch.guesses {
        let target = guess.target_player_id;
        let outcome = if !batch.selected_tells.contains_key(&target) {
            Outcome::Graded(None, NO_TELL_REASONING.to_string())
        } else {
            let target_name = batch.names.get(&target).map(String::as_str).unwrap_or("");
            let candidates = batch.options.get(&target).map(Vec::as_slice).unwrap_or(&[]);

            match generator::judge_guess(
                generator.get_ref(),
                target_name,
                &guess.free_text_guess,
                candidates,
            )
            .await
            {
                Ok(verdict) => Outcome::Graded(verdict.matched_option_id, verdict.reasoning),
                Err(err) => {
                    warn!("Could not judge guess {} - {}", guess.id, err);
                    Outcome::Ungraded(format!("Judging failed: {}", err))
                }
            }
        };

        match &outcome {
            Outcome::Graded(..) => summary.graded += 1,
            Outcome::Ungraded(_) => summary.ungraded += 1,
        }

        let pool = pool.clone();
        block(move || {
            let conn = get_conn(&pool)?;
            match outcome {
                Outcome::Graded(matched, reasoning) => {
                    Guess::record_verdict(&conn, guess.id, matched, &reasoning)
                }
                Outcome::Ungraded(reason) => Guess::mark_ungraded(&conn, guess.id, &reason),
            }
        })
        .await??;
    }

    info!(
        "Judged guesses: {} graded, {} ungraded",
        summary.graded, summary.ungraded
    );

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use db::models::{GeneratedOption, Guess, JudgeStatus, OptionKind, Player, Selection};
    use generator::Error as GeneratorError;

    use crate::tests::helpers::TestContext;

    use super::{judge_guesses, JudgingSummary, NO_TELL_REASONING};

    #[actix_rt::test]
    async fn test_failure_marks_one_guess_ungraded() {
        let ctx = TestContext::with_responses(vec![
            Err(GeneratorError::Network("connection reset".to_string())),
            Ok(json!({ "matchedOptionId": null, "reasoning": "Not even close." })),
        ]);
        let conn = ctx.conn();

        let target = Player::create(&conn, "Katherine", 2, false).unwrap();
        let first = Player::create(&conn, "David", 1, false).unwrap();
        let second = Player::create(&conn, "Emily", 1, false).unwrap();
        let texts = vec!["Hums".to_string(), "Winks".to_string(), "Claps".to_string()];
        let options =
            GeneratedOption::create_all(&conn, OptionKind::Tell, target.id, &texts).unwrap();
        Selection::select(&conn, OptionKind::Tell, target.id, options[1].id).unwrap();

        Guess::submit(&conn, first.id, target.id, "She winks a lot").unwrap();
        Guess::submit(&conn, second.id, target.id, "Whistling").unwrap();

        let summary = judge_guesses(ctx.pool_data(), ctx.generator_data()).await.unwrap();
        assert_eq!(
            summary,
            JudgingSummary {
                graded: 1,
                ungraded: 1
            }
        );

        let guesses = Guess::find_by_target(&conn, target.id).unwrap();
        assert_eq!(guesses[0].status(), JudgeStatus::Ungraded);
        assert!(guesses[0]
            .ai_reasoning
            .as_deref()
            .unwrap()
            .starts_with("Judging failed"));
        assert_eq!(guesses[1].status(), JudgeStatus::Graded);
        assert_eq!(guesses[1].matched_option_id, None);

        // the judge saw the target's options
        assert!(ctx.generator.prompts()[0].contains("Winks"));
    }

    #[actix_rt::test]
    async fn test_target_without_tell_skips_the_model() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let guesser = Player::create(&conn, "Ben", 2, false).unwrap();
        let target = Player::create(&conn, "Jemima", 3, false).unwrap();
        Guess::submit(&conn, guesser.id, target.id, "Taps her foot").unwrap();

        let summary = judge_guesses(ctx.pool_data(), ctx.generator_data()).await.unwrap();
        assert_eq!(summary.graded, 1);
        assert!(ctx.generator.prompts().is_empty());

        let guess = &Guess::find_by_guesser(&conn, guesser.id).unwrap()[0];
        assert_eq!(guess.status(), JudgeStatus::Graded);
        assert_eq!(guess.ai_reasoning.as_deref(), Some(NO_TELL_REASONING));
    }

    #[actix_rt::test]
    async fn test_matched_guess_is_recorded() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let target = Player::create(&conn, "Vicky", 3, false).unwrap();
        let guesser = Player::create(&conn, "Neal", 1, false).unwrap();
        let texts = vec!["Hums carols".to_string(), "Winks".to_string()];
        let options =
            GeneratedOption::create_all(&conn, OptionKind::Tell, target.id, &texts).unwrap();
        Selection::select(&conn, OptionKind::Tell, target.id, options[0].id).unwrap();
        Guess::submit(&conn, guesser.id, target.id, "Humming").unwrap();
        ctx.generator.push(Ok(json!({
            "matchedOptionId": options[0].id,
            "reasoning": "Humming carols is exactly it."
        })));

        judge_guesses(ctx.pool_data(), ctx.generator_data()).await.unwrap();

        let guess = &Guess::find_by_guesser(&conn, guesser.id).unwrap()[0];
        assert_eq!(guess.matched_option_id, Some(options[0].id));
        assert!(guess.is_correct(Some(options[0].id)));
    }
}
