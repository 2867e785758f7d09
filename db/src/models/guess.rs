use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use diesel::{
    self, Connection, ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl,
    SqliteConnection,
};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::schema::guesses;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JudgeStatus {
    Pending,
    Graded,
    Ungraded,
}

impl JudgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JudgeStatus::Pending => "pending",
            JudgeStatus::Graded => "graded",
            JudgeStatus::Ungraded => "ungraded",
        }
    }
}

impl fmt::Display for JudgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JudgeStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "pending" => Ok(JudgeStatus::Pending),
            "graded" => Ok(JudgeStatus::Graded),
            "ungraded" => Ok(JudgeStatus::Ungraded),
            _ => Err(Error::InternalServerError(format!(
                "Unknown judge status {}",
                value
            ))),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Identifiable, Queryable, Serialize)]
#[table_name = "guesses"]
pub struct Guess {
    pub id: i32,
    pub guesser_id: i32,
    pub target_player_id: i32,
    pub free_text_guess: String,
    pub matched_option_id: Option<i32>,
    pub ai_reasoning: Option<String>,
    pub judge_status: String,
    pub guessed_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "guesses"]
struct NewGuess<'a> {
    guesser_id: i32,
    target_player_id: i32,
    free_text_guess: &'a str,
}

impl Guess {
    pub fn status(&self) -> JudgeStatus {
        self.judge_status.parse().unwrap_or(JudgeStatus::Pending)
    }

    /// Correct when graded and matched to the target's selected tell.
    pub fn is_correct(&self, selected_tell_option: Option<i32>) -> bool {
        self.status() == JudgeStatus::Graded
            && self.matched_option_id.is_some()
            && self.matched_option_id == selected_tell_option
    }

    /// Wrong when graded and not correct. Pending and ungraded guesses are neither.
    pub fn is_wrong(&self, selected_tell_option: Option<i32>) -> bool {
        self.status() == JudgeStatus::Graded && !self.is_correct(selected_tell_option)
    }

    /// Creates the guess, or replaces the text of an existing one for the same pair and
    /// sends it back to pending.
    pub fn submit(
        conn: &SqliteConnection,
        guesser: i32,
        target: i32,
        text: &str,
    ) -> Result<Guess, Error> {
        use crate::schema::guesses::dsl::{
            ai_reasoning, free_text_guess, guesser_id, judge_status, matched_option_id,
            target_player_id, updated_at,
        };

        if guesser == target {
            return Err(Error::BadRequest("Cannot guess your own tell".into()));
        }

        conn.transaction::<Guess, Error, _>(|| {
            let existing = guesses::table
                .filter(guesser_id.eq(guesser))
                .filter(target_player_id.eq(target))
                .first::<Guess>(conn)
                .optional()?;

            match existing {
                Some(guess) => {
                    diesel::update(guesses::table.find(guess.id))
                        .set((
                            free_text_guess.eq(text),
                            matched_option_id.eq(None::<i32>),
                            ai_reasoning.eq(None::<String>),
                            judge_status.eq(JudgeStatus::Pending.as_str()),
                            updated_at.eq(Utc::now().naive_utc()),
                        ))
                        .execute(conn)?;
                }
                None => {
                    diesel::insert_into(guesses::table)
                        .values(NewGuess {
                            guesser_id: guesser,
                            target_player_id: target,
                            free_text_guess: text,
                        })
                        .execute(conn)?;
                }
            }

            let guess = guesses::table
                .filter(guesser_id.eq(guesser))
                .filter(target_player_id.eq(target))
                .first::<Guess>(conn)?;

            Ok(guess)
        })
    }

    pub fn find_by_guesser(conn: &SqliteConnection, guesser: i32) -> Result<Vec<Guess>, Error> {
        use crate::schema::guesses::dsl::{guesser_id, guesses, target_player_id};

        let results = guesses
            .filter(guesser_id.eq(guesser))
            .order(target_player_id.asc())
            .load::<Guess>(conn)?;

        Ok(results)
    }

    pub fn find_by_target(conn: &SqliteConnection, target: i32) -> Result<Vec<Guess>, Error> {
        use crate::schema::guesses::dsl::{guessed_at, guesses, id, target_player_id};

        let results = guesses
            .filter(target_player_id.eq(target))
            .order((guessed_at.asc(), id.asc()))
            .load::<Guess>(conn)?;

        Ok(results)
    }

    pub fn find_all(conn: &SqliteConnection) -> Result<Vec<Guess>, Error> {
        use crate::schema::guesses::dsl::{guesses, id};

        let results = guesses.order(id.asc()).load::<Guess>(conn)?;

        Ok(results)
    }

    pub fn count_by_guesser(conn: &SqliteConnection, guesser: i32) -> Result<i64, Error> {
        use crate::schema::guesses::dsl::{guesser_id, guesses};

        let total = guesses
            .filter(guesser_id.eq(guesser))
            .count()
            .get_result::<i64>(conn)?;

        Ok(total)
    }

    pub fn record_verdict(
        conn: &SqliteConnection,
        guess: i32,
        matched: Option<i32>,
        reasoning: &str,
    ) -> Result<(), Error> {
        use crate::schema::guesses::dsl::{ai_reasoning, judge_status, matched_option_id};

        diesel::update(guesses::table.find(guess))
            .set((
                matched_option_id.eq(matched),
                ai_reasoning.eq(Some(reasoning)),
                judge_status.eq(JudgeStatus::Graded.as_str()),
            ))
            .execute(conn)?;

        Ok(())
    }

    pub fn mark_ungraded(conn: &SqliteConnection, guess: i32, reason: &str) -> Result<(), Error> {
        use crate::schema::guesses::dsl::{ai_reasoning, judge_status, matched_option_id};

        diesel::update(guesses::table.find(guess))
            .set((
                matched_option_id.eq(None::<i32>),
                ai_reasoning.eq(Some(reason)),
                judge_status.eq(JudgeStatus::Ungraded.as_str()),
            ))
            .execute(conn)?;

        Ok(())
    }
}
