use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use diesel::{self, Connection, ExpressionMethods, QueryDsl, RunQueryDsl, SqliteConnection};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::schema::generated_options;

/// The two things a player picks for themselves: a tell other agents try to spot,
/// and a mission they try to complete with someone.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Tell,
    Mission,
}

impl OptionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OptionKind::Tell => "tell",
            OptionKind::Mission => "mission",
        }
    }
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OptionKind {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "tell" => Ok(OptionKind::Tell),
            "mission" => Ok(OptionKind::Mission),
            _ => Err(Error::BadRequest(format!("Unknown option kind {}", value))),
        }
    }
}

#[derive(Clone, Debug, Deserialize, Identifiable, Queryable, Serialize)]
pub struct GeneratedOption {
    pub id: i32,
    pub player_id: i32,
    pub kind: String,
    pub option_text: String,
    pub option_number: i32,
    pub is_selected: bool,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "generated_options"]
struct NewGeneratedOption<'a> {
    player_id: i32,
    kind: &'a str,
    option_text: &'a str,
    option_number: i32,
}

impl GeneratedOption {
    pub fn find_by_id(conn: &SqliteConnection, option_id: i32) -> Result<GeneratedOption, Error> {
        use crate::schema::generated_options::dsl::generated_options;

        generated_options
            .find(option_id)
            .first::<GeneratedOption>(conn)
            .map_err(|err| match err {
                diesel::result::Error::NotFound => Error::NotFound("Option not found".into()),
                _ => err.into(),
            })
    }

    pub fn find_by_player(
        conn: &SqliteConnection,
        kind_value: OptionKind,
        player: i32,
    ) -> Result<Vec<GeneratedOption>, Error> {
        use crate::schema::generated_options::dsl::{
            generated_options, kind, option_number, player_id,
        };

        let results = generated_options
            .filter(player_id.eq(player))
            .filter(kind.eq(kind_value.as_str()))
            .order(option_number.asc())
            .load::<GeneratedOption>(conn)?;

        Ok(results)
    }

    pub fn find_all(
        conn: &SqliteConnection,
        kind_value: OptionKind,
    ) -> Result<Vec<GeneratedOption>, Error> {
        use crate::schema::generated_options::dsl::{
            generated_options, kind, option_number, player_id,
        };

        let results = generated_options
            .filter(kind.eq(kind_value.as_str()))
            .order((player_id.asc(), option_number.asc()))
            .load::<GeneratedOption>(conn)?;

        Ok(results)
    }

    /// The most recent option texts of a kind, across all players.
    pub fn recent_texts(
        conn: &SqliteConnection,
        kind_value: OptionKind,
        limit: i64,
    ) -> Result<Vec<String>, Error> {
        use crate::schema::generated_options::dsl::{generated_options, id, kind, option_text};

        let results = generated_options
            .select(option_text)
            .filter(kind.eq(kind_value.as_str()))
            .order(id.desc())
            .limit(limit)
            .load::<String>(conn)?;

        Ok(results)
    }

    /// Stores freshly generated options for a player. If another request already stored a
    /// set for this player, that set is returned and `texts` is discarded.
    pub fn create_all(
        conn: &SqliteConnection,
        kind_value: OptionKind,
        player: i32,
        texts: &[String],
    ) -> Result<Vec<GeneratedOption>, Error> {
        conn.transaction::<Vec<GeneratedOption>, Error, _>(|| {
            let existing = GeneratedOption::find_by_player(conn, kind_value, player)?;
            if !existing.is_empty() {
                return Ok(existing);
            }

            let rows: Vec<NewGeneratedOption> = texts
                .iter()
                .enumerate()
                .map(|(i, text)| NewGeneratedOption {
                    player_id: player,
                    kind: kind_value.as_str(),
                    option_text: text,
                    option_number: i as i32 + 1,
                })
                .collect();

            diesel::insert_into(generated_options::table)
                .values(&rows)
                .execute(conn)?;

            GeneratedOption::find_by_player(conn, kind_value, player)
        })
    }

    /// Flags `option` as the player's pick and clears the flag on their other options.
    pub fn mark_selected(conn: &SqliteConnection, option: &GeneratedOption) -> Result<(), Error> {
        use crate::schema::generated_options::dsl::{
            generated_options, id, is_selected, kind, player_id,
        };

        diesel::update(
            generated_options
                .filter(player_id.eq(option.player_id))
                .filter(kind.eq(option.kind.as_str())),
        )
        .set(is_selected.eq(false))
        .execute(conn)?;

        diesel::update(generated_options.filter(id.eq(option.id)))
            .set(is_selected.eq(true))
            .execute(conn)?;

        Ok(())
    }
}
