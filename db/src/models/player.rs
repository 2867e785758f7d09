use chrono::{NaiveDateTime, Utc};
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl, SqliteConnection};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::schema::players;

#[derive(Clone, Debug, Deserialize, Identifiable, Queryable, Serialize)]
pub struct Player {
    pub id: i32,
    pub name: String,
    pub team_number: i32,
    pub is_admin: bool,
    pub is_logged_in: bool,
    pub logged_in_at: Option<NaiveDateTime>,
    pub team_name_suggestion: Option<String>,
    pub created_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "players"]
pub struct NewPlayer<'a> {
    pub name: &'a str,
    pub team_number: i32,
    pub is_admin: bool,
}

impl Player {
    pub fn create(
        conn: &SqliteConnection,
        name: &str,
        team_number: i32,
        is_admin: bool,
    ) -> Result<Player, Error> {
        diesel::insert_into(players::table)
            .values(NewPlayer {
                name,
                team_number,
                is_admin,
            })
            .execute(conn)?;

        Player::find_by_name(conn, name)
    }

    pub fn find_by_id(conn: &SqliteConnection, player_id: i32) -> Result<Player, Error> {
        use crate::schema::players::dsl::players;

        players
            .find(player_id)
            .first::<Player>(conn)
            .map_err(|err| match err {
                diesel::result::Error::NotFound => Error::NotFound("Player not found".into()),
                _ => err.into(),
            })
    }

    pub fn find_by_name(conn: &SqliteConnection, player_name: &str) -> Result<Player, Error> {
        use crate::schema::players::dsl::{name, players};

        players
            .filter(name.eq(player_name))
            .first::<Player>(conn)
            .map_err(|err| match err {
                diesel::result::Error::NotFound => Error::NotFound("Player not found".into()),
                _ => err.into(),
            })
    }

    pub fn find_all(conn: &SqliteConnection) -> Result<Vec<Player>, Error> {
        use crate::schema::players::dsl::{name, players};

        let results = players.order(name.asc()).load::<Player>(conn)?;

        Ok(results)
    }

    pub fn count(conn: &SqliteConnection) -> Result<i64, Error> {
        use crate::schema::players::dsl::players;

        let total = players.count().get_result::<i64>(conn)?;

        Ok(total)
    }

    /// Marks the player as logged in. A blank suggestion keeps the stored one.
    pub fn log_in(
        conn: &SqliteConnection,
        player_id: i32,
        suggestion: Option<&str>,
    ) -> Result<Player, Error> {
        use crate::schema::players::dsl::{
            is_logged_in, logged_in_at, players, team_name_suggestion,
        };

        let now = Utc::now().naive_utc();
        let suggestion = suggestion.map(str::trim).filter(|s| !s.is_empty());

        match suggestion {
            Some(suggestion) => diesel::update(players.find(player_id))
                .set((
                    is_logged_in.eq(true),
                    logged_in_at.eq(Some(now)),
                    team_name_suggestion.eq(Some(suggestion)),
                ))
                .execute(conn)?,
            None => diesel::update(players.find(player_id))
                .set((is_logged_in.eq(true), logged_in_at.eq(Some(now))))
                .execute(conn)?,
        };

        Player::find_by_id(conn, player_id)
    }

    pub fn log_out(conn: &SqliteConnection, player_id: i32) -> Result<(), Error> {
        use crate::schema::players::dsl::{is_logged_in, players};

        let updated = diesel::update(players.find(player_id))
            .set(is_logged_in.eq(false))
            .execute(conn)?;

        if updated == 0 {
            return Err(Error::NotFound("Player not found".into()));
        }

        Ok(())
    }

    /// Players with a non-blank team name suggestion, ordered by team then name.
    pub fn with_team_name_suggestions(conn: &SqliteConnection) -> Result<Vec<Player>, Error> {
        use crate::schema::players::dsl::{name, players, team_name_suggestion, team_number};

        let results = players
            .filter(team_name_suggestion.is_not_null())
            .filter(team_name_suggestion.ne(""))
            .order((team_number.asc(), name.asc()))
            .load::<Player>(conn)?;

        Ok(results)
    }
}
