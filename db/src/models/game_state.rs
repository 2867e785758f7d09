use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, Utc};
use diesel::{self, Connection, ExpressionMethods, QueryDsl, RunQueryDsl, SqliteConnection};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use errors::Error;

const GAME_STATE_ID: i32 = 1;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GameStatus {
    Setup,
    Active,
    Finished,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GameStatus::Setup => "setup",
            GameStatus::Active => "active",
            GameStatus::Finished => "finished",
        }
    }
}

impl fmt::Display for GameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GameStatus {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "setup" => Ok(GameStatus::Setup),
            "active" => Ok(GameStatus::Active),
            "finished" => Ok(GameStatus::Finished),
            _ => Err(Error::InternalServerError(format!(
                "Unknown game status {}",
                value
            ))),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamNameWinner {
    pub player_id: i32,
    pub player_name: String,
    pub team: i32,
    pub suggestion: String,
    pub reasoning: String,
}

#[derive(Clone, Debug, Deserialize, Queryable, Serialize)]
pub struct GameState {
    pub id: i32,
    pub status: String,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub team_name_winners: Option<String>,
    pub fun_awards: Option<String>,
}

impl GameState {
    pub fn get(conn: &SqliteConnection) -> Result<GameState, Error> {
        use crate::schema::game_state::dsl::game_state;

        let state = game_state.find(GAME_STATE_ID).first::<GameState>(conn)?;

        Ok(state)
    }

    pub fn status(&self) -> Result<GameStatus, Error> {
        self.status.parse()
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.status(), Ok(GameStatus::Finished))
    }

    /// Moves `from` to `to`, stamping `started_at` or `ended_at`.
    fn transition(
        conn: &SqliteConnection,
        from: GameStatus,
        to: GameStatus,
    ) -> Result<GameState, Error> {
        use crate::schema::game_state::dsl::{ended_at, game_state, started_at, status};

        let now = Utc::now().naive_utc();
        let target = game_state
            .find(GAME_STATE_ID)
            .filter(status.eq(from.as_str()));

        let updated = match to {
            GameStatus::Active => diesel::update(target)
                .set((status.eq(to.as_str()), started_at.eq(Some(now))))
                .execute(conn)?,
            GameStatus::Finished => diesel::update(target)
                .set((status.eq(to.as_str()), ended_at.eq(Some(now))))
                .execute(conn)?,
            GameStatus::Setup => diesel::update(target)
                .set(status.eq(to.as_str()))
                .execute(conn)?,
        };

        if updated == 0 {
            let current = GameState::get(conn)?;
            return Err(Error::BadRequest(format!(
                "Game is {}, expected {}",
                current.status, from
            )));
        }

        GameState::get(conn)
    }

    pub fn start(conn: &SqliteConnection) -> Result<GameState, Error> {
        GameState::transition(conn, GameStatus::Setup, GameStatus::Active)
    }

    pub fn end(conn: &SqliteConnection) -> Result<GameState, Error> {
        GameState::transition(conn, GameStatus::Active, GameStatus::Finished)
    }

    pub fn team_name_winners(&self) -> Vec<TeamNameWinner> {
        match &self.team_name_winners {
            Some(json) => serde_json::from_str(json).unwrap_or_else(|err| {
                error!("Failed to parse team_name_winners - {}", err);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    /// Awards are stored as the JSON the generator produced them in.
    pub fn fun_awards<T: DeserializeOwned>(&self) -> Vec<T> {
        match &self.fun_awards {
            Some(json) => serde_json::from_str(json).unwrap_or_else(|err| {
                error!("Failed to parse fun_awards - {}", err);
                Vec::new()
            }),
            None => Vec::new(),
        }
    }

    pub fn set_team_name_winners(
        conn: &SqliteConnection,
        winners: &[TeamNameWinner],
    ) -> Result<(), Error> {
        use crate::schema::game_state::dsl::{game_state, team_name_winners};

        let json = serde_json::to_string(winners)?;
        diesel::update(game_state.find(GAME_STATE_ID))
            .set(team_name_winners.eq(Some(json)))
            .execute(conn)?;

        Ok(())
    }

    pub fn set_fun_awards<T: Serialize>(
        conn: &SqliteConnection,
        awards: &[T],
    ) -> Result<(), Error> {
        use crate::schema::game_state::dsl::{fun_awards, game_state};

        let json = serde_json::to_string(awards)?;
        diesel::update(game_state.find(GAME_STATE_ID))
            .set(fun_awards.eq(Some(json)))
            .execute(conn)?;

        Ok(())
    }

    /// Wipes every per-game table, logs everyone out and puts the game back into setup.
    pub fn reset(conn: &SqliteConnection) -> Result<(), Error> {
        use crate::schema::{
            game_state, generated_options, guesses, mission_completions, players, selections,
        };

        conn.transaction::<(), Error, _>(|| {
            diesel::delete(guesses::table).execute(conn)?;
            diesel::delete(mission_completions::table).execute(conn)?;
            diesel::delete(selections::table).execute(conn)?;
            diesel::delete(generated_options::table).execute(conn)?;

            diesel::update(players::table)
                .set((
                    players::is_logged_in.eq(false),
                    players::team_name_suggestion.eq(None::<String>),
                    players::logged_in_at.eq(None::<NaiveDateTime>),
                ))
                .execute(conn)?;

            diesel::update(game_state::table.find(GAME_STATE_ID))
                .set((
                    game_state::status.eq(GameStatus::Setup.as_str()),
                    game_state::started_at.eq(None::<NaiveDateTime>),
                    game_state::ended_at.eq(None::<NaiveDateTime>),
                    game_state::team_name_winners.eq(None::<String>),
                    game_state::fun_awards.eq(None::<String>),
                ))
                .execute(conn)?;

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use errors::Error;

    use super::{GameState, GameStatus, TeamNameWinner};
    use crate::test_helpers::test_conn;

    #[test]
    fn test_lifecycle() {
        let conn = test_conn();
        let state = GameState::get(&conn).unwrap();
        assert_eq!(state.status().unwrap(), GameStatus::Setup);
        assert!(state.started_at.is_none());

        let state = GameState::start(&conn).unwrap();
        assert_eq!(state.status().unwrap(), GameStatus::Active);
        assert!(state.started_at.is_some());

        assert_eq!(
            GameState::start(&conn).unwrap_err(),
            Error::BadRequest("Game is active, expected setup".to_string())
        );

        let state = GameState::end(&conn).unwrap();
        assert!(state.is_finished());
        assert!(state.ended_at.is_some());
    }

    #[test]
    fn test_cannot_end_before_start() {
        let conn = test_conn();
        assert!(GameState::end(&conn).is_err());
    }

    #[test]
    fn test_stored_json_round_trips() {
        let conn = test_conn();
        let winners = vec![TeamNameWinner {
            player_id: 3,
            player_name: "Elaine".to_string(),
            team: 3,
            suggestion: "Snow Patrol".to_string(),
            reasoning: "Only one.".to_string(),
        }];
        GameState::set_team_name_winners(&conn, &winners).unwrap();
        GameState::set_fun_awards(
            &conn,
            &[json!({ "name": "Elaine", "award": "Quiet Storm", "reason": "Never spotted." })],
        )
        .unwrap();

        let state = GameState::get(&conn).unwrap();
        assert_eq!(state.team_name_winners(), winners);
        assert_eq!(state.fun_awards::<Value>()[0]["award"], "Quiet Storm");
    }

    #[test]
    fn test_unparseable_winners_are_empty() {
        let state = GameState {
            id: 1,
            status: "finished".to_string(),
            started_at: None,
            ended_at: None,
            team_name_winners: Some("not json".to_string()),
            fun_awards: None,
        };
        assert!(state.team_name_winners().is_empty());
        assert!(state.fun_awards::<Value>().is_empty());
    }
}
