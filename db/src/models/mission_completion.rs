use chrono::NaiveDateTime;
use diesel::{self, ExpressionMethods, QueryDsl, RunQueryDsl, SqliteConnection};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::schema::mission_completions;

#[derive(Clone, Debug, Deserialize, Identifiable, Queryable, Serialize)]
pub struct MissionCompletion {
    pub id: i32,
    pub player_id: i32,
    pub involved_player_id: i32,
    pub completed_at: NaiveDateTime,
}

#[derive(Insertable)]
#[table_name = "mission_completions"]
struct NewMissionCompletion {
    player_id: i32,
    involved_player_id: i32,
}

impl MissionCompletion {
    pub fn create(
        conn: &SqliteConnection,
        player: i32,
        involved: i32,
    ) -> Result<MissionCompletion, Error> {
        use crate::schema::mission_completions::dsl::{involved_player_id, player_id};

        if player == involved {
            return Err(Error::BadRequest(
                "Cannot complete mission with yourself".into(),
            ));
        }

        if MissionCompletion::exists(conn, player, involved)? {
            return Err(Error::BadRequest(
                "Already completed mission with this person".into(),
            ));
        }

        diesel::insert_into(mission_completions::table)
            .values(NewMissionCompletion {
                player_id: player,
                involved_player_id: involved,
            })
            .execute(conn)
            .map_err(|err| match err {
                diesel::result::Error::DatabaseError(
                    diesel::result::DatabaseErrorKind::UniqueViolation,
                    _,
                ) => Error::BadRequest("Already completed mission with this person".into()),
                _ => err.into(),
            })?;

        let completion = mission_completions::table
            .filter(player_id.eq(player))
            .filter(involved_player_id.eq(involved))
            .first::<MissionCompletion>(conn)?;

        Ok(completion)
    }

    pub fn exists(conn: &SqliteConnection, player: i32, involved: i32) -> Result<bool, Error> {
        use crate::schema::mission_completions::dsl::{
            involved_player_id, mission_completions, player_id,
        };

        let total = mission_completions
            .filter(player_id.eq(player))
            .filter(involved_player_id.eq(involved))
            .count()
            .get_result::<i64>(conn)?;

        Ok(total > 0)
    }

    pub fn count_by_player(conn: &SqliteConnection, player: i32) -> Result<i64, Error> {
        use crate::schema::mission_completions::dsl::{mission_completions, player_id};

        let total = mission_completions
            .filter(player_id.eq(player))
            .count()
            .get_result::<i64>(conn)?;

        Ok(total)
    }

    /// Newest first.
    pub fn find_by_player(
        conn: &SqliteConnection,
        player: i32,
    ) -> Result<Vec<MissionCompletion>, Error> {
        use crate::schema::mission_completions::dsl::{
            completed_at, id, mission_completions, player_id,
        };

        let results = mission_completions
            .filter(player_id.eq(player))
            .order((completed_at.desc(), id.desc()))
            .load::<MissionCompletion>(conn)?;

        Ok(results)
    }

    pub fn find_all(conn: &SqliteConnection) -> Result<Vec<MissionCompletion>, Error> {
        use crate::schema::mission_completions::dsl::{id, mission_completions};

        let results = mission_completions
            .order(id.asc())
            .load::<MissionCompletion>(conn)?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use errors::Error;

    use super::MissionCompletion;
    use crate::models::Player;
    use crate::test_helpers::test_conn;

    #[test]
    fn test_completion_once_per_pair() {
        let conn = test_conn();
        let player = Player::create(&conn, "David", 1, false).unwrap();
        let first = Player::create(&conn, "Rosanne", 2, false).unwrap();
        let second = Player::create(&conn, "Elaine", 3, false).unwrap();

        MissionCompletion::create(&conn, player.id, first.id).unwrap();
        assert_eq!(
            MissionCompletion::create(&conn, player.id, first.id).unwrap_err(),
            Error::BadRequest("Already completed mission with this person".to_string())
        );
        MissionCompletion::create(&conn, player.id, second.id).unwrap();
        // the reverse pair is a different completion
        MissionCompletion::create(&conn, first.id, player.id).unwrap();

        assert_eq!(MissionCompletion::count_by_player(&conn, player.id).unwrap(), 2);
        let newest = &MissionCompletion::find_by_player(&conn, player.id).unwrap()[0];
        assert_eq!(newest.involved_player_id, second.id);
        assert_eq!(MissionCompletion::find_all(&conn).unwrap().len(), 3);
    }

    #[test]
    fn test_cannot_complete_with_self() {
        let conn = test_conn();
        let player = Player::create(&conn, "Emily", 1, false).unwrap();
        assert!(MissionCompletion::create(&conn, player.id, player.id).is_err());
        assert!(!MissionCompletion::exists(&conn, player.id, player.id).unwrap());
    }
}
