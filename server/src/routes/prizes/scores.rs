use actix_web::web::{block, Data, Json};

use db::{get_conn, DbPool};
use errors::Error;

use super::finished_state;
use crate::handlers::{load_scoreboard, ScoresResponse};

pub async fn scores(pool: Data<DbPool>) -> Result<Json<ScoresResponse>, Error> {
    let res = block(move || {
        let conn = get_conn(&pool)?;
        let state = finished_state(&conn)?;
        load_scoreboard(&conn, &state)
    })
    .await??;

    Ok(Json(res))
}

#[cfg(test)]
mod tests {
    use db::models::{
        GameState, GeneratedOption, Guess, MissionCompletion, OptionKind, Player, Selection,
        TeamNameWinner,
    };
    use errors::ErrorResponse;

    use crate::handlers::ScoresResponse;
    use crate::tests::helpers::{get, TestContext};

    #[actix_rt::test]
    async fn test_scores_hidden_until_finished() {
        let ctx = TestContext::new();
        let (status, body): (u16, ErrorResponse) = get(&ctx, "/api/prizes/scores").await;
        assert_eq!(status, 400);
        assert_eq!(body.error, "Game not finished yet");
    }

    #[actix_rt::test]
    async fn test_scoreboard() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let emily = Player::create(&conn, "Emily", 1, false).unwrap();
        let neal = Player::create(&conn, "Neal", 1, false).unwrap();
        let alex = Player::create(&conn, "Alex", 3, false).unwrap();
        Player::log_in(&conn, neal.id, Some("Jingle Jammers")).unwrap();

        let texts = vec!["Cracks knuckles".to_string(), "Hums".to_string()];
        let options =
            GeneratedOption::create_all(&conn, OptionKind::Tell, alex.id, &texts).unwrap();
        Selection::select(&conn, OptionKind::Tell, alex.id, options[0].id).unwrap();

        GameState::start(&conn).unwrap();
        let right = Guess::submit(&conn, emily.id, alex.id, "knuckles").unwrap();
        let wrong = Guess::submit(&conn, neal.id, alex.id, "humming").unwrap();
        Guess::record_verdict(&conn, right.id, Some(options[0].id), "Knuckles.").unwrap();
        Guess::record_verdict(&conn, wrong.id, Some(options[1].id), "Humming.").unwrap();
        MissionCompletion::create(&conn, neal.id, alex.id).unwrap();
        MissionCompletion::create(&conn, neal.id, emily.id).unwrap();
        GameState::set_team_name_winners(
            &conn,
            &[TeamNameWinner {
                player_id: neal.id,
                player_name: "Neal".to_string(),
                team: 1,
                suggestion: "Jingle Jammers".to_string(),
                reasoning: "Catchy.".to_string(),
            }],
        )
        .unwrap();
        GameState::end(&conn).unwrap();

        let (status, body): (u16, ScoresResponse) = get(&ctx, "/api/prizes/scores").await;
        assert_eq!(status, 200);

        let points: Vec<(&str, i64)> = body
            .players
            .iter()
            .map(|p| (p.name.as_str(), p.total_points))
            .collect();
        // guesses were made moments before the end, so no early bonus
        assert_eq!(points, vec![("Neal", 4), ("Alex", 1), ("Emily", 1)]);

        assert_eq!(body.teams[0].team, 1);
        assert_eq!(body.teams[0].total_points, 5);
        assert_eq!(body.team_name_winners[0].suggestion, "Jingle Jammers");
        assert_eq!(body.all_team_name_suggestions.len(), 1);
        assert_eq!(body.all_team_name_suggestions[0].name, "Neal");
    }
}
