use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GameState, OptionKind, Selection},
    DbPool,
};
use errors::Error;
use generator::ContentGenerator;

use crate::handlers::spawn_selection_image;

#[derive(Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectRequest {
    pub player_id: i32,
    pub option_id: i32,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SelectResponse {
    pub success: bool,
    pub message: String,
}

/// Selections lock once the game is finished, since guesses were graded against them.
pub async fn select(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
    kind: Data<OptionKind>,
    params: Json<SelectRequest>,
) -> Result<Json<SelectResponse>, Error> {
    let kind = *kind.get_ref();
    let SelectRequest {
        player_id,
        option_id,
    } = params.into_inner();

    let select_pool = pool.clone();
    let (_, option) = block(move || {
        let conn = get_conn(&select_pool)?;

        if GameState::get(&conn)?.is_finished() {
            return Err(Error::BadRequest(
                "The game is over, selections are closed".to_string(),
            ));
        }

        Selection::select(&conn, kind, player_id, option_id)
    })
    .await??;

    spawn_selection_image(pool, generator, kind, option);

    Ok(Json(SelectResponse {
        success: true,
        message: "Image generating in background".to_string(),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use db::models::{GameState, GeneratedOption, OptionKind, Player, Selection};
    use errors::ErrorResponse;

    use crate::tests::helpers::{post, TestContext};

    use super::SelectResponse;

    #[actix_rt::test]
    async fn test_select_option() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let player = Player::create(&conn, "Emily", 1, false).unwrap();
        let texts = vec!["Winks".to_string(), "Shrugs".to_string()];
        let options =
            GeneratedOption::create_all(&conn, OptionKind::Tell, player.id, &texts).unwrap();

        let (status, body): (u16, SelectResponse) = post(
            &ctx,
            "/api/tells/select",
            json!({ "playerId": player.id, "optionId": options[1].id }),
        )
        .await;
        assert_eq!(status, 200);
        assert!(body.success);
        assert_eq!(body.message, "Image generating in background");

        let selection = Selection::find_by_player(&conn, OptionKind::Tell, player.id)
            .unwrap()
            .unwrap();
        assert_eq!(selection.option_id, options[1].id);
    }

    #[actix_rt::test]
    async fn test_option_must_match_scope_and_player() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let owner = Player::create(&conn, "Neal", 1, false).unwrap();
        let other = Player::create(&conn, "Adam", 2, true).unwrap();
        let texts = vec!["Whistles".to_string()];
        let options =
            GeneratedOption::create_all(&conn, OptionKind::Tell, owner.id, &texts).unwrap();

        let (status, body): (u16, ErrorResponse) = post(
            &ctx,
            "/api/tells/select",
            json!({ "playerId": other.id, "optionId": options[0].id }),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body.error, "Option does not belong to this player");

        // a tell option cannot be picked as a mission
        let (status, _): (u16, ErrorResponse) = post(
            &ctx,
            "/api/missions/select",
            json!({ "playerId": owner.id, "optionId": options[0].id }),
        )
        .await;
        assert_eq!(status, 400);

        let (status, body): (u16, ErrorResponse) = post(
            &ctx,
            "/api/tells/select",
            json!({ "playerId": owner.id, "optionId": 999 }),
        )
        .await;
        assert_eq!(status, 404);
        assert_eq!(body.error, "Option not found");
    }

    #[actix_rt::test]
    async fn test_closed_once_finished() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let player = Player::create(&conn, "Olivia", 3, false).unwrap();
        let texts = vec!["Twirls hair".to_string(), "Clears throat".to_string()];
        let options =
            GeneratedOption::create_all(&conn, OptionKind::Tell, player.id, &texts).unwrap();
        Selection::select(&conn, OptionKind::Tell, player.id, options[0].id).unwrap();
        GameState::start(&conn).unwrap();
        GameState::end(&conn).unwrap();

        let (status, body): (u16, ErrorResponse) = post(
            &ctx,
            "/api/tells/select",
            json!({ "playerId": player.id, "optionId": options[1].id }),
        )
        .await;
        assert_eq!(status, 400);
        assert_eq!(body.error, "The game is over, selections are closed");

        let selection = Selection::find_by_player(&conn, OptionKind::Tell, player.id)
            .unwrap()
            .unwrap();
        assert_eq!(selection.option_id, options[0].id);
    }
}
