use actix_web::web::{block, Data, Json};
use serde::{Deserialize, Serialize};
use validator::Validate;

use auth::GamePassword;
use db::{get_conn, models::Player, DbPool};
use errors::Error;

use super::PlayerSummary;
use crate::validate::{not_blank, validate};

#[derive(Clone, Deserialize, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(custom = "not_blank")]
    pub name: String,
    #[validate(custom = "not_blank")]
    pub password: String,
    pub team_name_suggestion: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    pub player: PlayerSummary,
}

pub async fn login(
    pool: Data<DbPool>,
    password: Data<GamePassword>,
    params: Json<LoginRequest>,
) -> Result<Json<LoginResponse>, Error> {
    validate(&params)?;

    if !password.matches(&params.password) {
        return Err(Error::Unauthorized("Invalid password".to_string()));
    }

    let player = block(move || {
        let conn = get_conn(&pool)?;
        let player = Player::find_by_name(&conn, params.name.trim())?;
        Player::log_in(&conn, player.id, params.team_name_suggestion.as_deref())
    })
    .await??;

    info!("{} logged in", player.name);

    Ok(Json(LoginResponse {
        success: true,
        player: player.into(),
    }))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use db::models::Player;
    use errors::ErrorResponse;

    use crate::tests::helpers::{post, TestContext, TEST_PASSWORD};

    use super::LoginResponse;

    #[actix_rt::test]
    async fn test_login_stores_suggestion() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        Player::create(&conn, "Lizzy", 1, true).unwrap();

        let (status, body): (u16, LoginResponse) = post(
            &ctx,
            "/api/auth/login",
            json!({
                "name": "Lizzy",
                "password": TEST_PASSWORD,
                "teamNameSuggestion": "Tinsel Ninjas"
            }),
        )
        .await;
        assert_eq!(status, 200);
        assert!(body.success);
        assert_eq!(body.player.name, "Lizzy");
        assert!(body.player.is_admin);

        // logging in again without a suggestion keeps the first one
        let (status, _): (u16, LoginResponse) = post(
            &ctx,
            "/api/auth/login",
            json!({ "name": "Lizzy", "password": TEST_PASSWORD }),
        )
        .await;
        assert_eq!(status, 200);

        let player = Player::find_by_name(&conn, "Lizzy").unwrap();
        assert!(player.is_logged_in);
        assert_eq!(player.team_name_suggestion.as_deref(), Some("Tinsel Ninjas"));
    }

    #[actix_rt::test]
    async fn test_login_wrong_password() {
        let ctx = TestContext::new();
        Player::create(&ctx.conn(), "Ben", 2, false).unwrap();

        let (status, body): (u16, ErrorResponse) = post(
            &ctx,
            "/api/auth/login",
            json!({ "name": "Ben", "password": "holly" }),
        )
        .await;
        assert_eq!(status, 401);
        assert_eq!(body.error, "Invalid password");
    }

    #[actix_rt::test]
    async fn test_login_unknown_player() {
        let ctx = TestContext::new();

        let (status, body): (u16, ErrorResponse) = post(
            &ctx,
            "/api/auth/login",
            json!({ "name": "Rudolph", "password": TEST_PASSWORD }),
        )
        .await;
        assert_eq!(status, 404);
        assert_eq!(body.error, "Player not found");
    }

    #[actix_rt::test]
    async fn test_login_requires_name() {
        let ctx = TestContext::new();

        let (status, body): (u16, ErrorResponse) = post(
            &ctx,
            "/api/auth/login",
            json!({ "name": "  ", "password": TEST_PASSWORD }),
        )
        .await;
        assert_eq!(status, 422);
        assert_eq!(body.error, "name is required");
    }
}
