use actix_web::web::{block, Data, Json, Path};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{OptionKind, Selection},
    DbPool,
};
use errors::Error;

/// `text` is always present. The kind-specific `tellText` / `missionText` key carries
/// the same value for older clients.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectedOption {
    pub id: i32,
    pub option_id: i32,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tell_text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mission_text: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SelectedResponse {
    pub selected: Option<SelectedOption>,
}

pub async fn selected(
    pool: Data<DbPool>,
    kind: Data<OptionKind>,
    player_id: Path<i32>,
) -> Result<Json<SelectedResponse>, Error> {
    let kind = *kind.get_ref();
    let player_id = player_id.into_inner();

    let found = block(move || {
        let conn = get_conn(&pool)?;
        Selection::find_with_option(&conn, kind, player_id)
    })
    .await??;

    let selected = found.map(|(selection, option)| SelectedOption {
        id: selection.id,
        option_id: option.id,
        tell_text: Some(option.option_text.clone()).filter(|_| kind == OptionKind::Tell),
        mission_text: Some(option.option_text.clone()).filter(|_| kind == OptionKind::Mission),
        text: option.option_text,
        image_url: selection.image_url,
    });

    Ok(Json(SelectedResponse { selected }))
}

#[cfg(test)]
mod tests {
    use serde_json::Value;

    use db::models::{GeneratedOption, OptionKind, Player, Selection};

    use crate::tests::helpers::{get, TestContext};

    #[actix_rt::test]
    async fn test_selected_mission() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let player = Player::create(&conn, "Jemima", 3, false).unwrap();
        let route = format!("/api/missions/selected/{}", player.id);

        let (status, body): (u16, Value) = get(&ctx, &route).await;
        assert_eq!(status, 200);
        assert!(body["selected"].is_null());

        let texts = vec!["Get a high five".to_string()];
        let options =
            GeneratedOption::create_all(&conn, OptionKind::Mission, player.id, &texts).unwrap();
        Selection::select(&conn, OptionKind::Mission, player.id, options[0].id).unwrap();

        let (_, body): (u16, Value) = get(&ctx, &route).await;
        let selected = &body["selected"];
        assert_eq!(selected["text"], "Get a high five");
        assert_eq!(selected["missionText"], "Get a high five");
        assert!(selected.get("tellText").is_none());
        assert!(selected["imageUrl"].is_null());
    }
}
