use std::collections::HashMap;

use actix_web::web::{block, Data, Json, Path};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{MissionCompletion, Player},
    DbPool,
};
use errors::Error;

/// Stays snake_case like the other stored rows the client reads.
#[derive(Debug, Deserialize, Serialize)]
pub struct CompletionEntry {
    pub id: i32,
    pub player_id: i32,
    pub involved_player_id: i32,
    pub involved_player_name: String,
    pub completed_at: NaiveDateTime,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CompletionsResponse {
    pub completions: Vec<CompletionEntry>,
}

pub async fn completions(
    pool: Data<DbPool>,
    player_id: Path<i32>,
) -> Result<Json<CompletionsResponse>, Error> {
    let player_id = player_id.into_inner();

    let (completions, names) = block(move || {
        let conn = get_conn(&pool)?;
        let completions = MissionCompletion::find_by_player(&conn, player_id)?;
        let names: HashMap<i32, String> = Player::find_all(&conn)?
            .into_iter()
            .map(|p| (p.id, p.name))
            .collect();
        Ok::<_, Error>((completions, names))
    })
    .await??;

    let completions = completions
        .into_iter()
        .map(|completion| CompletionEntry {
            involved_player_name: names
                .get(&completion.involved_player_id)
                .cloned()
                .unwrap_or_default(),
            id: completion.id,
            player_id: completion.player_id,
            involved_player_id: completion.involved_player_id,
            completed_at: completion.completed_at,
        })
        .collect();

    Ok(Json(CompletionsResponse { completions }))
}

#[cfg(test)]
mod tests {
    use db::models::{MissionCompletion, Player};

    use crate::tests::helpers::{get, TestContext};

    use super::CompletionsResponse;

    #[actix_rt::test]
    async fn test_completions_name_the_other_player() {
        let ctx = TestContext::new();
        let conn = ctx.conn();
        let katherine = Player::create(&conn, "Katherine", 2, false).unwrap();
        let olivia = Player::create(&conn, "Olivia", 3, false).unwrap();
        MissionCompletion::create(&conn, katherine.id, olivia.id).unwrap();

        let (status, body): (u16, CompletionsResponse) =
            get(&ctx, &format!("/api/missions/completions/{}", katherine.id)).await;
        assert_eq!(status, 200);
        assert_eq!(body.completions.len(), 1);
        assert_eq!(body.completions[0].involved_player_name, "Olivia");

        let (_, body): (u16, CompletionsResponse) =
            get(&ctx, &format!("/api/missions/completions/{}", olivia.id)).await;
        assert!(body.completions.is_empty());
    }
}
