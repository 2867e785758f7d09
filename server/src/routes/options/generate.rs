use actix_web::web::{block, Data, Json, Path};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GeneratedOption, OptionKind, Player},
    DbPool,
};
use errors::Error;
use generator::{prompts::EXISTING_OPTIONS_LIMIT, ContentGenerator};

use crate::handlers::upstream;

#[derive(Debug, Deserialize, Serialize)]
pub struct GenerateResponse {
    pub options: Vec<GeneratedOption>,
    pub cached: bool,
}

/// Options are generated once per player. Later calls hand back the stored set.
pub async fn generate(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
    kind: Data<OptionKind>,
    player_id: Path<i32>,
) -> Result<Json<GenerateResponse>, Error> {
    let kind = *kind.get_ref();
    let player_id = player_id.into_inner();

    let load_pool = pool.clone();
    let (player, stored, existing) = block(move || {
        let conn = get_conn(&load_pool)?;
        let player = Player::find_by_id(&conn, player_id)?;
        let stored = GeneratedOption::find_by_player(&conn, kind, player_id)?;
        let existing =
            GeneratedOption::recent_texts(&conn, kind, EXISTING_OPTIONS_LIMIT as i64)?;
        Ok::<_, Error>((player, stored, existing))
    })
    .await??;

    if !stored.is_empty() {
        return Ok(Json(GenerateResponse {
            options: stored,
            cached: true,
        }));
    }

    let texts = match kind {
        OptionKind::Tell => {
            generator::generate_tell_options(generator.get_ref(), &player.name, &existing).await
        }
        OptionKind::Mission => {
            generator::generate_mission_options(generator.get_ref(), &player.name, &existing).await
        }
    }
    .map_err(|err| {
        error!("Could not generate {} options for {} - {}", kind, player.name, err);
        upstream(err)
    })?;

    let options = block(move || {
        let conn = get_conn(&pool)?;
        GeneratedOption::create_all(&conn, kind, player_id, &texts)
    })
    .await??;

    info!("Generated {} {} options for {}", options.len(), kind, player.name);

    Ok(Json(GenerateResponse {
        options,
        cached: false,
    }))
}
