use actix_web::web::{block, Data, Json, Path};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{GeneratedOption, OptionKind},
    DbPool,
};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
pub struct OptionsResponse {
    pub options: Vec<GeneratedOption>,
}

pub async fn list(
    pool: Data<DbPool>,
    kind: Data<OptionKind>,
    player_id: Path<i32>,
) -> Result<Json<OptionsResponse>, Error> {
    let kind = *kind.get_ref();
    let player_id = player_id.into_inner();

    let options = block(move || {
        let conn = get_conn(&pool)?;
        GeneratedOption::find_by_player(&conn, kind, player_id)
    })
    .await??;

    Ok(Json(OptionsResponse { options }))
}
