use actix_web::{
    rt,
    web::{block, Data},
};

use db::{
    get_conn,
    models::{GeneratedOption, OptionKind, Selection},
    DbPool,
};
use generator::ContentGenerator;

/// Draws the illustration for a freshly selected option and stores it on the selection,
/// unless the player has picked something else in the meantime.
pub async fn generate_selection_image(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
    kind: OptionKind,
    option: GeneratedOption,
) {
    let image = match kind {
        OptionKind::Tell => {
            generator::generate_tell_image(generator.get_ref(), &option.option_text).await
        }
        OptionKind::Mission => {
            generator::generate_mission_image(generator.get_ref(), &option.option_text).await
        }
    };

    let url = match image {
        Ok(url) => url,
        Err(err) => {
            error!("Image generation failed for {} option {} - {}", kind, option.id, err);
            return;
        }
    };

    let (player_id, option_id) = (option.player_id, option.id);
    let stored = block(move || {
        let conn = get_conn(&pool)?;
        Selection::set_image_url(&conn, kind, player_id, option_id, &url)
    })
    .await;

    match stored {
        Ok(Ok(true)) => info!("Stored {} image for player {}", kind, player_id),
        Ok(Ok(false)) => info!(
            "Player {} changed their {} before the image was ready, dropping it",
            player_id, kind
        ),
        Ok(Err(err)) => error!("Could not store {} image - {}", kind, err),
        Err(err) => error!("Could not store {} image - {}", kind, err),
    }
}

/// Fire and forget; the selecting request does not wait for the image.
pub fn spawn_selection_image(
    pool: Data<DbPool>,
    generator: Data<dyn ContentGenerator>,
    kind: OptionKind,
    option: GeneratedOption,
) {
    rt::spawn(generate_selection_image(pool, generator, kind, option));
}
