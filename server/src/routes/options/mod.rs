//! Routes shared by tells and missions. The enclosing scope registers which
//! [`OptionKind`](db::models::OptionKind) they act on as app data.

use actix_web::web;

mod generate;
mod list;
mod select;
mod selected;

pub use self::generate::*;
pub use self::list::*;
pub use self::select::*;
pub use self::selected::*;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/options/{player_id}", web::get().to(list))
        .route("/generate/{player_id}", web::post().to(generate))
        .route("/select", web::post().to(select))
        .route("/selected/{player_id}", web::get().to(selected));
}
