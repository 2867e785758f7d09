use actix_web::{web, HttpResponse};

use db::models::OptionKind;
use errors::{Error, ErrorResponse};

use crate::middleware::Auth;

pub mod admin;
pub mod game;
pub mod guesses;
pub mod health;
pub mod missions;
pub mod options;
pub mod prizes;
pub mod session;
pub mod tells;

pub async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::from("Not Found"))
}

fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .error_handler(|err, _req| Error::BadRequest(err.to_string()).into())
}

fn path_config() -> web::PathConfig {
    web::PathConfig::default()
        .error_handler(|err, _req| Error::BadRequest(err.to_string()).into())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.app_data(json_config()).app_data(path_config()).service(
        web::scope("/api")
            .wrap(Auth)
            .route("/health", web::get().to(health::health))
            .service(
                web::scope("/auth")
                    .route("/login", web::post().to(session::login))
                    .route("/logout", web::post().to(session::logout))
                    .route("/session/{player_id}", web::get().to(session::session))
                    .route("/players", web::get().to(session::players)),
            )
            .service(
                web::scope("/game")
                    .route("/state", web::get().to(game::state))
                    .route("/players", web::get().to(game::players)),
            )
            .service(
                web::scope("/tells")
                    .app_data(web::Data::new(OptionKind::Tell))
                    .configure(options::routes)
                    .route("/all-options/{player_id}", web::get().to(tells::all_options)),
            )
            .service(
                web::scope("/missions")
                    .app_data(web::Data::new(OptionKind::Mission))
                    .configure(options::routes)
                    .route("/complete", web::post().to(missions::complete))
                    .route("/completions/{player_id}", web::get().to(missions::completions))
                    .route(
                        "/available-players/{player_id}",
                        web::get().to(missions::available_players),
                    ),
            )
            .service(
                web::scope("/guesses")
                    .route("/submit", web::post().to(guesses::submit))
                    .route("/mine/{player_id}", web::get().to(guesses::mine))
                    .route("/about-me/{player_id}", web::get().to(guesses::about_me)),
            )
            .service(
                web::scope("/admin")
                    .route("/status", web::get().to(admin::status))
                    .route("/start-game", web::post().to(admin::start_game))
                    .route("/end-game", web::post().to(admin::end_game))
                    .route("/restart", web::post().to(admin::restart)),
            )
            .service(
                web::scope("/prizes")
                    .route("/scores", web::get().to(prizes::scores))
                    .route("/reveals", web::get().to(prizes::reveals))
                    .route("/fun-awards", web::get().to(prizes::fun_awards))
                    .route("/judge-team-names", web::post().to(prizes::judge_team_names)),
            ),
    );
}
