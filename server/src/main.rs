#[macro_use]
extern crate log;

use std::io;
use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use dotenv::dotenv;

use auth::GamePassword;
use generator::{ContentGenerator, OpenAi};

mod handlers;
mod middleware;
mod routes;
mod scoring;
mod settings;
mod tests;
mod validate;

use crate::routes::{not_found, routes};
use crate::settings::Settings;

fn startup_error(err: impl ToString) -> io::Error {
    io::Error::new(io::ErrorKind::Other, err.to_string())
}

#[actix_rt::main]
async fn main() -> io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let settings = Settings::from_env();

    let pool = db::new_pool().map_err(startup_error)?;
    {
        let conn = db::get_conn(&pool).map_err(startup_error)?;
        db::run_migrations(&conn).map_err(startup_error)?;
    }

    let openai = OpenAi::new(settings.openai.clone()).map_err(startup_error)?;
    if !openai.is_configured() {
        warn!("OPENAI_API_KEY is not set, content generation will fail");
    }
    let generator: Arc<dyn ContentGenerator> = Arc::new(openai);

    let pool = web::Data::new(pool);
    let generator = web::Data::from(generator);
    let password = web::Data::new(GamePassword::new(settings.game_password.clone()));
    let client_host = settings.client_host.clone();

    info!("Listening on {}", settings.bind_address);

    HttpServer::new(move || {
        let cors = match &client_host {
            Some(host) => Cors::default()
                .allowed_origin(host)
                .allow_any_method()
                .allowed_headers(vec![
                    http::header::AUTHORIZATION,
                    http::header::ACCEPT,
                    http::header::CONTENT_TYPE,
                ])
                .max_age(3600),
            None => Cors::permissive(),
        };

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .app_data(pool.clone())
            .app_data(generator.clone())
            .app_data(password.clone())
            .configure(routes)
            .default_service(web::route().to(not_found))
    })
    .bind(&settings.bind_address)?
    .run()
    .await
}
