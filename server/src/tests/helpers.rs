use std::collections::VecDeque;
use std::path::Path;
use std::sync::{Arc, Mutex};

use actix_web::{test, web, App};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tempfile::TempDir;

use auth::GamePassword;
use db::{get_conn, new_pool_with_url, run_migrations, Connection, DbPool};
use generator::{CompletionRequest, ContentGenerator, Error as GeneratorError};

use crate::routes::{not_found, routes};

pub const TEST_PASSWORD: &str = "mistletoe";
pub const FAKE_IMAGE: &str = "data:image/png;base64,ZmFrZQ==";

/// Answers completions from a script, in order, and records every prompt it was sent.
/// Once the script runs out every completion fails.
#[derive(Default)]
pub struct FakeGenerator {
    responses: Mutex<VecDeque<Result<Value, GeneratorError>>>,
    prompts: Mutex<Vec<String>>,
}

impl FakeGenerator {
    pub fn scripted(responses: Vec<Result<Value, GeneratorError>>) -> Self {
        FakeGenerator {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, response: Result<Value, GeneratorError>) {
        self.responses.lock().unwrap().push_back(response);
    }

    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContentGenerator for FakeGenerator {
    async fn complete_json(&self, request: CompletionRequest) -> Result<Value, GeneratorError> {
        self.prompts.lock().unwrap().push(request.prompt);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GeneratorError::EmptyResponse))
    }

    async fn generate_image(&self, _prompt: &str) -> Result<String, GeneratorError> {
        Ok(FAKE_IMAGE.to_string())
    }
}

/// A migrated throwaway database plus the generator the app under test talks to.
/// The database directory is removed when the context is dropped.
pub struct TestContext {
    pub pool: DbPool,
    pub generator: Arc<FakeGenerator>,
    dir: TempDir,
}

impl TestContext {
    pub fn new() -> Self {
        TestContext::with_generator(FakeGenerator::default())
    }

    pub fn with_responses(responses: Vec<Result<Value, GeneratorError>>) -> Self {
        TestContext::with_generator(FakeGenerator::scripted(responses))
    }

    fn with_generator(generator: FakeGenerator) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("game.db");
        let pool = new_pool_with_url(path.to_str().unwrap()).unwrap();
        run_migrations(&get_conn(&pool).unwrap()).unwrap();

        TestContext {
            pool,
            generator: Arc::new(generator),
            dir,
        }
    }

    pub fn db_dir(&self) -> &Path {
        self.dir.path()
    }

    pub fn conn(&self) -> Connection {
        get_conn(&self.pool).unwrap()
    }

    pub fn pool_data(&self) -> web::Data<DbPool> {
        web::Data::new(self.pool.clone())
    }

    pub fn generator_data(&self) -> web::Data<dyn ContentGenerator> {
        let generator: Arc<dyn ContentGenerator> = self.generator.clone();
        web::Data::from(generator)
    }

    fn configure(&self) -> impl FnOnce(&mut web::ServiceConfig) {
        let pool = self.pool_data();
        let generator = self.generator_data();

        move |cfg: &mut web::ServiceConfig| {
            cfg.app_data(pool)
                .app_data(generator)
                .app_data(web::Data::new(GamePassword::new(TEST_PASSWORD)));
            routes(cfg);
        }
    }
}

fn read_json<R: DeserializeOwned>(body: &[u8], status: u16) -> R {
    serde_json::from_slice(body).unwrap_or_else(|_| {
        panic!(
            "read_response_json failed during deserialization. response: {} status: {}",
            String::from_utf8(body.to_vec())
                .unwrap_or_else(|_| "Could not convert Bytes -> String".to_string()),
            status
        )
    })
}

/// Helper for HTTP GET integration tests
pub async fn test_get<R>(ctx: &TestContext, route: &str, token: Option<&str>) -> (u16, R)
where
    R: DeserializeOwned,
{
    let app = test::init_service(
        App::new()
            .configure(ctx.configure())
            .default_service(web::route().to(not_found)),
    )
    .await;

    let mut req = test::TestRequest::get().uri(route);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }

    let res = test::call_service(&app, req.to_request()).await;

    let status = res.status().as_u16();
    let body = test::read_body(res).await;

    (status, read_json(&body, status))
}

/// Helper for HTTP POST integration tests
pub async fn test_post<T: Serialize, R>(
    ctx: &TestContext,
    route: &str,
    params: T,
    token: Option<&str>,
) -> (u16, R)
where
    R: DeserializeOwned,
{
    let app = test::init_service(
        App::new()
            .configure(ctx.configure())
            .default_service(web::route().to(not_found)),
    )
    .await;

    let mut req = test::TestRequest::post().set_json(&params).uri(route);
    if let Some(token) = token {
        req = req.insert_header(("Authorization", format!("Bearer {}", token)));
    }

    let res = test::call_service(&app, req.to_request()).await;

    let status = res.status().as_u16();
    let body = test::read_body(res).await;

    (status, read_json(&body, status))
}

/// GET with the right password.
pub async fn get<R: DeserializeOwned>(ctx: &TestContext, route: &str) -> (u16, R) {
    test_get(ctx, route, Some(TEST_PASSWORD)).await
}

/// POST with the right password.
pub async fn post<T: Serialize, R: DeserializeOwned>(
    ctx: &TestContext,
    route: &str,
    params: T,
) -> (u16, R) {
    test_post(ctx, route, params, Some(TEST_PASSWORD)).await
}

#[core::prelude::v1::test]
fn test_context_removes_database_on_drop() {
    let ctx = TestContext::new();
    let dir = ctx.db_dir().to_path_buf();
    assert!(dir.join("game.db").exists());

    drop(ctx);
    assert!(!dir.exists());
}
