use std::env;

use generator::OpenAiConfig;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_GAME_PASSWORD: &str = "secret-agents";

/// Process configuration, read once at startup. `DATABASE_URL` is read by the db crate.
#[derive(Clone, Debug)]
pub struct Settings {
    pub bind_address: String,
    pub game_password: String,
    pub client_host: Option<String>,
    pub openai: OpenAiConfig,
}

fn non_blank(key: &str) -> Option<String> {
    env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

impl Settings {
    pub fn from_env() -> Self {
        Settings {
            bind_address: non_blank("BIND_ADDRESS")
                .unwrap_or_else(|| DEFAULT_BIND_ADDRESS.to_string()),
            game_password: non_blank("GAME_PASSWORD")
                .unwrap_or_else(|| DEFAULT_GAME_PASSWORD.to_string()),
            client_host: non_blank("CLIENT_HOST"),
            openai: OpenAiConfig::from_env(),
        }
    }
}
