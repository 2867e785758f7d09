use std::env;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{CompletionRequest, ContentGenerator, Error};

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_TEXT_MODEL: &str = "gpt-4o";
const DEFAULT_IMAGE_MODEL: &str = "dall-e-3";
const PLACEHOLDER_KEY: &str = "sk-your-api-key-here";

#[derive(Clone, Debug, PartialEq)]
pub struct OpenAiConfig {
    pub api_key: Option<String>,
    pub base_url: String,
    pub text_model: String,
    pub image_model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        OpenAiConfig {
            api_key: None,
            base_url: DEFAULT_BASE_URL.to_string(),
            text_model: DEFAULT_TEXT_MODEL.to_string(),
            image_model: DEFAULT_IMAGE_MODEL.to_string(),
        }
    }
}

impl OpenAiConfig {
    /// Reads `OPENAI_API_KEY`, `OPENAI_BASE_URL`, `OPENAI_TEXT_MODEL` and
    /// `OPENAI_IMAGE_MODEL`. A blank or placeholder key counts as missing.
    pub fn from_env() -> Self {
        let defaults = OpenAiConfig::default();
        let api_key = env::var("OPENAI_API_KEY")
            .ok()
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty() && key != PLACEHOLDER_KEY);

        OpenAiConfig {
            api_key,
            base_url: env::var("OPENAI_BASE_URL").unwrap_or(defaults.base_url),
            text_model: env::var("OPENAI_TEXT_MODEL").unwrap_or(defaults.text_model),
            image_model: env::var("OPENAI_IMAGE_MODEL").unwrap_or(defaults.image_model),
        }
    }
}

/// OpenAI-compatible chat completion and image generation client.
#[derive(Clone)]
pub struct OpenAi {
    client: reqwest::Client,
    config: OpenAiConfig,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    response_format: ResponseFormat,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    n: u8,
    size: &'static str,
    quality: &'static str,
    response_format: &'static str,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

impl OpenAi {
    pub fn new(config: OpenAiConfig) -> Result<Self, Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| Error::Network(e.to_string()))?;

        Ok(OpenAi { client, config })
    }

    pub fn is_configured(&self) -> bool {
        self.config.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str, Error> {
        self.config.api_key.as_deref().ok_or(Error::NoApiKey)
    }

    async fn post<T: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &T,
    ) -> Result<reqwest::Response, Error> {
        let api_key = self.api_key()?;
        let response = self
            .client
            .post(format!("{}{}", self.config.base_url.trim_end_matches('/'), path))
            .bearer_auth(api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let message = response.text().await.unwrap_or_default();
            return Err(Error::Api { status, message });
        }

        Ok(response)
    }
}

#[async_trait]
impl ContentGenerator for OpenAi {
    async fn complete_json(&self, request: CompletionRequest) -> Result<Value, Error> {
        let body = ChatRequest {
            model: &self.config.text_model,
            messages: vec![ChatMessage {
                role: "user",
                content: &request.prompt,
            }],
            response_format: ResponseFormat {
                kind: "json_object",
            },
            temperature: request.temperature,
        };

        let response: ChatResponse = self
            .post("/chat/completions", &body)
            .await?
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(Error::EmptyResponse)?;

        debug!("completion: {}", content);
        serde_json::from_str(&content).map_err(|e| Error::Parse(e.to_string()))
    }

    async fn generate_image(&self, prompt: &str) -> Result<String, Error> {
        let body = ImageRequest {
            model: &self.config.image_model,
            prompt,
            n: 1,
            size: "1024x1024",
            quality: "standard",
            response_format: "b64_json",
        };

        let response: ImageResponse = self
            .post("/images/generations", &body)
            .await?
            .json()
            .await
            .map_err(|e| Error::Parse(e.to_string()))?;

        let image = response
            .data
            .into_iter()
            .next()
            .and_then(|data| data.b64_json)
            .ok_or(Error::EmptyResponse)?;

        Ok(format!("data:image/png;base64,{}", image))
    }
}
