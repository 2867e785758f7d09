use actix_web::http::header::{HeaderMap, AUTHORIZATION};

use errors::Error;

const TOKEN_PREFIX: &str = "Bearer ";

/// The shared game password, handed to the bearer check and the login route.
#[derive(Clone, Debug)]
pub struct GamePassword(String);

impl GamePassword {
    pub fn new(password: impl Into<String>) -> Self {
        GamePassword(password.into())
    }

    pub fn matches(&self, candidate: &str) -> bool {
        constant_time_eq(self.0.as_bytes(), candidate.as_bytes())
    }
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Pulls the token out of an `Authorization: Bearer <token>` header.
pub fn get_bearer_token(headers: &HeaderMap) -> Result<String, Error> {
    let missing = || Error::Unauthorized("Authorization token required".to_string());

    let header = headers.get(AUTHORIZATION).ok_or_else(missing)?;
    let header = header.to_str().map_err(|_| missing())?;
    if !header.starts_with(TOKEN_PREFIX) {
        return Err(missing());
    }

    Ok(header[TOKEN_PREFIX.len()..].trim().to_string())
}

pub fn verify_request(headers: &HeaderMap, password: &GamePassword) -> Result<(), Error> {
    let token = get_bearer_token(headers)?;
    if token.is_empty() || !password.matches(&token) {
        return Err(Error::Unauthorized(
            "Invalid authorization token".to_string(),
        ));
    }

    Ok(())
}
