use actix_web::web::Json;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

#[cfg(test)]
mod tests {
    use crate::tests::helpers::{get, TestContext};

    use super::HealthResponse;

    #[actix_rt::test]
    async fn test_health() {
        let ctx = TestContext::new();
        let (status, body): (u16, HealthResponse) = get(&ctx, "/api/health").await;
        assert_eq!(status, 200);
        assert_eq!(body.status, "ok");
    }
}
