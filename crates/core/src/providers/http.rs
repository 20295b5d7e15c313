//! HTTP helpers shared by the network-backed adapters.

use std::time::Duration;

use reqwest::{Client, Response, StatusCode};

use super::ProviderError;

/// User agent sent to every provider.
pub const USER_AGENT: &str = concat!("imagebus/", env!("CARGO_PKG_VERSION"));

pub(crate) fn default_timeout_secs() -> u32 {
    15
}

pub(crate) fn build_client(timeout_secs: u32, user_agent: &str) -> Result<Client, ProviderError> {
    Ok(Client::builder()
        .timeout(Duration::from_secs(timeout_secs as u64))
        .user_agent(user_agent)
        .build()?)
}

/// Map non-success statuses to provider errors.
pub(crate) async fn check_status(provider: &str, response: Response) -> Result<Response, ProviderError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ProviderError::Unauthorized),
        StatusCode::TOO_MANY_REQUESTS => {
            let retry_after_ms = response
                .headers()
                .get(reqwest::header::RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
                .map(|secs| secs * 1000)
                .unwrap_or(60_000);
            Err(ProviderError::RateLimited {
                provider: provider.to_string(),
                retry_after_ms,
            })
        }
        _ => {
            let body = response.text().await.unwrap_or_default();
            Err(ProviderError::ApiError {
                status: status.as_u16(),
                message: body.chars().take(200).collect(),
            })
        }
    }
}

/// Resolve an optional base URL override, without a trailing slash.
pub(crate) fn base_url(configured: Option<&str>, default: &str) -> String {
    configured.unwrap_or(default).trim_end_matches('/').to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{CannedResponse, CannedServer};

    #[test]
    fn test_base_url_override() {
        assert_eq!(
            base_url(None, "https://api.pexels.com/v1"),
            "https://api.pexels.com/v1"
        );
        assert_eq!(
            base_url(Some("http://127.0.0.1:9000/"), "https://api.pexels.com/v1"),
            "http://127.0.0.1:9000"
        );
    }

    #[test]
    fn test_user_agent_has_version() {
        assert!(USER_AGENT.starts_with("imagebus/"));
    }

    async fn status_for(response: CannedResponse) -> Result<Response, ProviderError> {
        let server = CannedServer::start(response).await.unwrap();
        let client = build_client(5, USER_AGENT).unwrap();
        let response = client.get(server.base_url()).send().await.unwrap();
        check_status("unsplash", response).await
    }

    #[tokio::test]
    async fn test_success_passes_through() {
        let response = status_for(CannedResponse::json("{}")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_auth_failures_map_to_unauthorized() {
        for code in [401, 403] {
            let result = status_for(CannedResponse::new(code)).await;
            assert!(
                matches!(result, Err(ProviderError::Unauthorized)),
                "status {} should be Unauthorized",
                code
            );
        }
    }

    #[tokio::test]
    async fn test_too_many_requests_reads_retry_after() {
        let result = status_for(CannedResponse::new(429).with_header("Retry-After", "30")).await;
        match result {
            Err(ProviderError::RateLimited {
                provider,
                retry_after_ms,
            }) => {
                assert_eq!(provider, "unsplash");
                assert_eq!(retry_after_ms, 30_000);
            }
            other => panic!("Expected RateLimited, got {:?}", other.map(|r| r.status())),
        }

        let result = status_for(CannedResponse::new(429)).await;
        assert!(matches!(
            result,
            Err(ProviderError::RateLimited {
                retry_after_ms: 60_000,
                ..
            })
        ));
    }

    #[tokio::test]
    async fn test_other_failures_map_to_api_error() {
        let body = "x".repeat(500);
        let result = status_for(CannedResponse::new(503).with_body(body)).await;
        match result {
            Err(ProviderError::ApiError { status, message }) => {
                assert_eq!(status, 503);
                assert_eq!(message.len(), 200);
            }
            other => panic!("Expected ApiError, got {:?}", other.map(|r| r.status())),
        }
    }
}
