//! HTTP plumbing shared by the lookup clients

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::NomenclatorError;

const USER_AGENT: &str = concat!("nomenclator/", env!("CARGO_PKG_VERSION"));

/// Build a client with the given request timeout
pub fn build_client(timeout_seconds: u32) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_seconds.into()))
        .user_agent(USER_AGENT)
        .build()
        .with_context(|| "Failed to create HTTP client")
}

/// Send a GET request and decode a JSON body, mapping failures to API errors.
///
/// `service` names the API in error messages; `url` is only logged with the
/// query string stripped since it carries the access key.
pub async fn get_json<T: DeserializeOwned>(client: &Client, service: &str, url: &str) -> Result<T> {
    let start_time = Instant::now();
    debug!(service, endpoint = redact(url), "Sending request");

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| NomenclatorError::api(format!("request to {service} failed: {e}")))?;

    let response = check_status(service, response).await?;

    let body = response
        .json::<T>()
        .await
        .with_context(|| format!("Failed to decode {service} response body"))?;

    let elapsed = start_time.elapsed();
    debug!(service, elapsed_ms = elapsed.as_millis() as u64, "Request finished");
    if elapsed.as_secs() > 5 {
        warn!("Slow {} response: {:.3}s", service, elapsed.as_secs_f64());
    }

    Ok(body)
}

async fn check_status(service: &str, response: Response) -> Result<Response, NomenclatorError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let message = match status {
        StatusCode::UNAUTHORIZED => format!("{service} rejected the API key (HTTP 401)"),
        StatusCode::TOO_MANY_REQUESTS => format!("{service} rate limit exceeded (HTTP 429)"),
        _ => {
            let body = response.text().await.unwrap_or_default();
            format!(
                "non 2xx response from {service}: {} {}",
                status,
                body.chars().take(200).collect::<String>()
            )
        }
    };

    warn!("{}", message);
    Err(NomenclatorError::api(message.trim_end().to_string()))
}

fn redact(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_redact_strips_query() {
        assert_eq!(
            redact("http://api.positionstack.com/v1/reverse?access_key=secret"),
            "http://api.positionstack.com/v1/reverse"
        );
        assert_eq!(redact("http://localhost/ping"), "http://localhost/ping");
    }

    #[test]
    fn test_build_client() {
        assert!(build_client(10).is_ok());
    }
}
