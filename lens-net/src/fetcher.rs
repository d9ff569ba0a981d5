//! Resilient GET with bounded retry
//!
//! Retries HTTP 429, any 5xx and transport failures with exponential
//! backoff. Other 4xx responses fail immediately. The fetcher keeps no
//! mutable state between calls, so one instance can serve concurrent
//! requests.

use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, Response, StatusCode};
use std::fmt;
use std::time::Duration;
use tracing::{debug, warn};

use crate::{create_client, FetchConfig, FetchError};

/// What a failed attempt observed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttemptOutcome {
    Status(u16),
    Transport(String),
}

/// One failed attempt, used only to drive and report the retry loop
#[derive(Debug, Clone)]
pub struct FetchAttempt {
    pub url: String,
    /// 1-based
    pub attempt: u32,
    pub max_attempts: u32,
    pub outcome: AttemptOutcome,
    pub delay: Duration,
}

impl fmt::Display for FetchAttempt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cause = match &self.outcome {
            AttemptOutcome::Status(status) => format!("HTTP {}", status),
            AttemptOutcome::Transport(err) => err.clone(),
        };
        write!(
            f,
            "{} from {} - retrying in {:.1}s (attempt {}/{})",
            cause,
            self.url,
            self.delay.as_secs_f64(),
            self.attempt,
            self.max_attempts
        )
    }
}

/// Delay before the retry that follows attempt `attempt` (0-based).
/// A server-provided `Retry-After` can only lengthen the wait.
pub fn backoff_delay(base: Duration, attempt: u32, retry_after: Option<u64>) -> Duration {
    let computed = base.saturating_mul(2u32.saturating_pow(attempt));
    match retry_after {
        Some(secs) => computed.max(Duration::from_secs(secs)),
        None => computed,
    }
}

/// Integer `Retry-After` seconds; HTTP-date forms are ignored
fn parse_retry_after(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
}

/// HTTP fetcher with bounded retry
#[derive(Debug, Clone)]
pub struct Fetcher {
    client: Client,
    config: FetchConfig,
}

impl Fetcher {
    pub fn new(config: FetchConfig) -> Result<Self, FetchError> {
        let client = create_client(&config)?;
        Ok(Self { client, config })
    }

    pub fn with_defaults() -> Result<Self, FetchError> {
        Self::new(FetchConfig::default())
    }

    pub fn config(&self) -> &FetchConfig {
        &self.config
    }

    /// GET with the fixed header set
    pub async fn get(&self, url: &str) -> Result<Response, FetchError> {
        self.get_with_headers(url, HeaderMap::new()).await
    }

    /// GET with caller headers overriding the fixed set
    pub async fn get_with_headers(
        &self,
        url: &str,
        headers: HeaderMap,
    ) -> Result<Response, FetchError> {
        let max_attempts = self.config.max_attempts.max(1);
        let mut attempt = 0;

        loop {
            debug!("GET {} (attempt {}/{})", url, attempt + 1, max_attempts);

            let (failure, outcome, retry_after) =
                match self.client.get(url).headers(headers.clone()).send().await {
                    Ok(response) => {
                        let status = response.status();
                        if status == StatusCode::TOO_MANY_REQUESTS {
                            let retry_after = parse_retry_after(response.headers());
                            (
                                FetchError::RateLimited {
                                    url: url.to_string(),
                                    retry_after,
                                },
                                AttemptOutcome::Status(status.as_u16()),
                                retry_after,
                            )
                        } else if status.is_server_error() {
                            (
                                FetchError::Server {
                                    url: url.to_string(),
                                    status: status.as_u16(),
                                },
                                AttemptOutcome::Status(status.as_u16()),
                                None,
                            )
                        } else if status.is_client_error() {
                            return Err(FetchError::Http {
                                url: url.to_string(),
                                status: status.as_u16(),
                            });
                        } else {
                            return Ok(response);
                        }
                    }
                    Err(e) => {
                        let outcome = AttemptOutcome::Transport(e.to_string());
                        (
                            FetchError::Transport {
                                url: url.to_string(),
                                source: e,
                            },
                            outcome,
                            None,
                        )
                    }
                };

            if attempt + 1 >= max_attempts {
                return Err(failure);
            }

            let record = FetchAttempt {
                url: url.to_string(),
                attempt: attempt + 1,
                max_attempts,
                outcome,
                delay: backoff_delay(self.config.base_delay, attempt, retry_after),
            };
            warn!(
                attempt = record.attempt,
                delay_ms = record.delay.as_millis() as u64,
                "{}",
                record
            );
            tokio::time::sleep(record.delay).await;
            attempt += 1;
        }
    }

    /// GET and read the body as text
    pub async fn get_text(&self, url: &str) -> Result<String, FetchError> {
        self.get(url)
            .await?
            .text()
            .await
            .map_err(|e| FetchError::Body {
                url: url.to_string(),
                source: e,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, header_regex, headers, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn fast_fetcher() -> Fetcher {
        Fetcher::new(FetchConfig::default().with_base_delay(Duration::from_millis(1))).unwrap()
    }

    #[test]
    fn test_backoff_delay_doubles() {
        let base = Duration::from_secs(3);
        assert_eq!(backoff_delay(base, 0, None), Duration::from_secs(3));
        assert_eq!(backoff_delay(base, 1, None), Duration::from_secs(6));
        assert_eq!(backoff_delay(base, 4, None), Duration::from_secs(48));
    }

    #[test]
    fn test_backoff_delay_respects_retry_after() {
        let base = Duration::from_secs(3);
        assert_eq!(backoff_delay(base, 0, Some(20)), Duration::from_secs(20));
        // Retry-After never shortens the computed wait
        assert_eq!(backoff_delay(base, 2, Some(1)), Duration::from_secs(12));
    }

    #[test]
    fn test_parse_retry_after() {
        let mut headers = HeaderMap::new();
        headers.insert(RETRY_AFTER, "17".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), Some(17));

        headers.insert(RETRY_AFTER, "Wed, 21 Oct 2015 07:28:00 GMT".parse().unwrap());
        assert_eq!(parse_retry_after(&headers), None);
    }

    #[test]
    fn test_attempt_display() {
        let attempt = FetchAttempt {
            url: "https://example.com".to_string(),
            attempt: 2,
            max_attempts: 5,
            outcome: AttemptOutcome::Status(503),
            delay: Duration::from_secs(6),
        };
        assert_eq!(
            attempt.to_string(),
            "HTTP 503 from https://example.com - retrying in 6.0s (attempt 2/5)"
        );
    }

    #[tokio::test]
    async fn test_persistent_429_uses_all_attempts() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/limited"))
            .respond_with(ResponseTemplate::new(429))
            .expect(5)
            .mount(&server)
            .await;

        let err = fast_fetcher()
            .get(&format!("{}/limited", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::RateLimited { .. }));
    }

    #[tokio::test]
    async fn test_recovers_after_transient_429() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(429))
            .up_to_n_times(2)
            .expect(2)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/flaky"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let body = fast_fetcher()
            .get_text(&format!("{}/flaky", server.uri()))
            .await
            .unwrap();

        assert_eq!(body, "ok");
    }

    #[tokio::test]
    async fn test_server_errors_are_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/down"))
            .respond_with(ResponseTemplate::new(503))
            .expect(3)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(
            FetchConfig::default()
                .with_base_delay(Duration::from_millis(1))
                .with_max_attempts(3),
        )
        .unwrap();
        let err = fetcher
            .get(&format!("{}/down", server.uri()))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(503));
        assert!(matches!(err, FetchError::Server { .. }));
    }

    #[tokio::test]
    async fn test_permanent_4xx_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        let err = fast_fetcher()
            .get(&format!("{}/missing", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Http { status: 404, .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_reports_last_error() {
        let fetcher = Fetcher::new(
            FetchConfig::default()
                .with_base_delay(Duration::from_millis(1))
                .with_max_attempts(2),
        )
        .unwrap();

        // Nothing listens on port 9 of localhost
        let err = fetcher.get("http://127.0.0.1:9/").await.unwrap_err();
        assert!(matches!(err, FetchError::Transport { .. }));
    }

    #[tokio::test]
    async fn test_rate_limit_reports_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/slow-down"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "7"))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(
            FetchConfig::default()
                .with_base_delay(Duration::from_millis(1))
                .with_max_attempts(1),
        )
        .unwrap();
        let err = fetcher
            .get(&format!("{}/slow-down", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            FetchError::RateLimited {
                retry_after: Some(7),
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_retry_waits_for_retry_after() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/wait"))
            .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "1"))
            .up_to_n_times(1)
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/wait"))
            .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
            .expect(1)
            .mount(&server)
            .await;

        let started = std::time::Instant::now();
        let body = fast_fetcher()
            .get_text(&format!("{}/wait", server.uri()))
            .await
            .unwrap();

        assert_eq!(body, "ok");
        // 1ms base delay, so the wait comes from the header
        assert!(started.elapsed() >= Duration::from_secs(1));
    }

    #[tokio::test]
    async fn test_zero_attempts_still_makes_one_request() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/once"))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        let fetcher = Fetcher::new(
            FetchConfig::default()
                .with_base_delay(Duration::from_millis(1))
                .with_max_attempts(0),
        )
        .unwrap();
        let err = fetcher
            .get(&format!("{}/once", server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Server { status: 503, .. }));
    }

    #[tokio::test]
    async fn test_fixed_headers_are_sent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/headers"))
            .and(headers("accept-language", vec!["en-US", "en;q=0.9"]))
            .and(header_regex("user-agent", r"Mozilla/5\.0|Chrome/"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let response = fast_fetcher()
            .get(&format!("{}/headers", server.uri()))
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_caller_headers_override_fixed_set() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/override"))
            .and(header("accept-language", "de-DE"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::ACCEPT_LANGUAGE, "de-DE".parse().unwrap());
        let response = fast_fetcher()
            .get_with_headers(&format!("{}/override", server.uri()), headers)
            .await
            .unwrap();
        assert!(response.status().is_success());
    }
}
