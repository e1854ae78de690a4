//! GCM legacy HTTP sender.

use std::time::Duration;

use push_core::Error;

use crate::{GcmMessage, GcmResponse, GcmResult, GcmSettings, GcmTransport, PROVIDER};

/// Most registration ids the gateway accepts in one request.
pub const MAX_RECIPIENTS: usize = 1000;

const INITIAL_BACKOFF: Duration = Duration::from_secs(1);

/// HTTP sender for the GCM legacy API.
///
/// Retries whole requests on network errors and 5xx answers, and resends
/// only the recipients whose result is `Unavailable` or
/// `InternalServerError`. Backoff doubles after every attempt.
pub struct HttpSender {
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    backoff: Duration,
}

#[derive(serde::Serialize)]
struct SendRequest<'a> {
    registration_ids: &'a [String],
    #[serde(flatten)]
    message: &'a GcmMessage,
}

/// Failure of one HTTP attempt.
struct AttemptError {
    error: Error,
    retryable: bool,
}

impl AttemptError {
    fn retryable(source: impl Into<push_core::BoxError>) -> Self {
        Self {
            error: Error::transport(PROVIDER, source),
            retryable: true,
        }
    }

    fn fatal(source: impl Into<push_core::BoxError>) -> Self {
        Self {
            error: Error::transport(PROVIDER, source),
            retryable: false,
        }
    }
}

impl HttpSender {
    /// Create a sender bound to the configured API key.
    pub fn connect(settings: &GcmSettings) -> Result<Self, Error> {
        if settings.server_api_key.trim().is_empty() {
            return Err(Error::connection_setup(PROVIDER, "server API key is empty"));
        }

        let client = reqwest::Client::builder()
            .build()
            .map_err(|e| Error::connection_setup(PROVIDER, e))?;

        tracing::info!(endpoint = settings.endpoint(), "GCM sender ready");

        Ok(Self {
            client,
            api_key: settings.server_api_key.clone(),
            endpoint: settings.endpoint().to_string(),
            backoff: INITIAL_BACKOFF,
        })
    }

    /// Set the delay before the first retry.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    async fn post(
        &self,
        message: &GcmMessage,
        registration_ids: &[String],
    ) -> Result<GcmResponse, AttemptError> {
        let request = SendRequest {
            registration_ids,
            message,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("key={}", self.api_key),
            )
            .json(&request)
            .send()
            .await
            .map_err(AttemptError::retryable)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = format!("gateway returned {status}: {body}");
            return Err(if status.is_server_error() {
                AttemptError::retryable(message)
            } else {
                AttemptError::fatal(message)
            });
        }

        let parsed: GcmResponse = response.json().await.map_err(AttemptError::fatal)?;
        if parsed.results.len() != registration_ids.len() {
            return Err(AttemptError::fatal(format!(
                "gateway returned {} results for {} registration ids",
                parsed.results.len(),
                registration_ids.len()
            )));
        }

        Ok(parsed)
    }

    async fn send_chunk(
        &self,
        message: &GcmMessage,
        registration_ids: &[String],
        retries: u32,
    ) -> Result<GcmResponse, Error> {
        let mut results: Vec<Option<GcmResult>> = vec![None; registration_ids.len()];
        let mut pending: Vec<usize> = (0..registration_ids.len()).collect();
        let mut multicast_id = None;
        let mut backoff = self.backoff;
        let mut attempt = 0;
        let mut answered = false;

        loop {
            let batch: Vec<String> = pending
                .iter()
                .map(|&i| registration_ids[i].clone())
                .collect();

            match self.post(message, &batch).await {
                Ok(response) => {
                    answered = true;
                    multicast_id = multicast_id.or(response.multicast_id);

                    let mut retry = Vec::new();
                    for (&index, result) in pending.iter().zip(response.results) {
                        if result.is_retryable() && attempt < retries {
                            retry.push(index);
                        }
                        results[index] = Some(result);
                    }

                    if retry.is_empty() {
                        break;
                    }
                    tracing::debug!(count = retry.len(), attempt, "resending unavailable recipients");
                    pending = retry;
                }
                Err(failure) => {
                    // Every recipient already has an outcome from an earlier answer.
                    if answered {
                        tracing::warn!(error = %failure.error, attempt, "GCM resend failed, keeping earlier results");
                        break;
                    }
                    if !failure.retryable || attempt >= retries {
                        return Err(failure.error);
                    }
                    tracing::warn!(error = %failure.error, attempt, "GCM request failed, retrying");
                }
            }

            attempt += 1;
            tokio::time::sleep(backoff).await;
            backoff *= 2;
        }

        let results: Vec<GcmResult> = results
            .into_iter()
            .map(|result| result.unwrap_or_else(|| GcmResult::error("Unavailable")))
            .collect();
        let failure = results.iter().filter(|r| r.error_code().is_some()).count() as u64;

        Ok(GcmResponse {
            multicast_id,
            success: results.len() as u64 - failure,
            failure,
            canonical_ids: results
                .iter()
                .filter(|r| r.registration_id.is_some())
                .count() as u64,
            results,
        })
    }
}

impl GcmTransport for HttpSender {
    async fn send(
        &self,
        message: &GcmMessage,
        registration_ids: &[String],
        retries: u32,
    ) -> Result<GcmResponse, Error> {
        let chunks = registration_ids
            .chunks(MAX_RECIPIENTS)
            .map(|chunk| self.send_chunk(message, chunk, retries));
        let responses = futures::future::try_join_all(chunks).await?;

        let mut merged = GcmResponse::default();
        for response in responses {
            merged.multicast_id = merged.multicast_id.or(response.multicast_id);
            merged.success += response.success;
            merged.failure += response.failure;
            merged.canonical_ids += response.canonical_ids;
            merged.results.extend(response.results);
        }

        Ok(merged)
    }
}
