//! BigQuery REST client
//!
//! Runs a statement through `jobs.query` and drains the result through
//! `jobs.getQueryResults`, polling while the job is still running and
//! following page tokens until the last page.

use super::models::{ErrorResponse, JobReference, QueryRequest, QueryResponse, TableRow};
use crate::config::{BigQueryConfig, SecretString};
use crate::domain::{QuarryError, Result, SourceError, SourceResult};
use reqwest::{Client, ClientBuilder, RequestBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::time::{Duration, Instant};

/// BigQuery REST API client
pub struct BigQueryClient {
    client: Client,
    base_url: String,
    project_id: String,
    access_token: Option<SecretString>,
    location: Option<String>,
    page_size: u32,
    query_timeout_ms: u64,
    deadline: Duration,
}

impl BigQueryClient {
    /// Create a new client
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built.
    pub fn new(config: &BigQueryConfig) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| QuarryError::Configuration(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            access_token: config.access_token.clone(),
            location: config.location.clone(),
            page_size: config.page_size,
            query_timeout_ms: config.query_timeout_ms,
            deadline: Duration::from_secs(config.timeout_seconds),
        })
    }

    /// Billing project
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Run `sql` and return every result row
    ///
    /// # Errors
    ///
    /// Returns the classified error of the first failing request, or
    /// [`SourceError::Timeout`] if the job does not complete within the
    /// configured timeout. Paging through a completed job's results is
    /// bounded only by the per-request timeout.
    pub async fn run_query(&self, sql: &str) -> SourceResult<Vec<TableRow>> {
        let started = Instant::now();
        let request = QueryRequest {
            query: sql.to_string(),
            use_legacy_sql: false,
            request_id: uuid::Uuid::new_v4().to_string(),
            max_results: self.page_size,
            timeout_ms: self.query_timeout_ms,
            location: self.location.clone(),
        };

        tracing::debug!(sql = %sql, request_id = %request.request_id, "Submitting BigQuery job");

        let url = format!("{}/projects/{}/queries", self.base_url, self.project_id);
        let mut response = self.send(self.client.post(&url).json(&request)).await?;
        let mut rows = Vec::new();

        loop {
            let page_token = if response.job_complete {
                rows.append(&mut response.rows);
                match response.page_token.take() {
                    Some(token) => Some(token),
                    None => break,
                }
            } else {
                // Only the wait for the job is bounded; result pages are not
                if started.elapsed() >= self.deadline {
                    return Err(SourceError::Timeout(format!(
                        "BigQuery job did not finish within {}s",
                        self.deadline.as_secs()
                    )));
                }
                None
            };

            let job = response.job_reference.clone().ok_or_else(|| {
                SourceError::InvalidResponse("response is missing jobReference".to_string())
            })?;

            tracing::debug!(
                job_id = %job.job_id,
                job_complete = response.job_complete,
                rows_so_far = rows.len(),
                "Polling BigQuery query results"
            );

            response = self.get_query_results(&job, page_token.as_deref()).await?;
            if response.job_reference.is_none() {
                response.job_reference = Some(job);
            }
        }

        Ok(rows)
    }

    async fn get_query_results(
        &self,
        job: &JobReference,
        page_token: Option<&str>,
    ) -> SourceResult<QueryResponse> {
        let url = format!(
            "{}/projects/{}/queries/{}",
            self.base_url, job.project_id, job.job_id
        );

        let mut params = vec![
            ("maxResults", self.page_size.to_string()),
            ("timeoutMs", self.query_timeout_ms.to_string()),
        ];
        if let Some(location) = job.location.as_ref().or(self.location.as_ref()) {
            params.push(("location", location.clone()));
        }
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        self.send(self.client.get(&url).query(&params)).await
    }

    async fn send(&self, mut request: RequestBuilder) -> SourceResult<QueryResponse> {
        if let Some(ref token) = self.access_token {
            request = request.bearer_auth(token.expose_secret().as_str());
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(e.to_string())
            } else {
                SourceError::Connectivity(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_status(status, &body));
        }

        response.json::<QueryResponse>().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(e.to_string())
            } else {
                SourceError::InvalidResponse(format!("Failed to decode BigQuery response: {e}"))
            }
        })
    }
}

/// Map a non-2xx response to a [`SourceError`]
fn classify_status(status: StatusCode, body: &str) -> SourceError {
    let parsed = serde_json::from_str::<ErrorResponse>(body).ok();
    let message = match parsed {
        Some(ref e) if !e.error.message.is_empty() => e.error.message.clone(),
        _ => body.chars().take(500).collect(),
    };
    let message = format!("HTTP {}: {}", status.as_u16(), message);

    // Quota and rate limits come back as 403 with a reason code
    let throttled = parsed.as_ref().is_some_and(|e| {
        e.error.errors.iter().any(|item| {
            matches!(
                item.reason.as_str(),
                "rateLimitExceeded" | "quotaExceeded" | "backendError"
            )
        })
    });
    if throttled {
        return SourceError::Unavailable(message);
    }

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => SourceError::Authorization(message),
        StatusCode::BAD_REQUEST | StatusCode::NOT_FOUND => SourceError::MalformedRequest(message),
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => SourceError::Timeout(message),
        StatusCode::TOO_MANY_REQUESTS => SourceError::Unavailable(message),
        s if s.is_server_error() => SourceError::Unavailable(message),
        _ => SourceError::InvalidResponse(message),
    }
}
