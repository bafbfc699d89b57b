//! Remote store backed by the questions HTTP endpoint.

use crate::config::Config;
use crate::error::{remote_error, Result};
use crate::wire::WireRecord;
use conference_engine::{Record, RemoteError, RemoteStore};
use reqwest::Response;
use url::Url;

/// Path of the questions collection, relative to the base URL.
pub const QUESTIONS_PATH: &str = "v1/questions";

/// Remote store speaking JSON over HTTP.
///
/// - `POST {base}/v1/questions` with a JSON array pushes a batch
/// - `GET {base}/v1/questions` returns the full JSON array
///
/// Each request is bounded by the configured timeout and never retried;
/// retry policy belongs to whoever calls `sync`.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::Client,
    endpoint: Url,
}

impl HttpRemote {
    /// Build a remote from configuration.
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()?;
        let endpoint = config.base_url.join(QUESTIONS_PATH)?;

        Ok(Self { client, endpoint })
    }

    /// Build a remote from `.env` and environment variables.
    pub fn from_env() -> Result<Self> {
        let config = Config::load()?;
        Self::new(&config)
    }

    /// URL of the questions collection.
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

impl RemoteStore for HttpRemote {
    async fn push_batch(&self, records: Vec<Record>) -> std::result::Result<(), RemoteError> {
        let body: Vec<WireRecord> = records.into_iter().map(WireRecord::from).collect();
        tracing::debug!(url = %self.endpoint, count = body.len(), "pushing batch");

        let response = self
            .client
            .post(self.endpoint.clone())
            .json(&body)
            .send()
            .await
            .map_err(remote_error)?;
        check_status(response)?;

        Ok(())
    }

    async fn fetch_all(&self) -> std::result::Result<Vec<Record>, RemoteError> {
        tracing::debug!(url = %self.endpoint, "fetching records");

        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(remote_error)?;
        let body: Vec<WireRecord> = check_status(response)?
            .json()
            .await
            .map_err(remote_error)?;

        tracing::debug!(count = body.len(), "fetched records");
        Ok(body.into_iter().map(Record::from).collect())
    }
}

fn check_status(response: Response) -> std::result::Result<Response, RemoteError> {
    let status = response.status();
    if status.is_success() {
        Ok(response)
    } else {
        tracing::warn!(%status, "remote rejected request");
        Err(RemoteError::Status(status.as_u16()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_from_config() {
        let config = Config::new("http://localhost:8282").unwrap();
        let remote = HttpRemote::new(&config).unwrap();
        assert_eq!(
            remote.endpoint().as_str(),
            "http://localhost:8282/v1/questions"
        );
    }

    #[test]
    fn endpoint_keeps_base_path() {
        let config = Config::new("http://localhost:8282/conference/").unwrap();
        let remote = HttpRemote::new(&config).unwrap();
        assert_eq!(
            remote.endpoint().as_str(),
            "http://localhost:8282/conference/v1/questions"
        );
    }
}
