//! Authenticated client for the remote audio processing API
//!
//! Thin wrapper around [`reqwest::Client`] covering the six endpoints the
//! pipeline needs: preset listing, production creation (multipart upload),
//! start command, status polling, full detail fetch, and output download.
//! Every non-2xx response maps to [`Error::Api`] with the raw body kept for
//! diagnosis; the exact JSON schema is treated as given by the server.

use crate::config::Config;
use crate::error::{Error, Result};
use crate::types::{Envelope, Preset, ProductionDetails, ProductionStatus};
use reqwest::multipart;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::time::Duration;
use tokio_util::io::ReaderStream;
use tracing::debug;
use url::Url;

/// Connection establishment timeout, applied to every request
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Human-facing status page, for timeout and monitor messages
const STATUS_PAGE_BASE: &str = "https://auphonic.com/engine/status";

/// Authenticated API client
///
/// Cheap to clone; holds the shared connection pool and the bearer token.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    request_timeout: Duration,
}

impl ApiClient {
    /// Create a client from the given configuration.
    ///
    /// Validates the base URL up front so a typo fails before any request.
    /// `config.request_timeout` bounds the small JSON requests only; the
    /// multipart upload and the result downloads run as long as the transfer
    /// takes, with just a connect timeout.
    pub fn new(config: &Config) -> Result<Self> {
        Url::parse(&config.base_url).map_err(|e| Error::Config {
            message: format!("invalid base URL {:?}: {e}", config.base_url),
        })?;
        let http = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            request_timeout: config.request_timeout,
        })
    }

    /// The human monitor URL for a production
    pub fn status_page_url(&self, uuid: &str) -> String {
        format!("{STATUS_PAGE_BASE}/{uuid}")
    }

    /// List all presets available to the authenticated account.
    pub async fn list_presets(&self) -> Result<Vec<Preset>> {
        let url = format!("{}/presets.json?minimal_data=1", self.base_url);
        let envelope: Envelope<Vec<Preset>> = self.get_json(&url).await?;
        Ok(envelope.data.unwrap_or_default())
    }

    /// Upload a local file and create a production for it.
    ///
    /// The file is streamed from disk as the `input_file` multipart field,
    /// together with the title and the preset identifier when present.
    /// Returns the new production's uuid. A 2xx response without a uuid is a
    /// malformed-response error, never retried: resubmitting could create a
    /// duplicate job.
    pub async fn create_production(
        &self,
        path: &Path,
        title: &str,
        preset_uuid: Option<&str>,
    ) -> Result<String> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("input")
            .to_string();
        let file = tokio::fs::File::open(path).await?;
        let part = multipart::Part::stream(reqwest::Body::wrap_stream(ReaderStream::new(file)))
            .file_name(file_name);

        let mut form = multipart::Form::new()
            .part("input_file", part)
            .text("title", title.to_string());
        if let Some(uuid) = preset_uuid {
            form = form.text("preset", uuid.to_string());
        }

        let url = format!("{}/simple/productions.json", self.base_url);
        debug!(%url, title, "creating production");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }

        let envelope: Envelope<crate::types::Production> = response.json().await?;
        envelope
            .data
            .and_then(|production| production.uuid)
            .ok_or_else(|| {
                Error::MalformedResponse(
                    "production creation response did not contain a uuid".to_string(),
                )
            })
    }

    /// Send the start command for a production.
    pub async fn start_production(&self, uuid: &str) -> Result<()> {
        let url = format!("{}/production/{uuid}/start.json", self.base_url);
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.request_timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(())
    }

    /// Fetch the current status of a production.
    pub async fn get_status(&self, uuid: &str) -> Result<ProductionStatus> {
        let url = format!("{}/production/{uuid}/status.json", self.base_url);
        let envelope: Envelope<ProductionStatus> = self.get_json(&url).await?;
        envelope.data.ok_or_else(|| {
            Error::MalformedResponse("status response did not contain data".to_string())
        })
    }

    /// Fetch the full production resource as raw text.
    ///
    /// Used on the failure path so the operator sees the exact server
    /// payload even when it does not parse.
    pub async fn get_production_raw(&self, uuid: &str) -> Result<String> {
        let url = format!("{}/production/{uuid}.json", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.api_key)
            .timeout(self.request_timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response.text().await?)
    }

    /// Fetch the full production resource, parsed.
    pub async fn get_production(&self, uuid: &str) -> Result<ProductionDetails> {
        let url = format!("{}/production/{uuid}.json", self.base_url);
        let envelope: Envelope<ProductionDetails> = self.get_json(&url).await?;
        envelope.data.ok_or_else(|| {
            Error::MalformedResponse("production response did not contain data".to_string())
        })
    }

    /// Download one output file from its pre-signed URL.
    ///
    /// The bearer token is sent along, matching the upstream service's
    /// expectations for authenticated result downloads. Not bounded by the
    /// JSON request timeout; large artifacts take as long as they take.
    pub async fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self.http.get(url).bearer_auth(&self.api_key).send().await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// GET a JSON endpoint and deserialize the response body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .bearer_auth(&self.api_key)
            .timeout(self.request_timeout)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(Error::from_response(response).await);
        }
        Ok(response.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_client(server: &MockServer) -> ApiClient {
        let config = Config {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            ..Config::default()
        };
        ApiClient::new(&config).unwrap()
    }

    #[test]
    fn rejects_invalid_base_url() {
        let config = Config {
            base_url: "not a url".to_string(),
            ..Config::default()
        };
        assert!(matches!(
            ApiClient::new(&config),
            Err(Error::Config { .. })
        ));
    }

    #[tokio::test]
    async fn list_presets_sends_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/presets.json"))
            .and(query_param("minimal_data", "1"))
            .and(header("authorization", "Bearer test-key"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": [
                    {"uuid": "p-1", "preset_name": "Usual-2"},
                    {"uuid": "p-2", "preset_name": "Loud"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let presets = test_client(&server).list_presets().await.unwrap();
        assert_eq!(presets.len(), 2);
        assert_eq!(presets[0].preset_name, "Usual-2");
    }

    #[tokio::test]
    async fn list_presets_surfaces_http_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/presets.json"))
            .respond_with(ResponseTemplate::new(401).set_body_string("bad token"))
            .mount(&server)
            .await;

        let err = test_client(&server).list_presets().await.unwrap_err();
        match err {
            Error::Api { status, body } => {
                assert_eq!(status, 401);
                assert_eq!(body, "bad token");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn create_production_without_uuid_is_malformed() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/simple/productions.json"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(serde_json::json!({"data": {}})),
            )
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("episode.wav");
        std::fs::write(&input, b"RIFF").unwrap();

        let err = test_client(&server)
            .create_production(&input, "Processed episode.wav", Some("p-1"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn get_status_parses_code() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/production/abc/status.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "data": {"status": 4, "status_string": "Audio Processing"}
            })))
            .mount(&server)
            .await;

        let status = test_client(&server).get_status("abc").await.unwrap();
        assert_eq!(status.status, crate::types::StatusCode::AudioProcessing);
    }

    #[tokio::test]
    async fn slow_download_outlives_json_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/dl/long-episode.wav"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(b"slow audio".to_vec())
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let config = Config {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            request_timeout: Duration::from_millis(50),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();

        // The download responds well past the JSON timeout and must still
        // complete.
        let url = format!("{}/dl/long-episode.wav", server.uri());
        let bytes = client.download(&url).await.unwrap();
        assert_eq!(bytes, b"slow audio");
    }

    #[tokio::test]
    async fn slow_json_endpoint_hits_request_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/production/abc/status.json"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({"data": {"status": 1}}))
                    .set_delay(Duration::from_millis(300)),
            )
            .mount(&server)
            .await;

        let config = Config {
            base_url: server.uri(),
            api_key: "test-key".to_string(),
            request_timeout: Duration::from_millis(50),
            ..Config::default()
        };
        let client = ApiClient::new(&config).unwrap();

        let err = client.get_status("abc").await.unwrap_err();
        match err {
            Error::Network(e) => assert!(e.is_timeout()),
            other => panic!("expected Network timeout, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn download_returns_body_bytes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/files/out.wav"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(b"wav-bytes".to_vec()))
            .mount(&server)
            .await;

        let url = format!("{}/files/out.wav", server.uri());
        let bytes = test_client(&server).download(&url).await.unwrap();
        assert_eq!(bytes, b"wav-bytes");
    }
}
