//! HTTP client for the director backend.
//!
//! Every endpoint lives under `{base_url}{api_prefix}`. Non-2xx responses are
//! turned into [`DirectorError::Api`] carrying the backend's `detail` message.

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{DirectorError, DirectorResult};
use crate::health::{ConnectionStatus, ProbeReport};
use crate::model::{
    DeepDiveResponse, DirectorResponse, NewsAnalyzeRequest, NewsAnalyzeResponse,
    NewsSearchResponse, PerspectiveRequest, PerspectiveResponse, SituationRequest, TopicRequest,
};

/// Operations offered by the backend.
#[async_trait]
pub trait DirectorApi: Send + Sync {
    /// Probe `/health`. Never fails; failures are reported as offline.
    async fn probe(&self) -> ProbeReport;

    async fn health(&self) -> DirectorResult<serde_json::Value>;

    async fn examples(&self) -> DirectorResult<serde_json::Value>;

    async fn direct(&self, situation: &str) -> DirectorResult<DirectorResponse>;

    async fn deep_dive(&self, topic: &str) -> DirectorResult<DeepDiveResponse>;

    async fn perspective(&self, situation: &str, perspective: &str)
        -> DirectorResult<PerspectiveResponse>;

    async fn news_search(&self, topic: &str) -> DirectorResult<NewsSearchResponse>;

    async fn news_analyze(&self, news_articles: &[String]) -> DirectorResult<NewsAnalyzeResponse>;
}

/// reqwest-backed [`DirectorApi`].
#[derive(Clone)]
pub struct ApiClient {
    config: ClientConfig,
    client: reqwest::Client,
}

impl ApiClient {
    /// Create a client from resolved configuration.
    pub fn new(config: ClientConfig) -> DirectorResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        debug!(base_url = %config.base_url, prefix = %config.api_prefix, "ApiClient initialized");
        Ok(Self { config, client })
    }

    /// Create a client for `base_url` with every other setting at its default.
    pub fn with_url(base_url: &str) -> DirectorResult<Self> {
        Self::new(ClientConfig::default().with_base_url(base_url))
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> DirectorResult<T> {
        let url = self.config.endpoint(path);
        debug!(url = %url, "GET");

        let response = self.client.get(&url).send().await.map_err(|e| {
            warn!(url = %url, error = %e, "Request failed");
            DirectorError::from(e)
        })?;

        Self::decode(path, response).await
    }

    async fn post_json<B, T>(&self, path: &str, body: &B) -> DirectorResult<T>
    where
        B: Serialize + Sync + ?Sized,
        T: DeserializeOwned,
    {
        let url = self.config.endpoint(path);
        debug!(url = %url, "POST");

        let response = self
            .client
            .post(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "Request failed");
                DirectorError::from(e)
            })?;

        Self::decode(path, response).await
    }

    async fn decode<T: DeserializeOwned>(path: &str, response: reqwest::Response) -> DirectorResult<T> {
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let err = DirectorError::from_response(status.as_u16(), &body);
            warn!(endpoint = %path, status = status.as_u16(), error = %err, "Backend returned an error");
            return Err(err);
        }

        serde_json::from_str(&body).map_err(|source| {
            warn!(endpoint = %path, error = %source, "Unexpected response shape");
            DirectorError::Decode {
                endpoint: path.to_string(),
                source,
            }
        })
    }
}

#[async_trait]
impl DirectorApi for ApiClient {
    async fn probe(&self) -> ProbeReport {
        let url = self.config.endpoint("/health");
        debug!(url = %url, "Probing backend");

        let response = self
            .client
            .get(&url)
            .timeout(self.config.probe_timeout())
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() => {
                let status_code = resp.status().as_u16();
                let data = resp.json::<serde_json::Value>().await.ok();
                debug!(url = %url, status = status_code, "Backend online");
                ProbeReport {
                    status: ConnectionStatus::Online,
                    message: format!("API 서버 연결 성공: {}", url),
                    url,
                    status_code: Some(status_code),
                    data,
                    checked_at: Utc::now(),
                }
            }
            Ok(resp) => {
                let status_code = resp.status().as_u16();
                debug!(url = %url, status = status_code, "Backend answered with failure status");
                ProbeReport {
                    status: ConnectionStatus::Offline,
                    message: format!("API 서버 응답 오류 ({}): {}", status_code, url),
                    url,
                    status_code: Some(status_code),
                    data: None,
                    checked_at: Utc::now(),
                }
            }
            Err(e) => {
                debug!(url = %url, error = %e, "Backend unreachable");
                ProbeReport {
                    status: ConnectionStatus::Offline,
                    message: format!("모든 API 엔드포인트 연결 실패: {}", url),
                    url,
                    status_code: None,
                    data: None,
                    checked_at: Utc::now(),
                }
            }
        }
    }

    async fn health(&self) -> DirectorResult<serde_json::Value> {
        self.get_json("/health").await
    }

    async fn examples(&self) -> DirectorResult<serde_json::Value> {
        self.get_json("/examples").await
    }

    async fn direct(&self, situation: &str) -> DirectorResult<DirectorResponse> {
        debug!(chars = situation.chars().count(), "Requesting directing");
        self.post_json("/direct", &SituationRequest { situation }).await
    }

    async fn deep_dive(&self, topic: &str) -> DirectorResult<DeepDiveResponse> {
        debug!(topic = %topic, "Requesting deep dive");
        self.post_json("/deep-dive", &TopicRequest { topic }).await
    }

    async fn perspective(
        &self,
        situation: &str,
        perspective: &str,
    ) -> DirectorResult<PerspectiveResponse> {
        debug!(perspective = %perspective, "Requesting perspective expansion");
        self.post_json("/perspective", &PerspectiveRequest { situation, perspective })
            .await
    }

    async fn news_search(&self, topic: &str) -> DirectorResult<NewsSearchResponse> {
        debug!(topic = %topic, "Searching news");
        self.post_json("/news-search", &TopicRequest { topic }).await
    }

    async fn news_analyze(&self, news_articles: &[String]) -> DirectorResult<NewsAnalyzeResponse> {
        debug!(articles = news_articles.len(), "Analyzing news articles");
        self.post_json("/news-analyze", &NewsAnalyzeRequest { news_articles })
            .await
    }
}
