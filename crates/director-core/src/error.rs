//! Centralized error types for the director client.

use thiserror::Error;

/// Message shown when a request is attempted while the backend is offline.
pub const OFFLINE_MESSAGE: &str = "API 서버가 오프라인 상태입니다. 백엔드 서버를 시작해주세요.";

/// Main error type for director operations.
///
/// The `Display` text of every variant is what ends up in the session's
/// error banner, so it is written for the reporter, not for developers.
#[derive(Error, Debug)]
pub enum DirectorError {
    #[error("{message}")]
    Api { status: u16, message: String },

    #[error("API 서버에 연결할 수 없습니다: {0}")]
    Network(#[from] reqwest::Error),

    #[error("응답 형식이 올바르지 않습니다 ({endpoint}): {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("{0}을(를) 입력해주세요.")]
    EmptyInput(&'static str),

    #[error("{}", OFFLINE_MESSAGE)]
    Offline,

    #[error("먼저 현장 상황을 분석해주세요.")]
    NoSituation,

    #[error("심화 분석할 주제가 없습니다.")]
    NoTopic,

    #[error("분석할 뉴스 기사가 없습니다. 먼저 뉴스를 검색해주세요.")]
    NoNewsArticles,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Result type for director operations.
pub type DirectorResult<T> = Result<T, DirectorError>;

impl DirectorError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Build the error for a non-2xx response from its status and raw body.
    ///
    /// Prefers the backend's `detail` field; falls back to a generic
    /// status-code message when the body carries none.
    pub fn from_response(status: u16, body: &str) -> Self {
        let detail = serde_json::from_str::<crate::model::ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail_message());

        Self::Api {
            status,
            message: detail.unwrap_or_else(|| format!("API 오류: {}", status)),
        }
    }

    /// True for errors raised before any request was sent.
    pub fn is_client_guard(&self) -> bool {
        matches!(
            self,
            Self::EmptyInput(_) | Self::NoSituation | Self::NoTopic | Self::NoNewsArticles
        )
    }
}
