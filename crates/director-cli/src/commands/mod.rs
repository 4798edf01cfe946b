//! CLI command definitions and handlers.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use director_core::{ApiClient, ClientConfig, Session};
use std::io::{IsTerminal, Read};
use std::path::PathBuf;
use std::sync::Arc;

use crate::output;

pub mod deep_dive;
pub mod direct;
pub mod examples;
pub mod health;
pub mod news;
pub mod perspective;
pub mod session;

/// AI 취재 디렉터 - field reporting guidance from the director backend
#[derive(Parser)]
#[command(name = "director")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Backend base URL (overrides the config file)
    #[arg(long, global = true, env = "DIRECTOR_API_URL")]
    pub api_url: Option<String>,

    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Print raw JSON responses instead of formatted sections
    #[arg(long, global = true)]
    pub json: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Test the connection to the backend
    Health,

    /// List example situations offered by the backend
    Examples,

    /// Get directing for a field situation
    Direct(direct::DirectArgs),

    /// Deep dive on a topic
    DeepDive(deep_dive::DeepDiveArgs),

    /// Re-analyze a situation from one viewpoint
    Perspective(perspective::PerspectiveArgs),

    /// Search news for a topic, then analyze the articles
    News(news::NewsArgs),

    /// Interactive session with live connection status
    Session,
}

/// Resolved settings shared by every command.
pub struct Context {
    pub config: ClientConfig,
    pub client: Arc<ApiClient>,
    pub json: bool,
}

impl Context {
    /// A fresh session with no connection test run yet.
    ///
    /// Requests go out regardless of backend status and report network
    /// failures as they happen.
    pub fn session(&self) -> Session {
        Session::new(self.client.clone())
    }

    /// A fresh session that has already run its first connection test.
    ///
    /// Fails with the offline banner printed when the backend is unreachable.
    pub async fn online_session(&self) -> Result<Session> {
        let mut session = Session::new(self.client.clone());
        let report = output::with_spinner("API 연결 확인 중...", session.test_connection())
            .await
            .clone();

        if report.status.is_offline() {
            output::print_offline_banner(&report);
            anyhow::bail!(director_core::DirectorError::Offline);
        }
        Ok(session)
    }
}

impl Cli {
    pub async fn execute(self) -> Result<()> {
        let mut config = ClientConfig::load(self.config.as_deref())?;
        if let Some(url) = self.api_url.as_deref() {
            config = config.with_base_url(url);
        }
        tracing::debug!(base_url = %config.base_url, "Resolved backend");

        let client = Arc::new(ApiClient::new(config.clone())?);
        let ctx = Context {
            config,
            client,
            json: self.json,
        };

        match self.command {
            Commands::Health => health::execute(&ctx).await,
            Commands::Examples => examples::execute(&ctx).await,
            Commands::Direct(args) => direct::execute(args, &ctx).await,
            Commands::DeepDive(args) => deep_dive::execute(args, &ctx).await,
            Commands::Perspective(args) => perspective::execute(args, &ctx).await,
            Commands::News(args) => news::execute(args, &ctx).await,
            Commands::Session => session::execute(&ctx).await,
        }
    }
}

/// Trimmed text, or `EmptyInput` naming `what` when it is blank.
///
/// Commands call this before building a session so blank input never
/// reaches the network.
pub fn require_input(text: &str, what: &'static str) -> Result<String> {
    let text = text.trim();
    if text.is_empty() {
        anyhow::bail!(director_core::DirectorError::EmptyInput(what));
    }
    Ok(text.to_string())
}

/// Join positional words, or read stdin when none were given and it is piped.
pub fn text_or_stdin(words: &[String]) -> Result<String> {
    if !words.is_empty() {
        return Ok(words.join(" "));
    }

    let mut stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(String::new());
    }

    let mut buf = String::new();
    stdin
        .read_to_string(&mut buf)
        .context("Failed to read from stdin")?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use director_core::DirectorError;

    fn offline_context() -> Context {
        let config = ClientConfig::default().with_base_url("http://127.0.0.1:9");
        let client = Arc::new(ApiClient::new(config.clone()).unwrap());
        Context {
            config,
            client,
            json: false,
        }
    }

    fn is_empty_input(err: &anyhow::Error, what: &str) -> bool {
        matches!(
            err.downcast_ref::<DirectorError>(),
            Some(DirectorError::EmptyInput(w)) if *w == what
        )
    }

    #[test]
    fn test_words_are_joined() {
        let words = vec!["세월호".to_string(), "침몰".to_string(), "현장".to_string()];
        assert_eq!(text_or_stdin(&words).unwrap(), "세월호 침몰 현장");
    }

    #[test]
    fn test_require_input() {
        assert_eq!(require_input("  구조 지연 \n", "분석 주제").unwrap(), "구조 지연");

        let err = require_input(" \t\n", "분석 주제").unwrap_err();
        assert!(is_empty_input(&err, "분석 주제"));
    }

    #[tokio::test]
    async fn test_blank_input_is_rejected_before_any_request() {
        let ctx = offline_context();
        let blank = vec!["   ".to_string()];

        let err = deep_dive::execute(deep_dive::DeepDiveArgs { topic: blank.clone() }, &ctx)
            .await
            .unwrap_err();
        assert!(is_empty_input(&err, "분석 주제"));

        let err = news::execute(
            news::NewsArgs {
                topic: blank.clone(),
                search_only: false,
            },
            &ctx,
        )
        .await
        .unwrap_err();
        assert!(is_empty_input(&err, "검색 주제"));

        let err = direct::execute(
            direct::DirectArgs {
                situation: blank,
                deep_dive: true,
                perspectives: vec![],
            },
            &ctx,
        )
        .await
        .unwrap_err();
        assert!(is_empty_input(&err, "현장 상황"));
    }

    #[tokio::test]
    async fn test_deep_dive_reports_network_failure_without_gating() {
        let ctx = offline_context();
        let args = deep_dive::DeepDiveArgs {
            topic: vec!["구조 지연 원인".to_string()],
        };

        let err = deep_dive::execute(args, &ctx).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DirectorError>(),
            Some(DirectorError::Network(_))
        ));
    }
}
