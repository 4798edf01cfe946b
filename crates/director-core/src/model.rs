//! Data-transfer records mirrored from the backend JSON.
//!
//! Wire names are kept exactly as the backend emits them: camelCase for the
//! directing and deep-dive shapes, snake_case for the news shapes.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Questions addressed to one interview target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionGroup {
    pub target: String,
    pub questions: Vec<String>,
}

/// Primary guidance produced from a situation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectorResponse {
    pub issues: Vec<String>,
    pub questions: Vec<QuestionGroup>,
    pub angles: Vec<String>,
    pub interpretation: String,
    pub additional_points: Vec<String>,
    pub checklist: Vec<String>,
}

/// Secondary analysis keyed on a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeepDiveResponse {
    pub background: String,
    pub key_points: Vec<String>,
    pub analysis: String,
    pub implications: Vec<String>,
}

/// Analysis of the situation from one viewpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Perspective {
    pub viewpoint: String,
    pub issues: Vec<String>,
    pub questions: Vec<String>,
    pub implications: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PerspectiveResponse {
    pub perspectives: Vec<Perspective>,
}

/// Raw article texts found for a topic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsSearchResponse {
    pub news_articles: Vec<String>,
}

/// Analysis of a single article. Every field but the title is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ArticleAnalysis {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub article_index: Option<u32>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub angles: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub issues: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub framing: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub implications: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewsAnalyzeResponse {
    pub article_analyses: Vec<ArticleAnalysis>,
    pub summary: String,
}

// Request bodies

#[derive(Debug, Clone, Serialize)]
pub struct SituationRequest<'a> {
    pub situation: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct TopicRequest<'a> {
    pub topic: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PerspectiveRequest<'a> {
    pub situation: &'a str,
    pub perspective: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsAnalyzeRequest<'a> {
    pub news_articles: &'a [String],
}

/// Error body returned by the backend on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub detail: Option<serde_json::Value>,
}

impl ErrorBody {
    /// The `detail` field as display text.
    ///
    /// Plain strings are returned as-is; structured details (validation
    /// error arrays) are compact-encoded.
    pub fn detail_message(&self) -> Option<String> {
        match self.detail.as_ref()? {
            serde_json::Value::Null => None,
            serde_json::Value::String(s) if s.trim().is_empty() => None,
            serde_json::Value::String(s) => Some(s.clone()),
            other => Some(other.to_string()),
        }
    }
}

/// A sample situation offered by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleSituation {
    pub title: String,
    pub situation: String,
}

/// Typed view over the `/examples` payload.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExampleCatalog {
    #[serde(default)]
    pub examples: Vec<ExampleSituation>,
    #[serde(default)]
    pub perspectives: Vec<String>,
}

impl ExampleCatalog {
    /// Best-effort parse of the arbitrary examples JSON.
    pub fn from_value(value: &serde_json::Value) -> Option<Self> {
        let catalog: Self = serde_json::from_value(value.clone()).ok()?;
        if catalog.examples.is_empty() && catalog.perspectives.is_empty() {
            None
        } else {
            Some(catalog)
        }
    }
}

/// Viewpoint categories offered for perspective expansion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Viewpoint {
    Politics,
    Economy,
    Society,
    Law,
}

impl Viewpoint {
    pub const ALL: [Viewpoint; 4] = [
        Viewpoint::Politics,
        Viewpoint::Economy,
        Viewpoint::Society,
        Viewpoint::Law,
    ];

    /// Label sent to the backend and shown on buttons.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Politics => "정치",
            Self::Economy => "경제",
            Self::Society => "사회",
            Self::Law => "법제도",
        }
    }

    /// English name accepted on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Politics => "politics",
            Self::Economy => "economy",
            Self::Society => "society",
            Self::Law => "law",
        }
    }

    /// Match a viewpoint string echoed back by the backend.
    pub fn from_label(label: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|v| v.label() == label.trim())
    }
}

impl fmt::Display for Viewpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Viewpoint {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let s = s.strip_suffix(" 관점").unwrap_or(s);
        Self::ALL
            .into_iter()
            .find(|v| v.label() == s || v.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                format!(
                    "unknown viewpoint '{}' (expected one of: 정치/politics, 경제/economy, 사회/society, 법제도/law)",
                    s
                )
            })
    }
}
