//! Fixed visual templates keyed by response shape.
//!
//! Renderers only arrange content into titled sections; coloring is left to
//! the terminal front end. Items keep their order and are never shortened.

use crate::health::ProbeReport;
use crate::model::{
    ArticleAnalysis, DeepDiveResponse, DirectorResponse, NewsAnalyzeResponse, Perspective,
    QuestionGroup, Viewpoint,
};

/// Command that starts the backend, shown in the offline banner.
pub const BACKEND_START_HINT: &str = "cd backend && uvicorn app.main:app --reload --port 8000";

/// Accent color of a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Red,
    Blue,
    Green,
    Purple,
    Yellow,
    Gray,
    Orange,
    Teal,
    Rose,
    Cyan,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SectionBody {
    Text(String),
    List(Vec<String>),
    Groups(Vec<QuestionGroup>),
    /// Nested sections, e.g. one block per viewpoint.
    Nested(Vec<Section>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub tone: Tone,
    pub body: SectionBody,
}

impl Section {
    fn text(title: impl Into<String>, tone: Tone, text: &str) -> Self {
        Self {
            title: title.into(),
            tone,
            body: SectionBody::Text(text.to_string()),
        }
    }

    fn list(title: impl Into<String>, tone: Tone, items: &[String]) -> Self {
        Self {
            title: title.into(),
            tone,
            body: SectionBody::List(items.to_vec()),
        }
    }
}

/// Sections of the primary guidance, in display order.
pub fn director(response: &DirectorResponse) -> Vec<Section> {
    vec![
        Section::list("핵심 취재 쟁점", Tone::Red, &response.issues),
        Section {
            title: "심층 취재 질문".to_string(),
            tone: Tone::Blue,
            body: SectionBody::Groups(response.questions.clone()),
        },
        Section::list("보도 각도 제안", Tone::Green, &response.angles),
        Section::text("구조적 해석", Tone::Purple, &response.interpretation),
        Section::list("추가 취재 포인트", Tone::Yellow, &response.additional_points),
        Section::list("현장 체크리스트", Tone::Gray, &response.checklist),
    ]
}

pub fn deep_dive(response: &DeepDiveResponse) -> Vec<Section> {
    vec![
        Section::text("배경 및 맥락", Tone::Orange, &response.background),
        Section::list("핵심 포인트", Tone::Teal, &response.key_points),
        Section::text("상세 분석", Tone::Rose, &response.analysis),
        Section::list("정책 시사점", Tone::Cyan, &response.implications),
    ]
}

/// Tone associated with a viewpoint label; unknown labels are gray.
pub fn viewpoint_tone(viewpoint: &str) -> Tone {
    match Viewpoint::from_label(viewpoint) {
        Some(Viewpoint::Politics) => Tone::Red,
        Some(Viewpoint::Economy) => Tone::Green,
        Some(Viewpoint::Society) => Tone::Blue,
        Some(Viewpoint::Law) => Tone::Purple,
        None => Tone::Gray,
    }
}

/// One block per viewpoint.
pub fn perspectives(perspectives: &[Perspective]) -> Vec<Section> {
    perspectives
        .iter()
        .map(|p| {
            let tone = viewpoint_tone(&p.viewpoint);
            Section {
                title: format!("{} 관점 분석", p.viewpoint),
                tone,
                body: SectionBody::Nested(vec![
                    Section::list("주요 쟁점", tone, &p.issues),
                    Section::list("핵심 질문", tone, &p.questions),
                    Section::list("정책 시사점", tone, &p.implications),
                ]),
            }
        })
        .collect()
}

fn article(position: usize, analysis: &ArticleAnalysis) -> Section {
    let number = analysis
        .article_index
        .map(|i| i as usize)
        .unwrap_or(position + 1);

    let mut parts = Vec::new();
    if let Some(angles) = &analysis.angles {
        parts.push(Section::list("보도 각도", Tone::Green, angles));
    }
    if let Some(issues) = &analysis.issues {
        parts.push(Section::list("쟁점", Tone::Red, issues));
    }
    if let Some(framing) = &analysis.framing {
        parts.push(Section::text("프레이밍", Tone::Purple, framing));
    }
    if let Some(implications) = &analysis.implications {
        parts.push(Section::list("시사점", Tone::Cyan, implications));
    }

    Section {
        title: format!("기사 {}: {}", number, analysis.title),
        tone: Tone::Blue,
        body: SectionBody::Nested(parts),
    }
}

/// Per-article blocks followed by the overall summary.
pub fn news_analysis(response: &NewsAnalyzeResponse) -> Vec<Section> {
    let mut sections: Vec<Section> = response
        .article_analyses
        .iter()
        .enumerate()
        .map(|(i, a)| article(i, a))
        .collect();
    sections.push(Section::text("종합 요약", Tone::Teal, &response.summary));
    sections
}

/// Search results before analysis: one list of raw articles.
pub fn news_articles(articles: &[String]) -> Vec<Section> {
    vec![Section::list(
        format!("검색된 기사 ({}건)", articles.len()),
        Tone::Blue,
        articles,
    )]
}

/// Persistent banner shown while the backend is unreachable.
pub fn offline_banner(report: &ProbeReport) -> Section {
    let mut lines = Vec::new();
    if !report.message.is_empty() {
        lines.push(report.message.clone());
    }
    lines.push(format!("해결 방법: 터미널에서 {} 실행", BACKEND_START_HINT));

    Section {
        title: "백엔드 서버 연결 실패".to_string(),
        tone: Tone::Red,
        body: SectionBody::List(lines),
    }
}

/// Banner for the shared error slot.
pub fn error_banner(message: &str) -> Section {
    Section::text("오류 발생", Tone::Red, message)
}

/// Uncolored rendering, used for logs, pipes and tests.
pub fn render_plain(sections: &[Section]) -> String {
    let mut out = String::new();
    for (i, section) in sections.iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        write_section(&mut out, section, 0);
    }
    out
}

fn write_section(out: &mut String, section: &Section, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if depth == 0 { "■" } else { "▸" };
    out.push_str(&format!("{}{} {}\n", indent, marker, section.title));

    match &section.body {
        SectionBody::Text(text) => {
            for line in text.lines() {
                out.push_str(&format!("{}  {}\n", indent, line));
            }
        }
        SectionBody::List(items) => {
            for item in items {
                out.push_str(&format!("{}  • {}\n", indent, item));
            }
        }
        SectionBody::Groups(groups) => {
            for group in groups {
                out.push_str(&format!("{}  [{}]\n", indent, group.target));
                for q in &group.questions {
                    out.push_str(&format!("{}    • {}\n", indent, q));
                }
            }
        }
        SectionBody::Nested(children) => {
            for child in children {
                write_section(out, child, depth + 1);
            }
        }
    }
}
