//! Terminal output formatting.

use colored::{ColoredString, Colorize};
use director_core::health::ProbeReport;
use director_core::model::ExampleCatalog;
use director_core::notes::{self, Notes};
use director_core::render::{self, Section, SectionBody, Tone};
use director_core::ConnectionStatus;
use indicatif::{ProgressBar, ProgressStyle};
use serde_json::Value;
use std::future::Future;
use std::time::Duration;
use unicode_width::UnicodeWidthStr;

/// Get terminal width, defaulting to 80.
fn term_width() -> usize {
    terminal_size::terminal_size()
        .map(|(w, _)| w.0 as usize)
        .unwrap_or(80)
}

/// Horizontal rule capped at 80 columns.
fn rule() -> String {
    "─".repeat(term_width().min(80))
}

/// Pad a plain string to a given visual width (right-padded).
fn pad_right(s: &str, width: usize) -> String {
    let visual = UnicodeWidthStr::width(s);
    if visual >= width {
        s.to_string()
    } else {
        format!("{}{}", s, " ".repeat(width - visual))
    }
}

fn paint(text: &str, tone: Tone) -> ColoredString {
    match tone {
        Tone::Red => text.red(),
        Tone::Blue => text.blue(),
        Tone::Green => text.green(),
        Tone::Purple => text.magenta(),
        Tone::Yellow => text.yellow(),
        Tone::Gray => text.white().dimmed(),
        Tone::Orange => text.truecolor(234, 88, 12),
        Tone::Teal => text.truecolor(13, 148, 136),
        Tone::Rose => text.truecolor(225, 29, 72),
        Tone::Cyan => text.cyan(),
    }
}

/// Print rendered sections with tone colors.
pub fn print_sections(sections: &[Section]) {
    for section in sections {
        print_section(section, 0);
        println!();
    }
}

fn print_section(section: &Section, depth: usize) {
    let indent = "  ".repeat(depth);
    let marker = if depth == 0 { "■" } else { "▸" };
    println!(
        "{}{} {}",
        indent,
        paint(marker, section.tone),
        paint(&section.title, section.tone).bold()
    );

    match &section.body {
        SectionBody::Text(text) => {
            for line in text.lines() {
                println!("{}  {}", indent, line);
            }
        }
        SectionBody::List(items) => {
            if items.is_empty() {
                println!("{}  {}", indent, "(없음)".dimmed());
            }
            for item in items {
                println!("{}  {} {}", indent, paint("•", section.tone), item);
            }
        }
        SectionBody::Groups(groups) => {
            for group in groups {
                println!("{}  {}", indent, format!("[{}]", group.target).bold());
                for q in &group.questions {
                    println!("{}    {} {}", indent, paint("•", section.tone), q);
                }
            }
        }
        SectionBody::Nested(children) => {
            for child in children {
                print_section(child, depth + 1);
            }
        }
    }
}

/// Status pill shown in the session header.
pub fn status_badge(status: ConnectionStatus) -> ColoredString {
    let label = format!("● {}", status.label());
    match status {
        ConnectionStatus::Online => label.green().bold(),
        ConnectionStatus::Offline => label.red().bold(),
        ConnectionStatus::Checking => label.yellow(),
    }
}

/// Print the result of a connection test.
pub fn print_probe(report: &ProbeReport) {
    println!("{} {}", "API 상태".bold(), status_badge(report.status));
    if !report.url.is_empty() {
        let code = report
            .status_code
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        println!("  {} {}", pad_right("URL", 8).dimmed(), report.url);
        println!("  {} {}", pad_right("HTTP", 8).dimmed(), code);
        println!(
            "  {} {}",
            pad_right("확인 시각", 8).dimmed(),
            report
                .checked_at
                .with_timezone(&chrono::Local)
                .format("%Y-%m-%d %H:%M:%S")
        );
    }
    if let Some(data) = &report.data {
        if let Some(msg) = data.get("message").and_then(Value::as_str) {
            println!("  {} {}", pad_right("메시지", 8).dimmed(), msg);
        }
    }
    println!();

    if report.status == ConnectionStatus::Offline {
        print_offline_banner(report);
    }
}

pub fn print_offline_banner(report: &ProbeReport) {
    print_sections(&[render::offline_banner(report)]);
}

/// Error banner for the shared error slot.
pub fn print_error(message: &str) {
    eprintln!("{}", rule().red().dimmed());
    eprintln!("{} {}", "✗".red().bold(), "오류 발생".red().bold());
    eprintln!("  {}", message.red());
    eprintln!("{}", rule().red().dimmed());
}

pub fn print_success(message: &str) {
    println!("{} {}", "✓".green().bold(), message);
}

pub fn print_hint(message: &str) {
    println!("{}", message.dimmed());
}

/// Print the examples payload, typed when it matches the catalog shape.
pub fn print_examples(value: &Value) {
    let Some(catalog) = ExampleCatalog::from_value(value) else {
        println!(
            "{}",
            serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
        );
        return;
    };

    print_catalog(&catalog);
}

pub fn print_catalog(catalog: &ExampleCatalog) {
    if catalog.examples.is_empty() {
        println!("{}", "No example situations.".dimmed());
    } else {
        println!("{}", "예시 상황".bold());
        println!("{}", rule().dimmed());
        let width = catalog
            .examples
            .iter()
            .map(|e| UnicodeWidthStr::width(e.title.as_str()))
            .max()
            .unwrap_or(0);
        for (i, example) in catalog.examples.iter().enumerate() {
            println!(
                "  {}. {}  {}",
                i + 1,
                pad_right(&example.title, width).cyan().bold(),
                example.situation
            );
        }
    }

    if !catalog.perspectives.is_empty() {
        println!();
        println!("{}", "분석 관점".bold());
        println!("  {}", catalog.perspectives.join(" · ").dimmed());
    }
}

/// Print reporter notes with their counters.
pub fn print_notes(notes: &Notes) {
    println!("{}", "기자 메모".truecolor(234, 88, 12).bold());
    println!("{}", rule().dimmed());

    println!("{} {}", "현장 메모".bold(), notes.field_notes_counter().dimmed());
    if notes.field_notes.is_empty() {
        println!("  {}", "(비어 있음)".dimmed());
    }
    for line in notes.field_notes.lines() {
        println!("  {}", line);
    }

    println!("{} {}", "추가 질문 아이디어".bold(), notes.question_ideas_counter().dimmed());
    if notes.question_ideas.is_empty() {
        println!("  {}", "(비어 있음)".dimmed());
    }
    for line in notes.question_ideas.lines() {
        println!("  {}", line);
    }
    println!();
}

/// Counter shown under free-text inputs.
pub fn print_counter(text: &str) {
    println!("{}", notes::counter(text).dimmed());
}

/// Print any serializable value as pretty JSON.
pub fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Spinner on stderr while a request is outstanding.
fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner()
        .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"])
        .template("{spinner:.cyan} {msg}")
    {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

/// Await `fut` with a spinner showing `message`.
pub async fn with_spinner<F, T>(message: &str, fut: F) -> T
where
    F: Future<Output = T>,
{
    let pb = spinner(message);
    let out = fut.await;
    pb.finish_and_clear();
    out
}
