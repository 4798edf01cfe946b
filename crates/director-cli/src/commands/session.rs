//! Interactive session: the full directing page in the terminal.
//!
//! A background [`HealthMonitor`] re-probes the backend while the reporter
//! works through menus; its latest report is adopted before every action.

use anyhow::{Context as _, Result};
use colored::Colorize;
use dialoguer::{Input, Select};
use director_core::model::{ExampleCatalog, Viewpoint};
use director_core::{render, ConnectionStatus, DirectorApi, DirectorError, HealthMonitor, Session};
use std::sync::Arc;
use std::time::Duration;

use super::Context;
use crate::output;

#[derive(Clone, Copy)]
enum Action {
    Submit,
    Example,
    DeepDive,
    Perspective,
    Review,
    Notes,
    NewsSearch,
    NewsAnalyze,
    TestConnection,
    Quit,
}

impl Action {
    fn label(&self) -> &'static str {
        match self {
            Self::Submit => "현장 상황 입력 (분석 시작)",
            Self::Example => "예시 상황 불러오기",
            Self::DeepDive => "유사 사건 분석 (심화 분석)",
            Self::Perspective => "관점별 분석",
            Self::Review => "분석 결과 다시 보기",
            Self::Notes => "기자 메모",
            Self::NewsSearch => "뉴스 검색",
            Self::NewsAnalyze => "검색된 뉴스 분석",
            Self::TestConnection => "연결 테스트",
            Self::Quit => "종료",
        }
    }
}

/// Menu entries available in the current state.
fn menu(session: &Session) -> Vec<Action> {
    let mut actions = vec![Action::Submit, Action::Example];
    if session.director().is_some() {
        actions.extend([Action::DeepDive, Action::Perspective, Action::Review, Action::Notes]);
    }
    actions.push(Action::NewsSearch);
    if session.news_articles().is_some_and(|a| !a.is_empty()) {
        actions.push(Action::NewsAnalyze);
    }
    actions.extend([Action::TestConnection, Action::Quit]);
    actions
}

pub async fn execute(ctx: &Context) -> Result<()> {
    let api: Arc<dyn DirectorApi> = ctx.client.clone();
    let mut monitor = HealthMonitor::spawn(api.clone(), ctx.config.health_interval());
    let mut session = Session::new(api);

    println!();
    println!("  {} {}", "AI 취재 디렉터".cyan().bold(), "Professional Journalism Assistant".dimmed());
    println!("  {}  {}", "Backend".green(), ctx.config.endpoint(""));
    println!();

    let first = output::with_spinner(
        "API 연결 확인 중...",
        tokio::time::timeout(ctx.config.probe_timeout() + Duration::from_secs(1), monitor.changed()),
    )
    .await;
    if let Ok(Some(report)) = first {
        session.apply_probe(report);
    }
    let mut updates = monitor.subscribe();

    loop {
        if updates.has_changed().unwrap_or(false) {
            let report = updates.borrow_and_update().clone();
            if report.status != ConnectionStatus::Checking {
                session.apply_probe(report);
            }
        }
        print_header(&session);

        let actions = menu(&session);
        let labels: Vec<&str> = actions.iter().map(Action::label).collect();
        let choice = Select::new()
            .with_prompt("작업 선택")
            .items(&labels)
            .default(0)
            .interact_opt()
            .context("Failed to read menu selection")?;

        let Some(index) = choice else { break };
        let action = actions[index];

        let outcome = match action {
            Action::Submit => submit(&mut session).await,
            Action::Example => example(&mut session, ctx).await,
            Action::DeepDive => deep_dive(&mut session).await,
            Action::Perspective => perspective(&mut session).await,
            Action::Review => {
                review(&session);
                Ok(())
            }
            Action::Notes => notes(&mut session),
            Action::NewsSearch => news_search(&mut session).await,
            Action::NewsAnalyze => news_analyze(&mut session).await,
            Action::TestConnection => {
                let report = output::with_spinner("테스트 중...", session.test_connection()).await;
                output::print_probe(report);
                Ok(())
            }
            Action::Quit => break,
        };

        if let Err(e) = outcome {
            match e.downcast_ref::<DirectorError>() {
                // Request failures already sit in the session's error slot.
                Some(de) if !de.is_client_guard() && session.error().is_some() => {}
                _ => output::print_error(&e.to_string()),
            }
        }
    }

    println!("{}", "세션을 종료합니다.".dimmed());
    Ok(())
}

fn print_header(session: &Session) {
    println!();
    let situation = session
        .current_situation()
        .map(|s| s.chars().take(40).collect::<String>())
        .unwrap_or_else(|| "-".to_string());
    println!(
        "{} {}   {} {}",
        "API".bold(),
        output::status_badge(session.api_status()),
        "현재 상황".bold(),
        situation.dimmed()
    );

    if session.api_status().is_offline() {
        if let Some(report) = session.last_probe() {
            output::print_offline_banner(report);
        }
    }
    if let Some(error) = session.error() {
        output::print_error(error);
    }
}

fn read_line(prompt: &str) -> Result<String> {
    let text: String = Input::new()
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .with_context(|| format!("Failed to read {}", prompt))?;
    Ok(text)
}

async fn submit(session: &mut Session) -> Result<()> {
    output::print_hint("취재 현장의 상황을 자세히 설명해보세요 (시간, 장소, 인물, 사건의 전후 맥락).");
    let text = read_line("현장 상황")?;
    output::print_counter(&text);
    run_directing(session, &text).await
}

async fn run_directing(session: &mut Session, text: &str) -> Result<()> {
    let response = output::with_spinner("AI 분석 중...", session.submit_situation(text)).await?;
    println!();
    output::print_sections(&render::director(response));
    Ok(())
}

async fn example(session: &mut Session, ctx: &Context) -> Result<()> {
    let value = output::with_spinner("예시 데이터 요청 중...", ctx.client.examples()).await?;
    let Some(catalog) = ExampleCatalog::from_value(&value).filter(|c| !c.examples.is_empty())
    else {
        output::print_examples(&value);
        return Ok(());
    };

    let titles: Vec<&str> = catalog.examples.iter().map(|e| e.title.as_str()).collect();
    let choice = Select::new()
        .with_prompt("예시 상황")
        .items(&titles)
        .default(0)
        .interact_opt()
        .context("Failed to read example selection")?;

    let Some(index) = choice else { return Ok(()) };
    let situation = catalog.examples[index].situation.clone();
    println!("{}", situation.dimmed());
    run_directing(session, &situation).await
}

async fn deep_dive(session: &mut Session) -> Result<()> {
    let response =
        output::with_spinner("데이터 분석 중...", session.deep_dive_first_issue()).await?;
    println!();
    output::print_sections(&render::deep_dive(response));
    Ok(())
}

async fn perspective(session: &mut Session) -> Result<()> {
    let labels: Vec<String> = Viewpoint::ALL
        .iter()
        .map(|v| format!("{} 관점", v.label()))
        .collect();
    let choice = Select::new()
        .with_prompt("관점별 분석")
        .items(&labels)
        .default(0)
        .interact_opt()
        .context("Failed to read viewpoint selection")?;

    let Some(index) = choice else { return Ok(()) };
    let viewpoint = Viewpoint::ALL[index];

    let response = output::with_spinner(
        &format!("{} 관점 분석 중...", viewpoint),
        session.expand_perspective(viewpoint),
    )
    .await?;
    println!();
    output::print_sections(&render::perspectives(&response.perspectives));
    Ok(())
}

fn review(session: &Session) {
    println!();
    if let Some(director) = session.director() {
        output::print_sections(&render::director(director));
    }
    if let Some(dive) = session.deep_dive_result() {
        output::print_sections(&render::deep_dive(dive));
    }
    if let Some(view) = session.perspective_result() {
        output::print_sections(&render::perspectives(&view.perspectives));
    }
}

fn notes(session: &mut Session) -> Result<()> {
    const ITEMS: [&str; 4] = ["현장 메모 추가", "추가 질문 아이디어 추가", "초기화", "돌아가기"];

    loop {
        output::print_notes(&session.notes);
        let choice = Select::new()
            .with_prompt("기자 메모")
            .items(&ITEMS)
            .default(0)
            .interact_opt()
            .context("Failed to read notes selection")?;

        match choice {
            Some(0) => {
                let line = read_line("현장 메모")?;
                if !line.trim().is_empty() {
                    session.notes.add_field_note(&line);
                    output::print_success("현장 메모를 추가했습니다.");
                }
            }
            Some(1) => {
                let line = read_line("추가 질문")?;
                if !line.trim().is_empty() {
                    session.notes.add_question_idea(&line);
                    output::print_success("추가 질문을 기록했습니다.");
                }
            }
            Some(2) => session.notes.clear(),
            _ => return Ok(()),
        }
    }
}

async fn news_search(session: &mut Session) -> Result<()> {
    let topic = read_line("검색 주제")?;
    let articles = output::with_spinner("뉴스 검색 중...", session.search_news(&topic)).await?;
    println!();
    output::print_sections(&render::news_articles(articles));
    Ok(())
}

async fn news_analyze(session: &mut Session) -> Result<()> {
    let analysis = output::with_spinner("기사 분석 중...", session.analyze_news()).await?;
    println!();
    output::print_sections(&render::news_analysis(analysis));
    Ok(())
}
