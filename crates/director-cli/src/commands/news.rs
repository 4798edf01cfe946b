//! News search and analysis command.

use anyhow::Result;
use clap::Args;
use director_core::render;

use super::{require_input, text_or_stdin, Context};
use crate::output;

#[derive(Args)]
pub struct NewsArgs {
    /// Topic to search (reads stdin when omitted)
    pub topic: Vec<String>,

    /// Stop after the search phase
    #[arg(long)]
    pub search_only: bool,
}

pub async fn execute(args: NewsArgs, ctx: &Context) -> Result<()> {
    let topic = require_input(&text_or_stdin(&args.topic)?, "검색 주제")?;
    let mut session = ctx.session();

    let articles = output::with_spinner("뉴스 검색 중...", session.search_news(&topic)).await?;
    if ctx.json && args.search_only {
        output::print_json(&articles)?;
    } else if !ctx.json {
        output::print_sections(&render::news_articles(articles));
    }

    if args.search_only {
        return Ok(());
    }
    if articles.is_empty() {
        output::print_hint("검색된 기사가 없어 분석을 건너뜁니다.");
        return Ok(());
    }

    let analysis = output::with_spinner("기사 분석 중...", session.analyze_news()).await?;
    if ctx.json {
        output::print_json(analysis)?;
    } else {
        output::print_sections(&render::news_analysis(analysis));
    }
    Ok(())
}
