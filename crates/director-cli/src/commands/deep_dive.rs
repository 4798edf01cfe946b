//! Deep dive command.

use anyhow::Result;
use clap::Args;
use director_core::render;

use super::{require_input, text_or_stdin, Context};
use crate::output;

#[derive(Args)]
pub struct DeepDiveArgs {
    /// Topic to analyze (reads stdin when omitted)
    pub topic: Vec<String>,
}

pub async fn execute(args: DeepDiveArgs, ctx: &Context) -> Result<()> {
    let topic = require_input(&text_or_stdin(&args.topic)?, "분석 주제")?;
    let mut session = ctx.session();

    let response = output::with_spinner("데이터 분석 중...", session.deep_dive(&topic)).await?;

    if ctx.json {
        output::print_json(response)?;
    } else {
        output::print_sections(&render::deep_dive(response));
    }
    Ok(())
}
