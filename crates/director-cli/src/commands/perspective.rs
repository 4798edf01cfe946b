//! Perspective expansion command.

use anyhow::Result;
use clap::Args;
use director_core::model::Viewpoint;
use director_core::{render, DirectorApi};

use super::{require_input, text_or_stdin, Context};
use crate::output;

#[derive(Args)]
pub struct PerspectiveArgs {
    /// Viewpoint (정치/politics, 경제/economy, 사회/society, 법제도/law)
    pub viewpoint: Viewpoint,

    /// Situation to re-analyze (reads stdin when omitted)
    #[arg(short, long)]
    pub situation: Option<String>,
}

pub async fn execute(args: PerspectiveArgs, ctx: &Context) -> Result<()> {
    let words: Vec<String> = args.situation.into_iter().collect();
    let situation = require_input(&text_or_stdin(&words)?, "현장 상황")?;

    let response = output::with_spinner(
        &format!("{} 관점 분석 중...", args.viewpoint),
        ctx.client.perspective(&situation, args.viewpoint.label()),
    )
    .await?;

    if ctx.json {
        output::print_json(&response)?;
    } else {
        output::print_sections(&render::perspectives(&response.perspectives));
    }
    Ok(())
}
