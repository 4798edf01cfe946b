//! Directing command.

use anyhow::Result;
use clap::Args;
use director_core::model::Viewpoint;
use director_core::render;

use super::{require_input, text_or_stdin, Context};
use crate::output;

#[derive(Args)]
pub struct DirectArgs {
    /// Field situation (reads stdin when omitted)
    pub situation: Vec<String>,

    /// Follow up with a deep dive on the first issue
    #[arg(long)]
    pub deep_dive: bool,

    /// Follow up with a viewpoint analysis (repeatable)
    #[arg(short, long = "perspective", value_name = "VIEWPOINT")]
    pub perspectives: Vec<Viewpoint>,
}

pub async fn execute(args: DirectArgs, ctx: &Context) -> Result<()> {
    let situation = require_input(&text_or_stdin(&args.situation)?, "현장 상황")?;
    let mut session = ctx.online_session().await?;

    let response = output::with_spinner("AI 분석 중...", session.submit_situation(&situation)).await?;
    if ctx.json {
        output::print_json(response)?;
    } else {
        output::print_sections(&render::director(response));
    }

    if args.deep_dive {
        let dive =
            output::with_spinner("데이터 분석 중...", session.deep_dive_first_issue()).await?;
        if ctx.json {
            output::print_json(dive)?;
        } else {
            output::print_sections(&render::deep_dive(dive));
        }
    }

    for viewpoint in args.perspectives {
        let result = output::with_spinner(
            &format!("{} 관점 분석 중...", viewpoint),
            session.expand_perspective(viewpoint),
        )
        .await?;
        if ctx.json {
            output::print_json(result)?;
        } else {
            output::print_sections(&render::perspectives(&result.perspectives));
        }
    }

    Ok(())
}
