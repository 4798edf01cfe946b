//! Connection test command.

use anyhow::Result;
use director_core::DirectorApi;

use super::Context;
use crate::output;

pub async fn execute(ctx: &Context) -> Result<()> {
    let report = output::with_spinner("테스트 중...", ctx.client.probe()).await;

    if ctx.json {
        output::print_json(&report)?;
    } else {
        output::print_probe(&report);
    }

    if report.status.is_offline() {
        anyhow::bail!(director_core::DirectorError::Offline);
    }
    Ok(())
}
