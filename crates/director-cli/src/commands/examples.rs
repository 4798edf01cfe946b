//! Example situations command.

use anyhow::Result;
use director_core::DirectorApi;

use super::Context;
use crate::output;

pub async fn execute(ctx: &Context) -> Result<()> {
    let value = output::with_spinner("예시 데이터 요청 중...", ctx.client.examples()).await?;

    if ctx.json {
        output::print_json(&value)?;
    } else {
        output::print_examples(&value);
    }
    Ok(())
}
