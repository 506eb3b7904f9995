use crate::commands::{CmdMessage, CmdResult};
use crate::error::Result;
use crate::generate::{Backend, CardGenerator};

/// Confirms the configured backend answers.
pub fn run<B: Backend>(generator: &CardGenerator<B>) -> Result<CmdResult> {
    generator.check()?;
    let mut result = CmdResult::default();
    result.add_message(CmdMessage::success(format!(
        "Backend \"{}\" is reachable",
        generator.backend().name()
    )));
    Ok(result)
}
