use std::process::Command;

use anyhow::Context;

use crate::error::PredictorError;

#[cfg(test)]
#[ctor::ctor]
fn init_backtrace() {
    color_backtrace::install();
}

/// An extension trait that is intended to add a run method to the std::process::Command struct.
pub trait CommandExt {
    /// Run the command to completion, returning its stdout.
    fn run(&mut self) -> Result<String, PredictorError>;
}

impl CommandExt for Command {
    fn run(&mut self) -> Result<String, PredictorError> {
        log::debug!("running: {self:?}");

        let output = self
            .output()
            .with_context(|| format!("failed to run command: {:?}", self.get_program()))?;

        let stdout =
            String::from_utf8(output.stdout).context("failed to convert stdout to UTF8")?;

        match output.status.success() {
            true => Ok(stdout),
            false => {
                let stderr = String::from_utf8_lossy(&output.stderr);

                log::debug!("command:\n{self:?}\n");
                log::debug!("stdout:\n{stdout}\n");
                log::debug!("stderr:\n{stderr}\n");

                // python tools put the exception message on the last line
                let message = stderr
                    .lines()
                    .rev()
                    .map(str::trim)
                    .find(|l| !l.is_empty())
                    .unwrap_or("no output on stderr")
                    .to_string();

                Err(PredictorError::Failed {
                    command: self.get_program().to_string_lossy().to_string(),
                    stderr: message,
                })
            }
        }
    }
}
