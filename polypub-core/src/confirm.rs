//! Interactive confirmation before touching the registry.

use crate::error::Result;
use crate::options::RunOptions;

/// Source of a single-key answer.
///
/// The CLI reads one key from the terminal; tests script the answer.
pub trait Prompt {
    /// Shows `message` and waits for one character. `None` means the input
    /// closed without an answer.
    fn ask(&mut self, message: &str) -> Result<Option<char>>;
}

/// Decides whether a run may go ahead.
pub struct ConfirmationGate;

impl ConfirmationGate {
    pub fn message(target_count: usize, tag: &str) -> String {
        let noun = if target_count == 1 {
            "package"
        } else {
            "packages"
        };
        format!(
            "Publish {} {} with tag \"{}\"? [y/N] ",
            target_count, noun, tag
        )
    }

    /// Dry runs and `--yes` runs proceed without asking. Otherwise only
    /// `y` or `Y` proceeds.
    pub fn should_proceed(
        options: &RunOptions,
        target_count: usize,
        prompt: &mut dyn Prompt,
    ) -> Result<bool> {
        if options.dry_run || options.auto_confirm {
            return Ok(true);
        }

        let answer = prompt.ask(&Self::message(target_count, &options.tag))?;
        let proceed = matches!(answer, Some('y') | Some('Y'));
        tracing::debug!(?answer, proceed, "confirmation answer");
        Ok(proceed)
    }
}
