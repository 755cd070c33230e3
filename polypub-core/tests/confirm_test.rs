use polypub_core::confirm::{ConfirmationGate, Prompt};
use polypub_core::error::Result;
use polypub_core::options::RunOptions;

struct ScriptedPrompt {
    answer: Option<char>,
    asked: Vec<String>,
}

impl ScriptedPrompt {
    fn new(answer: Option<char>) -> Self {
        Self {
            answer,
            asked: Vec::new(),
        }
    }
}

impl Prompt for ScriptedPrompt {
    fn ask(&mut self, message: &str) -> Result<Option<char>> {
        self.asked.push(message.to_string());
        Ok(self.answer)
    }
}

fn publishing(tag: &str) -> RunOptions {
    RunOptions {
        dry_run: false,
        ..RunOptions::new(tag)
    }
}

#[test]
fn test_dry_run_never_prompts() {
    let mut prompt = ScriptedPrompt::new(Some('n'));
    let proceed = ConfirmationGate::should_proceed(&RunOptions::new("x"), 3, &mut prompt).unwrap();
    assert!(proceed);
    assert!(prompt.asked.is_empty());
}

#[test]
fn test_auto_confirm_never_prompts() {
    let options = RunOptions {
        auto_confirm: true,
        ..publishing("x")
    };
    let mut prompt = ScriptedPrompt::new(None);
    assert!(ConfirmationGate::should_proceed(&options, 3, &mut prompt).unwrap());
    assert!(prompt.asked.is_empty());
}

#[test]
fn test_prompt_shows_count_and_tag() {
    let mut prompt = ScriptedPrompt::new(Some('y'));
    assert!(ConfirmationGate::should_proceed(&publishing("alpha"), 4, &mut prompt).unwrap());
    assert_eq!(prompt.asked.len(), 1);
    assert!(prompt.asked[0].contains("4 packages"));
    assert!(prompt.asked[0].contains("\"alpha\""));
}

#[test]
fn test_uppercase_y_proceeds() {
    let mut prompt = ScriptedPrompt::new(Some('Y'));
    assert!(ConfirmationGate::should_proceed(&publishing("alpha"), 1, &mut prompt).unwrap());
}

#[test]
fn test_anything_else_declines() {
    for answer in [Some('n'), Some('N'), Some('\n'), Some('x'), None] {
        let mut prompt = ScriptedPrompt::new(answer);
        assert!(
            !ConfirmationGate::should_proceed(&publishing("alpha"), 1, &mut prompt).unwrap(),
            "{answer:?} must decline"
        );
    }
}
