// ABOUTME: Interactive prompt seam for input resolution.
// ABOUTME: StdinPrompt reads the terminal; tests substitute a scripted source.

use std::io::{self, BufRead, Write};

/// Source of interactively-supplied parameter values.
pub trait PromptInput {
    /// Ask one question, offering a default the user can accept with Enter.
    fn ask(&mut self, question: &str, default: Option<&str>) -> io::Result<String>;
}

/// Prompts on stdout, reads answers from stdin.
pub struct StdinPrompt;

impl PromptInput for StdinPrompt {
    fn ask(&mut self, question: &str, default: Option<&str>) -> io::Result<String> {
        match default {
            Some(d) => print!("{question} [{d}]: "),
            None => print!("{question}: "),
        }
        io::stdout().flush()?;

        let mut answer = String::new();
        io::stdin().lock().read_line(&mut answer)?;
        let answer = answer.trim();

        if answer.is_empty() {
            Ok(default.unwrap_or("").to_string())
        } else {
            Ok(answer.to_string())
        }
    }
}

/// Scripted answers for tests. Panics if asked more questions than scripted.
pub struct ScriptedPrompt {
    answers: Vec<String>,
    next: usize,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: answers.iter().map(|s| s.to_string()).collect(),
            next: 0,
        }
    }
}

impl PromptInput for ScriptedPrompt {
    fn ask(&mut self, question: &str, default: Option<&str>) -> io::Result<String> {
        let answer = self
            .answers
            .get(self.next)
            .unwrap_or_else(|| panic!("no scripted answer for: {question}"))
            .clone();
        self.next += 1;
        if answer.is_empty() {
            return Ok(default.unwrap_or("").to_string());
        }
        Ok(answer)
    }
}
