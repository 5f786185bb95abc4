// ABOUTME: RemoteScript - a named, ordered list of shell steps rendered to one script.
// ABOUTME: Each step is Strict (aborts the script) or IgnoreAbsent (tolerated teardown).

use std::fmt;

/// How a single step treats failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepMode {
    /// A nonzero exit aborts the whole script.
    Strict,
    /// Failure is tolerated. Used for teardown-style operations where
    /// "target does not exist" is success, not error.
    IgnoreAbsent,
}

#[derive(Debug, Clone)]
struct Step {
    command: String,
    mode: StepMode,
}

/// A parameterized remote script, compiled from a session's values and
/// executed through a single run-and-capture primitive. Keeping remote-side
/// logic here (instead of opaque string blocks in each stage) makes it
/// testable without a host.
#[derive(Debug, Clone)]
pub struct RemoteScript {
    name: &'static str,
    steps: Vec<Step>,
}

impl RemoteScript {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Append a strict step.
    pub fn step(mut self, command: impl Into<String>) -> Self {
        self.steps.push(Step {
            command: command.into(),
            mode: StepMode::Strict,
        });
        self
    }

    /// Append a tolerated step.
    pub fn step_ignore_absent(mut self, command: impl Into<String>) -> Self {
        self.steps.push(Step {
            command: command.into(),
            mode: StepMode::IgnoreAbsent,
        });
        self
    }

    /// Render to a single shell script. `set -eu` makes strict steps fatal;
    /// tolerated steps are suffixed with `|| true`.
    pub fn render(&self) -> String {
        let mut script = String::from("set -eu\n");
        for step in &self.steps {
            match step.mode {
                StepMode::Strict => {
                    script.push_str(&step.command);
                    script.push('\n');
                }
                StepMode::IgnoreAbsent => {
                    // Multi-line tolerated steps are grouped so the suffix
                    // covers the whole step.
                    if step.command.contains('\n') {
                        script.push_str("{\n");
                        script.push_str(&step.command);
                        script.push_str("\n} || true\n");
                    } else {
                        script.push_str(&step.command);
                        script.push_str(" || true\n");
                    }
                }
            }
        }
        script
    }
}

impl fmt::Display for RemoteScript {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
