/// Errors that can occur while prompting for input.
#[derive(Debug)]
pub enum PromptError {
    /// Failed to switch the terminal into raw mode or the input stream
    /// is not an interactive terminal.
    TerminalMode { source: nix::Error },
    /// Failed to read a line from the terminal (device error, EOF, or
    /// non-UTF-8 input).
    Read { source: std::io::Error },
    /// A termination-class signal arrived before input completed.
    Interrupted { signal: &'static str },
    /// The entered line is not valid JSON.
    InvalidJson { source: serde_json::Error },
}

impl std::fmt::Display for PromptError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PromptError::TerminalMode { source } => {
                write!(f, "failed to switch terminal to raw mode: {}", source)
            }
            PromptError::Read { source } => {
                write!(f, "failed to read input from terminal: {}", source)
            }
            PromptError::Interrupted { signal } => {
                write!(f, "interrupted by signal {}", signal)
            }
            PromptError::InvalidJson { source } => {
                write!(f, "input is not valid JSON: {}", source)
            }
        }
    }
}

impl std::error::Error for PromptError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PromptError::TerminalMode { source } => Some(source),
            PromptError::Read { source } => Some(source),
            PromptError::Interrupted { .. } => None,
            PromptError::InvalidJson { source } => Some(source),
        }
    }
}
