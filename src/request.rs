/// A single prompt: the optional question label and the stream the
/// label (and trailing newline) should be written to.
use std::io::{self, Write};

/// Parameters for one prompt invocation.
///
/// `to_stdout` selects standard output for the label; the default is
/// standard error so that captured stdout holds only the answer.
#[derive(Debug, Clone)]
pub struct PromptRequest {
    pub question: Option<String>,
    pub to_stdout: bool,
}

impl PromptRequest {
    pub fn new(question: Option<String>, to_stdout: bool) -> Self {
        Self {
            question,
            to_stdout,
        }
    }

    /// Write `"<question>: "` (no newline) to the selected stream.
    /// Writes nothing when the question is absent or empty.
    pub fn write_label(&self) -> io::Result<()> {
        match &self.question {
            Some(q) if !q.is_empty() => self.emit(&format!("{}: ", q)),
            _ => Ok(()),
        }
    }

    /// Write the trailing newline that closes a no-echo prompt line.
    pub fn write_newline(&self) -> io::Result<()> {
        self.emit("\n")
    }

    fn emit(&self, text: &str) -> io::Result<()> {
        if self.to_stdout {
            let mut out = io::stdout();
            out.write_all(text.as_bytes())?;
            out.flush()
        } else {
            let mut err = io::stderr();
            err.write_all(text.as_bytes())?;
            err.flush()
        }
    }
}
