/// Plain (echoing) prompt path.
///
/// Ordinary line-buffered input with terminal echo left on. No terminal
/// mode changes and no signal race: with the terminal in canonical mode
/// the default signal dispositions already behave correctly.
use crate::error::PromptError;
use crate::request::PromptRequest;
use std::io::BufRead;

/// Prompt for a plain string.
///
/// Writes the label to the request's stream, reads one line from
/// `input`, and returns it trimmed. EOF before a line is a read error.
pub fn plain_string(
    request: &PromptRequest,
    input: &mut impl BufRead,
) -> Result<String, PromptError> {
    let _ = request.write_label();

    let mut line = String::new();
    let n = input
        .read_line(&mut line)
        .map_err(|e| PromptError::Read { source: e })?;
    if n == 0 {
        return Err(PromptError::Read {
            source: std::io::Error::new(
                std::io::ErrorKind::UnexpectedEof,
                "end of input before any data",
            ),
        });
    }

    Ok(line.trim().to_string())
}
