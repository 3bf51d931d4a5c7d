/// Secret (no-echo) prompt path.
///
/// Switches the terminal to raw mode, then races a blocking line read
/// against delivery of SIGINT, SIGTERM, or SIGPIPE: whichever finishes
/// first decides the outcome, and the terminal mode is restored on every
/// path before the result is returned.
use crate::error::PromptError;
use crate::request::PromptRequest;
use crate::terminal;
use std::io::{self, Read};
use std::os::fd::{AsRawFd, RawFd};
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::oneshot;
use tracing::debug;

/// Prompt for a secret string.
///
/// Writes the label to the request's stream, reads one line with echo
/// suppressed, restores the terminal, writes the trailing newline, and
/// returns the trimmed value. The secret itself is never written to any
/// output stream. Label write failures are ignored; they must not mask
/// the read outcome.
pub async fn secret_string(request: &PromptRequest) -> Result<String, PromptError> {
    let _ = request.write_label();

    let stdin = io::stdin();
    let snapshot = terminal::acquire_raw_mode(&stdin)?;

    let fd = stdin.as_raw_fd();
    let outcome = race_signals(move || read_secret_line(&mut FdReader { fd })).await;

    // Restore before reporting, on success and failure alike.
    terminal::restore(&stdin, snapshot);
    let _ = request.write_newline();

    outcome
}

/// Race a blocking input task against termination signals.
///
/// The input task runs on a detached thread and publishes its result
/// through a oneshot channel; SIGINT, SIGTERM, and SIGPIPE streams are
/// registered for the duration of the call. The first completion wins.
/// A signal win abandons the read: the thread stays blocked until its
/// read returns, and its late send into the dropped channel is
/// discarded. Dropping the signal streams on return withdraws interest,
/// so no handler from this call fires for a later signal.
async fn race_signals<F>(input: F) -> Result<String, PromptError>
where
    F: FnOnce() -> io::Result<String> + Send + 'static,
{
    // Register signal interest before the read starts so a signal that
    // arrives mid-setup cannot slip between the two tasks.
    let mut interrupt =
        signal(SignalKind::interrupt()).map_err(|e| PromptError::Read { source: e })?;
    let mut terminate =
        signal(SignalKind::terminate()).map_err(|e| PromptError::Read { source: e })?;
    let mut pipe = signal(SignalKind::pipe()).map_err(|e| PromptError::Read { source: e })?;

    let (tx, rx) = oneshot::channel();
    std::thread::spawn(move || {
        // The receiver is gone if a signal already won; discard the result.
        let _ = tx.send(input());
    });

    let name = tokio::select! {
        // When a line and a signal are both ready, prefer the line: the
        // user finished typing before the signal was observed.
        biased;
        line = rx => {
            return match line {
                Ok(Ok(value)) => Ok(value),
                Ok(Err(e)) => Err(PromptError::Read { source: e }),
                Err(_) => Err(PromptError::Read {
                    source: io::Error::other("input thread exited without a result"),
                }),
            };
        }
        _ = interrupt.recv() => "SIGINT",
        _ = terminate.recv() => "SIGTERM",
        _ = pipe.recv() => "SIGPIPE",
    };

    debug!(signal = name, "prompt interrupted before input completed");
    Err(PromptError::Interrupted { signal: name })
}

/// Unbuffered reads straight from a file descriptor.
///
/// `io::stdin()` wraps an 8 KiB BufReader, which would drain type-ahead
/// past the newline into process memory. Reading the descriptor itself
/// takes only the bytes asked for and leaves the rest on the terminal
/// for whatever reads next (the shell, or the next `--loop` pass).
struct FdReader {
    fd: RawFd,
}

impl Read for FdReader {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        nix::unistd::read(self.fd, buf).map_err(io::Error::from)
    }
}

/// Read one line of raw-mode input, byte by byte.
///
/// Callers pass an unbuffered reader, so nothing past the terminating
/// newline is consumed. `\n` or `\r` ends the line; backspace/DEL
/// erases the previous character (all of its bytes, for multibyte
/// UTF-8). EOF before any byte is an error; EOF after input ends the
/// line. The result is trimmed.
fn read_secret_line(input: &mut impl Read) -> io::Result<String> {
    let mut line: Vec<u8> = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        let n = match input.read(&mut byte) {
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        if n == 0 {
            if line.is_empty() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "end of input before any data",
                ));
            }
            break;
        }
        match byte[0] {
            b'\n' | b'\r' => break,
            0x08 | 0x7f => {
                // Erase one whole character: continuation bytes, then
                // the lead byte.
                while let Some(&last) = line.last() {
                    line.pop();
                    if last & 0xc0 != 0x80 {
                        break;
                    }
                }
            }
            b => line.push(b),
        }
    }

    let text =
        String::from_utf8(line).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(text.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use nix::sys::signal::{kill, Signal};
    use nix::unistd::Pid;
    use serial_test::serial;
    use std::io::Cursor;
    use std::time::Duration;

    #[test]
    fn test_read_line_trims_whitespace() {
        let mut input = Cursor::new(b"  secret123  \n".to_vec());
        assert_eq!(read_secret_line(&mut input).unwrap(), "secret123");
    }

    #[test]
    fn test_read_line_already_trimmed() {
        let mut input = Cursor::new(b"secret123\n".to_vec());
        assert_eq!(read_secret_line(&mut input).unwrap(), "secret123");
    }

    #[test]
    fn test_read_line_carriage_return_terminates() {
        // Raw mode delivers Enter as \r.
        let mut input = Cursor::new(b"123456\rleftover".to_vec());
        assert_eq!(read_secret_line(&mut input).unwrap(), "123456");
    }

    #[test]
    fn test_read_line_backspace_edits() {
        let mut input = Cursor::new(b"secrex\x7ft123\n".to_vec());
        assert_eq!(read_secret_line(&mut input).unwrap(), "secret123");
    }

    #[test]
    fn test_read_line_backspace_erases_whole_multibyte_char() {
        // "café" then DEL then "e": the two-byte é must go as a unit,
        // leaving valid UTF-8.
        let mut input = Cursor::new(b"caf\xc3\xa9\x7fe\n".to_vec());
        assert_eq!(read_secret_line(&mut input).unwrap(), "cafe");
    }

    #[test]
    fn test_fd_reader_leaves_bytes_past_newline() {
        let (r, w) = nix::unistd::pipe().unwrap();
        nix::unistd::write(&w, b"line1\nline2\n").unwrap();
        drop(w);

        let mut reader = FdReader { fd: r.as_raw_fd() };
        assert_eq!(read_secret_line(&mut reader).unwrap(), "line1");
        // The first read must not have drained the descriptor past its
        // newline; the second line is still there to be read.
        assert_eq!(read_secret_line(&mut reader).unwrap(), "line2");
    }

    #[test]
    fn test_read_line_eof_after_bytes_completes() {
        let mut input = Cursor::new(b"secret123".to_vec());
        assert_eq!(read_secret_line(&mut input).unwrap(), "secret123");
    }

    #[test]
    fn test_read_line_eof_before_bytes_is_error() {
        let mut input = Cursor::new(Vec::new());
        let err = read_secret_line(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }

    #[test]
    fn test_read_line_rejects_invalid_utf8() {
        let mut input = Cursor::new(vec![0xff, 0xfe, b'\n']);
        let err = read_secret_line(&mut input).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    // The race tests hold process-wide signal registrations, and the
    // SIGTERM raised in the signal-wins test is broadcast to every
    // registered stream; they must not overlap.
    #[tokio::test]
    #[serial(signal_race)]
    async fn test_race_input_wins() {
        let result = race_signals(|| Ok("secret123".to_string())).await;
        assert_eq!(result.unwrap(), "secret123");
    }

    #[tokio::test]
    #[serial(signal_race)]
    async fn test_race_read_error_propagates() {
        let result =
            race_signals(|| Err(io::Error::new(io::ErrorKind::BrokenPipe, "device gone"))).await;
        assert!(matches!(result, Err(PromptError::Read { .. })));
    }

    #[tokio::test]
    #[serial(signal_race)]
    async fn test_race_signal_wins_over_blocked_read() {
        let race = race_signals(|| {
            std::thread::sleep(Duration::from_secs(30));
            Ok(String::new())
        });
        // Deliver SIGTERM once the race is polling. The current-thread
        // runtime only runs this task while the race is parked in its
        // select, after the signal stream is registered.
        let killer = tokio::spawn(async {
            tokio::time::sleep(Duration::from_millis(100)).await;
            kill(Pid::this(), Signal::SIGTERM).unwrap();
        });

        let result = race.await;
        killer.await.unwrap();
        match result {
            Err(PromptError::Interrupted { signal }) => assert_eq!(signal, "SIGTERM"),
            other => panic!("expected Interrupted, got {:?}", other),
        }
    }
}
