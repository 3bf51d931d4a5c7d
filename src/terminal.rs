/// Terminal mode switching for secret input.
///
/// Captures the terminal's termios attributes, applies a no-echo
/// non-canonical mode for the duration of one read, and restores the
/// captured attributes afterwards. Generic over the descriptor so the
/// real stdin and a test pty go through the same code.
use crate::error::PromptError;
use nix::sys::termios::{self, LocalFlags, SetArg, SpecialCharacterIndices, Termios};
use std::os::fd::AsFd;
use tracing::{debug, warn};

/// Terminal attributes captured before switching to raw mode.
///
/// Consumed by value in [`restore`], so each acquisition is restored
/// exactly once.
#[derive(Debug)]
pub struct ModeSnapshot {
    saved: Termios,
}

/// Switch the terminal behind `fd` into raw (no-echo, non-canonical) mode.
///
/// Returns a snapshot of the prior attributes on success. Fails with
/// `TerminalMode` if `fd` is not a terminal or either termios call fails;
/// on failure nothing was changed and there is nothing to restore.
///
/// ISIG is left enabled: Ctrl-C during the read still raises SIGINT.
pub fn acquire_raw_mode<F: AsFd>(fd: &F) -> Result<ModeSnapshot, PromptError> {
    let saved = termios::tcgetattr(fd).map_err(|e| PromptError::TerminalMode { source: e })?;

    let mut raw = saved.clone();
    raw.local_flags &= !(LocalFlags::ECHO
        | LocalFlags::ECHOE
        | LocalFlags::ECHOK
        | LocalFlags::ECHONL
        | LocalFlags::ICANON);
    // Non-canonical reads: deliver each byte as it arrives, no timeout.
    raw.control_chars[SpecialCharacterIndices::VMIN as usize] = 1;
    raw.control_chars[SpecialCharacterIndices::VTIME as usize] = 0;

    termios::tcsetattr(fd, SetArg::TCSANOW, &raw)
        .map_err(|e| PromptError::TerminalMode { source: e })?;

    debug!("terminal switched to raw mode");
    Ok(ModeSnapshot { saved })
}

/// Restore the terminal behind `fd` to the attributes in `snapshot`.
///
/// Best-effort: a restoration failure is logged and swallowed so it can
/// never mask the outcome of the read that preceded it.
pub fn restore<F: AsFd>(fd: &F, snapshot: ModeSnapshot) {
    match termios::tcsetattr(fd, SetArg::TCSANOW, &snapshot.saved) {
        Ok(()) => debug!("terminal mode restored"),
        Err(e) => warn!(error = %e, "failed to restore terminal mode"),
    }
}
