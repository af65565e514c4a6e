//! Access key / secret key acquisition.
//!
//! Secrets come from a [`SecretSource`]: a masked prompt when stdin is an
//! interactive terminal, or one line per secret when stdin is piped or
//! redirected. Nothing read here is ever logged or echoed.

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use std::io::{self, BufRead, IsTerminal, Write};
use thiserror::Error;

pub const ACCESS_KEY_PROMPT: &str = "Enter your Access Key: ";
pub const SECRET_KEY_PROMPT: &str = "Enter your Secret Key: ";

#[derive(Debug, Error)]
pub enum SecretError {
    #[error("no more input while reading {what}")]
    Exhausted { what: &'static str },
    #[error("{what} must not be empty")]
    Empty { what: &'static str },
    #[error("prompt interrupted")]
    Interrupted,
    #[error("failed to read {what}: {source}")]
    Io {
        what: &'static str,
        #[source]
        source: io::Error,
    },
}

/// Something that can hand out one secret per call, in order.
pub trait SecretSource {
    fn read_secret(&mut self, prompt: &str, what: &'static str) -> Result<String, SecretError>;
}

/// The access key / secret key pair used to log in.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub access_key: String,
    pub secret_key: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("access_key", &"<redacted>")
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

impl Credentials {
    /// Reads the access key, then the secret key.
    pub fn read_from(source: &mut dyn SecretSource) -> Result<Self, SecretError> {
        let access_key = source.read_secret(ACCESS_KEY_PROMPT, "access key")?;
        let secret_key = source.read_secret(SECRET_KEY_PROMPT, "secret key")?;
        Ok(Self {
            access_key,
            secret_key,
        })
    }
}

/// Reads each secret as one line from a stream, without the line terminator.
pub struct LineSecretSource<R> {
    reader: R,
}

impl<R: BufRead> LineSecretSource<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> SecretSource for LineSecretSource<R> {
    fn read_secret(&mut self, _prompt: &str, what: &'static str) -> Result<String, SecretError> {
        let mut line = String::new();
        let read = self
            .reader
            .read_line(&mut line)
            .map_err(|source| SecretError::Io { what, source })?;
        if read == 0 {
            return Err(SecretError::Exhausted { what });
        }
        let secret = line.trim_end_matches(['\n', '\r']).to_string();
        if secret.is_empty() {
            return Err(SecretError::Empty { what });
        }
        Ok(secret)
    }
}

/// Masked prompt on the controlling terminal. Keystrokes are read in raw
/// mode and not echoed.
pub struct TerminalSecretSource;

/// Leaves raw mode when dropped, including on early return.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

impl SecretSource for TerminalSecretSource {
    fn read_secret(&mut self, prompt: &str, what: &'static str) -> Result<String, SecretError> {
        let io_err = |source| SecretError::Io { what, source };

        let mut stderr = io::stderr();
        write!(stderr, "{}", prompt).map_err(io_err)?;
        stderr.flush().map_err(io_err)?;

        let mut secret = String::new();
        {
            let _raw = RawModeGuard::enable().map_err(io_err)?;
            loop {
                let key = match event::read().map_err(io_err)? {
                    Event::Key(key) if key.kind != KeyEventKind::Release => key,
                    _ => continue,
                };
                match apply_key(&mut secret, key) {
                    KeyOutcome::Continue => {}
                    KeyOutcome::Submit => break,
                    KeyOutcome::Cancel => {
                        drop(_raw);
                        let _ = writeln!(stderr);
                        return Err(SecretError::Interrupted);
                    }
                }
            }
        }
        writeln!(stderr).map_err(io_err)?;

        if secret.is_empty() {
            return Err(SecretError::Empty { what });
        }
        Ok(secret)
    }
}

#[derive(Debug, PartialEq, Eq)]
enum KeyOutcome {
    Continue,
    Submit,
    Cancel,
}

fn apply_key(secret: &mut String, key: KeyEvent) -> KeyOutcome {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    match key.code {
        KeyCode::Enter => KeyOutcome::Submit,
        KeyCode::Esc => KeyOutcome::Cancel,
        KeyCode::Char('c') | KeyCode::Char('d') if ctrl => KeyOutcome::Cancel,
        KeyCode::Char('u') if ctrl => {
            secret.clear();
            KeyOutcome::Continue
        }
        KeyCode::Backspace => {
            secret.pop();
            KeyOutcome::Continue
        }
        KeyCode::Char(c) if !ctrl => {
            secret.push(c);
            KeyOutcome::Continue
        }
        _ => KeyOutcome::Continue,
    }
}

/// Picks the masked prompt when stdin is a terminal, line reading otherwise.
pub fn stdin_secret_source() -> Box<dyn SecretSource> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        tracing::debug!("stdin is a terminal, using masked prompt");
        Box::new(TerminalSecretSource)
    } else {
        tracing::debug!("stdin is not a terminal, reading secrets line by line");
        Box::new(LineSecretSource::new(stdin.lock()))
    }
}

#[cfg(test)]
#[path = "tests/secrets_tests.rs"]
mod tests;
