//! User-facing notifications
//!
//! Some failures are reported to the user instead of being returned as
//! errors. A [`Notifier`] receives them. [`detect`] picks one from the
//! execution context: a console line whenever the process has a standard
//! input stream (terminal, pipe or redirected file), otherwise a `tracing`
//! event for the host to surface.

use std::cell::RefCell;
use std::io::Write;

/// How serious a notice is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Severity {
    #[default]
    None,
    Information,
    Warning,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    pub title: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new<T: Into<String>, U: Into<String>>(text: T, title: U, severity: Severity) -> Self {
        Self {
            text: text.into(),
            title: title.into(),
            severity,
        }
    }
}

/// Receives notices
pub trait Notifier {
    fn notify(&self, notice: &Notice);
}

impl<F> Notifier for F
where
    F: Fn(&Notice),
{
    fn notify(&self, notice: &Notice) {
        self(notice)
    }
}

/// Writes the notice text as one line
#[derive(Debug)]
pub struct ConsoleNotifier<W: Write> {
    out: RefCell<W>,
}

impl<W: Write> ConsoleNotifier<W> {
    pub fn new(out: W) -> Self {
        Self {
            out: RefCell::new(out),
        }
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

impl ConsoleNotifier<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write> Notifier for ConsoleNotifier<W> {
    fn notify(&self, notice: &Notice) {
        let mut out = self.out.borrow_mut();
        // Nowhere left to report a failed console write
        let _ = writeln!(out, "{}", notice.text);
        let _ = out.flush();
    }
}

/// Emits the notice as a `tracing` event
///
/// Errors are logged at `error`, everything else at `warn`. Nothing goes
/// below `warn`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingNotifier;

impl Notifier for TracingNotifier {
    fn notify(&self, notice: &Notice) {
        let Notice { text, title, .. } = notice;
        match notice.severity {
            Severity::Error => tracing::error!(%title, "{text}"),
            Severity::Warning | Severity::Information | Severity::None => {
                tracing::warn!(%title, "{text}")
            }
        }
    }
}

/// Pick the notifier for the current process
pub fn detect() -> Box<dyn Notifier> {
    detect_with(has_stdin(), std::io::stdout())
}

/// Console output to `out` when `console` is set, a tracing event otherwise
pub fn detect_with<W: Write + 'static>(console: bool, out: W) -> Box<dyn Notifier> {
    if console {
        Box::new(ConsoleNotifier::new(out))
    } else {
        Box::new(TracingNotifier)
    }
}

/// Whether the process was started with a standard input stream at all
///
/// A terminal, a pipe and `/dev/null` all count. Only a missing or closed
/// handle (a detached GUI host) does not.
#[cfg(unix)]
fn has_stdin() -> bool {
    use std::os::fd::AsFd;
    std::io::stdin().as_fd().try_clone_to_owned().is_ok()
}

#[cfg(windows)]
fn has_stdin() -> bool {
    use std::os::windows::io::AsHandle;
    std::io::stdin().as_handle().try_clone_to_owned().is_ok()
}

#[cfg(not(any(unix, windows)))]
fn has_stdin() -> bool {
    true
}
