use std::io::{self, Write as _};

use anyhow::Context as _;
use tracing::warn;

use crate::error::LoomResult;

/// Fire-and-forget operator notification; no acknowledgment.
pub trait NotificationSink {
    fn notify(&mut self, message: &str);
}

/// Surfaces notifications through the log stream.
pub struct ConsoleNotifier;

impl NotificationSink for ConsoleNotifier {
    fn notify(&mut self, message: &str) {
        warn!("{message}");
    }
}

/// The human-in-the-loop confirmation that an interception has been
/// resolved. One call, one resume signal; there is no timeout because
/// resolving the remote challenge is outside the system's control.
pub trait ResumeGate {
    fn wait_for_resume(&mut self) -> LoomResult<()>;
}

/// Blocking prompt on the controlling terminal.
pub struct StdinGate;

impl ResumeGate for StdinGate {
    fn wait_for_resume(&mut self) -> LoomResult<()> {
        eprint!("Press Enter to continue drawing once the problem has been solved... ");
        io::stderr().flush().ok();
        let mut line = String::new();
        io::stdin()
            .read_line(&mut line)
            .context("read resume confirmation")?;
        Ok(())
    }
}
