//! Human-readable progress and failure lines for the build log.

use std::io::Write;

use tracing::{debug, warn};

/// Append-only destination for diagnostic lines.
pub trait DiagnosticSink {
    /// Appends one line.
    fn log(&mut self, message: &str);
}

impl DiagnosticSink for Vec<String> {
    fn log(&mut self, message: &str) {
        self.push(message.to_string());
    }
}

/// Sink that writes each line to a build log and mirrors it to `tracing`.
///
/// The mirror is emitted at `debug` under the `branch_devs::build_log`
/// target, so lines already written to stderr are not repeated at the
/// default and `info` levels.
pub struct BuildLog<W: Write> {
    writer: W,
}

impl<W: Write> BuildLog<W> {
    /// Wraps a writer such as stderr or an open log file.
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Returns the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> DiagnosticSink for BuildLog<W> {
    fn log(&mut self, message: &str) {
        debug!(target: "branch_devs::build_log", "{message}");
        // A broken build log must not abort notification.
        if let Err(e) = writeln!(self.writer, "{message}").and_then(|()| self.writer.flush()) {
            warn!(error = %e, "Failed to write to build log");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};
    use tracing::Level;

    #[test]
    fn build_log_writes_one_line_per_message() {
        let mut log = BuildLog::new(Vec::new());
        log.log("first");
        log.log("second");
        let written = String::from_utf8(log.into_inner()).unwrap();
        assert_eq!(written, "first\nsecond\n");
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn traced_at(level: Level) -> String {
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(move || writer.clone())
            .finish();

        tracing::subscriber::with_default(subscriber, || {
            BuildLog::new(Vec::new()).log("Cannot determine the checked out Git branch!");
        });
        let bytes = captured.0.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn build_log_mirror_is_quiet_at_info() {
        assert!(traced_at(Level::INFO).is_empty());
    }

    #[test]
    fn build_log_mirror_shows_at_debug() {
        let traced = traced_at(Level::DEBUG);
        assert!(traced.contains("branch_devs::build_log"));
        assert!(traced.contains("Cannot determine the checked out Git branch!"));
    }

    #[test]
    fn vec_sink_collects_messages() {
        let mut lines: Vec<String> = Vec::new();
        lines.log("hello");
        assert_eq!(lines, vec!["hello".to_string()]);
    }
}
