use std::sync::mpsc::{self, Receiver, Sender};

use tracing::warn;

use crate::Diagnostic;

/// Trait for consuming diagnostics.
///
/// Each frontend provides its own implementation.
pub trait DiagnosticSink: Send + Sync {
    fn emit(&self, diagnostic: Diagnostic);
}

/// Default sink that forwards diagnostics to the `tracing` warn stream.
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, diagnostic: Diagnostic) {
        match diagnostic {
            Diagnostic::MissingMagicBytes { path } => {
                warn!(
                    path = %path.display(),
                    "seems to be a Type 1 AppImage without magic bytes"
                );
            }
        }
    }
}

/// Channel-based diagnostic sink.
///
/// Sends diagnostics through a standard mpsc channel. The receiver end
/// can be polled by any consumer (GUI, test harness, etc.).
pub struct ChannelSink {
    sender: Sender<Diagnostic>,
}

impl ChannelSink {
    pub fn new() -> (Self, Receiver<Diagnostic>) {
        let (sender, receiver) = mpsc::channel();
        (
            Self {
                sender,
            },
            receiver,
        )
    }
}

impl DiagnosticSink for ChannelSink {
    fn emit(&self, diagnostic: Diagnostic) {
        let _ = self.sender.send(diagnostic);
    }
}

/// No-op diagnostic sink for headless operation.
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _diagnostic: Diagnostic) {}
}

/// Collector sink that stores all diagnostics for inspection.
///
/// Useful in tests to verify that expected diagnostics were emitted.
#[derive(Default)]
pub struct CollectorSink {
    diagnostics: std::sync::Mutex<Vec<Diagnostic>>,
}

impl CollectorSink {
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().unwrap().clone()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticSink for CollectorSink {
    fn emit(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().unwrap().push(diagnostic);
    }
}
