//! Diagnostic sink for unsupported sequences
//!
//! Captured sessions routinely contain sequences the simulator does not
//! understand. Those are reported here and processing continues.

/// Receiver of human-readable "unsupported sequence" notices.
///
/// Implementations must not fail.
pub trait DiagnosticSink {
    /// Record one notice
    fn report(&mut self, description: &str);
}

/// Default sink: forwards notices to `tracing` at warn level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, description: &str) {
        tracing::warn!(target: "scriptcat::unsupported", "{}", description);
    }
}

/// Sink that keeps every notice in memory, in order.
#[derive(Debug, Default, Clone)]
pub struct CollectingSink {
    notices: Vec<String>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Notices received so far
    pub fn notices(&self) -> &[String] {
        &self.notices
    }

    pub fn len(&self) -> usize {
        self.notices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notices.is_empty()
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, description: &str) {
        self.notices.push(description.to_string());
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &mut S {
    fn report(&mut self, description: &str) {
        (**self).report(description);
    }
}
