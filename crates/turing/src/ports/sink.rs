//! Fragment sinks
//!
//! Where a turn writes its fragments. The orchestrator calls `deliver`
//! synchronously, in arrival order, on the task running the turn.

/// Consumer of streamed text
pub trait FragmentSink: Send {
    fn deliver(&mut self, fragment: &str);
}

impl<F> FragmentSink for F
where
    F: FnMut(&str) + Send,
{
    fn deliver(&mut self, fragment: &str) {
        self(fragment)
    }
}

/// Sink that discards everything
pub struct NullSink;

impl FragmentSink for NullSink {
    fn deliver(&mut self, _fragment: &str) {}
}
