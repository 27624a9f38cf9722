//! Submit events

/// An event whose default action the form suppresses on submit
///
/// Hosts wrap their native event type (a DOM event, a key press) in an
/// implementation of this trait.
pub trait FormEvent {
    /// Suppress the event's default action
    fn prevent_default(&mut self);
}

/// Plain submit event for hosts without a native event type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmitEvent {
    default_prevented: bool,
}

impl SubmitEvent {
    /// Create a fresh event
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if `prevent_default` was called
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented
    }
}

impl FormEvent for SubmitEvent {
    fn prevent_default(&mut self) {
        self.default_prevented = true;
    }
}
