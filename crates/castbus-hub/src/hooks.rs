use std::fmt;
use std::sync::Arc;

use castbus_wire::Envelope;

/// Hook invoked with the envelope an operation is working on.
pub type MessageHook = Arc<dyn Fn(&Envelope) + Send + Sync>;

/// Hook invoked around close, with no arguments.
pub type CloseHook = Arc<dyn Fn() + Send + Sync>;

/// Optional lifecycle callbacks fired around bus operations.
///
/// Supplied once per bus at attach time. Close fires its hooks from a
/// snapshot captured before the bundle is reset, so `after_close` runs even
/// though the live bundle is already empty by then.
#[derive(Clone, Default)]
pub struct Hooks {
    /// Fired just before a registered callback runs for an incoming message.
    pub before_dispatch: Option<MessageHook>,
    /// Fired just after a registered callback returns.
    pub after_dispatch: Option<MessageHook>,
    /// Fired just before an outgoing envelope is handed to the transport.
    pub before_post: Option<MessageHook>,
    /// Fired just after an outgoing envelope was handed to the transport.
    pub after_post: Option<MessageHook>,
    /// Fired at the start of close, before any state is torn down.
    pub before_close: Option<CloseHook>,
    /// Fired at the end of close.
    pub after_close: Option<CloseHook>,
    /// Fired when an incoming message names no registered callback.
    pub on_error: Option<MessageHook>,
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("before_dispatch", &self.before_dispatch.is_some())
            .field("after_dispatch", &self.after_dispatch.is_some())
            .field("before_post", &self.before_post.is_some())
            .field("after_post", &self.after_post.is_some())
            .field("before_close", &self.before_close.is_some())
            .field("after_close", &self.after_close.is_some())
            .field("on_error", &self.on_error.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_reports_set_slots_only() {
        let hooks = Hooks {
            on_error: Some(Arc::new(|_| {})),
            ..Hooks::default()
        };
        let rendered = format!("{hooks:?}");
        assert!(rendered.contains("on_error: true"));
        assert!(rendered.contains("before_post: false"));
    }
}
