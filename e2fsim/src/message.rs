use std::sync::Mutex;

/// Receives messages meant for the person driving the engine.
///
/// The engine shows these in its UI; the default sink just logs them.
pub trait MessageSink {
    /// Delivers one message.
    fn message(&self, text: &str);
}

/// Sends user messages to the log.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogSink;

impl MessageSink for LogSink {
    fn message(&self, text: &str) {
        info!("{}", text);
    }
}

/// Keeps every message it receives.
#[derive(Debug, Default)]
pub struct MessageLog(Mutex<Vec<String>>);

impl MessageLog {
    /// Creates an empty log.
    pub fn new() -> MessageLog {
        MessageLog::default()
    }
    /// The messages received so far, oldest first.
    pub fn messages(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(m) => m.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl MessageSink for MessageLog {
    fn message(&self, text: &str) {
        match self.0.lock() {
            Ok(mut m) => m.push(text.to_string()),
            Err(poisoned) => poisoned.into_inner().push(text.to_string()),
        }
    }
}

#[test]
fn message_log_keeps_order() {
    let log = MessageLog::new();
    log.message("first");
    log.message("second");
    assert_eq!(log.messages(), vec!["first", "second"]);
}
