// ABOUTME: Ordered, append-only output sink for one deployment's response body.
// ABOUTME: Pipeline stages and start-event handlers write through the same sink.

use parking_lot::Mutex;

/// Destination for response text.
///
/// Writes are appended in call order. One deployment owns one sink; the
/// orchestrator serializes its own writes, so implementations only need to
/// guard against handlers writing from other tasks.
pub trait OutputSink: Send + Sync {
    fn write(&self, text: &str);

    fn write_line(&self, line: &str) {
        self.write(line);
        self.write("\n");
    }
}

/// In-memory sink collecting the whole response.
#[derive(Debug, Default)]
pub struct ResponseBuffer {
    buffer: Mutex<String>,
}

impl ResponseBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of everything written so far.
    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.lock().is_empty()
    }
}

impl OutputSink for ResponseBuffer {
    fn write(&self, text: &str) {
        self.buffer.lock().push_str(text);
    }
}
