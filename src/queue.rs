use std::collections::VecDeque;

/// A completed line waiting for its turn at the evaluator.
///
/// `echo` is set for lines that were never shown while typing (the tail of a
/// multi-line paste), so the dispatcher writes them out before evaluating.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedCommand {
    text: String,
    echo: bool,
}

impl QueuedCommand {
    pub fn new(text: impl Into<String>, echo: bool) -> Self {
        Self { text: text.into(), echo }
    }
    pub fn text(&self) -> &str {
        &self.text
    }
    pub fn echo(&self) -> bool {
        self.echo
    }
    pub fn into_text(self) -> String {
        self.text
    }
}

// plain fifo, no bounds - input is local and trusted
#[derive(Debug, Default)]
pub struct CommandQueue {
    pending: VecDeque<QueuedCommand>,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self { pending: VecDeque::new() }
    }
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
    pub fn len(&self) -> usize {
        self.pending.len()
    }
    pub fn enqueue(&mut self, cmd: QueuedCommand) {
        self.pending.push_back(cmd);
    }
    /// Empty queue gives `None`, never an error.
    pub fn dequeue(&mut self) -> Option<QueuedCommand> {
        self.pending.pop_front()
    }
}
