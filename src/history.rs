// accepted commands, oldest first, plus an up/down navigation cursor

#[derive(Debug, Default)]
pub struct History {
    entries: Vec<String>,
    cursor: Option<usize>, // None = not navigating
}

impl History {
    pub fn new() -> Self {
        Self { entries: Vec::new(), cursor: None }
    }

    /// Record an accepted command. Blank lines are skipped. Always drops the
    /// navigation cursor so navigation starts over.
    pub fn push(&mut self, entry: &str) {
        self.cursor = None;
        if entry.trim().is_empty() {
            return;
        }
        self.entries.push(entry.to_string());
    }

    /// Up. The first press lands on the oldest entry, later presses walk
    /// toward the newest and stay there.
    pub fn previous(&mut self) -> Option<&str> {
        if self.entries.is_empty() {
            return None;
        }
        let idx = match self.cursor {
            None => 0,
            Some(i) => (i + 1).min(self.entries.len() - 1),
        };
        self.cursor = Some(idx);
        self.entries.get(idx).map(|s| s.as_str())
    }

    /// Down. Walks back toward the oldest entry and clamps there; does
    /// nothing until Up has been pressed.
    pub fn next(&mut self) -> Option<&str> {
        let idx = self.cursor?.saturating_sub(1);
        self.cursor = Some(idx);
        self.entries.get(idx).map(|s| s.as_str())
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }
    pub fn entries(&self) -> &[String] {
        &self.entries
    }
    pub fn len(&self) -> usize {
        self.entries.len()
    }
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn listing(&self) -> String {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, cmd)| format!("{:4}  {}", i + 1, cmd))
            .collect::<Vec<_>>()
            .join("\n")
    }
}
