use crate::config::TerminalConfig;
use crate::history::History;
use crate::queue::QueuedCommand;
use crate::terminal::{erase, CLEAR_ROW, CLEAR_ROW_UP, ERASE_CHAR, NEWLINE};

const DEL: char = '\x7f';
const BS: char = '\x08';
const ESC: char = '\x1b';

/// What a chunk of input or a key press did: text to echo, lines that are
/// ready for the dispatcher, and whether the screen should be wiped first.
#[derive(Debug, Default, PartialEq)]
pub struct Edit {
    pub echo: String,
    pub completed: Vec<QueuedCommand>,
    pub clear_screen: bool,
}

/// A key event as the widget reports it, before it turns into data.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyInput {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
    pub alt: bool,
}

impl KeyInput {
    pub fn plain(key: &str) -> Self {
        Self { key: key.to_string(), ..Default::default() }
    }
    pub fn ctrl(key: &str) -> Self {
        Self { key: key.to_string(), ctrl: true, ..Default::default() }
    }
}

// line being typed + history. row_starts holds the byte offset of every
// continued row, so the current visual row starts at the last of them.
pub struct LineEditor {
    line: String,
    row_starts: Vec<usize>,
    history: History,
    pasted: bool, // line comes from the unechoed tail of a paste
    after_cr: bool,
    prompt: String,
    continuation_prompt: String,
}

impl LineEditor {
    pub fn new(config: &TerminalConfig) -> Self {
        Self {
            line: String::new(),
            row_starts: Vec::new(),
            history: History::new(),
            pasted: false,
            after_cr: false,
            prompt: config.prompt.clone(),
            continuation_prompt: config.continuation_prompt.clone(),
        }
    }

    pub fn line(&self) -> &str {
        &self.line
    }
    pub fn history(&self) -> &History {
        &self.history
    }
    pub fn is_pasted(&self) -> bool {
        self.pasted
    }

    /// Feed one chunk of terminal data. A chunk holding a line break with more
    /// text after it is a paste: the first line shows up as typed, the rest
    /// are queued with echo so the dispatcher prints them when they run.
    ///
    /// A paste that ends without a line break leaves its last line unechoed.
    /// Keys typed onto that line are not echoed either (and backspace writes
    /// no erase) until the line completes and the dispatcher prints it whole.
    pub fn feed(&mut self, chunk: &str, is_complete: impl Fn(&str) -> bool) -> Edit {
        let mut edit = Edit::default();
        let chars: Vec<char> = chunk.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let ch = chars[i];
            i += 1;

            if ch == '\n' && self.after_cr {
                self.after_cr = false;
                continue;
            }
            self.after_cr = ch == '\r';

            match ch {
                '\r' | '\n' => {
                    let mut rest = &chars[i..];
                    if ch == '\r' && rest.first() == Some(&'\n') {
                        rest = &rest[1..];
                    }
                    self.carriage_return(&is_complete, !rest.is_empty(), &mut edit);
                }
                DEL | BS => self.delete_back(&mut edit),
                ESC => i = skip_escape(&chars, i),
                '\t' => self.insert(ch, &mut edit),
                c if c.is_control() => {}
                c => self.insert(c, &mut edit),
            }
        }
        edit
    }

    /// Returns `None` when the key is not ours, so the host keeps its default
    /// behaviour (copy/paste shortcuts in particular).
    pub fn handle_key(&mut self, key: &KeyInput) -> Option<Edit> {
        if key.ctrl && !key.meta && !key.alt && key.key.eq_ignore_ascii_case("l") {
            return Some(Edit {
                echo: format!("{}{}", self.prompt, self.render()),
                clear_screen: true,
                ..Default::default()
            });
        }
        if key.ctrl || key.meta {
            return None;
        }

        let entry = match key.key.as_str() {
            "ArrowUp" => self.history.previous().map(str::to_owned),
            "ArrowDown" => self.history.next().map(str::to_owned),
            _ => return None,
        };

        let mut edit = Edit::default();
        if let Some(entry) = entry {
            self.replace_line(entry, &mut edit);
        }
        Some(edit)
    }

    /// What to put back on screen after a fresh prompt: rows typed ahead while
    /// a command was running. Empty for unechoed paste tails.
    pub fn render(&self) -> String {
        if self.pasted {
            return String::new();
        }
        let joiner = format!("{}{}", NEWLINE, self.continuation_prompt);
        let mut out = String::new();
        let mut start = 0;
        for &next in &self.row_starts {
            let row = &self.line[start..next];
            out.push_str(row.strip_suffix('\n').unwrap_or(row));
            out.push_str(&joiner);
            start = next;
        }
        out.push_str(&self.line[start..]);
        out
    }

    fn row_start(&self) -> usize {
        self.row_starts.last().copied().unwrap_or(0)
    }

    fn insert(&mut self, ch: char, edit: &mut Edit) {
        self.line.push(ch);
        if !self.pasted {
            edit.echo.push(ch);
        }
    }

    fn delete_back(&mut self, edit: &mut Edit) {
        if self.line.len() <= self.row_start() {
            return;
        }
        self.line.pop();
        if !self.pasted {
            edit.echo.push_str(ERASE_CHAR);
        }
    }

    fn carriage_return(&mut self, is_complete: &impl Fn(&str) -> bool, more_follows: bool, edit: &mut Edit) {
        if self.line.ends_with('\\') {
            self.line.pop();
            self.continue_row(edit);
            return;
        }
        if !is_complete(&self.line) {
            self.line.push('\n');
            self.continue_row(edit);
            return;
        }

        let text = std::mem::take(&mut self.line);
        self.row_starts.clear();
        if !self.pasted {
            edit.echo.push_str(NEWLINE);
        }
        self.history.push(&text);
        edit.completed.push(QueuedCommand::new(text, self.pasted));
        self.pasted = more_follows;
    }

    fn continue_row(&mut self, edit: &mut Edit) {
        self.row_starts.push(self.line.len());
        if !self.pasted {
            edit.echo.push_str(NEWLINE);
            edit.echo.push_str(&self.continuation_prompt);
        }
    }

    // wipe every row of the shown line, back to a bare prompt when it spans
    // more than one
    fn erase_shown(&self, edit: &mut Edit) {
        let row_chars = self.line[self.row_start()..].chars().count();
        edit.echo.push_str(&erase(row_chars));
        if !self.row_starts.is_empty() {
            edit.echo.push_str(&CLEAR_ROW_UP.repeat(self.row_starts.len()));
            edit.echo.push_str(CLEAR_ROW);
            edit.echo.push_str(&self.prompt);
        }
    }

    fn replace_line(&mut self, entry: String, edit: &mut Edit) {
        if !self.pasted {
            self.erase_shown(edit);
        }
        self.pasted = false;
        self.row_starts = entry.match_indices('\n').map(|(idx, _)| idx + 1).collect();
        let shown = entry.replace('\n', &format!("{}{}", NEWLINE, self.continuation_prompt));
        edit.echo.push_str(&shown);
        self.line = entry;
    }
}

// CSI / SS3 sequences end at a byte in '@'..='~'; anything else is a lone
// ESC (or ESC + one char) and is dropped as such
fn skip_escape(chars: &[char], mut i: usize) -> usize {
    match chars.get(i) {
        Some('[') | Some('O') => {
            i += 1;
            while let Some(&c) = chars.get(i) {
                i += 1;
                if ('@'..='~').contains(&c) {
                    break;
                }
            }
            i
        }
        Some(_) => i + 1,
        None => i,
    }
}
