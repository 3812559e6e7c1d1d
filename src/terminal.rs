// output side of the terminal widget (xterm.js and friends)

pub trait TerminalSink {
    fn write(&self, text: &str);
    fn clear(&self);
    fn focus(&self);
}

pub const ERASE_CHAR: &str = "\x08 \x08";
pub const NEWLINE: &str = "\r\n";
/// Blank the current row and move the cursor one row up.
pub const CLEAR_ROW_UP: &str = "\x1b[2K\x1b[1A";
/// Blank the current row and return to its first column.
pub const CLEAR_ROW: &str = "\x1b[2K\r";

/// Terminals want CRLF; interpreters and pasted text usually give bare LF.
pub fn to_crlf(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev = '\0';
    for ch in text.chars() {
        if ch == '\n' && prev != '\r' {
            out.push('\r');
        }
        out.push(ch);
        prev = ch;
    }
    out
}

/// Backspace-erase sequence covering `count` characters of the current row.
pub fn erase(count: usize) -> String {
    ERASE_CHAR.repeat(count)
}
