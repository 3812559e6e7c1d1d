/// Fallback completeness check for interpreters that don't expose one.
///
/// Text is complete once every `(`, `[` and `{` opened outside a string
/// literal or `#` comment has been closed and no quote is left open. A stray
/// closer counts as complete so the interpreter gets to report it.
pub fn brackets_balanced(text: &str) -> bool {
    let mut depth: i64 = 0;
    let mut quote: Option<char> = None;
    let mut escaped = false;
    let mut comment = false;

    for ch in text.chars() {
        if comment {
            if ch == '\n' {
                comment = false;
            }
            continue;
        }
        if let Some(q) = quote {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == q {
                quote = None;
            }
            continue;
        }
        match ch {
            '"' | '\'' => quote = Some(ch),
            '#' => comment = true,
            '(' | '[' | '{' => depth += 1,
            ')' | ']' | '}' => {
                depth -= 1;
                if depth < 0 {
                    return true;
                }
            }
            _ => {}
        }
    }

    quote.is_none() && depth == 0
}
