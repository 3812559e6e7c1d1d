use crate::console;
use serde::{Deserialize, Serialize};

pub const DEFAULT_DRAIN_DELAY_MS: u32 = 10;

/// Per-session terminal settings. Every field has a default, so hosts only
/// pass what they want to change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    pub prompt: String,
    pub continuation_prompt: String,
    /// Pause before each drain step, gives the page a chance to repaint.
    pub drain_delay_ms: u32,
    /// SGR parameter used for evaluator errors, e.g. "31" or "1;31".
    pub error_sgr: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            continuation_prompt: "+ ".to_string(),
            drain_delay_ms: DEFAULT_DRAIN_DELAY_MS,
            error_sgr: "31".to_string(),
        }
    }
}

impl TerminalConfig {
    pub fn from_json(text: &str) -> Result<Self, String> {
        if text.trim().is_empty() {
            console::log("config", "empty terminal config, using defaults");
            return Ok(Self::default());
        }
        serde_json::from_str(text).map_err(|e| format!("invalid terminal config: {}", e))
    }

    pub fn style_error(&self, msg: &str) -> String {
        format!("\x1b[{}m{}\x1b[0m", self.error_sgr, msg)
    }
}
