// terminal front-end for an interpreter compiled to wasm
// keystrokes -> line editor -> command queue -> one-at-a-time evaluation
pub mod config;
pub mod console;
pub mod context;
pub mod dispatch;
pub mod editor;
pub mod evaluator;
pub mod history;
pub mod queue;
pub mod syntax;
pub mod terminal;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod testing;

pub use config::TerminalConfig;
pub use context::{Session, SessionSnapshot};
pub use dispatch::{DrainPhase, Runtime};
pub use editor::{Edit, KeyInput, LineEditor};
pub use evaluator::{EvalResult, Evaluator};
pub use queue::{CommandQueue, QueuedCommand};
pub use terminal::TerminalSink;
