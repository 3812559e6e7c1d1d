use crate::config::TerminalConfig;
use crate::console;
use crate::dispatch::{self, DrainPhase, Runtime};
use crate::editor::{Edit, KeyInput, LineEditor};
use crate::evaluator::Evaluator;
use crate::queue::{CommandQueue, QueuedCommand};
use crate::terminal::TerminalSink;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;

pub struct SessionState {
    pub editor: LineEditor,
    pub queue: CommandQueue,
    pub phase: DrainPhase,
}

/// Everything the host page may want to look at without poking internals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: String,
    pub line: String,
    pub history: Vec<String>,
    pub pending: usize,
    pub draining: bool,
}

/// One terminal: editor, queue and drain state plus the collaborators they
/// talk to. Lives behind an `Rc` because the drain task holds on to it.
///
/// All mutation goes through `state`, and no borrow of it survives an await.
pub struct Session {
    pub(crate) id: String,
    pub(crate) config: TerminalConfig,
    pub(crate) state: RefCell<SessionState>,
    pub(crate) terminal: Rc<dyn TerminalSink>,
    pub(crate) evaluator: Rc<dyn Evaluator>,
    pub(crate) runtime: Rc<dyn Runtime>,
}

impl Session {
    pub fn new(
        config: TerminalConfig,
        terminal: Rc<dyn TerminalSink>,
        evaluator: Rc<dyn Evaluator>,
        runtime: Rc<dyn Runtime>,
    ) -> Rc<Self> {
        let id = uuid::Uuid::new_v4().simple().to_string()[..8].to_string();
        let state = SessionState {
            editor: LineEditor::new(&config),
            queue: CommandQueue::new(),
            phase: DrainPhase::Idle,
        };
        Rc::new(Self {
            id,
            config,
            state: RefCell::new(state),
            terminal,
            evaluator,
            runtime,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }
    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    /// Show the first prompt and grab focus.
    pub fn start(&self) {
        console::log(&self.id, "session started");
        self.terminal.write(&self.config.prompt);
        self.terminal.focus();
    }

    /// Raw data from the widget: typed characters or a whole paste.
    pub fn handle_data(self: &Rc<Self>, data: &str) {
        let edit = {
            let mut state = self.state.borrow_mut();
            state.editor.feed(data, |text: &str| self.evaluator.is_complete(text))
        };
        self.apply(edit);
    }

    /// Key events. `false` means the key wasn't handled here and the host
    /// should let it through.
    pub fn handle_key(self: &Rc<Self>, key: &KeyInput) -> bool {
        let edit = self.state.borrow_mut().editor.handle_key(key);
        match edit {
            Some(edit) => {
                self.apply(edit);
                true
            }
            None => false,
        }
    }

    pub fn history(&self) -> Vec<String> {
        self.state.borrow().editor.history().entries().to_vec()
    }
    pub fn history_listing(&self) -> String {
        self.state.borrow().editor.history().listing()
    }
    pub fn pending(&self) -> usize {
        self.state.borrow().queue.len()
    }
    pub fn is_draining(&self) -> bool {
        self.state.borrow().phase == DrainPhase::Draining
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let state = self.state.borrow();
        SessionSnapshot {
            session_id: self.id.clone(),
            line: state.editor.line().to_string(),
            history: state.editor.history().entries().to_vec(),
            pending: state.queue.len(),
            draining: state.phase == DrainPhase::Draining,
        }
    }

    fn apply(self: &Rc<Self>, edit: Edit) {
        if edit.clear_screen {
            self.terminal.clear();
        }
        if !edit.echo.is_empty() {
            self.terminal.write(&edit.echo);
        }
        if !edit.completed.is_empty() {
            self.submit(edit.completed);
        }
    }

    // queue completed lines; the idle -> draining edge starts the drain task
    fn submit(self: &Rc<Self>, commands: Vec<QueuedCommand>) {
        let start_drain = {
            let mut state = self.state.borrow_mut();
            for cmd in commands {
                state.queue.enqueue(cmd);
            }
            if state.phase == DrainPhase::Idle {
                state.phase = DrainPhase::Draining;
                true
            } else {
                false
            }
        };
        if start_drain {
            self.runtime.spawn(Box::pin(dispatch::drain(Rc::clone(self))));
        }
    }
}
