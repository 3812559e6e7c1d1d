// fakes for the terminal, interpreter and timer so sessions can be driven
// from plain #[test]s with a LocalPool

use crate::config::TerminalConfig;
use crate::context::Session;
use crate::dispatch::Runtime;
use crate::evaluator::{EvalResult, Evaluator};
use crate::terminal::TerminalSink;
use futures::channel::oneshot;
use futures::executor::{LocalPool, LocalSpawner};
use futures::future::{self, LocalBoxFuture};
use futures::task::LocalSpawnExt;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

#[derive(Default)]
pub struct RecordingTerminal {
    output: RefCell<String>,
    cleared: Cell<usize>,
    focused: Cell<usize>,
}

impl RecordingTerminal {
    pub fn output(&self) -> String {
        self.output.borrow().clone()
    }
    pub fn cleared(&self) -> usize {
        self.cleared.get()
    }
    pub fn focused(&self) -> usize {
        self.focused.get()
    }
}

impl TerminalSink for RecordingTerminal {
    fn write(&self, text: &str) {
        self.output.borrow_mut().push_str(text);
    }
    fn clear(&self) {
        self.cleared.set(self.cleared.get() + 1);
    }
    fn focus(&self) {
        self.focused.set(self.focused.get() + 1);
    }
}

/// Answers immediately: "fail ..." errors out, anything else succeeds with
/// "ran <cmd>" (or a fixed output).
#[derive(Default)]
pub struct ScriptedEvaluator {
    calls: RefCell<Vec<String>>,
    output: Option<String>,
}

impl ScriptedEvaluator {
    pub fn with_output(output: &str) -> Self {
        Self { calls: RefCell::default(), output: Some(output.to_string()) }
    }
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
}

impl Evaluator for ScriptedEvaluator {
    fn evaluate(&self, source: &str) -> LocalBoxFuture<'static, EvalResult> {
        self.calls.borrow_mut().push(source.to_string());
        let result = if source.starts_with("fail") {
            Err(format!("error: {}", source))
        } else {
            Ok(self.output.clone().unwrap_or_else(|| format!("ran {}", source)))
        };
        Box::pin(future::ready(result))
    }
}

/// Every evaluation stays pending until the test releases it.
#[derive(Default)]
pub struct GatedEvaluator {
    calls: RefCell<Vec<String>>,
    waiting: RefCell<VecDeque<oneshot::Sender<EvalResult>>>,
}

impl GatedEvaluator {
    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }
    pub fn release(&self, result: EvalResult) {
        let tx = self.waiting.borrow_mut().pop_front().expect("no evaluation in flight");
        tx.send(result).expect("evaluation dropped");
    }
}

impl Evaluator for GatedEvaluator {
    fn evaluate(&self, source: &str) -> LocalBoxFuture<'static, EvalResult> {
        self.calls.borrow_mut().push(source.to_string());
        let (tx, rx) = oneshot::channel();
        self.waiting.borrow_mut().push_back(tx);
        Box::pin(async move { rx.await.unwrap_or_else(|_| Err("cancelled".to_string())) })
    }
}

/// Sleeps complete at once, but the requested delays are recorded.
pub struct TestRuntime {
    spawner: LocalSpawner,
    sleeps: RefCell<Vec<u32>>,
    spawned: Cell<usize>,
}

impl TestRuntime {
    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }
    pub fn spawned(&self) -> usize {
        self.spawned.get()
    }
}

impl Runtime for TestRuntime {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        self.sleeps.borrow_mut().push(ms);
        Box::pin(future::ready(()))
    }
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        self.spawned.set(self.spawned.get() + 1);
        self.spawner.spawn_local(task).expect("spawn drain task");
    }
}

pub struct Harness<E> {
    pub pool: LocalPool,
    pub terminal: Rc<RecordingTerminal>,
    pub evaluator: Rc<E>,
    pub runtime: Rc<TestRuntime>,
    pub session: Rc<Session>,
}

impl<E: Evaluator + 'static> Harness<E> {
    pub fn new(evaluator: E) -> Self {
        Self::with_config(evaluator, TerminalConfig::default())
    }

    pub fn with_config(evaluator: E, config: TerminalConfig) -> Self {
        let pool = LocalPool::new();
        let terminal = Rc::new(RecordingTerminal::default());
        let evaluator = Rc::new(evaluator);
        let runtime = Rc::new(TestRuntime {
            spawner: pool.spawner(),
            sleeps: RefCell::default(),
            spawned: Cell::new(0),
        });
        let session = Session::new(config, terminal.clone(), evaluator.clone(), runtime.clone());
        Self { pool, terminal, evaluator, runtime, session }
    }
}
