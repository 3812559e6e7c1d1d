use crate::console;
use crate::context::Session;
use crate::queue::QueuedCommand;
use crate::terminal::{to_crlf, NEWLINE};
use futures::future::LocalBoxFuture;
use std::rc::Rc;

/// Timer and task spawning, gloo-timers + spawn_local in the browser.
pub trait Runtime {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()>;
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainPhase {
    #[default]
    Idle,
    Draining,
}

/// The drain loop. Runs one queued command per step, a fixed delay before
/// each, and goes back to idle once the queue is empty. Only ever one of
/// these per session, started by the idle -> draining transition.
pub(crate) async fn drain(session: Rc<Session>) {
    loop {
        session.runtime.sleep(session.config.drain_delay_ms).await;

        let next = session.state.borrow_mut().queue.dequeue();
        let Some(cmd) = next else {
            session.state.borrow_mut().phase = DrainPhase::Idle;
            return;
        };
        run_one(&session, cmd).await;

        let mut state = session.state.borrow_mut();
        if state.queue.is_empty() {
            state.phase = DrainPhase::Idle;
            return;
        }
    }
}

async fn run_one(session: &Session, cmd: QueuedCommand) {
    let term = &session.terminal;
    console::log(&session.id, &format!("dispatching {:?}", cmd.text()));

    if cmd.echo() {
        term.write(&to_crlf(cmd.text()));
        term.write(NEWLINE);
    }

    match session.evaluator.evaluate(cmd.text()).await {
        Ok(output) => {
            if !output.is_empty() {
                term.write(&to_crlf(&output));
                if !output.ends_with('\n') {
                    term.write(NEWLINE);
                }
            }
        }
        Err(msg) => {
            console::error(&session.id, &msg);
            let msg = to_crlf(msg.trim_end());
            term.write(&session.config.style_error(&msg));
            term.write(NEWLINE);
        }
    }

    // fresh prompt, then whatever was typed while the command ran
    let typed_ahead = session.state.borrow().editor.render();
    term.write(&format!("{}{}", session.config.prompt, typed_ahead));
}

#[cfg(test)]
mod tests {
    use crate::config::TerminalConfig;
    use crate::testing::{GatedEvaluator, Harness, ScriptedEvaluator};

    #[test]
    fn single_command_runs_and_reprompts() {
        let mut h = Harness::new(ScriptedEvaluator::default());
        h.session.start();
        h.session.handle_data("echo\r");
        h.pool.run_until_stalled();

        assert_eq!(h.evaluator.calls(), vec!["echo"]);
        assert_eq!(h.terminal.output(), "> echo\r\nran echo\r\n> ");
        assert!(!h.session.is_draining());
        assert_eq!(h.runtime.sleeps(), vec![10]);
    }

    #[test]
    fn pasted_lines_run_in_order_with_echo() {
        let mut h = Harness::new(ScriptedEvaluator::default());
        h.session.start();
        h.session.handle_data("a\nb\nc\n");
        h.pool.run_until_stalled();

        assert_eq!(h.evaluator.calls(), vec!["a", "b", "c"]);
        assert_eq!(
            h.terminal.output(),
            "> a\r\nran a\r\n> b\r\nran b\r\n> c\r\nran c\r\n> "
        );
        assert_eq!(h.runtime.sleeps().len(), 3);
        assert_eq!(h.runtime.spawned(), 1);
    }

    #[test]
    fn failure_does_not_stop_the_loop() {
        let mut h = Harness::new(ScriptedEvaluator::default());
        h.session.start();
        h.session.handle_data("fail 1\rok\r");
        h.pool.run_until_stalled();

        assert_eq!(h.evaluator.calls(), vec!["fail 1", "ok"]);
        assert_eq!(
            h.terminal.output(),
            "> fail 1\r\n\x1b[31merror: fail 1\x1b[0m\r\n> ok\r\nran ok\r\n> "
        );
        assert_eq!(h.session.pending(), 0);
    }

    #[test]
    fn multiline_output_and_errors_use_crlf() {
        let mut h = Harness::new(ScriptedEvaluator::with_output("1\n2\n"));
        h.session.handle_data("x\r");
        h.pool.run_until_stalled();
        assert!(h.terminal.output().ends_with("1\r\n2\r\n> "));
    }

    #[test]
    fn empty_output_prints_only_prompt() {
        let mut h = Harness::new(ScriptedEvaluator::with_output(""));
        h.session.handle_data("x\r");
        h.pool.run_until_stalled();
        assert_eq!(h.terminal.output(), "x\r\n> ");
    }

    #[test]
    fn only_one_command_in_flight() {
        let mut h = Harness::new(GatedEvaluator::default());
        h.session.handle_data("a\rb\r");
        h.pool.run_until_stalled();
        assert_eq!(h.evaluator.calls(), vec!["a"]);
        assert_eq!(h.session.pending(), 1);

        h.session.handle_data("c\r");
        assert_eq!(h.runtime.spawned(), 1);

        h.evaluator.release(Ok(String::new()));
        h.pool.run_until_stalled();
        assert_eq!(h.evaluator.calls(), vec!["a", "b"]);

        h.evaluator.release(Err("bad".into()));
        h.pool.run_until_stalled();
        h.evaluator.release(Ok(String::new()));
        h.pool.run_until_stalled();
        assert_eq!(h.evaluator.calls(), vec!["a", "b", "c"]);
        assert!(!h.session.is_draining());
    }

    #[test]
    fn enqueue_after_idle_starts_new_drain() {
        let mut h = Harness::new(ScriptedEvaluator::default());
        h.session.handle_data("a\r");
        h.pool.run_until_stalled();
        h.session.handle_data("b\r");
        h.pool.run_until_stalled();
        assert_eq!(h.runtime.spawned(), 2);
        assert_eq!(h.evaluator.calls(), vec!["a", "b"]);
    }

    #[test]
    fn typed_ahead_text_is_redrawn_after_prompt() {
        let mut h = Harness::new(GatedEvaluator::default());
        h.session.handle_data("a\r");
        h.pool.run_until_stalled();
        h.session.handle_data("nex");
        h.evaluator.release(Ok(String::new()));
        h.pool.run_until_stalled();
        assert!(h.terminal.output().ends_with("> nex"));
    }

    #[test]
    fn drain_delay_comes_from_config() {
        let cfg = TerminalConfig { drain_delay_ms: 250, ..Default::default() };
        let mut h = Harness::with_config(ScriptedEvaluator::default(), cfg);
        h.session.handle_data("a\rb\r");
        h.pool.run_until_stalled();
        assert_eq!(h.runtime.sleeps(), vec![250, 250]);
    }
}
