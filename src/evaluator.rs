use futures::future::LocalBoxFuture;

/// Ok carries whatever output the interpreter wants shown, Err the message of
/// a syntax or runtime failure.
pub type EvalResult = Result<String, String>;

/// The interpreter side of the terminal.
///
/// `evaluate` may take arbitrarily long (network fetches, file pickers), the
/// dispatcher awaits it before sending the next command.
pub trait Evaluator {
    fn evaluate(&self, source: &str) -> LocalBoxFuture<'static, EvalResult>;

    /// Whether `source` parses as a finished command. Interpreters with a
    /// grammar of their own should override this.
    fn is_complete(&self, source: &str) -> bool {
        crate::syntax::brackets_balanced(source)
    }
}
