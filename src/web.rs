// browser side: xterm.js-style terminal object in, interpreter functions in,
// everything wired to a Session

use crate::config::TerminalConfig;
use crate::console;
use crate::context::Session;
use crate::dispatch::Runtime;
use crate::editor::KeyInput;
use crate::evaluator::{EvalResult, Evaluator};
use crate::terminal::TerminalSink;
use futures::future::LocalBoxFuture;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;

/// Timers from gloo, tasks on the wasm-bindgen-futures microtask queue.
pub struct BrowserRuntime;

impl Runtime for BrowserRuntime {
    fn sleep(&self, ms: u32) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::TimeoutFuture::new(ms))
    }
    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

// anything with write/clear/focus methods
struct JsTerminal {
    inner: JsValue,
}

impl JsTerminal {
    fn call(&self, method: &str, arg: Option<&JsValue>) {
        let func = match js_sys::Reflect::get(&self.inner, &method.into()) {
            Ok(f) if f.is_function() => f.unchecked_into::<js_sys::Function>(),
            _ => {
                console::warn("web", &format!("terminal object has no {}() method", method));
                return;
            }
        };
        let result = match arg {
            Some(arg) => func.call1(&self.inner, arg),
            None => func.call0(&self.inner),
        };
        if let Err(e) = result {
            console::error("web", &format!("terminal.{}() threw: {}", method, js_error_text(&e)));
        }
    }
}

impl TerminalSink for JsTerminal {
    fn write(&self, text: &str) {
        self.call("write", Some(&JsValue::from_str(text)));
    }
    fn clear(&self) {
        self.call("clear", None);
    }
    fn focus(&self) {
        self.call("focus", None);
    }
}

struct JsEvaluator {
    evaluate: js_sys::Function,
    is_complete: Option<js_sys::Function>,
}

impl Evaluator for JsEvaluator {
    fn evaluate(&self, source: &str) -> LocalBoxFuture<'static, EvalResult> {
        let called = self.evaluate.call1(&JsValue::NULL, &JsValue::from_str(source));
        Box::pin(async move {
            let value = called.map_err(|e| js_error_text(&e))?;
            // plain values and promises both allowed
            let value = match value.dyn_into::<js_sys::Promise>() {
                Ok(promise) => JsFuture::from(promise).await.map_err(|e| js_error_text(&e))?,
                Err(value) => value,
            };
            Ok(js_output_text(&value))
        })
    }

    fn is_complete(&self, source: &str) -> bool {
        match &self.is_complete {
            Some(func) => match func.call1(&JsValue::NULL, &JsValue::from_str(source)) {
                Ok(v) => v.as_bool().unwrap_or(true),
                Err(e) => {
                    // let the interpreter itself complain on evaluate
                    console::warn("web", &format!("isComplete threw: {}", js_error_text(&e)));
                    true
                }
            },
            None => crate::syntax::brackets_balanced(source),
        }
    }
}

fn js_error_text(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{:?}", value))
}

fn js_output_text(value: &JsValue) -> String {
    if value.is_undefined() || value.is_null() {
        return String::new();
    }
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(n) = value.as_f64() {
        return n.to_string();
    }
    js_sys::JSON::stringify(value)
        .map(String::from)
        .unwrap_or_else(|_| format!("{:?}", value))
}

/// One terminal on the page. The config may be a plain object or its JSON
/// text (e.g. straight out of localStorage).
///
/// ```js
/// const web = new WebTerminal(term, src => interp.eval(src), src => interp.isComplete(src), { prompt: "% " });
/// term.onData(data => web.onData(data));
/// term.attachCustomKeyEventHandler(ev => !web.onKey(ev));
/// web.start();
/// ```
#[wasm_bindgen]
pub struct WebTerminal {
    session: Rc<Session>,
}

#[wasm_bindgen]
impl WebTerminal {
    #[wasm_bindgen(constructor)]
    pub fn new(
        terminal: JsValue,
        evaluate: js_sys::Function,
        is_complete: Option<js_sys::Function>,
        config: JsValue,
    ) -> Result<WebTerminal, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            console::log("config", "no terminal config given, using defaults");
            TerminalConfig::default()
        } else if let Some(text) = config.as_string() {
            TerminalConfig::from_json(&text).map_err(|e| JsValue::from_str(&e))?
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("invalid terminal config: {}", e)))?
        };

        let session = Session::new(
            config,
            Rc::new(JsTerminal { inner: terminal }),
            Rc::new(JsEvaluator { evaluate, is_complete }),
            Rc::new(BrowserRuntime),
        );
        Ok(WebTerminal { session })
    }

    #[wasm_bindgen]
    pub fn start(&self) {
        self.session.start();
    }

    #[wasm_bindgen(js_name = onData)]
    pub fn on_data(&self, data: &str) {
        self.session.handle_data(data);
    }

    /// True when the key was handled here; the default action is suppressed
    /// in that case.
    #[wasm_bindgen(js_name = onKey)]
    pub fn on_key(&self, event: &web_sys::KeyboardEvent) -> bool {
        if event.type_() != "keydown" {
            return false;
        }
        let key = KeyInput {
            key: event.key(),
            ctrl: event.ctrl_key(),
            meta: event.meta_key(),
            alt: event.alt_key(),
        };
        let handled = self.session.handle_key(&key);
        if handled {
            event.prevent_default();
        }
        handled
    }

    #[wasm_bindgen]
    pub fn history(&self) -> js_sys::Array {
        self.session.history().into_iter().map(JsValue::from).collect()
    }

    #[wasm_bindgen(js_name = historyListing)]
    pub fn history_listing(&self) -> String {
        self.session.history_listing()
    }

    #[wasm_bindgen]
    pub fn pending(&self) -> usize {
        self.session.pending()
    }

    #[wasm_bindgen]
    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.session.snapshot()).map_err(JsValue::from)
    }
}
