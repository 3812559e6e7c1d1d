// browser console logging, stderr when running natively (tests, tooling)
// messages carry a [replterm <session>] prefix so several terminals on one
// page can be told apart

#[cfg(target_arch = "wasm32")]
pub fn log(scope: &str, msg: &str) {
    web_sys::console::log_2(&format!("[replterm {}]", scope).into(), &msg.into());
}

#[cfg(target_arch = "wasm32")]
pub fn warn(scope: &str, msg: &str) {
    web_sys::console::warn_2(&format!("[replterm {}]", scope).into(), &msg.into());
}

#[cfg(target_arch = "wasm32")]
pub fn error(scope: &str, msg: &str) {
    web_sys::console::error_2(&format!("[replterm {}]", scope).into(), &msg.into());
}

#[cfg(not(target_arch = "wasm32"))]
pub fn log(scope: &str, msg: &str) {
    eprintln!("[replterm {}] {}", scope, msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn warn(scope: &str, msg: &str) {
    eprintln!("[replterm {}] warning: {}", scope, msg);
}

#[cfg(not(target_arch = "wasm32"))]
pub fn error(scope: &str, msg: &str) {
    eprintln!("[replterm {}] error: {}", scope, msg);
}
