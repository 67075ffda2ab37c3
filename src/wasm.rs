//! Helpers for WebAssembly builds. A bare Rust panic in WASM just calls
//! `abort`; the hook pipes the panic message into the browser console
//! instead.

#[cfg(all(target_arch = "wasm32", feature = "web"))]
pub fn set_panic_hook() {
    console_error_panic_hook::set_once();
}
