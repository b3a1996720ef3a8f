//! ブラウザコンソールへのログ出力

use wasm_bindgen::JsValue;

/// ログの接頭辞（他スクリプトの出力と区別する）
const PREFIX: &str = "[repo-publish]";

pub fn log(message: &str) {
    web_sys::console::log_1(&JsValue::from_str(&format!("{} {}", PREFIX, message)));
}

pub fn warn(message: &str) {
    web_sys::console::warn_1(&JsValue::from_str(&format!("{} {}", PREFIX, message)));
}

pub fn error(message: &str) {
    web_sys::console::error_1(&JsValue::from_str(&format!("{} {}", PREFIX, message)));
}
