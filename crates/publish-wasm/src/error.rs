//! publish-wasm エラー型

use std::fmt;

use wasm_bindgen::JsValue;

/// クライアント初期化・DOM 操作のエラー
///
/// `std::error::Error` を実装しているので、`?` で `JsError` に変換される。
#[derive(Debug)]
pub enum ClientError {
    /// `window` が存在しない（Worker 等）
    NoWindow,
    /// `document` が存在しない
    NoDocument,
    /// 指定 ID の要素がない
    MissingElement(String),
    /// 要素の種類が想定と違う（例: ファイル入力が `<input>` でない）
    WrongElementType(String),
    /// 設定 JSON が不正
    Config(serde_json::Error),
    /// Web API 呼び出しの失敗
    Js(String),
}

impl ClientError {
    /// JS 側の例外値を文字列化して包む
    pub fn js(value: JsValue) -> Self {
        ClientError::Js(describe_js(&value))
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClientError::NoWindow => write!(f, "No global window (not running in a page)"),
            ClientError::NoDocument => write!(f, "Window has no document"),
            ClientError::MissingElement(id) => write!(f, "Element #{} not found", id),
            ClientError::WrongElementType(id) => write!(f, "Element #{} has an unexpected type", id),
            ClientError::Config(e) => write!(f, "Invalid client config: {}", e),
            ClientError::Js(msg) => write!(f, "Web API call failed: {}", msg),
        }
    }
}

impl std::error::Error for ClientError {}

/// JS の例外値を人が読める文字列にする
pub fn describe_js(value: &JsValue) -> String {
    use wasm_bindgen::JsCast;

    if let Some(text) = value.as_string() {
        return text;
    }
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    format!("{:?}", value)
}
