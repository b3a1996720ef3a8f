//! # publish-wasm
//!
//! wasm-bindgen エクスポート：ページの JavaScript から呼び出す公開 API。
//!
//! ## 使用方法（JavaScript）
//!
//! ```javascript
//! import init, { PublishClient, init_panic_hook } from './pkg/publish_wasm.js';
//!
//! await init();
//! // パニック時のスタックトレースを有効化（開発時）
//! init_panic_hook();
//!
//! // DOMContentLoaded 後に 1 度だけ生成する。
//! // WebSocket を開き、フォーム送信と「やり直す」ボタンにハンドラーを登録する。
//! const client = new PublishClient();
//!
//! // 要素 ID を変える場合は JSON で上書きする
//! const custom = new PublishClient(JSON.stringify({ elements: { zipFile: "archive" } }));
//!
//! // 診断
//! console.log(client.phase(), client.getStats());
//! ```

use wasm_bindgen::prelude::*;

pub mod client;
pub mod config;
pub mod console;
pub mod dom;
pub mod error;
pub mod file;
pub mod socket;

pub use client::PublishClient;
pub use config::ClientConfig;
pub use error::ClientError;

/// パニック時にブラウザコンソールにスタックトレースを出力する
///
/// 開発時に必ず呼び出すこと。本番ビルドでは feature flag で無効化可能。
#[wasm_bindgen]
pub fn init_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// data URL（`readAsDataURL` の結果）から Base64 ペイロードだけを取り出すユーティリティ
///
/// JS 側で既に data URL を持っている場合に使う。
///
/// # エラー
/// - `,` 区切りがない
/// - `;base64` 指定がない
/// - ペイロードが Base64 ではない
#[wasm_bindgen(js_name = "stripDataUrlPrefix")]
pub fn strip_data_url_prefix(data_url: &str) -> Result<String, JsError> {
    let payload = publish_encoder::EncodedPayload::from_data_url(data_url)
        .map_err(|e| JsError::new(&format!("{}", e)))?;
    Ok(payload.into_string())
}
