//! # publish-encoder
//!
//! アップロードするアーカイブを、メッセージ指向チャンネルで送れる
//! テキスト表現（Base64）に変換するクレート。
//! `no_std` + `alloc` 環境（WASM を含む）で動作する。
//!
//! ## ペイロード形式
//!
//! ```text
//! ブラウザの readAsDataURL 結果:
//!   data:application/zip;base64,UEsDBBQAAAAI...
//!   └──────── 接頭辞 ─────────┘└─ ペイロード ─┘
//!
//! サーバーへ送るのはペイロード部分のみ（標準 Base64、パディングあり）
//! ```
//!
//! ## 読み込みの非同期性
//!
//! ファイル読み込みはセッション全体で唯一の中断点。
//! [`FileSource::read_all`] が完了するまで呼び出し側の継続は保留され、
//! UI スレッドはブロックされない。

#![no_std]
extern crate alloc;

mod error;
mod payload;
mod source;

pub use error::EncodeError;
pub use payload::{encode_payload, strip_data_url_prefix, EncodedPayload, DATA_URL_SCHEME};
pub use source::{encode_file, FileSource};
