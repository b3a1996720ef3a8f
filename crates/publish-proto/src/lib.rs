//! # publish-proto
//!
//! 「プロジェクト公開」ワークフローのイベントプロトコル定義と
//! JSON ペイロードのエンコード/デコード。
//!
//! ## メッセージ一覧
//!
//! ```text
//! Client → Server
//!   upload_project { repo_name, file(base64), branch, visibility, commit_message }
//!                  セッションごとに 1 回だけ、ローカル検証成功後に送信
//!
//! Server → Client
//!   progress { data, progress? }   0 回以上
//!   success  { data, repo_url }    終端（最大 1 回）
//!   error    { data }              終端（最大 1 回、success と排他）
//! ```
//!
//! セッション ID は交換しない。1 接続につき同時に 1 セッションだけが進行する前提。

#![no_std]
extern crate alloc;

pub mod error;
pub mod event;
pub mod request;

pub use error::ProtoError;
pub use event::{ProgressEvent, ServerEvent, TerminalEvent};
pub use request::{UploadRequest, Visibility};

/// クライアント → サーバー: アップロード要求
pub const UPLOAD_PROJECT_EVENT: &str = "upload_project";

/// サーバー → クライアント: 進捗（ログ 1 行 + 任意のパーセント）
pub const PROGRESS_EVENT: &str = "progress";

/// サーバー → クライアント: 成功（終端）
pub const SUCCESS_EVENT: &str = "success";

/// サーバー → クライアント: 失敗（終端）
pub const ERROR_EVENT: &str = "error";
