//! # publish-session
//!
//! アップロードセッションのコア状態機械。
//!
//! ## 構成
//!
//! - **state**: 純粋な遷移関数 `(state, input) → state'`
//! - **projection**: 状態から UI 出力への純粋な写像 `state → UiOutput`
//! - **ports**: UI 出力ポートとイベント送信先のトレイト（テストでは記録用ダブルを注入）
//! - **controller**: 上記をまとめ、副作用（送信・描画・アラート）を実行する
//!
//! ## セッションの状態遷移
//!
//! ```text
//! Idle ──submit──→ Submitting ──encode 完了/送信──→ InProgress ──progress──→ InProgress
//!  ↑                   │                              │
//!  │            読み込み失敗/送信失敗                  ├──success──→ Succeeded ─┐
//!  ├───────────────────┘                              └──error────→ Failed ────┤
//!  └───────────────────────────── reset ──────────────────────────────────────┘
//! ```
//!
//! 終端状態に入った後の progress / success / error はリセットまで無視する。
//! 接続断では終端状態を作らず、InProgress のまま留まる。

#![no_std]
extern crate alloc;

pub mod controller;
pub mod error;
pub mod form;
pub mod log;
pub mod ports;
pub mod projection;
pub mod state;

pub use controller::{Handled, SessionController, SessionStats};
pub use error::{SessionError, SubmitError};
pub use form::{FormSnapshot, RequestDraft};
pub use log::SessionLog;
pub use ports::{EventSink, Panel, UiPorts};
pub use projection::{project, RepoLink, ResultView, Tone, UiOutput};
pub use state::{transition, Phase, SessionInput, SessionState, Transition};

/// 終端状態でのプログレスバーの値
pub const COMPLETE_PERCENT: u8 = 100;

/// 失敗時にログと結果メッセージへ付ける接頭辞
pub const FAILURE_PREFIX: &str = "ERROR: ";
