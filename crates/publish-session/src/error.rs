//! publish-session エラー型

use alloc::string::String;

use publish_encoder::EncodeError;

use crate::state::Phase;

/// ローカル検証エラー（ユーザーにはブロッキングなアラートで通知し、送信は行わない）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitError {
    /// ファイルが選択されていない
    NoFileSelected,
    /// リポジトリ名が空
    MissingRepoName,
    /// 公開範囲が不正
    InvalidVisibility(String),
    /// 前のセッションがまだリセットされていない
    SessionActive,
    /// ファイルを読み込めなかった
    Unreadable(EncodeError),
    /// 接続が使えず要求を送信できなかった
    EmitFailed(String),
}

impl core::fmt::Display for SubmitError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SubmitError::NoFileSelected => write!(f, "Please select a .zip file."),
            SubmitError::MissingRepoName => write!(f, "Please enter a repository name."),
            SubmitError::InvalidVisibility(v) => {
                write!(f, "Unknown visibility '{}' (choose public or private).", v)
            }
            SubmitError::SessionActive => {
                write!(f, "An upload is already running. Start over before submitting again.")
            }
            SubmitError::Unreadable(e) => write!(f, "{}", e),
            SubmitError::EmitFailed(reason) => {
                write!(f, "Could not send the upload request: {}", reason)
            }
        }
    }
}

/// 現在の状態では実行できない操作
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// `operation` は `phase` では無効
    InvalidState {
        operation: &'static str,
        phase: Phase,
    },
}

impl core::fmt::Display for SessionError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SessionError::InvalidState { operation, phase } => {
                write!(f, "'{}' is not allowed while the session is {:?}", operation, phase)
            }
        }
    }
}
