//! publish-proto エラー型

use alloc::string::String;

/// メッセージのエンコード/デコードのエラー
#[derive(Debug)]
pub enum ProtoError {
    /// 未知のイベント名
    UnknownEvent(String),
    /// ペイロードがイベントのスキーマに合わない
    InvalidPayload(&'static str, serde_json::Error),
    /// 公開範囲が `public` / `private` のどちらでもない
    InvalidVisibility(String),
    /// JSON へのエンコード失敗
    EncodeFailed(serde_json::Error),
}

impl core::fmt::Display for ProtoError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ProtoError::UnknownEvent(name) => write!(f, "Unknown event: {}", name),
            ProtoError::InvalidPayload(event, e) => {
                write!(f, "Invalid payload for '{}': {}", event, e)
            }
            ProtoError::InvalidVisibility(v) => {
                write!(f, "Invalid visibility: {} (expected 'public' or 'private')", v)
            }
            ProtoError::EncodeFailed(e) => write!(f, "Payload encode failed: {}", e),
        }
    }
}
