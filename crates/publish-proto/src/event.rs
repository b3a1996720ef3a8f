//! サーバー → クライアントのイベント
//!
//! 順序キーは持たない。トランスポートの到着順をそのまま表示順とする。

use alloc::string::String;

use serde::{Deserialize, Serialize};
use serde_json::{Number, Value};

use crate::error::ProtoError;
use crate::{ERROR_EVENT, PROGRESS_EVENT, SUCCESS_EVENT};

/// 進捗イベント（1 セッションにつき 0 回以上）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    /// ログに追記する 1 行（置き換えではなく追記）
    pub text: String,
    /// 0〜100。`None` のときは表示中のパーセントを変更しない
    pub percent: Option<u8>,
}

/// 終端イベント（1 セッションにつきちょうど 1 回）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TerminalEvent {
    /// リポジトリ作成成功。`repo_url` は常に設定される（絶対/相対どちらも可）
    Success { text: String, repo_url: String },
    /// ワークフロー失敗。リンク先はない
    Failure { text: String },
}

/// サーバーから届くイベント
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServerEvent {
    Progress(ProgressEvent),
    Terminal(TerminalEvent),
}

#[derive(Serialize, Deserialize)]
struct ProgressWire {
    data: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    progress: Option<Number>,
}

#[derive(Serialize, Deserialize)]
struct SuccessWire {
    data: String,
    repo_url: String,
}

#[derive(Serialize, Deserialize)]
struct ErrorWire {
    data: String,
}

impl ServerEvent {
    /// イベント名と JSON ペイロードからイベントを復元する
    ///
    /// # エラー
    /// - `ProtoError::UnknownEvent`: `progress` / `success` / `error` 以外
    /// - `ProtoError::InvalidPayload`: 必須フィールド欠落・型不一致
    pub fn decode(name: &str, payload: Value) -> Result<Self, ProtoError> {
        match name {
            PROGRESS_EVENT => {
                let wire: ProgressWire = serde_json::from_value(payload)
                    .map_err(|e| ProtoError::InvalidPayload(PROGRESS_EVENT, e))?;
                Ok(ServerEvent::Progress(ProgressEvent {
                    text: wire.data,
                    percent: wire.progress.as_ref().and_then(percent_from_number),
                }))
            }
            SUCCESS_EVENT => {
                let wire: SuccessWire = serde_json::from_value(payload)
                    .map_err(|e| ProtoError::InvalidPayload(SUCCESS_EVENT, e))?;
                Ok(ServerEvent::Terminal(TerminalEvent::Success {
                    text: wire.data,
                    repo_url: wire.repo_url,
                }))
            }
            ERROR_EVENT => {
                let wire: ErrorWire = serde_json::from_value(payload)
                    .map_err(|e| ProtoError::InvalidPayload(ERROR_EVENT, e))?;
                Ok(ServerEvent::Terminal(TerminalEvent::Failure { text: wire.data }))
            }
            other => Err(ProtoError::UnknownEvent(String::from(other))),
        }
    }

    /// ワイヤ上のイベント名
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::Progress(_) => PROGRESS_EVENT,
            ServerEvent::Terminal(TerminalEvent::Success { .. }) => SUCCESS_EVENT,
            ServerEvent::Terminal(TerminalEvent::Failure { .. }) => ERROR_EVENT,
        }
    }

    /// JSON ペイロードに変換する（サーバー側・テスト用）
    pub fn to_payload(&self) -> Result<Value, ProtoError> {
        let value = match self {
            ServerEvent::Progress(evt) => serde_json::to_value(ProgressWire {
                data: evt.text.clone(),
                progress: evt.percent.map(Number::from),
            }),
            ServerEvent::Terminal(TerminalEvent::Success { text, repo_url }) => {
                serde_json::to_value(SuccessWire {
                    data: text.clone(),
                    repo_url: repo_url.clone(),
                })
            }
            ServerEvent::Terminal(TerminalEvent::Failure { text }) => {
                serde_json::to_value(ErrorWire { data: text.clone() })
            }
        };
        value.map_err(ProtoError::EncodeFailed)
    }
}

/// JSON 数値をパーセントに変換する（0..=100 に収める、小数は四捨五入）
fn percent_from_number(n: &Number) -> Option<u8> {
    if let Some(i) = n.as_i64() {
        return Some(i.clamp(0, 100) as u8);
    }
    if n.is_u64() {
        // i64 に収まらない巨大な正の整数
        return Some(100);
    }
    let f = n.as_f64()?;
    if f.is_nan() {
        return None;
    }
    Some((f.clamp(0.0, 100.0) + 0.5) as u8)
}
