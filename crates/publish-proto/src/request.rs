//! クライアント → サーバーのアップロード要求

use alloc::string::String;
use core::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::ProtoError;
use crate::UPLOAD_PROJECT_EVENT;

/// 作成するリポジトリの公開範囲
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    #[default]
    Public,
    Private,
}

impl Visibility {
    /// ワイヤ上の文字列表現
    pub fn as_str(&self) -> &'static str {
        match self {
            Visibility::Public => "public",
            Visibility::Private => "private",
        }
    }
}

impl FromStr for Visibility {
    type Err = ProtoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            other => Err(ProtoError::InvalidVisibility(String::from(other))),
        }
    }
}

/// `upload_project` メッセージのペイロード
///
/// 送信は 1 セッションにつき 1 回。ファイルが選択されていない状態では
/// セッション側で組み立て自体が行われない。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadRequest {
    /// リポジトリ名（空でない）
    pub repo_name: String,
    /// アーカイブ本体（標準 Base64、data URL 接頭辞なし）
    pub file: String,
    /// ブランチ名（空ならサーバー既定）
    pub branch: String,
    pub visibility: Visibility,
    /// コミットメッセージ（空ならサーバー既定）
    pub commit_message: String,
}

impl UploadRequest {
    /// このメッセージのイベント名
    pub const EVENT: &'static str = UPLOAD_PROJECT_EVENT;

    /// JSON ペイロードに変換する
    pub fn to_payload(&self) -> Result<Value, ProtoError> {
        serde_json::to_value(self).map_err(ProtoError::EncodeFailed)
    }

    /// 受信した JSON ペイロードから復元する（サーバー側・テスト用）
    pub fn from_payload(payload: Value) -> Result<Self, ProtoError> {
        serde_json::from_value(payload)
            .map_err(|e| ProtoError::InvalidPayload(UPLOAD_PROJECT_EVENT, e))
    }
}
