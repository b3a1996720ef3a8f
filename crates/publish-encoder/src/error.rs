//! エンコードエラー型

use alloc::string::String;

/// ファイル読み込み・エンコードのエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// ファイルの読み込みに失敗（選択後にディスクから削除された等）
    ReadFailed(String),
    /// data URL にペイロード区切りの `,` がない
    MissingDataUrlSeparator,
    /// data URL が Base64 形式ではない（`;base64` 指定なし）
    NotBase64DataUrl,
    /// ペイロードが Base64 としてデコードできない
    InvalidBase64,
}

impl core::fmt::Display for EncodeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            EncodeError::ReadFailed(reason) => write!(f, "Could not read the selected file: {}", reason),
            EncodeError::MissingDataUrlSeparator => write!(f, "Malformed data URL (missing ',' separator)"),
            EncodeError::NotBase64DataUrl => write!(f, "Data URL is not base64 encoded"),
            EncodeError::InvalidBase64 => write!(f, "Invalid Base64 payload"),
        }
    }
}
