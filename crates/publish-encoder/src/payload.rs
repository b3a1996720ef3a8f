//! Base64 ペイロードと data URL 接頭辞の除去

use alloc::string::String;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::EncodeError;

/// data URL のスキーム接頭辞
pub const DATA_URL_SCHEME: &str = "data:";

/// data URL ヘッダー末尾の Base64 指定
const BASE64_PARAM: &str = "base64";

/// 送信可能な Base64 ペイロード（data URL 接頭辞を含まない）
///
/// `upload_project` メッセージの `file` フィールドにそのまま載せる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedPayload(String);

impl EncodedPayload {
    /// data URL（または接頭辞なしの Base64 文字列）からペイロードを取り出す
    ///
    /// 取り出した部分が Base64 としてデコードできることを検証する。
    ///
    /// # エラー
    /// - `EncodeError::MissingDataUrlSeparator`: `data:` で始まるが `,` がない
    /// - `EncodeError::NotBase64DataUrl`: ヘッダーに `;base64` がない
    /// - `EncodeError::InvalidBase64`: ペイロードが Base64 ではない
    pub fn from_data_url(text: &str) -> Result<Self, EncodeError> {
        let payload = strip_data_url_prefix(text)?;
        STANDARD
            .decode(payload)
            .map_err(|_| EncodeError::InvalidBase64)?;
        Ok(EncodedPayload(String::from(payload)))
    }

    /// ペイロード文字列の参照
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// ペイロード文字列を取り出す
    pub fn into_string(self) -> String {
        self.0
    }

    /// エンコード後の文字数（= 送信バイト数）
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// デコード後の元ファイルのバイト数
    pub fn decoded_len(&self) -> usize {
        let padding = self.0.bytes().rev().take_while(|&b| b == b'=').count();
        (self.0.len() / 4) * 3 - padding
    }
}

/// 生バイト列を標準 Base64（パディングあり）にエンコードする
///
/// ブラウザの `readAsDataURL` が返すペイロード部分と同じ文字列になる。
pub fn encode_payload(bytes: &[u8]) -> EncodedPayload {
    EncodedPayload(STANDARD.encode(bytes))
}

/// data URL の接頭辞（`data:<mime>;base64,`）を取り除く
///
/// `data:` で始まらない文字列は Base64 ペイロードそのものとみなしてそのまま返す。
/// 空ファイルのときブラウザは `data:` だけを返すので、空ペイロードとして扱う。
pub fn strip_data_url_prefix(text: &str) -> Result<&str, EncodeError> {
    let Some(rest) = text.strip_prefix(DATA_URL_SCHEME) else {
        return Ok(text);
    };

    if rest.is_empty() {
        return Ok(rest);
    }

    let (header, payload) = rest
        .split_once(',')
        .ok_or(EncodeError::MissingDataUrlSeparator)?;

    let is_base64 = header
        .rsplit_once(';')
        .is_some_and(|(_, param)| param.eq_ignore_ascii_case(BASE64_PARAM));
    if !is_base64 {
        return Err(EncodeError::NotBase64DataUrl);
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_payload_standard_alphabet() {
        // "PK\x03\x04" は zip のマジックナンバー
        let encoded = encode_payload(b"PK\x03\x04");
        assert_eq!(encoded.as_str(), "UEsDBA==");
        assert_eq!(encoded.decoded_len(), 4);
    }

    #[test]
    fn test_encode_empty_file() {
        let encoded = encode_payload(&[]);
        assert!(encoded.is_empty());
        assert_eq!(encoded.decoded_len(), 0);
    }

    #[test]
    fn test_strip_zip_data_url() {
        let payload = strip_data_url_prefix("data:application/zip;base64,UEsDBA==").unwrap();
        assert_eq!(payload, "UEsDBA==");
    }

    #[test]
    fn test_strip_keeps_raw_payload() {
        assert_eq!(strip_data_url_prefix("UEsDBA==").unwrap(), "UEsDBA==");
    }

    #[test]
    fn test_strip_empty_file_data_url() {
        assert_eq!(strip_data_url_prefix("data:").unwrap(), "");
    }

    #[test]
    fn test_strip_octet_stream_without_mime() {
        // MIME 不明のファイルでは "data:;base64," になるブラウザがある
        assert_eq!(strip_data_url_prefix("data:;base64,AAEC").unwrap(), "AAEC");
    }

    #[test]
    fn test_strip_missing_separator() {
        let result = strip_data_url_prefix("data:application/zip;base64");
        assert_eq!(result, Err(EncodeError::MissingDataUrlSeparator));
    }

    #[test]
    fn test_strip_rejects_plain_text_data_url() {
        let result = strip_data_url_prefix("data:text/plain,hello");
        assert_eq!(result, Err(EncodeError::NotBase64DataUrl));
    }

    #[test]
    fn test_from_data_url_validates_payload() {
        let ok = EncodedPayload::from_data_url("data:application/zip;base64,UEsDBA==").unwrap();
        assert_eq!(ok.into_string(), "UEsDBA==");

        let bad = EncodedPayload::from_data_url("data:application/zip;base64,@@@");
        assert_eq!(bad, Err(EncodeError::InvalidBase64));
    }
}
