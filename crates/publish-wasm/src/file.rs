//! ブラウザの `File` からの読み込み

use js_sys::Uint8Array;
use wasm_bindgen_futures::JsFuture;
use web_sys::File;

use publish_encoder::{EncodeError, FileSource};

use crate::error::describe_js;

/// ユーザーが選択した `File`
///
/// `Blob.arrayBuffer()` の Promise を待つ間、イベントループに制御を返す。
pub struct BrowserFile(File);

impl BrowserFile {
    pub fn new(file: File) -> Self {
        BrowserFile(file)
    }

    /// ファイル名（ログ用）
    pub fn name(&self) -> String {
        self.0.name()
    }

    /// ファイルサイズ（バイト）
    pub fn size(&self) -> f64 {
        self.0.size()
    }
}

impl FileSource for BrowserFile {
    async fn read_all(self) -> Result<Vec<u8>, EncodeError> {
        // 選択後にファイルが削除された場合などはここで reject される
        let buffer = JsFuture::from(self.0.array_buffer())
            .await
            .map_err(|e| EncodeError::ReadFailed(describe_js(&e)))?;
        Ok(Uint8Array::new(&buffer).to_vec())
    }
}
