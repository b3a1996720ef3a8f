//! ファイル読み込みの抽象化

use alloc::vec::Vec;
use core::future::Future;

use crate::error::EncodeError;
use crate::payload::{encode_payload, EncodedPayload};

/// ユーザーが選択したファイルの読み込み元
///
/// ブラウザでは `File`（`Blob.arrayBuffer()`）、テストではメモリ上のバイト列が実装する。
/// サイズ制限はこの層では行わない。
pub trait FileSource {
    /// ファイル全体をメモリに読み込む
    ///
    /// 読み込みが完了するまで呼び出し側を中断する（UI スレッドはブロックしない）。
    fn read_all(self) -> impl Future<Output = Result<Vec<u8>, EncodeError>>;
}

/// ファイルを読み込んで Base64 ペイロードに変換する
///
/// # エラー
/// 読み込み失敗は握りつぶさずそのまま返す。呼び出し側（セッション）が
/// ローカル検証エラーとして扱い、リクエストは送信しない。
pub async fn encode_file<S: FileSource>(source: S) -> Result<EncodedPayload, EncodeError> {
    let bytes = source.read_all().await?;
    Ok(encode_payload(&bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::String;
    use core::pin::pin;
    use core::task::{Context, Poll, RawWaker, RawWakerVTable, Waker};

    struct MemoryFile(Vec<u8>);

    impl FileSource for MemoryFile {
        async fn read_all(self) -> Result<Vec<u8>, EncodeError> {
            Ok(self.0)
        }
    }

    /// 選択後に削除されたファイル
    struct VanishedFile;

    impl FileSource for VanishedFile {
        async fn read_all(self) -> Result<Vec<u8>, EncodeError> {
            Err(EncodeError::ReadFailed(String::from("NotFoundError")))
        }
    }

    static VTABLE: RawWakerVTable = RawWakerVTable::new(clone_waker, noop, noop, noop);

    unsafe fn clone_waker(_: *const ()) -> RawWaker {
        RawWaker::new(core::ptr::null(), &VTABLE)
    }

    unsafe fn noop(_: *const ()) {}

    fn block_on<F: Future>(fut: F) -> F::Output {
        let waker = unsafe { Waker::from_raw(RawWaker::new(core::ptr::null(), &VTABLE)) };
        let mut cx = Context::from_waker(&waker);
        let mut fut = pin!(fut);
        loop {
            if let Poll::Ready(out) = fut.as_mut().poll(&mut cx) {
                return out;
            }
        }
    }

    #[test]
    fn test_encode_file_from_memory() {
        let encoded = block_on(encode_file(MemoryFile(b"PK\x03\x04".to_vec()))).unwrap();
        assert_eq!(encoded.as_str(), "UEsDBA==");
    }

    #[test]
    fn test_read_failure_propagates() {
        let result = block_on(encode_file(VanishedFile));
        assert_eq!(
            result,
            Err(EncodeError::ReadFailed(String::from("NotFoundError")))
        );
    }
}
