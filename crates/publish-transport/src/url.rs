//! 接続先 URL の組み立て
//!
//! プロトコル・ホスト・ポートはページ自身の location から導出する（同一オリジン）。

use alloc::format;
use alloc::string::String;

use crate::ENGINE_IO_VERSION;

/// ページの location から WebSocket 接続先を組み立てる
///
/// # 引数
/// - `page_protocol`: `location.protocol`（`"http:"` / `"https:"`）
/// - `host`: `location.host`（ポートを含む。例: `"localhost:5000"`）
/// - `path`: Socket.IO のパス（例: `"/socket.io/"`）
pub fn socket_url(page_protocol: &str, host: &str, path: &str) -> String {
    let scheme = if page_protocol.eq_ignore_ascii_case("https:") {
        "wss"
    } else {
        "ws"
    };

    let trimmed = path.trim_matches('/');
    let path = if trimmed.is_empty() {
        String::from("/")
    } else {
        format!("/{}/", trimmed)
    };

    format!(
        "{}://{}{}?EIO={}&transport=websocket",
        scheme, host, path, ENGINE_IO_VERSION
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_page_uses_ws() {
        assert_eq!(
            socket_url("http:", "localhost:5000", "/socket.io/"),
            "ws://localhost:5000/socket.io/?EIO=4&transport=websocket"
        );
    }

    #[test]
    fn test_https_page_uses_wss() {
        assert_eq!(
            socket_url("https:", "publish.example.com", "socket.io"),
            "wss://publish.example.com/socket.io/?EIO=4&transport=websocket"
        );
    }
}
