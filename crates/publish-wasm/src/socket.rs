//! WebSocket 上の Socket.IO チャンネル
//!
//! フレームの解釈は `publish-transport` の [`Connection`] が行い、
//! ここでは書き出しとセッションへの配送だけを担当する。
//! [`handle_frame`] は Web API に触れないので native のテストからも呼べる。

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use web_sys::WebSocket;

use publish_proto::{ProtoError, ServerEvent, UploadRequest};
use publish_session::{EventSink, Handled};
use publish_transport::{Connection, Inbound, TransportError};

use crate::console;
use crate::error::describe_js;

/// 送信失敗の理由
#[derive(Debug)]
pub enum SocketError {
    /// 要求の JSON 化に失敗
    Proto(ProtoError),
    /// 接続が閉じている等
    Transport(TransportError),
}

impl fmt::Display for SocketError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocketError::Proto(e) => write!(f, "{}", e),
            SocketError::Transport(e) => write!(f, "{}", e),
        }
    }
}

/// 書き出し待ちのフレームを `write` に渡す
pub fn drain_outgoing<W: FnMut(&str)>(connection: &mut Connection, mut write: W) {
    for frame in connection.take_outgoing() {
        write(&frame);
    }
}

/// フレームを 1 つ WebSocket に送る（失敗はコンソールに出すだけ）
pub fn send_frame(socket: &WebSocket, frame: &str) {
    if let Err(e) = socket.send_with_str(frame) {
        console::error(&format!("WebSocket send failed: {}", describe_js(&e)));
    }
}

/// 書き出し待ちのフレームを WebSocket に送る
pub fn flush(socket: &WebSocket, connection: &mut Connection) {
    drain_outgoing(connection, |frame| send_frame(socket, frame));
}

/// ページ全体で共有する送信先
pub struct SocketSink {
    socket: WebSocket,
    connection: Rc<RefCell<Connection>>,
}

impl SocketSink {
    pub fn new(socket: WebSocket, connection: Rc<RefCell<Connection>>) -> Self {
        SocketSink { socket, connection }
    }
}

impl EventSink for SocketSink {
    type Error = SocketError;

    fn emit(&mut self, request: &UploadRequest) -> Result<(), Self::Error> {
        let payload = request.to_payload().map_err(SocketError::Proto)?;

        let mut connection = self.connection.borrow_mut();
        connection
            .emit(UploadRequest::EVENT, payload)
            .map_err(SocketError::Transport)?;
        flush(&self.socket, &mut connection);

        console::log(&format!(
            "upload_project sent for '{}' ({} base64 chars)",
            request.repo_name,
            request.file.len()
        ));
        Ok(())
    }
}

/// 受信フレーム 1 つの処理結果
#[derive(Debug)]
pub enum FrameOutcome {
    /// 接続内部で完結した（open、ping/pong 等）
    Internal,
    Connected,
    /// 進行中のセッションはそのまま残す（終端状態を作らない）
    Disconnected,
    ConnectError(String),
    /// サーバーイベントをセッションに渡した
    Delivered {
        event: &'static str,
        handled: Handled,
    },
    /// 名前・ペイロードが解釈できないイベント
    Undecodable(ProtoError),
    /// フレーム自体が壊れている
    Malformed(TransportError),
}

impl FrameOutcome {
    /// ブラウザコンソールに記録する
    pub fn log(&self) {
        match self {
            FrameOutcome::Internal
            | FrameOutcome::Delivered {
                handled: Handled::Applied,
                ..
            } => {}
            FrameOutcome::Connected => console::log("Connected to server"),
            FrameOutcome::Disconnected => console::warn("Disconnected from server"),
            FrameOutcome::ConnectError(message) => {
                console::error(&format!("Connection refused: {}", message))
            }
            FrameOutcome::Delivered {
                event,
                handled: Handled::Ignored,
            } => console::warn(&format!("'{}' ignored: no upload in progress", event)),
            FrameOutcome::Undecodable(e) => console::warn(&format!("Unhandled server event: {}", e)),
            FrameOutcome::Malformed(e) => console::warn(&format!("Malformed frame dropped: {}", e)),
        }
    }
}

/// 受信フレームを接続に通し、返信フレームを `write` に、サーバーイベントを `deliver` に渡す
///
/// 接続の借用は `deliver` を呼ぶ前に解放する（セッションが送信で再借用するため）。
pub fn handle_frame<W, D>(
    connection: &RefCell<Connection>,
    text: &str,
    write: W,
    deliver: D,
) -> FrameOutcome
where
    W: FnMut(&str),
    D: FnOnce(ServerEvent) -> Handled,
{
    let inbound = {
        let mut conn = connection.borrow_mut();
        let inbound = conn.recv_frame(text);
        drain_outgoing(&mut conn, write);
        inbound
    };

    match inbound {
        Ok(Some(Inbound::Event { name, payload })) => match ServerEvent::decode(&name, payload) {
            Ok(event) => {
                let event_name = event.name();
                FrameOutcome::Delivered {
                    event: event_name,
                    handled: deliver(event),
                }
            }
            Err(e) => FrameOutcome::Undecodable(e),
        },
        Ok(Some(Inbound::Connected)) => FrameOutcome::Connected,
        Ok(Some(Inbound::Disconnected)) => FrameOutcome::Disconnected,
        Ok(Some(Inbound::ConnectError(message))) => FrameOutcome::ConnectError(message),
        Ok(None) => FrameOutcome::Internal,
        Err(e) => FrameOutcome::Malformed(e),
    }
}
