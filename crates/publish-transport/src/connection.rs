//! Socket.IO 接続の状態機械
//!
//! WebSocket 自体の送受信は呼び出し側（`publish-wasm`）が担当し、
//! このモジュールはフレームの解釈と送信待ちフレームの管理だけを行う。
//!
//! ## 状態遷移
//!
//! ```text
//! AwaitingOpen ──(0 open 受信 / 40 送信)──→ Opening ──(40 受信)──→ Connected
//!      │                                      │                      │
//!      └──────────── 1 close / 41 disconnect / 44 connect_error ─────┴──→ Closed
//! ```

use alloc::collections::VecDeque;
use alloc::string::String;
use alloc::vec::Vec;

use serde_json::Value;

use crate::error::TransportError;
use crate::frame::{decode_frame, encode_connect, encode_event, Frame, PONG};

/// 接続状態
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// WebSocket 接続直後、Engine.IO open 待ち
    AwaitingOpen,
    /// 名前空間への connect を送信済み、応答待ち
    Opening,
    /// イベント送受信可能
    Connected,
    /// 切断済み（再接続はしない）
    Closed,
}

/// 上位レイヤー（セッション）に渡す受信結果
#[derive(Debug, Clone, PartialEq)]
pub enum Inbound {
    /// 名前空間への接続完了
    Connected,
    /// サーバーイベント（到着順）
    Event { name: String, payload: Value },
    /// サーバー側から切断された
    Disconnected,
    /// 接続拒否
    ConnectError(String),
}

/// Socket.IO クライアント接続
///
/// ページの寿命の間 1 つだけ存在し、全セッションで共有される。
pub struct Connection {
    /// 接続する名前空間
    namespace: String,
    state: ConnectionState,
    /// Engine.IO セッション ID
    sid: Option<String>,
    /// サーバーの ping 間隔（ミリ秒）
    ping_interval_ms: u64,
    /// 接続確立前に emit されたイベントフレーム
    queued: VecDeque<String>,
    /// WebSocket に書き出すフレーム
    outgoing: VecDeque<String>,
    /// 受信したフレーム数（統計用）
    frames_received: u64,
    /// 送信に回したフレーム数（統計用）
    frames_sent: u64,
}

impl Connection {
    /// 新しい接続を生成する（WebSocket を開いた直後に呼ぶ）
    pub fn new(namespace: &str) -> Self {
        Connection {
            namespace: String::from(namespace),
            state: ConnectionState::AwaitingOpen,
            sid: None,
            ping_interval_ms: 0,
            queued: VecDeque::new(),
            outgoing: VecDeque::new(),
            frames_received: 0,
            frames_sent: 0,
        }
    }

    /// イベントを送信する
    ///
    /// 接続確立前なら確立時まで保留し、確立後に FIFO 順で送り出す。
    /// 送信後の取り消しはできない。
    ///
    /// # エラー
    /// - `TransportError::Closed`: 切断済み
    /// - `TransportError::InvalidJson`: ペイロードの JSON 化に失敗
    pub fn emit(&mut self, name: &str, payload: Value) -> Result<(), TransportError> {
        if self.state == ConnectionState::Closed {
            return Err(TransportError::Closed);
        }

        let frame = encode_event(&self.namespace, name, payload)?;
        if self.state == ConnectionState::Connected {
            self.outgoing.push_back(frame);
        } else {
            self.queued.push_back(frame);
        }
        Ok(())
    }

    /// 受信したテキストフレームを処理する
    ///
    /// # 戻り値
    /// - `Some(Inbound)`: 上位レイヤーに渡すべき出来事
    /// - `None`: 接続内部で完結した（ping/pong、open 等）
    pub fn recv_frame(&mut self, text: &str) -> Result<Option<Inbound>, TransportError> {
        self.frames_received += 1;

        match decode_frame(text)? {
            Frame::Open(info) => {
                self.sid = Some(info.sid);
                self.ping_interval_ms = info.ping_interval;
                if self.state == ConnectionState::AwaitingOpen {
                    self.state = ConnectionState::Opening;
                    self.outgoing.push_back(encode_connect(&self.namespace));
                }
                Ok(None)
            }
            Frame::Ping(data) => {
                let mut pong = String::from(PONG);
                pong.push_str(&data);
                self.outgoing.push_back(pong);
                Ok(None)
            }
            Frame::Pong(_) | Frame::Upgrade | Frame::Noop | Frame::Ack { .. } => Ok(None),
            Frame::Close => {
                self.close();
                Ok(Some(Inbound::Disconnected))
            }
            Frame::Connect { namespace, .. } if namespace == self.namespace => {
                self.state = ConnectionState::Connected;
                self.outgoing.extend(self.queued.drain(..));
                Ok(Some(Inbound::Connected))
            }
            Frame::Disconnect { namespace } if namespace == self.namespace => {
                self.close();
                Ok(Some(Inbound::Disconnected))
            }
            Frame::ConnectError { namespace, message } if namespace == self.namespace => {
                self.close();
                Ok(Some(Inbound::ConnectError(message)))
            }
            Frame::Event {
                namespace,
                name,
                payload,
                ..
            } if namespace == self.namespace => Ok(Some(Inbound::Event { name, payload })),
            // 他の名前空間宛て
            _ => Ok(None),
        }
    }

    /// WebSocket に書き出すフレームをすべて取り出す
    pub fn take_outgoing(&mut self) -> Vec<String> {
        self.frames_sent += self.outgoing.len() as u64;
        self.outgoing.drain(..).collect()
    }

    /// 書き出し待ちのフレームがあるか
    pub fn has_outgoing(&self) -> bool {
        !self.outgoing.is_empty()
    }

    /// 下層の WebSocket が閉じたときに呼ぶ
    ///
    /// 保留中のイベントは送られないまま破棄される。
    pub fn close(&mut self) {
        self.state = ConnectionState::Closed;
        self.queued.clear();
        self.outgoing.clear();
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    /// Engine.IO セッション ID
    pub fn sid(&self) -> Option<&str> {
        self.sid.as_deref()
    }

    /// サーバーの ping 間隔（ミリ秒、open 受信前は 0）
    pub fn ping_interval_ms(&self) -> u64 {
        self.ping_interval_ms
    }

    /// 受信したフレーム数
    pub fn frames_received(&self) -> u64 {
        self.frames_received
    }

    /// 送信に回したフレーム数
    pub fn frames_sent(&self) -> u64 {
        self.frames_sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OPEN: &str = r#"0{"sid":"abc","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#;

    fn connected() -> Connection {
        let mut conn = Connection::new("/");
        conn.recv_frame(OPEN).unwrap();
        conn.recv_frame(r#"40{"sid":"xyz"}"#).unwrap();
        let _ = conn.take_outgoing();
        conn
    }

    #[test]
    fn test_handshake_sends_namespace_connect() {
        let mut conn = Connection::new("/");
        assert_eq!(conn.state(), ConnectionState::AwaitingOpen);

        assert_eq!(conn.recv_frame(OPEN).unwrap(), None);
        assert_eq!(conn.state(), ConnectionState::Opening);
        assert_eq!(conn.sid(), Some("abc"));
        assert_eq!(conn.ping_interval_ms(), 25000);
        assert_eq!(conn.take_outgoing(), alloc::vec![String::from("40")]);

        let inbound = conn.recv_frame(r#"40{"sid":"xyz"}"#).unwrap();
        assert_eq!(inbound, Some(Inbound::Connected));
        assert!(conn.is_connected());
    }

    #[test]
    fn test_emit_before_connect_is_queued_in_order() {
        let mut conn = Connection::new("/");
        conn.emit("first", Value::Null).unwrap();
        conn.emit("second", Value::Null).unwrap();
        assert!(!conn.has_outgoing(), "接続前は WebSocket に書き出さない");

        conn.recv_frame(OPEN).unwrap();
        assert_eq!(conn.take_outgoing(), alloc::vec![String::from("40")]);

        conn.recv_frame("40").unwrap();
        assert_eq!(
            conn.take_outgoing(),
            alloc::vec![
                String::from(r#"42["first",null]"#),
                String::from(r#"42["second",null]"#),
            ]
        );
    }

    #[test]
    fn test_ping_answered_with_pong() {
        let mut conn = connected();
        assert_eq!(conn.recv_frame("2").unwrap(), None);
        assert_eq!(conn.take_outgoing(), alloc::vec![String::from("3")]);
    }

    #[test]
    fn test_events_delivered_in_arrival_order() {
        let mut conn = connected();
        let a = conn.recv_frame(r#"42["progress",{"data":"a"}]"#).unwrap();
        let b = conn.recv_frame(r#"42["progress",{"data":"b"}]"#).unwrap();

        let Some(Inbound::Event { payload: pa, .. }) = a else { panic!("event を期待") };
        let Some(Inbound::Event { payload: pb, .. }) = b else { panic!("event を期待") };
        assert_eq!(pa["data"], "a");
        assert_eq!(pb["data"], "b");
        assert_eq!(conn.frames_received(), 4);
    }

    #[test]
    fn test_other_namespace_ignored() {
        let mut conn = connected();
        let inbound = conn.recv_frame(r#"42/admin,["progress",{"data":"x"}]"#).unwrap();
        assert_eq!(inbound, None);
    }

    #[test]
    fn test_emit_after_disconnect_fails() {
        let mut conn = connected();
        assert_eq!(conn.recv_frame("41").unwrap(), Some(Inbound::Disconnected));
        assert_eq!(conn.state(), ConnectionState::Closed);
        assert_eq!(conn.emit("upload_project", Value::Null), Err(TransportError::Closed));
    }

    #[test]
    fn test_connect_error_closes() {
        let mut conn = Connection::new("/");
        conn.recv_frame(OPEN).unwrap();
        let inbound = conn.recv_frame(r#"44{"message":"Invalid namespace"}"#).unwrap();
        assert_eq!(inbound, Some(Inbound::ConnectError(String::from("Invalid namespace"))));
        assert_eq!(conn.state(), ConnectionState::Closed);
    }
}
