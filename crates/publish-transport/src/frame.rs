//! Engine.IO / Socket.IO テキストフレームのエンコードとデコード
//!
//! ## Wire Format
//! ```text
//! [engine_type: '0'..'6'][body]
//! engine_type == '4' のとき body は Socket.IO パケット:
//!   [socket_type: '0'..'6'][namespace + ',' (namespace が '/' 以外のとき)][ack_id: 10 進数]?[json]?
//! ```

use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;

use serde::Deserialize;
use serde_json::Value;

use crate::error::TransportError;
use crate::DEFAULT_NAMESPACE;

/// ping への応答フレーム
pub const PONG: &str = "3";

/// Engine.IO open パケットのハンドシェイク情報
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OpenInfo {
    /// Engine.IO セッション ID
    pub sid: String,
    /// サーバーが ping を送る間隔（ミリ秒）
    #[serde(default)]
    pub ping_interval: u64,
    /// ping 応答の待ち時間（ミリ秒）
    #[serde(default)]
    pub ping_timeout: u64,
    #[serde(default)]
    pub upgrades: Vec<String>,
}

/// デコード済みフレーム
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Engine.IO open（接続直後にサーバーから届く）
    Open(OpenInfo),
    /// Engine.IO close
    Close,
    /// Engine.IO ping（データ付きの場合はそのまま pong で返す）
    Ping(String),
    Pong(String),
    Upgrade,
    Noop,
    /// Socket.IO 名前空間への接続完了
    Connect { namespace: String, sid: Option<String> },
    /// Socket.IO 名前空間からの切断
    Disconnect { namespace: String },
    /// Socket.IO イベント
    Event {
        namespace: String,
        ack_id: Option<u64>,
        name: String,
        payload: Value,
    },
    /// Socket.IO ack（このクライアントは ack を要求しないので読み捨てる）
    Ack {
        namespace: String,
        ack_id: u64,
        args: Value,
    },
    /// Socket.IO 名前空間への接続拒否
    ConnectError { namespace: String, message: String },
}

/// テキストフレームをデコードする
///
/// # エラー
/// - `TransportError::EmptyFrame`: 空文字列
/// - `TransportError::UnknownPacketType`: 種別文字が範囲外
/// - `TransportError::InvalidJson`: JSON 部分が不正
/// - `TransportError::MalformedPacket`: イベント名なし等
/// - `TransportError::UnsupportedBinary`: バイナリ添付付きパケット
pub fn decode_frame(text: &str) -> Result<Frame, TransportError> {
    let kind = text.chars().next().ok_or(TransportError::EmptyFrame)?;
    let body = &text[kind.len_utf8()..];

    match kind {
        '0' => {
            let info: OpenInfo =
                serde_json::from_str(body).map_err(|_| TransportError::InvalidJson)?;
            Ok(Frame::Open(info))
        }
        '1' => Ok(Frame::Close),
        '2' => Ok(Frame::Ping(body.to_string())),
        '3' => Ok(Frame::Pong(body.to_string())),
        '4' => decode_socket_packet(body),
        '5' => Ok(Frame::Upgrade),
        '6' => Ok(Frame::Noop),
        other => Err(TransportError::UnknownPacketType(other)),
    }
}

/// Socket.IO パケット（engine message の body）をデコードする
fn decode_socket_packet(packet: &str) -> Result<Frame, TransportError> {
    let kind = packet.chars().next().ok_or(TransportError::MalformedPacket)?;
    let mut rest = &packet[kind.len_utf8()..];

    // 名前空間（'/' で始まる場合のみ存在し、',' で終わる）
    let namespace = if rest.starts_with('/') {
        match rest.find(',') {
            Some(i) => {
                let ns = &rest[..i];
                rest = &rest[i + 1..];
                ns
            }
            None => {
                let ns = rest;
                rest = "";
                ns
            }
        }
    } else {
        DEFAULT_NAMESPACE
    };
    let namespace = namespace.to_string();

    // ack ID（JSON 本体の前の 10 進数）
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    let ack_id = if digits > 0 {
        let id = rest[..digits]
            .parse::<u64>()
            .map_err(|_| TransportError::MalformedPacket)?;
        rest = &rest[digits..];
        Some(id)
    } else {
        None
    };

    match kind {
        '0' => {
            let sid = if rest.is_empty() {
                None
            } else {
                parse_json(rest)?
                    .get("sid")
                    .and_then(Value::as_str)
                    .map(ToString::to_string)
            };
            Ok(Frame::Connect { namespace, sid })
        }
        '1' => Ok(Frame::Disconnect { namespace }),
        '2' => {
            let Value::Array(mut items) = parse_json(rest)? else {
                return Err(TransportError::MalformedPacket);
            };
            if items.is_empty() {
                return Err(TransportError::MalformedPacket);
            }
            let name = match items.remove(0) {
                Value::String(name) => name,
                _ => return Err(TransportError::MalformedPacket),
            };
            let payload = if items.is_empty() {
                Value::Null
            } else {
                items.swap_remove(0)
            };
            Ok(Frame::Event {
                namespace,
                ack_id,
                name,
                payload,
            })
        }
        '3' => {
            let ack_id = ack_id.ok_or(TransportError::MalformedPacket)?;
            let args = parse_json(rest)?;
            Ok(Frame::Ack {
                namespace,
                ack_id,
                args,
            })
        }
        '4' => {
            let message = match parse_json(rest)? {
                Value::String(message) => message,
                Value::Object(map) => map
                    .get("message")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string(),
                other => other.to_string(),
            };
            Ok(Frame::ConnectError { namespace, message })
        }
        '5' | '6' => Err(TransportError::UnsupportedBinary),
        other => Err(TransportError::UnknownPacketType(other)),
    }
}

fn parse_json(text: &str) -> Result<Value, TransportError> {
    serde_json::from_str(text).map_err(|_| TransportError::InvalidJson)
}

/// 名前空間部分（既定の `/` は省略）
fn push_namespace(frame: &mut String, namespace: &str) {
    if namespace != DEFAULT_NAMESPACE {
        frame.push_str(namespace);
        frame.push(',');
    }
}

/// 名前空間への接続要求フレーム（`40` / `40/admin,`）
pub fn encode_connect(namespace: &str) -> String {
    let mut frame = String::from("40");
    push_namespace(&mut frame, namespace);
    frame
}

/// イベント送信フレーム（`42["name",payload]`）
///
/// # エラー
/// - `TransportError::InvalidJson`: ペイロードの JSON 化に失敗
pub fn encode_event(namespace: &str, name: &str, payload: Value) -> Result<String, TransportError> {
    let body = serde_json::to_string(&Value::Array(vec![Value::String(name.to_string()), payload]))
        .map_err(|_| TransportError::InvalidJson)?;

    let mut frame = String::with_capacity(body.len() + 2 + namespace.len());
    frame.push_str("42");
    push_namespace(&mut frame, namespace);
    frame.push_str(&body);
    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_open() {
        let frame = decode_frame(r#"0{"sid":"lv_VI97HAXpY6yYWAAAC","upgrades":[],"pingInterval":25000,"pingTimeout":20000}"#).unwrap();
        match frame {
            Frame::Open(info) => {
                assert_eq!(info.sid, "lv_VI97HAXpY6yYWAAAC");
                assert_eq!(info.ping_interval, 25000);
                assert_eq!(info.ping_timeout, 20000);
            }
            other => panic!("open を期待したが {:?}", other),
        }
    }

    #[test]
    fn test_decode_ping_and_probe() {
        assert_eq!(decode_frame("2").unwrap(), Frame::Ping(String::new()));
        assert_eq!(decode_frame("2probe").unwrap(), Frame::Ping(String::from("probe")));
    }

    #[test]
    fn test_decode_connect_with_sid() {
        let frame = decode_frame(r#"40{"sid":"wZX3oN0bSVIhsaknAAAI"}"#).unwrap();
        assert_eq!(
            frame,
            Frame::Connect {
                namespace: String::from("/"),
                sid: Some(String::from("wZX3oN0bSVIhsaknAAAI")),
            }
        );
    }

    #[test]
    fn test_decode_event() {
        let frame = decode_frame(r#"42["progress",{"data":"Unpacking...","progress":10}]"#).unwrap();
        let Frame::Event { namespace, ack_id, name, payload } = frame else {
            panic!("event を期待");
        };
        assert_eq!(namespace, "/");
        assert_eq!(ack_id, None);
        assert_eq!(name, "progress");
        assert_eq!(payload["data"], "Unpacking...");
        assert_eq!(payload["progress"], 10);
    }

    #[test]
    fn test_decode_event_with_namespace_and_ack() {
        let frame = decode_frame(r#"42/admin,13["success",{"data":"ok","repo_url":"/r"}]"#).unwrap();
        let Frame::Event { namespace, ack_id, name, .. } = frame else {
            panic!("event を期待");
        };
        assert_eq!(namespace, "/admin");
        assert_eq!(ack_id, Some(13));
        assert_eq!(name, "success");
    }

    #[test]
    fn test_decode_event_without_payload() {
        let frame = decode_frame(r#"42["ping_me"]"#).unwrap();
        assert!(matches!(frame, Frame::Event { payload: Value::Null, .. }));
    }

    #[test]
    fn test_decode_event_requires_name() {
        assert_eq!(decode_frame("42[]"), Err(TransportError::MalformedPacket));
        assert_eq!(decode_frame("42[1,2]"), Err(TransportError::MalformedPacket));
        assert_eq!(decode_frame("42{}"), Err(TransportError::MalformedPacket));
    }

    #[test]
    fn test_decode_connect_error() {
        let frame = decode_frame(r#"44{"message":"Not authorized"}"#).unwrap();
        assert_eq!(
            frame,
            Frame::ConnectError {
                namespace: String::from("/"),
                message: String::from("Not authorized"),
            }
        );
    }

    #[test]
    fn test_decode_rejects_binary_and_garbage() {
        assert_eq!(decode_frame(""), Err(TransportError::EmptyFrame));
        assert_eq!(decode_frame("9"), Err(TransportError::UnknownPacketType('9')));
        assert_eq!(decode_frame(r#"451-["a",{"_placeholder":true,"num":0}]"#), Err(TransportError::UnsupportedBinary));
        assert_eq!(decode_frame("42[oops"), Err(TransportError::InvalidJson));
    }

    #[test]
    fn test_encode_event_frame() {
        let payload: Value = serde_json::from_str(r#"{"repo_name":"demo"}"#).unwrap();
        let frame = encode_event("/", "upload_project", payload).unwrap();
        assert_eq!(frame, r#"42["upload_project",{"repo_name":"demo"}]"#);
    }

    #[test]
    fn test_encode_connect_namespaces() {
        assert_eq!(encode_connect("/"), "40");
        assert_eq!(encode_connect("/publish"), "40/publish,");
    }
}
