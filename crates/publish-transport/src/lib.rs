//! # publish-transport
//!
//! ページ読み込み時に 1 度だけ確立し、全セッションで共有する双方向メッセージチャンネル。
//! サーバーは Socket.IO なので、WebSocket 上の Engine.IO v4 / Socket.IO v5
//! テキストフレームを扱う。
//!
//! ## フレームの Wire Format
//!
//! ```text
//! [engine_type: 1 char][body...]
//!   0 open    {"sid":"...","pingInterval":25000,"pingTimeout":20000}
//!   1 close
//!   2 ping    3 pong
//!   4 message → Socket.IO パケット
//!   5 upgrade 6 noop
//!
//! Socket.IO パケット（engine_type = 4 の body）:
//! [socket_type: 1 char][/namespace,]?[ack_id]?[json]?
//!   0 connect  1 disconnect  2 event  3 ack  4 connect_error
//!
//! 例: 42["progress",{"data":"Unpacking...","progress":10}]
//! ```
//!
//! 同一接続上のイベントは送信順（FIFO）で届く。並べ替え・重複排除は行わない。

#![no_std]
extern crate alloc;

pub mod connection;
pub mod error;
pub mod frame;
pub mod url;

pub use connection::{Connection, ConnectionState, Inbound};
pub use error::TransportError;
pub use frame::{decode_frame, encode_connect, encode_event, Frame, OpenInfo, PONG};
pub use url::socket_url;

/// Engine.IO プロトコルバージョン
pub const ENGINE_IO_VERSION: u32 = 4;

/// 既定の名前空間
pub const DEFAULT_NAMESPACE: &str = "/";

/// 既定の Socket.IO パス
pub const DEFAULT_SOCKET_PATH: &str = "/socket.io/";
