//! publish-transport エラー型

/// フレーム処理・接続のエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransportError {
    /// 空のフレーム
    EmptyFrame,
    /// 未知の Engine.IO / Socket.IO パケット種別
    UnknownPacketType(char),
    /// パケット構造が不正（イベント名なし、ack ID が数値でない等）
    MalformedPacket,
    /// JSON 部分のパースに失敗
    InvalidJson,
    /// バイナリ添付付きパケット（このクライアントでは扱わない）
    UnsupportedBinary,
    /// 接続が閉じられている
    Closed,
}

impl core::fmt::Display for TransportError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            TransportError::EmptyFrame => write!(f, "Empty frame"),
            TransportError::UnknownPacketType(c) => write!(f, "Unknown packet type: {:?}", c),
            TransportError::MalformedPacket => write!(f, "Malformed packet"),
            TransportError::InvalidJson => write!(f, "Invalid JSON in packet body"),
            TransportError::UnsupportedBinary => write!(f, "Binary packets are not supported"),
            TransportError::Closed => write!(f, "Connection is closed"),
        }
    }
}
