//! セッションログ
//!
//! ログはセッション内で追記のみ。クリアされるのは Idle → Submitting のときだけで、
//! 個々のイベント受信でクリアされることはない。

use alloc::string::String;

/// 追記専用のログバッファ
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionLog {
    /// 改行区切りのログ全文
    text: String,
    /// 追記した行数
    lines: usize,
}

impl SessionLog {
    /// 空のログを生成する
    pub fn new() -> Self {
        SessionLog::default()
    }

    /// 1 行追記する（末尾に改行を付ける）
    ///
    /// サーバーから届いた文字列は解釈せずそのまま記録する。
    pub fn append_line(&mut self, line: &str) {
        self.text.push_str(line);
        self.text.push('\n');
        self.lines += 1;
    }

    /// ログ全文
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}
