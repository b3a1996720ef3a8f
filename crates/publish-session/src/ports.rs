//! コントローラーに注入する出力ポート
//!
//! DOM 要素の直接参照の代わりに、描画能力の集合として UI を受け取る。
//! テストでは呼び出しを記録するダブルを渡す。

use publish_proto::UploadRequest;

use crate::projection::{ResultView, Tone};

/// 表示を切り替えるパネル
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Panel {
    /// 入力フォーム
    Form,
    /// プログレスバーとログ
    Progress,
    /// 結果メッセージとリンク
    Result,
}

/// UI 出力ポート
///
/// 進捗・ログ・結果領域に書き込むのはコントローラーだけ。
/// ブロッキングなアラートはここに含めない（[`take_alerts`] で呼び出し側が表示する）。
///
/// [`take_alerts`]: crate::SessionController::take_alerts
pub trait UiPorts {
    /// ログ領域の全文を置き換える（末尾までスクロール）
    fn render_log(&mut self, log: &str);

    /// プログレスバーの幅と配色
    fn render_progress(&mut self, percent: u8, tone: Tone);

    /// 結果パネルのメッセージ・リンク・配色
    fn render_result(&mut self, result: &ResultView<'_>);

    fn toggle_panel(&mut self, panel: Panel, visible: bool);
}

/// アップロード要求の送信先（共有トランスポート）
pub trait EventSink {
    type Error: core::fmt::Display;

    /// `upload_project` を送信する。送信後の取り消しはできない。
    fn emit(&mut self, request: &UploadRequest) -> Result<(), Self::Error>;
}
