//! 状態から UI 出力への写像
//!
//! UI は常に状態の純粋関数として描画されるので、
//! 「成功色のバーとエラーメッセージ」のような不整合な表示は起こらない。

use crate::ports::Panel;
use crate::state::SessionState;
use crate::COMPLETE_PERCENT;

/// バー・結果パネルの配色
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    /// 進行中（色なし）
    Neutral,
    /// 成功
    Positive,
    /// 失敗
    Negative,
}

/// 結果パネルのリンク
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepoLink<'a> {
    /// 作成されたリポジトリへのリンク
    Href(&'a str),
    /// 失敗時の無効リンク
    Disabled,
}

/// 結果パネルの内容
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultView<'a> {
    pub message: &'a str,
    pub link: RepoLink<'a>,
    pub tone: Tone,
}

/// 画面全体の出力
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UiOutput<'a> {
    pub form_visible: bool,
    pub progress_visible: bool,
    pub result_visible: bool,
    /// プログレスバーの幅（%）
    pub percent: u8,
    pub tone: Tone,
    pub log: &'a str,
    pub result: Option<ResultView<'a>>,
}

impl UiOutput<'_> {
    /// 各パネルの表示状態
    pub fn panels(&self) -> [(Panel, bool); 3] {
        [
            (Panel::Form, self.form_visible),
            (Panel::Progress, self.progress_visible),
            (Panel::Result, self.result_visible),
        ]
    }
}

/// 状態を UI 出力に写す
pub fn project(state: &SessionState) -> UiOutput<'_> {
    match state {
        // 直前のセッションのログは次の送信まで残す
        SessionState::Idle { last_log } => UiOutput {
            form_visible: true,
            progress_visible: false,
            result_visible: false,
            percent: 0,
            tone: Tone::Neutral,
            log: last_log.as_str(),
            result: None,
        },
        SessionState::Submitting { .. } => UiOutput {
            form_visible: false,
            progress_visible: true,
            result_visible: false,
            percent: 0,
            tone: Tone::Neutral,
            log: "",
            result: None,
        },
        SessionState::InProgress { log, percent } => UiOutput {
            form_visible: false,
            progress_visible: true,
            result_visible: false,
            percent: *percent,
            tone: Tone::Neutral,
            log: log.as_str(),
            result: None,
        },
        SessionState::Succeeded {
            log,
            message,
            repo_url,
        } => UiOutput {
            form_visible: false,
            progress_visible: false,
            result_visible: true,
            percent: COMPLETE_PERCENT,
            tone: Tone::Positive,
            log: log.as_str(),
            result: Some(ResultView {
                message,
                link: RepoLink::Href(repo_url),
                tone: Tone::Positive,
            }),
        },
        SessionState::Failed { log, message } => UiOutput {
            form_visible: false,
            progress_visible: false,
            result_visible: true,
            percent: COMPLETE_PERCENT,
            tone: Tone::Negative,
            log: log.as_str(),
            result: Some(ResultView {
                message,
                link: RepoLink::Disabled,
                tone: Tone::Negative,
            }),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::log::SessionLog;
    use alloc::string::String;

    #[test]
    fn test_idle_shows_only_form() {
        let state = SessionState::default();
        let out = project(&state);
        assert_eq!(
            out.panels(),
            [(Panel::Form, true), (Panel::Progress, false), (Panel::Result, false)]
        );
        assert!(out.result.is_none());
    }

    #[test]
    fn test_success_is_full_and_positive() {
        let mut log = SessionLog::new();
        log.append_line("Done");
        let state = SessionState::Succeeded {
            log,
            message: String::from("Done"),
            repo_url: String::from("/repos/abc"),
        };

        let out = project(&state);
        assert_eq!(out.percent, 100);
        assert_eq!(out.tone, Tone::Positive);
        assert!(!out.progress_visible);
        assert_eq!(
            out.result,
            Some(ResultView {
                message: "Done",
                link: RepoLink::Href("/repos/abc"),
                tone: Tone::Positive,
            })
        );
    }

    #[test]
    fn test_failure_link_disabled() {
        let state = SessionState::Failed {
            log: SessionLog::new(),
            message: String::from("ERROR: Repo exists"),
        };
        let out = project(&state);
        assert_eq!(out.percent, 100);
        assert_eq!(out.tone, Tone::Negative);
        assert_eq!(out.result.map(|r| r.link), Some(RepoLink::Disabled));
    }

    #[test]
    fn test_in_progress_never_styled() {
        let state = SessionState::InProgress {
            log: SessionLog::new(),
            percent: 100,
        };
        let out = project(&state);
        assert_eq!(out.tone, Tone::Neutral);
        assert!(out.result.is_none());
    }

    #[test]
    fn test_idle_after_reset_keeps_previous_log() {
        let mut last_log = SessionLog::new();
        last_log.append_line("ERROR: Repo exists");
        let state = SessionState::Idle { last_log };
        let out = project(&state);

        assert!(out.form_visible);
        assert_eq!(out.log, "ERROR: Repo exists\n");
        assert!(out.result.is_none());
    }
}
