//! セッション状態と純粋な遷移関数
//!
//! 副作用（送信・描画）は持たない。コントローラーが遷移結果を見て実行する。

use alloc::format;
use alloc::string::String;

use publish_proto::{ProgressEvent, TerminalEvent};

use crate::form::RequestDraft;
use crate::log::SessionLog;
use crate::FAILURE_PREFIX;

/// セッション状態（クライアントに 1 つだけ存在する）
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    /// 初期状態、またはリセット後
    ///
    /// `last_log` は直前のセッションのログ。次の送信まで表示に残す。
    Idle { last_log: SessionLog },
    /// 検証済み、ファイルのエンコード待ち
    Submitting { draft: RequestDraft },
    /// 要求送信済み、サーバーからのイベント待ち
    InProgress { log: SessionLog, percent: u8 },
    /// success を受信（終端）
    Succeeded {
        log: SessionLog,
        message: String,
        repo_url: String,
    },
    /// error を受信（終端）
    Failed { log: SessionLog, message: String },
}

impl Default for SessionState {
    fn default() -> Self {
        SessionState::Idle {
            last_log: SessionLog::new(),
        }
    }
}

/// 状態の種類（データを持たない）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Submitting,
    InProgress,
    Succeeded,
    Failed,
}

/// 遷移の入力
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionInput {
    /// フォーム検証成功
    Submitted(RequestDraft),
    /// エンコード完了・要求送信済み
    Emitted,
    /// 読み込み失敗・送信失敗で要求を出せなかった
    Aborted,
    Progress(ProgressEvent),
    Terminal(TerminalEvent),
    /// ユーザーの「やり直す」操作
    Reset,
}

/// 遷移結果
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: SessionState,
    /// `false` のとき入力は現在の状態で無効で、状態は変化していない
    pub applied: bool,
}

impl SessionState {
    pub fn phase(&self) -> Phase {
        match self {
            SessionState::Idle { .. } => Phase::Idle,
            SessionState::Submitting { .. } => Phase::Submitting,
            SessionState::InProgress { .. } => Phase::InProgress,
            SessionState::Succeeded { .. } => Phase::Succeeded,
            SessionState::Failed { .. } => Phase::Failed,
        }
    }

    /// 終端状態か（リセットのみ受け付ける）
    pub fn is_terminal(&self) -> bool {
        matches!(self, SessionState::Succeeded { .. } | SessionState::Failed { .. })
    }

    /// 表示中のログ（Submitting ではクリア済みなので `None`）
    pub fn log(&self) -> Option<&SessionLog> {
        match self {
            SessionState::Idle { last_log: log }
            | SessionState::InProgress { log, .. }
            | SessionState::Succeeded { log, .. }
            | SessionState::Failed { log, .. } => Some(log),
            SessionState::Submitting { .. } => None,
        }
    }
}

/// 状態遷移
///
/// - パーセントは最後に受信した値をそのまま使う（単調性は保証しない）
/// - 終端状態では progress / success / error を無視する
/// - reset は終端状態からのみ有効。ログは Idle → Submitting でだけ捨てる
pub fn transition(state: SessionState, input: SessionInput) -> Transition {
    match (state, input) {
        (SessionState::Idle { .. }, SessionInput::Submitted(draft)) => {
            applied(SessionState::Submitting { draft })
        }
        (SessionState::Submitting { .. }, SessionInput::Emitted) => {
            // ログのクリアと 0% へのリセット
            applied(SessionState::InProgress {
                log: SessionLog::new(),
                percent: 0,
            })
        }
        (SessionState::Submitting { .. }, SessionInput::Aborted) => {
            applied(SessionState::default())
        }
        (SessionState::InProgress { mut log, percent }, SessionInput::Progress(evt)) => {
            log.append_line(&evt.text);
            applied(SessionState::InProgress {
                log,
                percent: evt.percent.unwrap_or(percent),
            })
        }
        (
            SessionState::InProgress { mut log, .. },
            SessionInput::Terminal(TerminalEvent::Success { text, repo_url }),
        ) => {
            log.append_line(&text);
            applied(SessionState::Succeeded {
                log,
                message: text,
                repo_url,
            })
        }
        (
            SessionState::InProgress { mut log, .. },
            SessionInput::Terminal(TerminalEvent::Failure { text }),
        ) => {
            let message = format!("{}{}", FAILURE_PREFIX, text);
            log.append_line(&message);
            applied(SessionState::Failed { log, message })
        }
        (
            SessionState::Succeeded { log, .. } | SessionState::Failed { log, .. },
            SessionInput::Reset,
        ) => applied(SessionState::Idle { last_log: log }),
        (state, _) => Transition {
            state,
            applied: false,
        },
    }
}

fn applied(state: SessionState) -> Transition {
    Transition {
        state,
        applied: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use publish_proto::Visibility;

    fn draft() -> RequestDraft {
        RequestDraft {
            repo_name: String::from("abc"),
            branch: String::new(),
            visibility: Visibility::Public,
            commit_message: String::new(),
        }
    }

    fn progress(text: &str, percent: Option<u8>) -> SessionInput {
        SessionInput::Progress(ProgressEvent {
            text: String::from(text),
            percent,
        })
    }

    fn in_progress() -> SessionState {
        let s = transition(SessionState::default(), SessionInput::Submitted(draft())).state;
        transition(s, SessionInput::Emitted).state
    }

    #[test]
    fn test_submit_then_emit_starts_empty_session() {
        let state = in_progress();
        assert_eq!(
            state,
            SessionState::InProgress {
                log: SessionLog::new(),
                percent: 0,
            }
        );
    }

    #[test]
    fn test_progress_without_percent_keeps_value() {
        let s = transition(in_progress(), progress("a", Some(40))).state;
        let s = transition(s, progress("b", None)).state;

        let SessionState::InProgress { log, percent } = s else {
            panic!("InProgress のままのはず");
        };
        assert_eq!(percent, 40);
        assert_eq!(log.as_str(), "a\nb\n");
    }

    #[test]
    fn test_percent_regression_is_displayed() {
        let s = transition(in_progress(), progress("a", Some(80))).state;
        let s = transition(s, progress("b", Some(30))).state;
        assert!(matches!(s, SessionState::InProgress { percent: 30, .. }));
    }

    #[test]
    fn test_failure_prefixes_message() {
        let t = transition(
            in_progress(),
            SessionInput::Terminal(TerminalEvent::Failure {
                text: String::from("Repo exists"),
            }),
        );
        assert!(t.applied);
        let SessionState::Failed { log, message } = t.state else {
            panic!("Failed のはず");
        };
        assert_eq!(message, "ERROR: Repo exists");
        assert_eq!(log.as_str(), "ERROR: Repo exists\n");
    }

    #[test]
    fn test_events_ignored_outside_in_progress() {
        let t = transition(SessionState::default(), progress("late", Some(5)));
        assert!(!t.applied);
        assert_eq!(t.state, SessionState::default());

        let submitting = SessionState::Submitting { draft: draft() };
        let t = transition(
            submitting.clone(),
            SessionInput::Terminal(TerminalEvent::Failure {
                text: String::from("early"),
            }),
        );
        assert!(!t.applied);
        assert_eq!(t.state, submitting);
    }

    #[test]
    fn test_second_terminal_ignored() {
        let done = transition(
            in_progress(),
            SessionInput::Terminal(TerminalEvent::Success {
                text: String::from("Done"),
                repo_url: String::from("/repos/abc"),
            }),
        )
        .state;

        let t = transition(
            done.clone(),
            SessionInput::Terminal(TerminalEvent::Failure {
                text: String::from("late failure"),
            }),
        );
        assert!(!t.applied);
        assert_eq!(t.state, done);
    }

    #[test]
    fn test_reset_only_from_terminal() {
        for state in [
            SessionState::default(),
            SessionState::Submitting { draft: draft() },
            in_progress(),
        ] {
            let phase = state.phase();
            let t = transition(state, SessionInput::Reset);
            assert!(!t.applied, "{:?} からの reset は無効", phase);
        }

        let mut log = SessionLog::new();
        log.append_line("ERROR: x");
        let failed = SessionState::Failed {
            log: log.clone(),
            message: String::from("ERROR: x"),
        };
        let t = transition(failed, SessionInput::Reset);
        assert!(t.applied);
        assert_eq!(t.state, SessionState::Idle { last_log: log });
    }

    #[test]
    fn test_log_kept_until_next_submit() {
        let s = transition(in_progress(), progress("one", None)).state;
        let s = transition(
            s,
            SessionInput::Terminal(TerminalEvent::Success {
                text: String::from("Done"),
                repo_url: String::from("/repos/abc"),
            }),
        )
        .state;

        let idle = transition(s, SessionInput::Reset).state;
        assert_eq!(idle.log().map(SessionLog::as_str), Some("one\nDone\n"));

        let submitting = transition(idle, SessionInput::Submitted(draft())).state;
        assert_eq!(submitting.log(), None);
    }

    #[test]
    fn test_resubmit_only_after_reset() {
        let t = transition(in_progress(), SessionInput::Submitted(draft()));
        assert!(!t.applied);
    }
}
