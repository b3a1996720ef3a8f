//! セッションコントローラー
//!
//! セッション状態の唯一の所有者であり、UI 出力領域への唯一の書き手。
//! すべての操作は中断点を持たずに完了する（ファイル読み込みだけは呼び出し側で待つ）。
//!
//! ## 送信の流れ
//!
//! ```text
//! submit(form) ──→ Ok(file) ──→ [呼び出し側: encode_file(file).await] ──→ complete_encoding(result)
//!      │                                                                     │
//!      └─ Err: アラート、送信なし                         Ok: upload_project 送信 / Err: アラートして Idle へ
//! ```
//!
//! ## アラート
//!
//! 検証エラーのアラートはその場では表示せず、キューに積む。
//! 呼び出し側はコントローラーの借用を解放してから [`SessionController::take_alerts`]
//! で取り出して表示する（アラート表示中に別のハンドラーが走っても再借用にならない）。

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use publish_encoder::{EncodeError, EncodedPayload};
use publish_proto::{ProgressEvent, ServerEvent, TerminalEvent};
use serde::Serialize;

use crate::error::{SessionError, SubmitError};
use crate::form::FormSnapshot;
use crate::ports::{EventSink, UiPorts};
use crate::projection::project;
use crate::state::{transition, Phase, SessionInput, SessionState};

/// イベント処理の結果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Handled {
    /// 状態が変化し、UI を再描画した
    Applied,
    /// 現在の状態では無効なので無視した（表示は変化しない）
    Ignored,
}

/// コントローラーの統計情報（診断用に JSON で出力できる）
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionStats {
    /// 検証を通過した送信の回数
    pub sessions_started: u64,
    /// 実際に送信した upload_project の数
    pub requests_emitted: u64,
    /// 適用した progress の数
    pub progress_events: u64,
    /// 適用した終端イベントの数
    pub terminal_events: u64,
    /// 無視したイベントの数（終端後の重複・状態外の到着）
    pub ignored_events: u64,
    /// 送信した Base64 ペイロードの合計文字数
    pub payload_bytes_emitted: u64,
}

/// アップロードセッションのコントローラー
pub struct SessionController<U, S> {
    state: SessionState,
    ui: U,
    sink: S,
    stats: SessionStats,
    /// 表示待ちのアラート（古い順）
    pending_alerts: Vec<String>,
}

impl<U: UiPorts, S: EventSink> SessionController<U, S> {
    /// コントローラーを生成し、Idle の画面を描画する
    pub fn new(ui: U, sink: S) -> Self {
        let mut controller = SessionController {
            state: SessionState::default(),
            ui,
            sink,
            stats: SessionStats::default(),
            pending_alerts: Vec::new(),
        };
        controller.render();
        controller
    }

    /// フォームを送信する
    ///
    /// 検証に通ればフォームを隠して進捗領域を表示し、読み込むべきファイルを返す。
    /// 呼び出し側はファイルをエンコードして [`complete_encoding`](Self::complete_encoding) に渡す。
    ///
    /// # エラー
    /// 検証エラーはアラートをキューに積み、何も送信しない。状態は Idle のまま。
    pub fn submit<F>(&mut self, form: FormSnapshot<F>) -> Result<F, SubmitError> {
        if self.state.phase() != Phase::Idle {
            return Err(self.reject(SubmitError::SessionActive));
        }

        let (draft, file) = match form.validate() {
            Ok(validated) => validated,
            Err(e) => return Err(self.reject(e)),
        };

        self.apply(SessionInput::Submitted(draft));
        self.stats.sessions_started += 1;
        Ok(file)
    }

    /// ファイルのエンコード完了を通知する
    ///
    /// 成功なら `upload_project` を送信して InProgress に進む。
    /// Submitting 以外で呼ばれた場合は無視する。
    ///
    /// # エラー
    /// - `SubmitError::Unreadable`: 読み込み失敗（握りつぶさない）
    /// - `SubmitError::EmitFailed`: 接続が使えない
    ///
    /// どちらもアラートをキューに積み、要求は送信されず Idle に戻る。
    pub fn complete_encoding(
        &mut self,
        encoded: Result<EncodedPayload, EncodeError>,
    ) -> Result<Handled, SubmitError> {
        let draft = match &self.state {
            SessionState::Submitting { draft } => draft.clone(),
            _ => {
                self.stats.ignored_events += 1;
                return Ok(Handled::Ignored);
            }
        };

        let payload = match encoded {
            Ok(payload) => payload,
            Err(e) => {
                self.apply(SessionInput::Aborted);
                return Err(self.reject(SubmitError::Unreadable(e)));
            }
        };

        let payload_len = payload.len() as u64;
        let request = draft.into_request(payload);
        if let Err(e) = self.sink.emit(&request) {
            self.apply(SessionInput::Aborted);
            return Err(self.reject(SubmitError::EmitFailed(e.to_string())));
        }

        self.stats.requests_emitted += 1;
        self.stats.payload_bytes_emitted += payload_len;
        Ok(self.apply(SessionInput::Emitted))
    }

    /// progress を処理する（InProgress 以外では無視）
    pub fn on_progress(&mut self, evt: ProgressEvent) -> Handled {
        let handled = self.apply(SessionInput::Progress(evt));
        if handled == Handled::Applied {
            self.stats.progress_events += 1;
        }
        handled
    }

    /// success を処理する（終端、InProgress 以外では無視）
    pub fn on_success(&mut self, text: &str, repo_url: &str) -> Handled {
        self.on_terminal(TerminalEvent::Success {
            text: text.to_string(),
            repo_url: repo_url.to_string(),
        })
    }

    /// error を処理する（終端、InProgress 以外では無視）
    pub fn on_error(&mut self, text: &str) -> Handled {
        self.on_terminal(TerminalEvent::Failure {
            text: text.to_string(),
        })
    }

    /// サーバーイベントを種類に応じて振り分ける
    pub fn on_server_event(&mut self, event: ServerEvent) -> Handled {
        match event {
            ServerEvent::Progress(evt) => self.on_progress(evt),
            ServerEvent::Terminal(evt) => self.on_terminal(evt),
        }
    }

    /// 「やり直す」: 終端状態から Idle に戻り、フォームを再表示する
    ///
    /// # エラー
    /// - `SessionError::InvalidState`: 終端状態以外（状態は変化しない）
    pub fn reset(&mut self) -> Result<(), SessionError> {
        let phase = self.state.phase();
        match self.apply(SessionInput::Reset) {
            Handled::Applied => Ok(()),
            Handled::Ignored => Err(SessionError::InvalidState {
                operation: "reset",
                phase,
            }),
        }
    }

    /// 表示待ちのアラートをすべて取り出す
    ///
    /// コントローラーの借用を解放してから表示すること。
    pub fn take_alerts(&mut self) -> Vec<String> {
        core::mem::take(&mut self.pending_alerts)
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase()
    }

    pub fn stats(&self) -> &SessionStats {
        &self.stats
    }

    pub fn ui(&self) -> &U {
        &self.ui
    }

    pub fn ui_mut(&mut self) -> &mut U {
        &mut self.ui
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    // ===== Private メソッド =====

    fn on_terminal(&mut self, evt: TerminalEvent) -> Handled {
        let handled = self.apply(SessionInput::Terminal(evt));
        if handled == Handled::Applied {
            self.stats.terminal_events += 1;
        }
        handled
    }

    /// 遷移を適用し、状態が変わった場合だけ再描画する
    fn apply(&mut self, input: SessionInput) -> Handled {
        let current = core::mem::take(&mut self.state);
        let result = transition(current, input);
        self.state = result.state;

        if result.applied {
            self.render();
            Handled::Applied
        } else {
            self.stats.ignored_events += 1;
            Handled::Ignored
        }
    }

    /// 現在の状態の写像を UI ポートに書き出す
    fn render(&mut self) {
        let output = project(&self.state);

        for (panel, visible) in output.panels() {
            self.ui.toggle_panel(panel, visible);
        }
        self.ui.render_progress(output.percent, output.tone);
        self.ui.render_log(output.log);
        if let Some(result) = output.result {
            self.ui.render_result(&result);
        }
    }

    /// 検証エラーのアラートをキューに積んでそのまま返す
    fn reject(&mut self, err: SubmitError) -> SubmitError {
        self.pending_alerts.push(err.to_string());
        err
    }
}
