//! PublishClient: ページに 1 つだけ置くアップロードクライアント

use std::cell::RefCell;
use std::rc::Rc;

use serde::Serialize;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::spawn_local;
use web_sys::{CloseEvent, Element, Event, MessageEvent, WebSocket, Window};

use publish_encoder::encode_file;
use publish_session::{Handled, SessionController, SessionStats};
use publish_transport::{socket_url, Connection};

use crate::config::ClientConfig;
use crate::console;
use crate::dom::{alert, element, read_form, DomUi};
use crate::error::ClientError;
use crate::socket::{handle_frame, send_frame, SocketSink};

type Controller = SessionController<DomUi, SocketSink>;

/// コントローラーを借用して操作し、借用を解放してからアラートを表示する
fn with_controller<R>(
    controller: &RefCell<Controller>,
    window: &Window,
    op: impl FnOnce(&mut Controller) -> R,
) -> R {
    let (result, alerts) = {
        let mut controller = controller.borrow_mut();
        let result = op(&mut controller);
        (result, controller.take_alerts())
    };
    for message in alerts {
        alert(window, &message);
    }
    result
}

/// アップロードクライアント
///
/// ## 構成
///
/// ```text
/// PublishClient
///   ├── SessionController (publish-session) - セッション状態と描画
///   │     ├── DomUi       - DOM への出力ポート
///   │     └── SocketSink  - upload_project の送信先
///   ├── Connection        (publish-transport) - Engine.IO / Socket.IO ハンドシェイク
///   └── WebSocket         - 実際の通信路
/// ```
///
/// ## スレッド安全性
///
/// WASM はシングルスレッドのため、コールバック間の共有は `Rc<RefCell<_>>` で行う。
/// 借用はコールバック 1 回の中で完結させ、`await` をまたいで保持しない。
#[wasm_bindgen]
pub struct PublishClient {
    controller: Rc<RefCell<Controller>>,
    connection: Rc<RefCell<Connection>>,
    socket: WebSocket,
    window: Window,
    form: Element,
    start_over: Option<Element>,
    // JS 側に渡したコールバック（クライアントと同じ寿命で保持する）
    _on_message: Closure<dyn FnMut(MessageEvent)>,
    _on_close: Closure<dyn FnMut(CloseEvent)>,
    on_submit: Closure<dyn FnMut(Event)>,
    on_start_over: Option<Closure<dyn FnMut(Event)>>,
}

#[wasm_bindgen]
impl PublishClient {
    /// クライアントを初期化する
    ///
    /// ページと同じホストに WebSocket を開き、フォームの送信と「やり直す」ボタンに
    /// ハンドラーを登録する。初期表示は Idle（フォームのみ表示）。
    ///
    /// # 引数
    /// - `config_json`: [`ClientConfig`] の JSON。省略時は既定の要素 ID を使う。
    ///
    /// # エラー
    /// - 設定 JSON が不正
    /// - 必要な要素がページにない
    /// - WebSocket を開けない
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<PublishClient, JsError> {
        let config = ClientConfig::from_json(config_json.as_deref()).map_err(ClientError::Config)?;

        let window = web_sys::window().ok_or(ClientError::NoWindow)?;
        let document = window.document().ok_or(ClientError::NoDocument)?;
        let location = window.location();
        let url = socket_url(
            &location.protocol().map_err(ClientError::js)?,
            &location.host().map_err(ClientError::js)?,
            &config.socket_path,
        );

        let socket = WebSocket::new(&url).map_err(ClientError::js)?;
        let connection = Rc::new(RefCell::new(Connection::new(&config.namespace)));
        let ui = DomUi::bind(&document, &config)?;
        let sink = SocketSink::new(socket.clone(), Rc::clone(&connection));
        let controller = Rc::new(RefCell::new(SessionController::new(ui, sink)));

        let on_message = {
            let socket = socket.clone();
            let window = window.clone();
            let connection = Rc::clone(&connection);
            let controller = Rc::clone(&controller);
            Closure::<dyn FnMut(MessageEvent)>::new(move |event: MessageEvent| {
                let Some(text) = event.data().as_string() else {
                    console::warn("Binary frame ignored");
                    return;
                };
                let outcome = handle_frame(
                    &connection,
                    &text,
                    |frame| send_frame(&socket, frame),
                    |evt| with_controller(&controller, &window, |c| c.on_server_event(evt)),
                );
                outcome.log();
            })
        };
        socket.set_onmessage(Some(on_message.as_ref().unchecked_ref()));

        let on_close = {
            let connection = Rc::clone(&connection);
            Closure::<dyn FnMut(CloseEvent)>::new(move |event: CloseEvent| {
                connection.borrow_mut().close();
                // 進行中の表示は残したまま（再接続はしない）
                console::warn(&format!("WebSocket closed (code {})", event.code()));
            })
        };
        socket.set_onclose(Some(on_close.as_ref().unchecked_ref()));

        let on_submit = {
            let window = window.clone();
            let document = document.clone();
            let ids = config.elements.clone();
            let controller = Rc::clone(&controller);
            Closure::<dyn FnMut(Event)>::new(move |event: Event| {
                event.prevent_default();

                let form = match read_form(&document, &ids) {
                    Ok(form) => form,
                    Err(e) => {
                        console::error(&format!("Cannot read form: {}", e));
                        return;
                    }
                };
                let file = match with_controller(&controller, &window, |c| c.submit(form)) {
                    Ok(file) => file,
                    Err(e) => {
                        console::warn(&format!("Submit rejected: {}", e));
                        return;
                    }
                };

                console::log(&format!("Encoding {} ({} bytes)", file.name(), file.size()));
                let controller = Rc::clone(&controller);
                let window = window.clone();
                spawn_local(async move {
                    let encoded = encode_file(file).await;
                    match with_controller(&controller, &window, |c| c.complete_encoding(encoded)) {
                        Ok(Handled::Applied) => {}
                        Ok(Handled::Ignored) => console::warn("Encoded file dropped: session moved on"),
                        Err(e) => console::error(&format!("Upload not sent: {}", e)),
                    }
                });
            })
        };
        let form = element(&document, &config.elements.form)?;
        form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())
            .map_err(ClientError::js)?;

        let start_over = document.get_element_by_id(&config.elements.start_over);
        let on_start_over = match &start_over {
            Some(button) => {
                let controller = Rc::clone(&controller);
                let window = window.clone();
                let closure = Closure::<dyn FnMut(Event)>::new(move |_: Event| {
                    if let Err(e) = with_controller(&controller, &window, |c| c.reset()) {
                        console::warn(&e.to_string());
                    }
                });
                button
                    .add_event_listener_with_callback("click", closure.as_ref().unchecked_ref())
                    .map_err(ClientError::js)?;
                Some(closure)
            }
            None => None,
        };

        console::log(&format!("Connecting to {}", url));
        Ok(PublishClient {
            controller,
            connection,
            socket,
            window,
            form,
            start_over,
            _on_message: on_message,
            _on_close: on_close,
            on_submit,
            on_start_over,
        })
    }

    /// 現在のセッション段階（`"Idle"`, `"InProgress"` など）
    pub fn phase(&self) -> String {
        format!("{:?}", self.controller.borrow().phase())
    }

    /// 「やり直す」をプログラムから実行する
    ///
    /// # エラー
    /// - 終端状態（成功・失敗）以外では実行できない
    pub fn reset(&self) -> Result<(), JsError> {
        with_controller(&self.controller, &self.window, |c| c.reset())
            .map_err(|e| JsError::new(&e.to_string()))
    }

    /// Socket.IO 名前空間に接続済みか
    #[wasm_bindgen(js_name = "isConnected")]
    pub fn is_connected(&self) -> bool {
        self.connection.borrow().is_connected()
    }

    /// 統計情報を JSON 文字列で返す（デバッグ用）
    ///
    /// ```json
    /// {
    ///   "session": { "sessions_started": 1, "requests_emitted": 1, ... },
    ///   "frames_received": 12,
    ///   "frames_sent": 3,
    ///   "connected": true
    /// }
    /// ```
    #[wasm_bindgen(js_name = "getStats")]
    pub fn get_stats(&self) -> Result<String, JsError> {
        #[derive(Serialize)]
        struct ClientStats<'a> {
            session: &'a SessionStats,
            frames_received: u64,
            frames_sent: u64,
            connected: bool,
        }

        let controller = self.controller.borrow();
        let connection = self.connection.borrow();
        let stats = ClientStats {
            session: controller.stats(),
            frames_received: connection.frames_received(),
            frames_sent: connection.frames_sent(),
            connected: connection.is_connected(),
        };
        serde_json::to_string(&stats).map_err(|e| JsError::new(&e.to_string()))
    }
}

impl Drop for PublishClient {
    fn drop(&mut self) {
        // 解放済みのコールバックが JS から呼ばれないよう先に外す
        self.socket.set_onmessage(None);
        self.socket.set_onclose(None);
        let _ = self
            .form
            .remove_event_listener_with_callback("submit", self.on_submit.as_ref().unchecked_ref());
        if let (Some(button), Some(closure)) = (&self.start_over, &self.on_start_over) {
            let _ = button.remove_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        }
        let _ = self.socket.close();
    }
}
