//! DOM を使った UI 出力ポートとフォーム読み取り
//!
//! 出力領域（プログレスバー・ログ・結果パネル）に書き込むのは [`DomUi`] だけ。

use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, Window};

use publish_session::{FormSnapshot, Panel, RepoLink, ResultView, Tone, UiPorts};

use crate::config::{ClientConfig, ElementIds, StyleClasses};
use crate::console;
use crate::error::{describe_js, ClientError};
use crate::file::BrowserFile;

/// ID で要素を取得する
pub fn element(document: &Document, id: &str) -> Result<Element, ClientError> {
    document
        .get_element_by_id(id)
        .ok_or_else(|| ClientError::MissingElement(String::from(id)))
}

/// `value` プロパティを読む（`<input>` / `<select>` / `<textarea>` 共通）
fn field_value(document: &Document, id: &str) -> Result<String, ClientError> {
    let el = element(document, id)?;
    let value = js_sys::Reflect::get(&el, &JsValue::from_str("value")).map_err(ClientError::js)?;
    Ok(value.as_string().unwrap_or_default())
}

/// 送信時点のフォーム内容を読み取る
///
/// ファイルは先頭の 1 つだけを使う。未選択なら `file` は `None`。
pub fn read_form(
    document: &Document,
    ids: &ElementIds,
) -> Result<FormSnapshot<BrowserFile>, ClientError> {
    let file_input = element(document, &ids.zip_file)?
        .dyn_into::<HtmlInputElement>()
        .map_err(|_| ClientError::WrongElementType(ids.zip_file.clone()))?;
    let file = file_input
        .files()
        .and_then(|list| list.get(0))
        .map(BrowserFile::new);

    Ok(FormSnapshot {
        repo_name: field_value(document, &ids.repo_name)?,
        file,
        branch: field_value(document, &ids.branch)?,
        visibility: field_value(document, &ids.visibility)?,
        commit_message: field_value(document, &ids.commit_message)?,
    })
}

/// DOM 操作の失敗はコンソールに出して続行する（描画は次の遷移でやり直される）
fn report(result: Result<(), JsValue>, what: &str) {
    if let Err(e) = result {
        console::error(&format!("{} failed: {}", what, describe_js(&e)));
    }
}

/// DOM に描画する UI 出力ポート
pub struct DomUi {
    form: Element,
    progress_container: Element,
    progress_bar: HtmlElement,
    log_output: Element,
    result_container: Element,
    result_message: Element,
    repo_url: Element,
    classes: StyleClasses,
}

impl DomUi {
    /// 設定の ID で出力領域を取得する
    ///
    /// # エラー
    /// - `ClientError::MissingElement`: 要素がページにない
    /// - `ClientError::WrongElementType`: プログレスバーが HTML 要素でない
    pub fn bind(document: &Document, config: &ClientConfig) -> Result<Self, ClientError> {
        let ids = &config.elements;
        let progress_bar = element(document, &ids.progress_bar)?
            .dyn_into::<HtmlElement>()
            .map_err(|_| ClientError::WrongElementType(ids.progress_bar.clone()))?;

        Ok(DomUi {
            form: element(document, &ids.form)?,
            progress_container: element(document, &ids.progress_container)?,
            progress_bar,
            log_output: element(document, &ids.log_output)?,
            result_container: element(document, &ids.result_container)?,
            result_message: element(document, &ids.result_message)?,
            repo_url: element(document, &ids.repo_url)?,
            classes: config.classes.clone(),
        })
    }

    fn panel(&self, panel: Panel) -> &Element {
        match panel {
            Panel::Form => &self.form,
            Panel::Progress => &self.progress_container,
            Panel::Result => &self.result_container,
        }
    }
}

impl UiPorts for DomUi {
    fn render_log(&mut self, log: &str) {
        self.log_output.set_text_content(Some(log));
        self.log_output.set_scroll_top(self.log_output.scroll_height());
    }

    fn render_progress(&mut self, percent: u8, tone: Tone) {
        report(
            self.progress_bar
                .style()
                .set_property("width", &format!("{}%", percent)),
            "progress width",
        );

        let classes = self.progress_bar.class_list();
        report(
            classes.remove_2(&self.classes.success, &self.classes.failure),
            "progress style reset",
        );
        match tone {
            Tone::Neutral => {}
            Tone::Positive => report(classes.add_1(&self.classes.success), "progress style"),
            Tone::Negative => report(classes.add_1(&self.classes.failure), "progress style"),
        }
    }

    fn render_result(&mut self, result: &ResultView<'_>) {
        self.result_message.set_text_content(Some(result.message));

        let link_classes = self.repo_url.class_list();
        match result.link {
            RepoLink::Href(url) => {
                report(self.repo_url.set_attribute("href", url), "result link");
                report(self.repo_url.remove_attribute("aria-disabled"), "result link");
                report(link_classes.remove_1(&self.classes.disabled_link), "result link");
            }
            RepoLink::Disabled => {
                report(self.repo_url.set_attribute("href", "#"), "result link");
                report(self.repo_url.set_attribute("aria-disabled", "true"), "result link");
                report(link_classes.add_1(&self.classes.disabled_link), "result link");
            }
        }
    }

    fn toggle_panel(&mut self, panel: Panel, visible: bool) {
        let classes = self.panel(panel).class_list();
        let result = if visible {
            classes.remove_1(&self.classes.hidden)
        } else {
            classes.add_1(&self.classes.hidden)
        };
        report(result, "panel toggle");
    }
}

/// ブロッキングなアラート
///
/// セッションの借用中に呼ばないこと（表示中に他のハンドラーが走るブラウザがある）。
pub fn alert(window: &Window, message: &str) {
    report(window.alert_with_message(message), "alert");
}
