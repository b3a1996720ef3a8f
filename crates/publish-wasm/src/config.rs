//! クライアント設定
//!
//! `PublishClient` のコンストラクタに JSON 文字列で渡す。すべて省略可能で、
//! 省略時は既存のページ（Bootstrap マークアップ）の要素 ID・クラス名を使う。
//!
//! ```json
//! {
//!   "socketPath": "/socket.io/",
//!   "namespace": "/",
//!   "elements": { "zipFile": "zip-file" },
//!   "classes": { "hidden": "d-none" }
//! }
//! ```

use serde::Deserialize;

use publish_transport::{DEFAULT_NAMESPACE, DEFAULT_SOCKET_PATH};

/// クライアント設定
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientConfig {
    /// Socket.IO のパス
    pub socket_path: String,
    /// Socket.IO の名前空間
    pub namespace: String,
    pub elements: ElementIds,
    pub classes: StyleClasses,
}

/// コアが読み書きする DOM 要素の ID
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct ElementIds {
    // --- 入力 ---
    pub form: String,
    pub repo_name: String,
    pub zip_file: String,
    pub branch: String,
    pub visibility: String,
    pub commit_message: String,
    // --- 出力 ---
    pub progress_container: String,
    pub progress_bar: String,
    pub log_output: String,
    pub result_container: String,
    pub result_message: String,
    pub repo_url: String,
    /// 「やり直す」ボタン（ページにない場合はリセット操作なし）
    pub start_over: String,
}

/// 表示切り替え・配色に使う CSS クラス
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct StyleClasses {
    /// 非表示
    pub hidden: String,
    /// 成功時のバー
    pub success: String,
    /// 失敗時のバー
    pub failure: String,
    /// 無効リンク
    pub disabled_link: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            socket_path: String::from(DEFAULT_SOCKET_PATH),
            namespace: String::from(DEFAULT_NAMESPACE),
            elements: ElementIds::default(),
            classes: StyleClasses::default(),
        }
    }
}

impl Default for ElementIds {
    fn default() -> Self {
        ElementIds {
            form: String::from("upload-form"),
            repo_name: String::from("repo-name"),
            zip_file: String::from("zip-file"),
            branch: String::from("branch"),
            visibility: String::from("visibility"),
            commit_message: String::from("commit-message"),
            progress_container: String::from("progress-container"),
            progress_bar: String::from("progress-bar"),
            log_output: String::from("log-output"),
            result_container: String::from("result-container"),
            result_message: String::from("result-message"),
            repo_url: String::from("repo-url"),
            start_over: String::from("start-over-btn"),
        }
    }
}

impl Default for StyleClasses {
    fn default() -> Self {
        StyleClasses {
            hidden: String::from("d-none"),
            success: String::from("bg-success"),
            failure: String::from("bg-danger"),
            disabled_link: String::from("disabled"),
        }
    }
}

impl ClientConfig {
    /// JSON 文字列から設定を読み込む（`None` や空文字列なら既定値）
    pub fn from_json(json: Option<&str>) -> Result<Self, serde_json::Error> {
        match json.map(str::trim) {
            None | Some("") => Ok(ClientConfig::default()),
            Some(text) => serde_json::from_str(text),
        }
    }
}
