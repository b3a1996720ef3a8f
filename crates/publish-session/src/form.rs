//! 入力フォームのスナップショットと検証

use alloc::string::String;

use publish_encoder::EncodedPayload;
use publish_proto::{UploadRequest, Visibility};

use crate::error::SubmitError;

/// 送信時点のフォーム内容
///
/// `F` は選択されたファイルのハンドル（ブラウザでは `File`）。
/// 読み込みはコントローラーではなく呼び出し側のエンコーダーが行う。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormSnapshot<F> {
    pub repo_name: String,
    /// ちょうど 1 つのファイル、または未選択
    pub file: Option<F>,
    pub branch: String,
    pub visibility: String,
    pub commit_message: String,
}

/// 検証済みのフォーム内容（ファイル本体を除く）
///
/// エンコード完了後にペイロードと組み合わせて [`UploadRequest`] になる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestDraft {
    pub repo_name: String,
    pub branch: String,
    pub visibility: Visibility,
    pub commit_message: String,
}

impl<F> FormSnapshot<F> {
    /// フォームを検証し、下書きとファイルハンドルに分ける
    ///
    /// ファイル未選択はプロトコルイベントではなく検証エラー。
    /// 文字列は入力されたまま送る（空白の除去はサーバー側の責務）。
    ///
    /// # エラー
    /// - `SubmitError::NoFileSelected`
    /// - `SubmitError::MissingRepoName`: 空白のみを含む
    /// - `SubmitError::InvalidVisibility`
    pub fn validate(self) -> Result<(RequestDraft, F), SubmitError> {
        let file = self.file.ok_or(SubmitError::NoFileSelected)?;

        if self.repo_name.trim().is_empty() {
            return Err(SubmitError::MissingRepoName);
        }

        let visibility = self
            .visibility
            .parse::<Visibility>()
            .map_err(|_| SubmitError::InvalidVisibility(self.visibility.clone()))?;

        let draft = RequestDraft {
            repo_name: self.repo_name,
            branch: self.branch,
            visibility,
            commit_message: self.commit_message,
        };
        Ok((draft, file))
    }
}

impl RequestDraft {
    /// エンコード済みペイロードと組み合わせて送信要求を作る
    pub fn into_request(self, payload: EncodedPayload) -> UploadRequest {
        UploadRequest {
            repo_name: self.repo_name,
            file: payload.into_string(),
            branch: self.branch,
            visibility: self.visibility,
            commit_message: self.commit_message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(file: Option<&'static str>) -> FormSnapshot<&'static str> {
        FormSnapshot {
            repo_name: String::from("  demo-repo "),
            file,
            branch: String::from(" feature "),
            visibility: String::from("public"),
            commit_message: String::new(),
        }
    }

    #[test]
    fn test_missing_file_rejected_first() {
        let mut f = form(None);
        f.repo_name = String::new();
        assert_eq!(f.validate(), Err(SubmitError::NoFileSelected));
    }

    #[test]
    fn test_blank_repo_name_rejected() {
        let mut f = form(Some("project.zip"));
        f.repo_name = String::from("   ");
        assert_eq!(f.validate(), Err(SubmitError::MissingRepoName));
    }

    #[test]
    fn test_invalid_visibility_rejected() {
        let mut f = form(Some("project.zip"));
        f.visibility = String::from("internal");
        assert_eq!(
            f.validate(),
            Err(SubmitError::InvalidVisibility(String::from("internal")))
        );
    }

    #[test]
    fn test_valid_form_sent_as_typed() {
        let (draft, file) = form(Some("project.zip")).validate().unwrap();
        assert_eq!(file, "project.zip");
        assert_eq!(draft.repo_name, "  demo-repo ");
        assert_eq!(draft.branch, " feature ");
        assert_eq!(draft.visibility, Visibility::Public);
        assert_eq!(draft.commit_message, "");
    }
}
