use crate::response::{Response, Status};

/// デフォルトのプロトコルバージョン
pub const DEFAULT_VERSION: &str = "3.0";

/// デフォルトの文字コード
pub const DEFAULT_CHARSET: &str = "UTF-8";

/// レスポンスビルダー
///
/// すべてのレスポンスに `Charset` と `Sender` を付与する。
/// ステータスは Value の有無で決まる。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseBuilder {
    version: String,
    charset: String,
    sender: String,
}

impl ResponseBuilder {
    /// ゴースト名を指定してビルダーを作成 (SHIORI/3.0, UTF-8)
    pub fn new(sender: &str) -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            charset: DEFAULT_CHARSET.to_string(),
            sender: sender.to_string(),
        }
    }

    /// プロトコルバージョンを設定 (ビルダーパターン)
    pub fn version(mut self, version: &str) -> Self {
        self.version = version.to_string();
        self
    }

    /// 文字コードを設定 (ビルダーパターン)
    pub fn charset(mut self, charset: &str) -> Self {
        self.charset = charset.to_string();
        self
    }

    /// Sender (ゴースト名) を取得
    pub fn sender(&self) -> &str {
        &self.sender
    }

    fn base(&self, status: Status) -> Response {
        Response::with_version(&self.version, status)
            .header("Charset", &self.charset)
            .header("Sender", &self.sender)
    }

    /// Value から組み立てる
    ///
    /// 空でない Value があれば 200、なければ 204
    pub fn from_value(&self, value: Option<String>) -> Response {
        match value {
            Some(value) if !value.is_empty() => self.ok(value),
            _ => self.no_content(),
        }
    }

    /// 200 OK
    pub fn ok(&self, value: String) -> Response {
        let mut response = self.base(Status::Ok);
        response.value = Some(value);
        response
    }

    /// 204 No Content
    pub fn no_content(&self) -> Response {
        self.base(Status::NoContent)
    }

    /// 400 Bad Request
    pub fn bad_request(&self) -> Response {
        self.base(Status::BadRequest)
    }

    /// 500 Internal Server Error
    pub fn internal_server_error(&self) -> Response {
        self.base(Status::InternalServerError)
    }
}
