use std::fmt;

use crate::decoder::{ResponseDecoder, ShioriHead};
use crate::error::Error;

/// Value ヘッダー名
pub(crate) const VALUE_HEADER: &str = "Value";

/// SHIORI ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// 200 OK (Value あり)
    Ok,
    /// 204 No Content (Value なし)
    NoContent,
    /// 400 Bad Request (リクエスト行が不正)
    BadRequest,
    /// 500 Internal Server Error (ハンドラーの失敗)
    InternalServerError,
}

impl Status {
    /// ステータスコードを取得
    pub fn code(self) -> u16 {
        match self {
            Status::Ok => 200,
            Status::NoContent => 204,
            Status::BadRequest => 400,
            Status::InternalServerError => 500,
        }
    }

    /// ステータスフレーズを取得
    pub fn reason_phrase(self) -> &'static str {
        match self {
            Status::Ok => "OK",
            Status::NoContent => "No Content",
            Status::BadRequest => "Bad Request",
            Status::InternalServerError => "Internal Server Error",
        }
    }

    /// ステータスコードから変換
    pub fn from_code(code: u16) -> Option<Self> {
        match code {
            200 => Some(Status::Ok),
            204 => Some(Status::NoContent),
            400 => Some(Status::BadRequest),
            500 => Some(Status::InternalServerError),
            _ => None,
        }
    }

    /// ステータスコードが成功 (2xx) か確認
    pub fn is_success(self) -> bool {
        (200..300).contains(&self.code())
    }

    /// ステータスコードがクライアントエラー (4xx) か確認
    pub fn is_client_error(self) -> bool {
        (400..500).contains(&self.code())
    }

    /// ステータスコードがサーバーエラー (5xx) か確認
    pub fn is_server_error(self) -> bool {
        (500..600).contains(&self.code())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code(), self.reason_phrase())
    }
}

/// SHIORI レスポンス
///
/// `value` は エンコード時に最後のヘッダー `Value:` として出力される。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// プロトコルバージョン (`"3.0"` 等)
    pub version: String,
    /// ステータス
    pub status: Status,
    /// ヘッダー (Value を除く)
    pub headers: Vec<(String, String)>,
    /// Value ヘッダーの値
    pub value: Option<String>,
}

impl Response {
    /// 新しいレスポンスを作成 (SHIORI/3.0)
    pub fn new(status: Status) -> Self {
        Self::with_version("3.0", status)
    }

    /// カスタムバージョンでレスポンスを作成
    pub fn with_version(version: &str, status: Status) -> Self {
        Self {
            version: version.to_string(),
            status,
            headers: Vec::new(),
            value: None,
        }
    }

    /// 文字列からレスポンスをパース
    ///
    /// 終端の空行がない場合は `Error::Incomplete` を返す
    pub fn parse(raw: &str) -> Result<Self, Error> {
        Self::parse_bytes(raw.as_bytes())
    }

    /// バイト列からレスポンスをパース
    pub fn parse_bytes(raw: &[u8]) -> Result<Self, Error> {
        let mut decoder = ResponseDecoder::unlimited();
        decoder.feed(raw)?;
        decoder.decode()?.ok_or(Error::Incomplete)
    }

    /// ヘッダーを追加 (ビルダーパターン)
    ///
    /// `Value` は常に最後に出力するため、ヘッダーには入れず `value` に設定する
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.add_header(name, value);
        self
    }

    /// Value を設定 (ビルダーパターン)
    pub fn value(mut self, value: &str) -> Self {
        self.value = Some(value.to_string());
        self
    }

    /// ヘッダーを追加
    ///
    /// `Value` は `value` に設定する
    pub fn add_header(&mut self, name: &str, value: &str) {
        if name == VALUE_HEADER {
            self.value = Some(value.to_string());
        } else {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    /// Value を取得
    pub fn get_value(&self) -> Option<&str> {
        self.value.as_deref()
    }

    /// ステータスコードを取得
    pub fn status_code(&self) -> u16 {
        self.status.code()
    }

    /// ステータスコードが成功 (2xx) か確認
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    /// ステータスコードがクライアントエラー (4xx) か確認
    pub fn is_client_error(&self) -> bool {
        self.status.is_client_error()
    }

    /// ステータスコードがサーバーエラー (5xx) か確認
    pub fn is_server_error(&self) -> bool {
        self.status.is_server_error()
    }
}

impl ShioriHead for Response {
    fn version(&self) -> Option<&str> {
        Some(&self.version)
    }

    fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}
