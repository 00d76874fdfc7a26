use std::fmt;

use crate::decoder::{RequestDecoder, ShioriHead};
use crate::error::Error;

/// SHIORI メソッド
///
/// 未知のメソッドは `Other` として保持されるが、ディスパッチャーは 400 を返す。
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET (応答に Value を期待する)
    Get,
    /// NOTIFY (通知のみ)
    Notify,
    /// 未知のメソッド
    Other(String),
}

impl Method {
    /// メソッド名をパース
    pub fn parse(s: &str) -> Self {
        match s {
            "GET" => Method::Get,
            "NOTIFY" => Method::Notify,
            other => Method::Other(other.to_string()),
        }
    }

    /// メソッド名を取得
    pub fn as_str(&self) -> &str {
        match self {
            Method::Get => "GET",
            Method::Notify => "NOTIFY",
            Method::Other(s) => s,
        }
    }

    /// 既知のメソッドか確認
    pub fn is_known(&self) -> bool {
        !matches!(self, Method::Other(_))
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// SHIORI リクエスト
///
/// リクエスト行が `METHOD SHIORI/VERSION` に一致しなかった場合、
/// `method` と `version` は `None` になる。パースエラーではない。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    /// メソッド (GET, NOTIFY)
    pub method: Option<Method>,
    /// プロトコルバージョン (`"3.0"` 等)
    pub version: Option<String>,
    /// 受信したリクエスト行そのもの
    pub start_line: String,
    /// ヘッダー (送信順)
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// 新しいリクエストを作成
    pub fn new(method: Method, version: &str) -> Self {
        Self {
            start_line: format!("{} SHIORI/{}", method, version),
            method: Some(method),
            version: Some(version.to_string()),
            headers: Vec::new(),
        }
    }

    /// SHIORI/3.0 の GET リクエストを作成
    pub fn get(id: &str) -> Self {
        Self::new(Method::Get, "3.0").header("ID", id)
    }

    /// SHIORI/3.0 の NOTIFY リクエストを作成
    pub fn notify(id: &str) -> Self {
        Self::new(Method::Notify, "3.0").header("ID", id)
    }

    /// 文字列からリクエストをパース
    ///
    /// 終端の空行がない場合は `Error::Incomplete` を返す。
    /// 空行以降のデータは無視する。
    pub fn parse(raw: &str) -> Result<Self, Error> {
        Self::parse_bytes(raw.as_bytes())
    }

    /// バイト列からリクエストをパース
    pub fn parse_bytes(raw: &[u8]) -> Result<Self, Error> {
        let mut decoder = RequestDecoder::unlimited();
        decoder.feed(raw)?;
        decoder.decode()?.ok_or(Error::Incomplete)
    }

    /// ヘッダーを追加 (ビルダーパターン)
    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }

    /// Reference ヘッダーを順番に追加 (ビルダーパターン)
    ///
    /// 既存の Reference の数から番号を振る
    pub fn with_references<I, S>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut index = self.references().len();
        for value in values {
            self.add_header(&format!("Reference{}", index), value.as_ref());
            index += 1;
        }
        self
    }

    /// ヘッダーを追加
    pub fn add_header(&mut self, name: &str, value: &str) {
        self.headers.push((name.to_string(), value.to_string()));
    }

    /// ID ヘッダーの値を取得 (ディスパッチキー)
    pub fn id(&self) -> Option<&str> {
        self.get_header("ID")
    }

    /// SecurityLevel ヘッダーの値を取得
    pub fn security_level(&self) -> Option<&str> {
        self.get_header("SecurityLevel")
    }

    /// Status ヘッダーの値を取得
    ///
    /// 値の解釈は行わない
    pub fn status(&self) -> Option<&str> {
        self.get_header("Status")
    }

    /// BaseID ヘッダーの値を取得
    pub fn base_id(&self) -> Option<&str> {
        self.get_header("BaseID")
    }

    /// Reference<N> ヘッダーの値を取得
    pub fn reference(&self, index: usize) -> Option<&str> {
        self.get_header(&format!("Reference{}", index))
    }

    /// Reference0 から連続する Reference ヘッダーの値を取得
    ///
    /// 最初の欠番で打ち切る。空の値は空文字列として含まれる。
    pub fn references(&self) -> Vec<&str> {
        let mut values = Vec::new();
        while let Some(value) = self.reference(values.len()) {
            values.push(value);
        }
        values
    }

    /// GET リクエストか確認
    pub fn is_get(&self) -> bool {
        self.method == Some(Method::Get)
    }

    /// NOTIFY リクエストか確認
    pub fn is_notify(&self) -> bool {
        self.method == Some(Method::Notify)
    }
}

impl ShioriHead for Request {
    fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    fn headers(&self) -> &[(String, String)] {
        &self.headers
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_get() {
        let request = Request::parse(
            "GET SHIORI/3.0\r\nCharset: UTF-8\r\nID: version\r\nSecurityLevel: local\r\nSender: SSP\r\n\r\n",
        )
        .unwrap();
        assert_eq!(request.method, Some(Method::Get));
        assert_eq!(request.version.as_deref(), Some("3.0"));
        assert_eq!(request.id(), Some("version"));
        assert_eq!(request.charset(), Some("UTF-8"));
        assert_eq!(request.security_level(), Some("local"));
        assert_eq!(request.sender(), Some("SSP"));
        assert_eq!(request.headers.len(), 4);
    }

    #[test]
    fn parse_malformed_version() {
        let request = Request::parse("GET SHIORI/123\r\n\r\n").unwrap();
        assert_eq!(request.method, None);
        assert_eq!(request.version, None);
        assert_eq!(request.start_line, "GET SHIORI/123");
    }

    #[test]
    fn parse_without_terminator() {
        assert_eq!(
            Request::parse("GET SHIORI/3.0\r\nID: version\r\n"),
            Err(Error::Incomplete)
        );
    }

    #[test]
    fn trailing_content_is_ignored() {
        let request =
            Request::parse("NOTIFY SHIORI/3.0\r\nID: OnBoot\r\n\r\nGET SHIORI/3.0\r\n").unwrap();
        assert_eq!(request.method, Some(Method::Notify));
        assert_eq!(request.headers.len(), 1);
    }

    #[test]
    fn references_are_contiguous() {
        let request = Request::parse(
            "NOTIFY SHIORI/3.0\r\nID: OnMouseMove\r\nReference0: 10\r\nReference1: 20\r\nReference3: 40\r\n\r\n",
        )
        .unwrap();
        assert_eq!(request.references(), vec!["10", "20"]);
        assert_eq!(request.reference(3), Some("40"));
        assert_eq!(request.reference(2), None);
    }

    #[test]
    fn empty_reference_is_not_absent() {
        let request =
            Request::parse("NOTIFY SHIORI/3.0\r\nID: OnInitialize\r\nReference0:\r\n\r\n").unwrap();
        assert_eq!(request.reference(0), Some(""));
        assert_eq!(request.references(), vec![""]);
    }

    #[test]
    fn references_in_any_order() {
        let request = Request::parse(
            "GET SHIORI/3.0\r\nReference1: b\r\nID: OnTest\r\nReference0: a\r\n\r\n",
        )
        .unwrap();
        assert_eq!(request.references(), vec!["a", "b"]);
    }

    #[test]
    fn builder_numbers_references() {
        let request = Request::get("OnMouseClick")
            .with_references(["100", "200"])
            .with_references(["0"]);
        assert_eq!(request.references(), vec!["100", "200", "0"]);
        assert_eq!(request.start_line, "GET SHIORI/3.0");
    }

    #[test]
    fn status_is_pass_through() {
        let request = Request::notify("OnSecondChange").header("Status", "talking,balloon(0=0)");
        assert_eq!(request.status(), Some("talking,balloon(0=0)"));
    }

    #[test]
    fn method_parse() {
        assert_eq!(Method::parse("GET"), Method::Get);
        assert_eq!(Method::parse("NOTIFY"), Method::Notify);
        assert_eq!(Method::parse("get"), Method::Other("get".to_string()));
        assert!(!Method::parse("TEACH").is_known());
        assert_eq!(Method::Notify.to_string(), "NOTIFY");
    }
}
