//! SHIORI ヘッダー操作の共通トレイト

/// SHIORI ヘッダー操作のための共通トレイト
///
/// SHIORI のヘッダー名は送信されたまま大文字小文字を区別して扱う。
/// 同名ヘッダーが複数ある場合、単一値の取得では最後のものが優先される。
pub trait ShioriHead {
    /// プロトコルバージョンを取得 (`"3.0"` 等)
    fn version(&self) -> Option<&str>;

    /// ヘッダーリストを取得 (送信順)
    fn headers(&self) -> &[(String, String)];

    /// ヘッダーを取得 (最後の出現が優先)
    fn get_header(&self, name: &str) -> Option<&str> {
        self.headers()
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// 指定した名前のヘッダーをすべて取得 (送信順)
    fn get_headers(&self, name: &str) -> Vec<&str> {
        self.headers()
            .iter()
            .filter(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// ヘッダーが存在するか確認
    fn has_header(&self, name: &str) -> bool {
        self.headers().iter().any(|(n, _)| n == name)
    }

    /// Charset ヘッダーの値を取得
    fn charset(&self) -> Option<&str> {
        self.get_header("Charset")
    }

    /// Sender ヘッダーの値を取得
    fn sender(&self) -> Option<&str> {
        self.get_header("Sender")
    }

    /// バージョンのメジャー番号を取得
    ///
    /// `"3.0"` なら `Some(3)`
    fn major_version(&self) -> Option<u32> {
        self.version()
            .and_then(|v| v.split_once('.'))
            .and_then(|(major, _)| major.parse().ok())
    }
}
