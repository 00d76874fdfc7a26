use thiserror::Error;

/// SHIORI パースエラー
///
/// リクエスト行の不一致や未知の ID はエラーではなく、
/// ステータスコード (400 / 204) で表現される。
/// ここに含まれるのはワイヤーフォーマットとして読めない場合のみ。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// 終端の空行 (CRLF CRLF) がない
    #[error("incomplete message: missing terminating blank line")]
    Incomplete,
    /// ステータス行が `SHIORI/<version> <code> <reason>` に一致しない
    #[error("invalid status line: {0}")]
    InvalidStatusLine(String),
    /// バッファサイズ超過
    #[error("buffer overflow: {size} > {limit}")]
    BufferOverflow { size: usize, limit: usize },
    /// ヘッダー数超過
    #[error("too many headers: {count} > {limit}")]
    TooManyHeaders { count: usize, limit: usize },
    /// ヘッダー行が長すぎる
    #[error("header line too long: {size} > {limit}")]
    HeaderLineTooLong { size: usize, limit: usize },
    /// 状態ストアの load / unload 失敗
    #[error("state store error: {0}")]
    Store(String),
}

/// ハンドラー実行時のエラー
///
/// ディスパッチャーは 500 Internal Server Error に変換する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("handler for {id} failed: {message}")]
pub struct HandlerError {
    /// 失敗したイベント ID
    pub id: String,
    /// エラーメッセージ
    pub message: String,
}

impl HandlerError {
    /// 新しいハンドラーエラーを作成
    pub fn new(id: &str, message: impl Into<String>) -> Self {
        Self {
            id: id.to_string(),
            message: message.into(),
        }
    }
}
