//! tokio-shiori エラー型

/// tokio-shiori エラー
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O エラー
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// SHIORI パースエラー
    #[error("SHIORI error: {0}")]
    Shiori(#[from] shiori::Error),
    /// タイムアウト
    #[error("timeout")]
    Timeout,
    /// 接続が閉じられた
    #[error("connection closed")]
    ConnectionClosed,
}

impl From<tokio::time::error::Elapsed> for Error {
    fn from(_: tokio::time::error::Elapsed) -> Self {
        Error::Timeout
    }
}

/// Result 型エイリアス
pub type Result<T> = std::result::Result<T, Error>;
