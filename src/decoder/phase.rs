//! デコード状態の定義

/// デコード状態
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DecodePhase {
    /// スタートライン待ち
    StartLine,
    /// ヘッダー待ち (空行で終了)
    Headers,
}
