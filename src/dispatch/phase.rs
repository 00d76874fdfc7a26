//! 交換 (リクエスト 1 つとレスポンス 1 つ) の状態

use std::fmt;

/// 交換の状態
///
/// ```text
/// AwaitingRequest -> Parsed -> Dispatched -> ResponseReady -> Sent
///                      |                          ^
///                      +--------- (400) ----------+
/// ```
///
/// `Sent` から `AwaitingRequest` に戻ると次の交換が始まる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExchangePhase {
    /// リクエスト待ち
    AwaitingRequest,
    /// パース済み
    Parsed,
    /// ハンドラーに渡した
    Dispatched,
    /// レスポンス完成
    ResponseReady,
    /// 送信済み
    Sent,
}

impl ExchangePhase {
    /// 次の状態に遷移できるか確認
    pub fn can_transition_to(self, next: ExchangePhase) -> bool {
        use ExchangePhase::*;
        matches!(
            (self, next),
            (AwaitingRequest, Parsed)
                | (Parsed, Dispatched)
                | (Parsed, ResponseReady)
                | (Dispatched, ResponseReady)
                | (ResponseReady, Sent)
                | (Sent, AwaitingRequest)
        )
    }

    /// 状態名を取得
    pub fn as_str(self) -> &'static str {
        match self {
            ExchangePhase::AwaitingRequest => "awaiting_request",
            ExchangePhase::Parsed => "parsed",
            ExchangePhase::Dispatched => "dispatched",
            ExchangePhase::ResponseReady => "response_ready",
            ExchangePhase::Sent => "sent",
        }
    }
}

impl fmt::Display for ExchangePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
