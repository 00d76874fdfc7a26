//! ID によるディスパッチ
//!
//! パース済みのリクエストを `ID` ヘッダーでハンドラーに振り分け、
//! 結果からレスポンスを組み立てる。
//!
//! | 条件 | ステータス |
//! |---|---|
//! | リクエスト行が不正 / 未知のメソッド / 非対応バージョン / ID なし | 400 |
//! | ハンドラーが空でない Value を返した | 200 |
//! | ハンドラーが `None` か空文字列を返した、未登録の ID | 204 |
//! | ハンドラーが `Err` を返した | 500 |
//!
//! ## 使い方
//!
//! ```rust
//! use shiori::{Dispatcher, DispatcherConfig, HandlerRegistry, MemoryStore};
//!
//! let registry = HandlerRegistry::new()
//!     .with("version", |_| Ok(Some("pasta-0.07.01/Duktape10000".to_string())));
//! let mut dispatcher =
//!     Dispatcher::new(DispatcherConfig::new("pasta"), registry, MemoryStore::new());
//!
//! let response = dispatcher
//!     .respond_str("GET SHIORI/3.0\r\nCharset: UTF-8\r\nID: version\r\nSecurityLevel: local\r\nSender: SSP\r\n\r\n")
//!     .unwrap();
//! assert_eq!(
//!     response,
//!     "SHIORI/3.0 200 OK\r\nCharset: UTF-8\r\nSender: pasta\r\nValue: pasta-0.07.01/Duktape10000\r\n\r\n"
//! );
//! ```

mod config;
mod phase;
mod registry;
mod translate;

use tracing::{debug, error, trace, warn};

use crate::builder::ResponseBuilder;
use crate::decoder::{RequestDecoder, ShioriHead};
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;
use crate::store::{MemoryStore, StateStore};

pub use config::DispatcherConfig;
pub use phase::ExchangePhase;
pub use registry::{Handler, HandlerRegistry, HandlerResult, Registry};
pub use translate::{ARGUMENT_SEPARATOR, Emission, TRANSLATE_ID, Translator, join_arguments};

use translate::EmissionLog;

/// ディスパッチ用のトレースターゲット
pub(crate) const DISPATCH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::dispatch");

/// SHIORI ディスパッチャー
///
/// レジストリと状態ストアはコンストラクタで受け取る。
/// メソッドは `&mut self` を取るため、同時に処理される交換は常に 1 つ。
pub struct Dispatcher<R: Registry = HandlerRegistry, S: StateStore = MemoryStore> {
    config: DispatcherConfig,
    builder: ResponseBuilder,
    registry: R,
    store: S,
    translator: Option<Box<dyn Translator>>,
    emissions: EmissionLog,
    phase: ExchangePhase,
}

impl<R: Registry, S: StateStore> Dispatcher<R, S> {
    /// 新しいディスパッチャーを作成
    pub fn new(config: DispatcherConfig, registry: R, store: S) -> Self {
        Self {
            builder: config.response_builder(),
            emissions: EmissionLog::new(&config.emission_key_prefix),
            config,
            registry,
            store,
            translator: None,
            phase: ExchangePhase::AwaitingRequest,
        }
    }

    /// トランスレーターを設定 (ビルダーパターン)
    pub fn with_translator<T: Translator + 'static>(mut self, translator: T) -> Self {
        self.translator = Some(Box::new(translator));
        self
    }

    /// 設定を取得
    pub fn config(&self) -> &DispatcherConfig {
        &self.config
    }

    /// レジストリを取得
    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// レジストリを可変で取得
    pub fn registry_mut(&mut self) -> &mut R {
        &mut self.registry
    }

    /// 状態ストアを取得
    pub fn store(&self) -> &S {
        &self.store
    }

    /// 状態ストアを可変で取得
    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    /// 現在の交換の状態を取得
    pub fn phase(&self) -> ExchangePhase {
        self.phase
    }

    /// セッション開始
    pub fn load(&mut self) -> Result<(), Error> {
        debug!(target: DISPATCH_TARGET, sender = %self.config.sender, "loading");
        self.store.load()
    }

    /// セッション終了
    pub fn unload(&mut self) -> Result<(), Error> {
        debug!(target: DISPATCH_TARGET, sender = %self.config.sender, "unloading");
        self.store.unload()
    }

    /// レスポンスを送信したことを記録する
    ///
    /// トランスポートが書き込みを終えた後に呼ぶ
    pub fn mark_sent(&mut self) {
        if self.phase == ExchangePhase::ResponseReady {
            self.transition(ExchangePhase::Sent);
        }
    }

    /// 生のリクエストを処理してエンコード済みのレスポンスを返す
    ///
    /// 終端の空行がない場合や制限超過の場合はエラー
    pub fn respond(&mut self, raw: &[u8]) -> Result<Vec<u8>, Error> {
        let request = self.decode(raw)?;
        Ok(self.dispatch(&request).encode())
    }

    /// 文字列版の `respond()`
    pub fn respond_str(&mut self, raw: &str) -> Result<String, Error> {
        let request = self.decode(raw.as_bytes())?;
        Ok(self.dispatch(&request).to_wire_string())
    }

    fn decode(&self, raw: &[u8]) -> Result<Request, Error> {
        let mut decoder = RequestDecoder::with_limits(self.config.limits.clone());
        decoder.feed(raw)?;
        decoder.decode()?.ok_or(Error::Incomplete)
    }

    /// パース済みのリクエストを処理してレスポンスを返す
    pub fn dispatch(&mut self, request: &Request) -> Response {
        self.phase = ExchangePhase::AwaitingRequest;
        self.transition(ExchangePhase::Parsed);

        let Some(method) = request.method.as_ref() else {
            warn!(
                target: DISPATCH_TARGET,
                start_line = %request.start_line,
                "malformed request line"
            );
            return self.ready(self.builder.bad_request());
        };

        if !method.is_known() {
            warn!(target: DISPATCH_TARGET, method = %method, "unknown method");
            return self.ready(self.builder.bad_request());
        }

        let supported = request
            .major_version()
            .is_some_and(|major| self.config.supports(major));
        if !supported {
            warn!(
                target: DISPATCH_TARGET,
                version = request.version.as_deref().unwrap_or(""),
                "unsupported protocol version"
            );
            return self.ready(self.builder.bad_request());
        }

        let Some(id) = request.id() else {
            warn!(target: DISPATCH_TARGET, method = %method, "request without ID");
            return self.ready(self.builder.bad_request());
        };

        self.transition(ExchangePhase::Dispatched);
        debug!(target: DISPATCH_TARGET, method = %method, id, "dispatching request");

        let result = if id == TRANSLATE_ID {
            self.translate(request)
        } else {
            self.call_handler(id, request)
        };

        let response = match result {
            Ok(value) => {
                if let Some(value) = value.as_deref() {
                    self.record_emission(id, request, value);
                }
                self.builder.from_value(value)
            }
            Err(e) => {
                error!(target: DISPATCH_TARGET, id, error = %e, "handler failed");
                self.builder.internal_server_error()
            }
        };
        self.ready(response)
    }

    fn call_handler(&self, id: &str, request: &Request) -> HandlerResult {
        match self.registry.resolve(id) {
            Some(handler) => handler.handle(request),
            None => {
                debug!(target: DISPATCH_TARGET, id, "no handler registered");
                Ok(None)
            }
        }
    }

    fn translate(&self, request: &Request) -> HandlerResult {
        if let Some(translator) = &self.translator {
            if let Some(origin) = self.emissions.correlate(&self.store, request) {
                debug!(
                    target: DISPATCH_TARGET,
                    origin = %origin.event,
                    "translating previous value"
                );
                let text = request.reference(0).unwrap_or_default();
                return translator.translate(text, &origin, request);
            }
            debug!(target: DISPATCH_TARGET, "no matching value to translate");
        }
        self.call_handler(TRANSLATE_ID, request)
    }

    fn record_emission(&mut self, id: &str, request: &Request, value: &str) {
        if !self.config.record_emissions || !request.is_get() || id == TRANSLATE_ID {
            return;
        }
        if value.is_empty() {
            return;
        }
        let emission = Emission::from_request(id, request, value);
        self.emissions.record(&mut self.store, &emission);
    }

    fn ready(&mut self, response: Response) -> Response {
        self.transition(ExchangePhase::ResponseReady);
        debug!(
            target: DISPATCH_TARGET,
            status = response.status.code(),
            "response ready"
        );
        response
    }

    fn transition(&mut self, next: ExchangePhase) {
        trace!(target: DISPATCH_TARGET, from = %self.phase, to = %next, "exchange phase");
        debug_assert!(self.phase.can_transition_to(next));
        self.phase = next;
    }
}
