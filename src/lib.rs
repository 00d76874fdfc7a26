//! # shiori
//!
//! SHIORI/3.x テキストプロトコルライブラリ (Sans I/O)
//!
//! ## 特徴
//!
//! - **Sans I/O**: I/O を完全に分離した設計。転送路 (パイプ、ソケット等) はホスト側の責務
//! - **寛容なパース**: 不正なリクエスト行はエラーではなく `method: None` として表現し、
//!   ディスパッチャーが 400 Bad Request に変換する
//! - **依存性注入**: ハンドラーレジストリと状態ストアはコンストラクタで渡す
//!
//! ## 使い方
//!
//! ### ゴースト (リクエスト受信、レスポンス送信)
//!
//! ```rust
//! use shiori::{Dispatcher, DispatcherConfig, HandlerRegistry, MemoryStore, Status};
//!
//! let registry = HandlerRegistry::new()
//!     .with("OnBoot", |_| Ok(Some("\\0\\s[0]こんにちは。\\e".to_string())));
//! let mut dispatcher =
//!     Dispatcher::new(DispatcherConfig::new("emily"), registry, MemoryStore::new());
//!
//! let bytes = dispatcher
//!     .respond(b"GET SHIORI/3.0\r\nCharset: UTF-8\r\nID: OnBoot\r\n\r\n")
//!     .unwrap();
//! // bytes を送信...
//! # let response = shiori::Response::parse_bytes(&bytes).unwrap();
//! # assert_eq!(response.status, Status::Ok);
//! ```
//!
//! ### ホスト (リクエスト送信、レスポンス受信)
//!
//! ```rust
//! use shiori::{Request, ResponseDecoder};
//!
//! // リクエストを作成してエンコード
//! let request = Request::get("OnMouseDoubleClick")
//!     .header("Charset", "UTF-8")
//!     .header("Sender", "SSP")
//!     .with_references(["0", "0", "0", "0", "Head"]);
//! let bytes = request.encode();
//! // bytes を送信...
//!
//! // レスポンスをデコード
//! let mut decoder = ResponseDecoder::new();
//! // 受信データを feed...
//! // decoder.feed(&received_data)?;
//! // if let Some(response) = decoder.decode()? { ... }
//! ```

mod builder;
mod decoder;
mod dispatch;
mod encoder;
mod error;
mod limits;
mod request;
mod response;
mod store;

pub use builder::{DEFAULT_CHARSET, DEFAULT_VERSION, ResponseBuilder};
pub use decoder::{RequestDecoder, ResponseDecoder, ShioriHead};
pub use dispatch::{
    ARGUMENT_SEPARATOR, Dispatcher, DispatcherConfig, Emission, ExchangePhase, Handler,
    HandlerRegistry, HandlerResult, Registry, TRANSLATE_ID, Translator, join_arguments,
};
pub use encoder::{encode_request, encode_response};
pub use error::{Error, HandlerError};
pub use limits::DecoderLimits;
pub use request::{Method, Request};
pub use response::{Response, Status};
pub use store::{MemoryStore, StateStore};
