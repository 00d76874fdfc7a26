//! tokio_shiori - Tokio integration for shiori
//!
//! tokio を使用した非同期 SHIORI/3.x サーバー/クライアントライブラリ。
//!
//! ## Features
//!
//! - `client` - ホスト側のクライアント機能 (デフォルト有効)
//! - `server` - ゴースト側のサーバー機能 (デフォルト有効)
//! - `full` - すべての機能を有効化
//!
//! ## 特徴
//!
//! - **shiori ベース**: Sans I/O ライブラリをベースにした設計
//! - **非同期 I/O**: tokio による完全非同期対応
//! - **持続接続**: 1 本の接続で複数のリクエストを順番に処理
//!
//! ## サーバー
//!
//! ```ignore
//! use shiori::{Dispatcher, DispatcherConfig, HandlerRegistry, MemoryStore};
//! use tokio_shiori::{Server, share};
//!
//! let registry = HandlerRegistry::new()
//!     .with("OnBoot", |_| Ok(Some("\\0\\s[0]こんにちは。\\e".to_string())));
//! let dispatcher = Dispatcher::new(DispatcherConfig::new("emily"), registry, MemoryStore::new());
//!
//! let server = Server::bind("127.0.0.1:9801").await?;
//! server.serve(share(dispatcher)).await?;
//! ```
//!
//! ## クライアント
//!
//! ```ignore
//! use shiori::Request;
//! use tokio_shiori::Client;
//!
//! let mut client = Client::connect("127.0.0.1:9801").await?;
//! let response = client.request(&Request::get("OnBoot")).await?;
//! ```

#[cfg(feature = "client")]
pub mod client;
pub mod error;
#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "client")]
pub use client::Client;
pub use error::{Error, Result};
#[cfg(feature = "server")]
pub use server::{Server, SharedDispatcher, share};

// shiori の型を re-export
pub use shiori::{Request, Response};
