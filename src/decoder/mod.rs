//! SHIORI デコーダーモジュール
//!
//! Sans I/O 設計に基づくストリーミングデコーダーを提供。
//!
//! ## 使い方
//!
//! ```rust
//! use shiori::{Method, RequestDecoder};
//!
//! let mut decoder = RequestDecoder::new();
//!
//! // データを投入 (分割して届いてもよい)
//! decoder.feed(b"GET SHIORI/3.0\r\nID: version\r\n").unwrap();
//! assert!(decoder.decode().unwrap().is_none());
//!
//! decoder.feed(b"\r\n").unwrap();
//! let request = decoder.decode().unwrap().unwrap();
//! assert_eq!(request.method, Some(Method::Get));
//! assert_eq!(request.id(), Some("version"));
//! ```

mod head;
mod line;
mod phase;
mod request;
mod response;

// 公開 API
pub use head::ShioriHead;
pub use request::RequestDecoder;
pub use response::ResponseDecoder;
