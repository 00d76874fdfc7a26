//! SHIORI クライアント (ホスト側)
//!
//! 1 本の TCP 接続でリクエストを順番に送り、レスポンスを受け取る。
//!
//! ## 使い方
//!
//! ```ignore
//! use shiori::Request;
//! use tokio_shiori::Client;
//!
//! let mut client = Client::connect("127.0.0.1:9801").await?;
//! let response = client
//!     .request(&Request::get("version").header("Sender", "SSP"))
//!     .await?;
//! ```

use std::time::Duration;

use shiori::{DecoderLimits, Request, Response, ResponseDecoder};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;

use crate::error::{Error, Result};

/// SHIORI クライアント
pub struct Client {
    stream: TcpStream,
    decoder: ResponseDecoder,
    read_timeout: Duration,
    read_buffer_size: usize,
}

impl Client {
    /// 接続を確立 (接続タイムアウト 30 秒)
    pub async fn connect(addr: &str) -> Result<Self> {
        Self::connect_timeout(addr, Duration::from_secs(30)).await
    }

    /// 接続タイムアウトを指定して接続を確立
    pub async fn connect_timeout(addr: &str, timeout: Duration) -> Result<Self> {
        let stream = tokio::time::timeout(timeout, TcpStream::connect(addr)).await??;
        Ok(Self {
            stream,
            decoder: ResponseDecoder::new(),
            read_timeout: Duration::from_secs(60),
            read_buffer_size: 8192,
        })
    }

    /// 読み取りタイムアウトを設定
    pub fn read_timeout(mut self, timeout: Duration) -> Self {
        self.read_timeout = timeout;
        self
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// レスポンスデコーダーの制限を設定
    pub fn limits(mut self, limits: DecoderLimits) -> Self {
        self.decoder = ResponseDecoder::with_limits(limits);
        self
    }

    /// リクエストを送信してレスポンスを受け取る
    pub async fn request(&mut self, request: &Request) -> Result<Response> {
        self.send_raw(&request.encode()).await
    }

    /// エンコード済みのリクエストを送信してレスポンスを受け取る
    pub async fn send_raw(&mut self, bytes: &[u8]) -> Result<Response> {
        self.stream.write_all(bytes).await?;
        self.receive().await
    }

    async fn receive(&mut self) -> Result<Response> {
        // 前のレスポンスの後ろに残っていた分を先に見る
        if let Some(response) = self.decoder.decode()? {
            return Ok(response);
        }

        let mut buf = vec![0u8; self.read_buffer_size];
        loop {
            let n = tokio::time::timeout(self.read_timeout, self.stream.read(&mut buf)).await??;
            if n == 0 {
                return Err(Error::ConnectionClosed);
            }

            self.decoder.feed(&buf[..n])?;

            if let Some(response) = self.decoder.decode()? {
                return Ok(response);
            }
        }
    }
}
