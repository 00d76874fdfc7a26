//! SHIORI サーバー
//!
//! TCP で受けたリクエストを `shiori::Dispatcher` に渡し、レスポンスを書き戻す。
//! 1 接続で複数のリクエストを順番に処理する。
//!
//! ## 使い方
//!
//! ```ignore
//! use tokio_shiori::{Server, share};
//! use shiori::{Dispatcher, DispatcherConfig, HandlerRegistry, MemoryStore};
//!
//! let registry = HandlerRegistry::new()
//!     .with("name", |_| Ok(Some("emily".to_string())));
//! let dispatcher = Dispatcher::new(DispatcherConfig::new("emily"), registry, MemoryStore::new());
//!
//! let server = Server::bind("127.0.0.1:9801").await?;
//! server.serve(share(dispatcher)).await?;
//! ```

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use shiori::{Dispatcher, HandlerRegistry, MemoryStore, Registry, RequestDecoder, StateStore};
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader, BufWriter};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};

/// サーバー用のトレースターゲット
const SERVER_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::server");

/// 接続間で共有するディスパッチャー
///
/// ロックを取っている間だけ 1 つの交換が進む
pub type SharedDispatcher<R = HandlerRegistry, S = MemoryStore> = Arc<Mutex<Dispatcher<R, S>>>;

/// ディスパッチャーを共有用に包む
pub fn share<R: Registry, S: StateStore>(dispatcher: Dispatcher<R, S>) -> SharedDispatcher<R, S> {
    Arc::new(Mutex::new(dispatcher))
}

/// SHIORI サーバー
pub struct Server {
    listener: TcpListener,
    idle_timeout: Duration,
    write_timeout: Duration,
    read_buffer_size: usize,
    write_buffer_size: usize,
}

impl Server {
    /// 指定アドレスにバインド
    pub async fn bind(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            idle_timeout: Duration::from_secs(60),
            write_timeout: Duration::from_secs(30),
            read_buffer_size: 8192,
            write_buffer_size: 65536,
        })
    }

    /// 無通信タイムアウトを設定
    pub fn idle_timeout(mut self, timeout: Duration) -> Self {
        self.idle_timeout = timeout;
        self
    }

    /// 書き込みタイムアウトを設定
    ///
    /// 相手が読み取らずにレスポンスを書き切れない場合、この時間で接続を切る
    pub fn write_timeout(mut self, timeout: Duration) -> Self {
        self.write_timeout = timeout;
        self
    }

    /// 読み取りバッファサイズを設定
    pub fn read_buffer_size(mut self, size: usize) -> Self {
        self.read_buffer_size = size;
        self
    }

    /// 書き込みバッファサイズを設定
    pub fn write_buffer_size(mut self, size: usize) -> Self {
        self.write_buffer_size = size;
        self
    }

    /// ローカルアドレスを取得
    pub fn local_addr(&self) -> Result<SocketAddr> {
        Ok(self.listener.local_addr()?)
    }

    fn connection_config(&self) -> Arc<ConnectionConfig> {
        Arc::new(ConnectionConfig {
            idle_timeout: self.idle_timeout,
            write_timeout: self.write_timeout,
            read_buffer_size: self.read_buffer_size,
            write_buffer_size: self.write_buffer_size,
        })
    }

    /// サーバーを起動
    pub async fn serve<R, S>(self, dispatcher: SharedDispatcher<R, S>) -> Result<()>
    where
        R: Registry + Send + 'static,
        S: StateStore + Send + 'static,
    {
        let config = self.connection_config();
        info!(target: SERVER_TARGET, addr = %self.local_addr()?, "listening");

        loop {
            let (stream, peer_addr) = self.listener.accept().await?;
            let config = config.clone();
            let dispatcher = dispatcher.clone();

            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer_addr, config, dispatcher).await {
                    warn!(target: SERVER_TARGET, peer = %peer_addr, error = %e, "connection error");
                }
            });
        }
    }

    /// 単一の接続を処理 (テスト用)
    pub async fn handle_one<R, S>(self, dispatcher: SharedDispatcher<R, S>) -> Result<()>
    where
        R: Registry + Send + 'static,
        S: StateStore + Send + 'static,
    {
        let (stream, peer_addr) = self.listener.accept().await?;
        let config = self.connection_config();
        handle_connection(stream, peer_addr, config, dispatcher).await
    }
}

struct ConnectionConfig {
    idle_timeout: Duration,
    write_timeout: Duration,
    read_buffer_size: usize,
    write_buffer_size: usize,
}

/// SHIORI 接続を処理
async fn handle_connection<R, S>(
    stream: TcpStream,
    peer_addr: SocketAddr,
    config: Arc<ConnectionConfig>,
    dispatcher: SharedDispatcher<R, S>,
) -> Result<()>
where
    R: Registry + Send + 'static,
    S: StateStore + Send + 'static,
{
    debug!(target: SERVER_TARGET, peer = %peer_addr, "connection accepted");

    let (reader, writer) = stream.into_split();
    let mut reader = BufReader::with_capacity(config.read_buffer_size, reader);
    let mut writer = BufWriter::with_capacity(config.write_buffer_size, writer);

    let limits = dispatcher.lock().await.config().limits.clone();
    let mut decoder = RequestDecoder::with_limits(limits);
    let mut buf = vec![0u8; config.read_buffer_size];

    loop {
        let read_result = tokio::time::timeout(config.idle_timeout, reader.read(&mut buf)).await;

        let n = match read_result {
            Ok(Ok(n)) => n,
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => {
                debug!(target: SERVER_TARGET, peer = %peer_addr, "idle timeout");
                return Ok(());
            }
        };

        if n == 0 {
            debug!(target: SERVER_TARGET, peer = %peer_addr, "connection closed by peer");
            return Ok(());
        }

        if let Err(e) = decoder.feed(&buf[..n]) {
            return reject(&mut writer, &dispatcher, &config, peer_addr, e).await;
        }

        loop {
            let request = match decoder.decode() {
                Ok(Some(request)) => request,
                Ok(None) => break,
                Err(e) => return reject(&mut writer, &dispatcher, &config, peer_addr, e).await,
            };

            // 書き込み中は他の接続の交換を止めない
            let bytes = dispatcher.lock().await.dispatch(&request).encode();
            write_response(&mut writer, &bytes, config.write_timeout).await?;
            dispatcher.lock().await.mark_sent();
        }
    }
}

/// デコードできないデータに 400 を返して接続を閉じる
async fn reject<W, R, S>(
    writer: &mut W,
    dispatcher: &SharedDispatcher<R, S>,
    config: &ConnectionConfig,
    peer_addr: SocketAddr,
    error: shiori::Error,
) -> Result<()>
where
    W: AsyncWrite + Unpin,
    R: Registry,
    S: StateStore,
{
    warn!(target: SERVER_TARGET, peer = %peer_addr, error = %error, "undecodable request");
    let response = dispatcher.lock().await.config().response_builder().bad_request();
    write_response(writer, &response.encode(), config.write_timeout).await
}

/// レスポンスを書き込んでフラッシュする
///
/// `timeout` 以内に終わらなければ `Error::Timeout`
async fn write_response<W>(writer: &mut W, bytes: &[u8], timeout: Duration) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    tokio::time::timeout(timeout, async {
        writer.write_all(bytes).await?;
        writer.flush().await
    })
    .await??;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use shiori::DispatcherConfig;

    #[tokio::test]
    async fn test_server_bind() {
        let server = Server::bind("127.0.0.1:0").await.unwrap();
        let addr = server.local_addr().unwrap();
        assert!(addr.port() > 0);
    }

    #[tokio::test]
    async fn test_share() {
        let dispatcher = share(Dispatcher::new(
            DispatcherConfig::new("emily"),
            HandlerRegistry::new(),
            MemoryStore::new(),
        ));
        assert_eq!(dispatcher.lock().await.config().sender, "emily");
    }
}
