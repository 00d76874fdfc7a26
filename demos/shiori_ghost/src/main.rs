//! TCP で SHIORI/3.0 を話す小さなゴーストの例 (tokio)
//!
//! 使い方:
//!   # ポート 9801 で起動
//!   cargo run -p shiori_ghost
//!
//!   # ゴースト名とポートを指定
//!   cargo run -p shiori_ghost -- --sender emily --port 9900
//!
//!   # ログを詳しく出す
//!   RUST_LOG=debug cargo run -p shiori_ghost

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use shiori::{
    Dispatcher, DispatcherConfig, Emission, HandlerRegistry, HandlerResult, MemoryStore, Request,
    Translator,
};
use tokio_shiori::{Server, share};
use tracing::info;

/// ひとりごとの間隔 (秒)
const TALK_INTERVAL: u64 = 300;

struct GhostOptions {
    port: u16,
    sender: String,
}

/// Value をそのまま返すトランスレーター
struct Echo;

impl Translator for Echo {
    fn translate(&self, text: &str, origin: &Emission, _request: &Request) -> HandlerResult {
        tracing::debug!(event = %origin.event, arguments = origin.argument_list().len(), "translate");
        Ok(Some(text.to_string()))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let options = parse_args()?;

    let mut dispatcher = Dispatcher::new(
        DispatcherConfig::new(&options.sender),
        registry(&options.sender),
        MemoryStore::new(),
    )
    .with_translator(Echo);
    dispatcher.load()?;

    let addr = format!("127.0.0.1:{}", options.port);
    let server = Server::bind(&addr).await?;
    info!(sender = %options.sender, "SHIORI ghost listening on {}", addr);

    server.serve(share(dispatcher)).await?;
    Ok(())
}

fn registry(sender: &str) -> HandlerRegistry {
    let name = sender.to_string();
    let seconds = Arc::new(AtomicU64::new(0));

    HandlerRegistry::new()
        .with("version", |_| Ok(Some(env!("CARGO_PKG_VERSION").to_string())))
        .with("name", move |_| Ok(Some(name.clone())))
        .with("craftman", |_| Ok(Some("shiori".to_string())))
        .with("OnBoot", |r: &Request| {
            let shell = r.reference(0).unwrap_or("master");
            Ok(Some(format!("\\0\\s[0]{}で起動しました。\\e", shell)))
        })
        .with("OnClose", |_| Ok(Some("\\0\\s[0]またね。\\-\\e".to_string())))
        .with("OnSecondChange", move |r: &Request| {
            // Reference3 が 1 のときだけ話しかけてよい
            let elapsed = seconds.fetch_add(1, Ordering::Relaxed) + 1;
            if r.reference(3) != Some("1") || elapsed % TALK_INTERVAL != 0 {
                return Ok(None);
            }
            Ok(Some(format!(
                "\\0\\s[5]起動してから {} 分たちました。\\e",
                elapsed / 60
            )))
        })
}

fn parse_args() -> Result<GhostOptions, Box<dyn std::error::Error>> {
    let mut args = noargs::raw_args();
    args.metadata_mut().app_name = "shiori_ghost";

    // --help フラグ
    noargs::HELP_FLAG.take_help(&mut args);

    // --version フラグ
    let version_flag: bool = noargs::flag("version")
        .short('V')
        .doc("Show version")
        .take(&mut args)
        .is_present();
    if version_flag {
        println!("{}", env!("CARGO_PKG_VERSION"));
        std::process::exit(0);
    }

    // --port オプション
    let port: u16 = noargs::opt("port")
        .short('p')
        .doc("Port to listen on")
        .default("9801")
        .take(&mut args)
        .then(|o| o.value().parse())
        .map_err(|e| format!("{:?}", e))?;

    // --sender オプション
    let sender: String = noargs::opt("sender")
        .short('s')
        .doc("Ghost name used for the Sender header")
        .default("emily")
        .take(&mut args)
        .then(|o| Ok::<_, &str>(o.value().to_string()))
        .map_err(|e| format!("{:?}", e))?;

    // 未知の引数があればエラー、ヘルプが返されたら表示
    if let Some(help) = args.finish().map_err(|e| format!("{:?}", e))? {
        print!("{}", help);
        std::process::exit(0);
    }

    Ok(GhostOptions { port, sender })
}
