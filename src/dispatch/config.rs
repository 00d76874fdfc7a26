//! ディスパッチャーの設定

use crate::builder::{DEFAULT_CHARSET, DEFAULT_VERSION, ResponseBuilder};
use crate::limits::DecoderLimits;

/// ディスパッチャーの設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatcherConfig {
    /// Sender ヘッダーに載せるゴースト名
    pub sender: String,
    /// Charset ヘッダーの値 (デフォルト: UTF-8)
    pub charset: String,
    /// レスポンスのプロトコルバージョン (デフォルト: 3.0)
    pub version: String,
    /// 受け付けるメジャーバージョン (デフォルト: [3])
    pub supported_major_versions: Vec<u32>,
    /// OnTranslate 用に GET の Value を記録するか (デフォルト: true)
    pub record_emissions: bool,
    /// 状態ストアのキー接頭辞 (デフォルト: shiori.emission)
    pub emission_key_prefix: String,
    /// `respond()` で使うデコーダーの制限
    pub limits: DecoderLimits,
}

impl Default for DispatcherConfig {
    fn default() -> Self {
        Self {
            sender: "shiori".to_string(),
            charset: DEFAULT_CHARSET.to_string(),
            version: DEFAULT_VERSION.to_string(),
            supported_major_versions: vec![3],
            record_emissions: true,
            emission_key_prefix: "shiori.emission".to_string(),
            limits: DecoderLimits::default(),
        }
    }
}

impl DispatcherConfig {
    /// ゴースト名を指定して作成
    pub fn new(sender: &str) -> Self {
        Self {
            sender: sender.to_string(),
            ..Self::default()
        }
    }

    /// Charset を設定 (ビルダーパターン)
    pub fn charset(mut self, charset: &str) -> Self {
        self.charset = charset.to_string();
        self
    }

    /// 受け付けるメジャーバージョンを設定 (ビルダーパターン)
    pub fn supported_major_versions(mut self, versions: &[u32]) -> Self {
        self.supported_major_versions = versions.to_vec();
        self
    }

    /// Value の記録の有無を設定 (ビルダーパターン)
    pub fn record_emissions(mut self, record: bool) -> Self {
        self.record_emissions = record;
        self
    }

    /// デコーダーの制限を設定 (ビルダーパターン)
    pub fn limits(mut self, limits: DecoderLimits) -> Self {
        self.limits = limits;
        self
    }

    /// メジャーバージョンを受け付けるか確認
    pub fn supports(&self, major: u32) -> bool {
        self.supported_major_versions.contains(&major)
    }

    /// 設定からレスポンスビルダーを作成
    pub fn response_builder(&self) -> ResponseBuilder {
        ResponseBuilder::new(&self.sender)
            .version(&self.version)
            .charset(&self.charset)
    }
}
