/// デコーダーの制限設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderLimits {
    /// 最大バッファサイズ (デフォルト: 1MB)
    ///
    /// OnTranslate では直前の Value がそのまま Reference0 に戻ってくる
    pub max_buffer_size: usize,
    /// 最大ヘッダー数 (デフォルト: 256)
    pub max_headers_count: usize,
    /// 最大ヘッダー行長 (デフォルト: 512KB)
    pub max_header_line_size: usize,
}

impl Default for DecoderLimits {
    fn default() -> Self {
        Self {
            max_buffer_size: 1024 * 1024, // 1MB
            max_headers_count: 256,
            max_header_line_size: 512 * 1024, // 512KB
        }
    }
}

impl DecoderLimits {
    /// 制限なしの設定を作成
    pub fn unlimited() -> Self {
        Self {
            max_buffer_size: usize::MAX,
            max_headers_count: usize::MAX,
            max_header_line_size: usize::MAX,
        }
    }

    /// 最大バッファサイズを設定 (ビルダーパターン)
    pub fn max_buffer_size(mut self, size: usize) -> Self {
        self.max_buffer_size = size;
        self
    }

    /// 最大ヘッダー数を設定 (ビルダーパターン)
    pub fn max_headers_count(mut self, count: usize) -> Self {
        self.max_headers_count = count;
        self
    }

    /// 最大ヘッダー行長を設定 (ビルダーパターン)
    pub fn max_header_line_size(mut self, size: usize) -> Self {
        self.max_header_line_size = size;
        self
    }
}
