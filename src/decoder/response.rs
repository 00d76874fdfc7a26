//! SHIORI レスポンスデコーダー

use crate::error::Error;
use crate::limits::DecoderLimits;
use crate::response::{Response, Status, VALUE_HEADER};

use super::line::{find_line, parse_header_line, parse_status_line, take_line};
use super::phase::DecodePhase;

/// SHIORI レスポンスデコーダー (Sans I/O)
///
/// ホスト側でゴーストからのレスポンスをパースする際に使用
///
/// `Value` ヘッダーは `Response::value` に取り出される。
/// 未知のステータスコードは `Error::InvalidStatusLine` になる。
#[derive(Debug)]
pub struct ResponseDecoder {
    buf: Vec<u8>,
    phase: DecodePhase,
    status_line: Option<(String, Status)>,
    headers: Vec<(String, String)>,
    value: Option<String>,
    limits: DecoderLimits,
}

impl Default for ResponseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ResponseDecoder {
    /// 新しいデコーダーを作成
    pub fn new() -> Self {
        Self::with_limits(DecoderLimits::default())
    }

    /// 制限付きでデコーダーを作成
    pub fn with_limits(limits: DecoderLimits) -> Self {
        Self {
            buf: Vec::new(),
            phase: DecodePhase::StartLine,
            status_line: None,
            headers: Vec::new(),
            value: None,
            limits,
        }
    }

    /// 制限なしでデコーダーを作成
    pub(crate) fn unlimited() -> Self {
        Self::with_limits(DecoderLimits::unlimited())
    }

    /// 制限設定を取得
    pub fn limits(&self) -> &DecoderLimits {
        &self.limits
    }

    /// バッファにデータを追加
    pub fn feed(&mut self, data: &[u8]) -> Result<(), Error> {
        let new_size = self.buf.len() + data.len();
        if new_size > self.limits.max_buffer_size {
            return Err(Error::BufferOverflow {
                size: new_size,
                limit: self.limits.max_buffer_size,
            });
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    /// バッファの残りデータを取得
    pub fn remaining(&self) -> &[u8] {
        &self.buf
    }

    /// デコーダーをリセット
    pub fn reset(&mut self) {
        self.buf.clear();
        self.phase = DecodePhase::StartLine;
        self.status_line = None;
        self.headers.clear();
        self.value = None;
    }

    /// レスポンスをデコード
    ///
    /// 空行まで受信したら `Some(Response)` を返す。
    /// データ不足の場合は `None` を返す。
    pub fn decode(&mut self) -> Result<Option<Response>, Error> {
        loop {
            let Some(pos) = find_line(&self.buf) else {
                if self.buf.len() > self.limits.max_header_line_size {
                    return Err(Error::HeaderLineTooLong {
                        size: self.buf.len(),
                        limit: self.limits.max_header_line_size,
                    });
                }
                return Ok(None);
            };

            if pos > self.limits.max_header_line_size {
                return Err(Error::HeaderLineTooLong {
                    size: pos,
                    limit: self.limits.max_header_line_size,
                });
            }

            match self.phase {
                DecodePhase::StartLine => {
                    let line = take_line(&mut self.buf, pos);
                    let (version, code, _reason) = parse_status_line(&line)?;
                    let status =
                        Status::from_code(code).ok_or(Error::InvalidStatusLine(line))?;
                    self.status_line = Some((version, status));
                    self.phase = DecodePhase::Headers;
                }
                DecodePhase::Headers => {
                    if pos == 0 {
                        self.buf.drain(..2);
                        return self.finish().map(Some);
                    }

                    if self.headers.len() >= self.limits.max_headers_count {
                        return Err(Error::TooManyHeaders {
                            count: self.headers.len() + 1,
                            limit: self.limits.max_headers_count,
                        });
                    }

                    let line = take_line(&mut self.buf, pos);

                    match parse_header_line(&line) {
                        Some((name, value)) if name == VALUE_HEADER => self.value = Some(value),
                        Some(header) => self.headers.push(header),
                        None => {}
                    }
                }
            }
        }
    }

    fn finish(&mut self) -> Result<Response, Error> {
        let (version, status) = self
            .status_line
            .take()
            .ok_or_else(|| Error::InvalidStatusLine(String::new()))?;
        self.phase = DecodePhase::StartLine;
        Ok(Response {
            version,
            status,
            headers: std::mem::take(&mut self.headers),
            value: self.value.take(),
        })
    }
}
