//! SHIORI リクエストデコーダー

use crate::error::Error;
use crate::limits::DecoderLimits;
use crate::request::Request;

use super::line::{find_line, parse_header_line, parse_request_line, take_line};
use super::phase::DecodePhase;

/// SHIORI リクエストデコーダー (Sans I/O)
///
/// ゴースト側でホストからのリクエストをパースする際に使用
///
/// リクエスト行が `METHOD SHIORI/VERSION` に一致しない場合もエラーにはせず、
/// `method` が `None` の `Request` を返す。
#[derive(Debug)]
pub struct RequestDecoder {
    buf: Vec<u8>,
    phase: DecodePhase,
    start_line: Option<String>,
    headers: Vec<(String, String)>,
    limits: DecoderLimits,
}

impl Default for RequestDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RequestDecoder {
    /// 新しいデコーダーを作成
    pub fn new() -> Self {
        Self::with_limits(DecoderLimits::default())
    }

    /// 制限付きでデコーダーを作成
    pub fn with_limits(limits: DecoderLimits) -> Self {
        Self {
            buf: Vec::new(),
            phase: DecodePhase::StartLine,
            start_line: None,
            headers: Vec::new(),
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
        self.start_line = None;
        self.headers.clear();
    }

    /// リクエストをデコード
    ///
    /// 空行まで受信したら `Some(Request)` を返す。
    /// データ不足の場合は `None` を返す。
    /// 空行以降のデータはバッファに残り、次の `decode()` で処理される。
    pub fn decode(&mut self) -> Result<Option<Request>, Error> {
        loop {
            let Some(pos) = find_line(&self.buf) else {
                // 行が長すぎる場合は CRLF を待たずにエラーにする
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
                    self.start_line = Some(line);
                    self.phase = DecodePhase::Headers;
                }
                DecodePhase::Headers => {
                    if pos == 0 {
                        // 空行 - ヘッダー終了
                        self.buf.drain(..2);
                        return Ok(Some(self.finish()));
                    }

                    if self.headers.len() >= self.limits.max_headers_count {
                        return Err(Error::TooManyHeaders {
                            count: self.headers.len() + 1,
                            limit: self.limits.max_headers_count,
                        });
                    }

                    let line = take_line(&mut self.buf, pos);

                    if let Some(header) = parse_header_line(&line) {
                        self.headers.push(header);
                    }
                }
            }
        }
    }

    /// Request を構築して次のリクエストに備える
    fn finish(&mut self) -> Request {
        let start_line = self.start_line.take().unwrap_or_default();
        let headers = std::mem::take(&mut self.headers);
        self.phase = DecodePhase::StartLine;

        let (method, version) = match parse_request_line(&start_line) {
            Some((method, version)) => (Some(method), Some(version)),
            None => (None, None),
        };

        Request {
            method,
            version,
            start_line,
            headers,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Method;

    #[test]
    fn decode_in_pieces() {
        let raw = b"GET SHIORI/3.0\r\nCharset: UTF-8\r\nID: version\r\n\r\n";
        let mut decoder = RequestDecoder::new();
        for chunk in raw.chunks(5) {
            decoder.feed(chunk).unwrap();
            if let Some(request) = decoder.decode().unwrap() {
                assert_eq!(request.method, Some(Method::Get));
                assert_eq!(request.id(), Some("version"));
                return;
            }
        }
        panic!("request was not decoded");
    }

    #[test]
    fn waits_for_blank_line() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"NOTIFY SHIORI/3.0\r\nID: OnBoot\r\n").unwrap();
        assert_eq!(decoder.decode().unwrap(), None);
        decoder.feed(b"\r\n").unwrap();
        let request = decoder.decode().unwrap().unwrap();
        assert_eq!(request.method, Some(Method::Notify));
    }

    #[test]
    fn consecutive_requests() {
        let mut decoder = RequestDecoder::new();
        decoder
            .feed(b"NOTIFY SHIORI/3.0\r\nID: OnBoot\r\n\r\nGET SHIORI/3.0\r\nID: version\r\n\r\n")
            .unwrap();
        let first = decoder.decode().unwrap().unwrap();
        assert_eq!(first.id(), Some("OnBoot"));
        let second = decoder.decode().unwrap().unwrap();
        assert_eq!(second.id(), Some("version"));
        assert_eq!(decoder.decode().unwrap(), None);
        assert!(decoder.remaining().is_empty());
    }

    #[test]
    fn malformed_start_line_is_not_an_error() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"GET SHIORI/123\r\n\r\n").unwrap();
        let request = decoder.decode().unwrap().unwrap();
        assert_eq!(request.method, None);
        assert_eq!(request.version, None);
    }

    #[test]
    fn lines_without_colon_are_skipped() {
        let mut decoder = RequestDecoder::new();
        decoder
            .feed(b"GET SHIORI/3.0\r\ngarbage\r\nID: name\r\n\r\n")
            .unwrap();
        let request = decoder.decode().unwrap().unwrap();
        assert_eq!(request.headers, vec![("ID".to_string(), "name".to_string())]);
    }

    #[test]
    fn buffer_limit() {
        let mut decoder = RequestDecoder::with_limits(DecoderLimits::default().max_buffer_size(8));
        assert_eq!(
            decoder.feed(b"GET SHIORI/3.0\r\n"),
            Err(Error::BufferOverflow { size: 16, limit: 8 })
        );
    }

    #[test]
    fn headers_count_limit() {
        let mut decoder =
            RequestDecoder::with_limits(DecoderLimits::default().max_headers_count(1));
        decoder
            .feed(b"GET SHIORI/3.0\r\nID: a\r\nCharset: UTF-8\r\n\r\n")
            .unwrap();
        assert_eq!(
            decoder.decode(),
            Err(Error::TooManyHeaders { count: 2, limit: 1 })
        );
    }

    #[test]
    fn header_line_limit() {
        let mut decoder =
            RequestDecoder::with_limits(DecoderLimits::default().max_header_line_size(16));
        decoder
            .feed(b"GET SHIORI/3.0\r\nReference0: 0123456789abcdef\r\n\r\n")
            .unwrap();
        assert!(matches!(
            decoder.decode(),
            Err(Error::HeaderLineTooLong { limit: 16, .. })
        ));
    }

    #[test]
    fn invalid_utf8_is_replaced() {
        let mut decoder = RequestDecoder::new();
        decoder
            .feed(b"NOTIFY SHIORI/3.0\r\nCharset: Shift_JIS\r\nReference0: \x82\xa0\r\n")
            .unwrap();
        assert_eq!(decoder.decode().unwrap(), None);

        // 置き換えた行は消費済みなので続きを読める
        decoder.feed(b"ID: OnBoot\r\n\r\n").unwrap();
        let request = decoder.decode().unwrap().unwrap();
        assert_eq!(request.method, Some(Method::Notify));
        assert_eq!(request.reference(0), Some("\u{fffd}\u{fffd}"));
        assert_eq!(request.id(), Some("OnBoot"));
        assert!(decoder.remaining().is_empty());
    }

    #[test]
    fn invalid_utf8_in_start_line() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"G\xffT SHIORI/3.0\r\nID: version\r\n\r\n").unwrap();
        let request = decoder.decode().unwrap().unwrap();
        assert_eq!(request.method, None);
        assert_eq!(request.id(), Some("version"));
    }

    #[test]
    fn reset_clears_state() {
        let mut decoder = RequestDecoder::new();
        decoder.feed(b"GET SHIORI/3.0\r\nID: a").unwrap();
        assert_eq!(decoder.decode().unwrap(), None);
        decoder.reset();
        decoder.feed(b"NOTIFY SHIORI/3.0\r\n\r\n").unwrap();
        let request = decoder.decode().unwrap().unwrap();
        assert_eq!(request.method, Some(Method::Notify));
        assert!(request.headers.is_empty());
    }
}
