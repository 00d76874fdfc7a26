//! 行単位のパース処理

use crate::error::Error;
use crate::request::Method;

/// プロトコル名のプレフィックス
pub(crate) const PROTOCOL_PREFIX: &str = "SHIORI/";

/// CRLF の位置を探す
pub(crate) fn find_line(buf: &[u8]) -> Option<usize> {
    buf.windows(2).position(|w| w == b"\r\n")
}

/// 先頭の 1 行 (`pos` まで) を CRLF ごとバッファから取り出して文字列にする
///
/// UTF-8 として不正なバイトは U+FFFD に置き換える
pub(crate) fn take_line(buf: &mut Vec<u8>, pos: usize) -> String {
    let line = String::from_utf8_lossy(&buf[..pos]).into_owned();
    buf.drain(..pos + 2);
    line
}

/// メソッドに許可される文字か確認
fn is_method_char(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// バージョンが `<major>.<minor>` 形式か確認
///
/// `"3.0"` は有効、`"123"` や `"3."` は無効
pub(crate) fn is_valid_version(version: &str) -> bool {
    match version.split_once('.') {
        Some((major, minor)) => {
            !major.is_empty()
                && !minor.is_empty()
                && major.bytes().all(|b| b.is_ascii_digit())
                && minor.bytes().all(|b| b.is_ascii_digit())
        }
        None => false,
    }
}

/// リクエスト行をパース
///
/// `METHOD SHIORI/VERSION` に一致しない場合は `None` を返す。
/// これはエラーではなく、ディスパッチャーが 400 に変換する。
pub(crate) fn parse_request_line(line: &str) -> Option<(Method, String)> {
    let (method, rest) = line.split_once(' ')?;
    if method.is_empty() || !method.bytes().all(is_method_char) {
        return None;
    }
    let version = rest.strip_prefix(PROTOCOL_PREFIX)?;
    if !is_valid_version(version) {
        return None;
    }
    Some((Method::parse(method), version.to_string()))
}

/// ヘッダー行をパース
///
/// 最初の `:` で分割し、値の先頭の空白を 1 つだけ取り除く。
/// `:` を含まない行や名前が空の行は `None` を返す (読み飛ばし)。
pub(crate) fn parse_header_line(line: &str) -> Option<(String, String)> {
    let (name, value) = line.split_once(':')?;
    if name.is_empty() {
        return None;
    }
    let value = value.strip_prefix(' ').unwrap_or(value);
    Some((name.to_string(), value.to_string()))
}

/// ステータス行をパース
///
/// `SHIORI/<version> <code> <reason>` を `(version, code, reason)` に分解する
pub(crate) fn parse_status_line(line: &str) -> Result<(String, u16, String), Error> {
    let invalid = || Error::InvalidStatusLine(line.to_string());

    let rest = line.strip_prefix(PROTOCOL_PREFIX).ok_or_else(invalid)?;
    let mut parts = rest.splitn(3, ' ');
    let version = parts.next().ok_or_else(invalid)?;
    if !is_valid_version(version) {
        return Err(invalid());
    }
    let code = parts.next().ok_or_else(invalid)?;
    if code.len() != 3 {
        return Err(invalid());
    }
    let code: u16 = code.parse().map_err(|_| invalid())?;
    let reason = parts.next().unwrap_or("");
    Ok((version.to_string(), code, reason.to_string()))
}
