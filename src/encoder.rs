use crate::request::Request;
use crate::response::Response;

fn encode_headers(buf: &mut Vec<u8>, headers: &[(String, String)]) {
    for (name, value) in headers {
        buf.extend_from_slice(name.as_bytes());
        buf.extend_from_slice(b": ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }
}

/// リクエストをエンコード
///
/// リクエスト行は受信時のまま (`start_line`) 出力する
pub fn encode_request(request: &Request) -> Vec<u8> {
    let mut buf = Vec::new();

    // Request line: METHOD SP SHIORI/VERSION CRLF
    buf.extend_from_slice(request.start_line.as_bytes());
    buf.extend_from_slice(b"\r\n");

    encode_headers(&mut buf, &request.headers);

    // End of headers
    buf.extend_from_slice(b"\r\n");

    buf
}

/// レスポンスをエンコード
///
/// Value は最後のヘッダーとして、エスケープせずにそのまま出力する
pub fn encode_response(response: &Response) -> Vec<u8> {
    let mut buf = Vec::new();

    // Status line: SHIORI/VERSION SP STATUS-CODE SP REASON-PHRASE CRLF
    buf.extend_from_slice(b"SHIORI/");
    buf.extend_from_slice(response.version.as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(response.status.code().to_string().as_bytes());
    buf.push(b' ');
    buf.extend_from_slice(response.status.reason_phrase().as_bytes());
    buf.extend_from_slice(b"\r\n");

    encode_headers(&mut buf, &response.headers);

    if let Some(value) = &response.value {
        buf.extend_from_slice(b"Value: ");
        buf.extend_from_slice(value.as_bytes());
        buf.extend_from_slice(b"\r\n");
    }

    // End of headers
    buf.extend_from_slice(b"\r\n");

    buf
}

impl Request {
    /// リクエストをバイト列にエンコード
    pub fn encode(&self) -> Vec<u8> {
        encode_request(self)
    }
}

impl Response {
    /// レスポンスをバイト列にエンコード
    pub fn encode(&self) -> Vec<u8> {
        encode_response(self)
    }

    /// レスポンスを文字列にエンコード
    pub fn to_wire_string(&self) -> String {
        String::from_utf8_lossy(&self.encode()).into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::response::Status;

    #[test]
    fn value_is_last_header() {
        let response = Response::new(Status::Ok)
            .value("\\1\\s[10]\\0\\s[6]\\e")
            .header("Charset", "UTF-8")
            .header("Sender", "pasta");
        assert_eq!(
            response.to_wire_string(),
            "SHIORI/3.0 200 OK\r\nCharset: UTF-8\r\nSender: pasta\r\nValue: \\1\\s[10]\\0\\s[6]\\e\r\n\r\n"
        );
    }

    #[test]
    fn no_value_line_without_value() {
        let response = Response::new(Status::NoContent).header("Charset", "UTF-8");
        assert_eq!(
            response.to_wire_string(),
            "SHIORI/3.0 204 No Content\r\nCharset: UTF-8\r\n\r\n"
        );
    }

    #[test]
    fn request_keeps_start_line() {
        let request = Request::notify("OnInitialize").header("Reference0", "");
        let encoded = String::from_utf8(request.encode()).unwrap();
        assert_eq!(
            encoded,
            "NOTIFY SHIORI/3.0\r\nID: OnInitialize\r\nReference0: \r\n\r\n"
        );
        let decoded = Request::parse(&encoded).unwrap();
        assert_eq!(decoded.reference(0), Some(""));
    }
}
