#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiori::{Method, Request, Response, Status};

#[derive(Arbitrary, Debug)]
struct FuzzRequest {
    notify: bool,
    id: String,
    headers: Vec<(String, String)>,
}

#[derive(Arbitrary, Debug)]
struct FuzzResponse {
    status_code: u16,
    headers: Vec<(String, String)>,
    value: Option<String>,
}

fn is_valid_header_name(s: &str) -> bool {
    !s.is_empty() && !s.contains(':') && is_valid_header_value(s)
}

fn is_valid_header_value(s: &str) -> bool {
    s.chars().all(|c| c != '\r' && c != '\n')
}

fuzz_target!(|data: (FuzzRequest, FuzzResponse)| {
    let (fuzz_req, fuzz_resp) = data;

    // Request roundtrip
    if is_valid_header_value(&fuzz_req.id) {
        let valid_headers: Vec<_> = fuzz_req
            .headers
            .iter()
            .filter(|(n, v)| is_valid_header_name(n) && is_valid_header_value(v))
            .cloned()
            .collect();

        let method = if fuzz_req.notify {
            Method::Notify
        } else {
            Method::Get
        };
        let mut request = Request::new(method, "3.0").header("ID", &fuzz_req.id);
        for (name, value) in &valid_headers {
            request.add_header(name, value);
        }

        let decoded = Request::parse_bytes(&request.encode()).expect("encoded request must parse");
        assert_eq!(decoded, request);
    }

    // Response roundtrip
    if let Some(status) = Status::from_code(fuzz_resp.status_code) {
        let valid_headers: Vec<_> = fuzz_resp
            .headers
            .iter()
            .filter(|(n, v)| {
                n != "Value" && is_valid_header_name(n) && is_valid_header_value(v)
            })
            .cloned()
            .collect();

        let mut response = Response::new(status);
        for (name, value) in &valid_headers {
            response.add_header(name, value);
        }
        response.value = fuzz_resp.value.filter(|v| is_valid_header_value(v));

        let decoded =
            Response::parse_bytes(&response.encode()).expect("encoded response must parse");
        assert_eq!(decoded, response);
    }
});
