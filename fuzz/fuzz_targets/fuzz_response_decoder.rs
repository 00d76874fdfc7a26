#![no_main]

use libfuzzer_sys::fuzz_target;
use shiori::{ResponseDecoder, ShioriHead};

fuzz_target!(|data: &[u8]| {
    let mut decoder = ResponseDecoder::new();

    if decoder.feed(data).is_ok() {
        while let Ok(Some(response)) = decoder.decode() {
            let _ = response.status.code();
            let _ = response.get_value();
            let _ = response.sender();
            assert!(response.get_header("Value").is_none());
        }
    }

    decoder.reset();
    for chunk in data.chunks(13) {
        if decoder.feed(chunk).is_err() {
            return;
        }
        loop {
            match decoder.decode() {
                Ok(Some(_)) => {}
                Ok(None) => break,
                Err(_) => return,
            }
        }
    }
});
