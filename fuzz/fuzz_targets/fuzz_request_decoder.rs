#![no_main]

use libfuzzer_sys::fuzz_target;
use shiori::RequestDecoder;

fuzz_target!(|data: &[u8]| {
    let mut decoder = RequestDecoder::new();

    // データを一度に feed
    if decoder.feed(data).is_ok() {
        while let Ok(Some(request)) = decoder.decode() {
            // リクエスト行が不正でもデコード自体は成功する
            assert_eq!(request.method.is_some(), request.version.is_some());
            let _ = request.id();
            let _ = request.references();
        }
    }

    // データを分割して feed (ストリーミングシナリオ)
    decoder.reset();
    for chunk in data.chunks(17) {
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
