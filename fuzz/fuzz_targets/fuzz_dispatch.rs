#![no_main]

use libfuzzer_sys::fuzz_target;
use shiori::{Dispatcher, DispatcherConfig, HandlerRegistry, MemoryStore, Response, ShioriHead};

fuzz_target!(|data: &[u8]| {
    let registry = HandlerRegistry::new()
        .with("version", |_| Ok(Some("1.0.0".to_string())))
        .with("OnEcho", |r| Ok(r.reference(0).map(str::to_string)));
    let mut dispatcher =
        Dispatcher::new(DispatcherConfig::new("fuzz"), registry, MemoryStore::new());

    // 不正な入力でもパニックせず、返すレスポンスは常にパースできる
    if let Ok(bytes) = dispatcher.respond(data) {
        let response = Response::parse_bytes(&bytes).expect("response must parse");
        assert_eq!(response.sender(), Some("fuzz"));
        dispatcher.mark_sent();
    }
});
