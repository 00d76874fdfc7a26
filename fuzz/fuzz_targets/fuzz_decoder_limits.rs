#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use shiori::{DecoderLimits, Error, RequestDecoder};

#[derive(Arbitrary, Debug)]
struct Input {
    max_buffer_size: u16,
    max_headers_count: u8,
    max_header_line_size: u16,
    data: Vec<u8>,
}

fuzz_target!(|input: Input| {
    let limits = DecoderLimits::default()
        .max_buffer_size(input.max_buffer_size as usize)
        .max_headers_count(input.max_headers_count as usize)
        .max_header_line_size(input.max_header_line_size as usize);
    let mut decoder = RequestDecoder::with_limits(limits);

    for chunk in input.data.chunks(31) {
        match decoder.feed(chunk) {
            Ok(()) => {}
            Err(Error::BufferOverflow { size, limit }) => {
                assert!(size > limit);
                return;
            }
            Err(_) => return,
        }
        assert!(decoder.remaining().len() <= input.max_buffer_size as usize);

        loop {
            match decoder.decode() {
                Ok(Some(request)) => {
                    assert!(request.headers.len() <= input.max_headers_count as usize);
                }
                Ok(None) => break,
                Err(_) => return,
            }
        }
    }
});
