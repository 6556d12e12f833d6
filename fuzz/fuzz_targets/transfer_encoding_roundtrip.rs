#![no_main]

use libfuzzer_sys::fuzz_target;
use mimeprobe_io::filters::{filter_all, ContentEncoding, DecoderFilter, EncoderFilter};

fuzz_target!(|data: &[u8]| {
    for encoding in ContentEncoding::ALL {
        let mut encoder = EncoderFilter::create(encoding);
        let mut decoder = DecoderFilter::create(encoding);
        let encoded = filter_all(encoder.as_mut(), data).expect("encode present buffer");
        let decoded = filter_all(decoder.as_mut(), &encoded).expect("decode present buffer");
        assert_eq!(decoded, data, "{encoding:?} round trip");
    }
});
