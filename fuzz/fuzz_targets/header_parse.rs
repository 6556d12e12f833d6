#![no_main]

use libfuzzer_sys::fuzz_target;
use mimeprobe_contract::ArgumentFailure;
use mimeprobe_parse::{
    ContentDisposition, ContentType, InternetAddressList, MimeParse, ParseError,
};

fn check<T: MimeParse>(data: &[u8]) {
    let result: Result<T, ParseError> = T::parse_bytes(Some(data));
    if let Err(error) = result {
        // a present buffer is never an argument failure
        assert!(error.argument_error().is_none(), "{error}");
    }
}

fuzz_target!(|data: &[u8]| {
    check::<InternetAddressList>(data);
    check::<ContentType>(data);
    check::<ContentDisposition>(data);

    let Ok(length) = i32::try_from(data.len()) else {
        return;
    };
    let half = length / 2;
    if let Err(error) = ContentType::parse_range(Some(data), half, length - half) {
        assert!(error.argument_error().is_none(), "{error}");
    }
});
