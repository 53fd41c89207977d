// cargo fuzz run compress -- -timeout=30

#![no_main]

use libfuzzer_sys::fuzz_target;

use gifweave::lzw;
use weezl::{decode::Decoder, BitOrder};

fuzz_target!(|data: &[u8]| {
    if let Some((first, indices)) = data.split_first() {
        let min_code_size = 2 + first % 7;
        let mask = ((1u16 << min_code_size) - 1) as u8;
        let indices: Vec<u8> = indices.iter().map(|i| i & mask).collect();
        let compressed = lzw::compress(min_code_size, &indices).unwrap();
        let mut out = vec![];
        let mut decoder = Decoder::new(BitOrder::Lsb, min_code_size);
        let result = decoder.into_stream(&mut out).decode_all(&compressed[..]);
        assert!(result.status.is_ok());
        assert_eq!(out, indices);
    }
});
