#![no_main]

use cardinality_sketches::{HyperLogLog, Recordinality};
use libfuzzer_sys::fuzz_target;
use wyhash::wyhash;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let salt = wyhash(data, 0);
    let text = String::from_utf8_lossy(data);
    let tokens: Vec<&str> = text.split_whitespace().collect();

    let mut hll = HyperLogLog::new(4 + (salt % 15) as u8).unwrap().with_trial(salt);
    let mut rec = Recordinality::with_seed(1 + (salt % 32) as usize, salt).unwrap();
    let mut previous = hll.registers().to_vec();
    for &token in &tokens {
        hll.insert(token).unwrap();
        rec.insert(token).unwrap();

        assert!(previous.iter().zip(hll.registers()).all(|(p, c)| p <= c));
        previous = hll.registers().to_vec();
        assert!(rec.len() <= rec.capacity());
        assert!(rec.records() >= rec.capacity());
        assert!(rec.estimate() >= 0.0);
    }

    // Whole lines are accepted as sequences of sub-tokens
    rec.insert(tokens.as_slice()).unwrap();
    hll.insert(tokens.as_slice()).unwrap();
    let _ = hll.estimate();
});
