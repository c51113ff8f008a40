use cardinality_sketches::{EstimatorConfig, EstimatorTrait, HyperLogLog, Recordinality};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use test_case::test_case;

const TRIALS: u64 = 10;

fn distinct_tokens(n: usize) -> Vec<String> {
    (0..n).map(|i| i.to_string()).collect()
}

/// Mean relative error of the per-trial mean estimate against `actual`.
fn relative_error(estimates: &[f64], actual: usize) -> f64 {
    let mean = estimates.iter().sum::<f64>() / estimates.len() as f64;
    (mean - actual as f64).abs() / actual as f64
}

#[test_case(8)]
#[test_case(10)]
#[test_case(12)]
#[test_case(14)]
fn test_hyperloglog_accuracy(precision: u8) {
    let n = 10_000;
    let tokens = distinct_tokens(n);
    let estimates: Vec<f64> = (0..TRIALS)
        .map(|trial| {
            let mut hll = HyperLogLog::new(precision).unwrap();
            for token in &tokens {
                hll.add(token, trial).unwrap();
            }
            hll.estimate() as f64
        })
        .collect();

    let bound = 3.0 * cardinality_sketches::hyperloglog::standard_error(precision);
    let error = relative_error(&estimates, n);
    assert!(error < bound, "error = {error:.4}, bound = {bound:.4}");
}

#[test]
fn test_hyperloglog_single_trials_b12() {
    let n = 10_000;
    let tokens = distinct_tokens(n);
    let bound = 3.0 * 1.04 / 64.0;
    let mut within = 0;
    for trial in 0..20 {
        let mut hll = HyperLogLog::new(12).unwrap().with_trial(trial);
        for token in &tokens {
            hll.insert(token).unwrap();
        }
        let error = (hll.estimate() as f64 - n as f64).abs() / n as f64;
        if error < bound {
            within += 1;
        }
    }
    assert!(within >= 18, "only {within} of 20 trials within bound");
}

#[test_case(16)]
#[test_case(32)]
#[test_case(64)]
#[test_case(128)]
fn test_recordinality_accuracy(capacity: usize) {
    let n = 10_000;
    let tokens = distinct_tokens(n);
    let estimates: Vec<f64> = (0..TRIALS)
        .map(|seed| {
            let mut rec = Recordinality::with_seed(capacity, seed).unwrap();
            rec.observe(&tokens).unwrap();
            rec.estimate()
        })
        .collect();

    let bound = 3.0 * cardinality_sketches::recordinality::standard_error(capacity);
    let error = relative_error(&estimates, n);
    assert!(error < bound, "error = {error:.4}, bound = {bound:.4}");
}

#[test_case(EstimatorConfig::hll(12), 0.05)]
#[test_case(EstimatorConfig::rec(64), 0.3)]
fn test_skewed_stream(config: EstimatorConfig, tolerance: f64) {
    // Heavily repeated low ids with a long tail of rare ones
    let mut rng = StdRng::seed_from_u64(12345);
    let n = 5_000;
    let tokens: Vec<String> = (0..100_000)
        .map(|_| {
            let u: f64 = rng.gen();
            ((n as f64).powf(u) as usize - 1).to_string()
        })
        .collect();
    let mut unique = tokens.clone();
    unique.sort_unstable();
    unique.dedup();
    let actual = unique.len();

    let estimates: Vec<f64> = (0..TRIALS)
        .map(|salt| {
            let mut estimator = config.with_salt(salt).build().unwrap();
            estimator.observe(&tokens).unwrap();
            estimator.cardinality()
        })
        .collect();
    let error = relative_error(&estimates, actual);
    assert!(error < tolerance, "error = {error:.4}, actual = {actual}");
}

#[test]
fn test_partial_stream_estimates() {
    // Estimates are well defined after any prefix of the stream
    let tokens = distinct_tokens(4_000);
    let mut hll = HyperLogLog::new(12).unwrap();
    let mut rec = Recordinality::with_seed(64, 1).unwrap();
    let mut previous_records = rec.records();
    for (i, token) in tokens.iter().enumerate() {
        hll.insert(token).unwrap();
        rec.insert(token).unwrap();
        if i < 63 {
            assert_eq!(rec.estimate(), (i + 1) as f64);
        }
        assert!(rec.records() >= previous_records);
        previous_records = rec.records();
    }
    let error = (hll.estimate() as f64 - 4_000.0).abs() / 4_000.0;
    assert!(error < 0.05, "error = {error:.4}");
}
