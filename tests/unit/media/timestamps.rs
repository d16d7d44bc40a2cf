use super::*;

#[test]
fn uniform_excludes_endpoints() {
    let ts = generate_timestamps(TimestampMode::Uniform, 3, 40.0, &mut Rng64::new(0)).unwrap();
    assert_eq!(ts, vec![10.0, 20.0, 30.0]);
}

#[test]
fn uniform_single_is_midpoint() {
    let ts = generate_timestamps(TimestampMode::Uniform, 1, 9.0, &mut Rng64::new(0)).unwrap();
    assert_eq!(ts, vec![4.5]);
}

#[test]
fn random_is_bounded_and_sorted() {
    let ts = generate_timestamps(TimestampMode::Random, 5, 10.0, &mut Rng64::new(42)).unwrap();
    assert_eq!(ts.len(), 5);
    assert!(ts.iter().all(|t| (0.0..10.0).contains(t)));
    assert!(ts.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn random_is_reproducible_with_seed() {
    let a = generate_timestamps(TimestampMode::Random, 8, 60.0, &mut Rng64::new(7)).unwrap();
    let b = generate_timestamps(TimestampMode::Random, 8, 60.0, &mut Rng64::new(7)).unwrap();
    assert_eq!(a, b);
}

#[test]
fn zero_count_is_empty() {
    for mode in [TimestampMode::Uniform, TimestampMode::Random] {
        let ts = generate_timestamps(mode, 0, 10.0, &mut Rng64::new(1)).unwrap();
        assert!(ts.is_empty());
    }
}

#[test]
fn bad_duration_is_rejected() {
    for d in [0.0, -1.0, f64::NAN, f64::INFINITY] {
        let err = generate_timestamps(TimestampMode::Uniform, 2, d, &mut Rng64::new(0)).unwrap_err();
        assert!(matches!(err, CardError::InvalidArgument(_)));
    }
}

#[test]
fn mode_parses_lowercase() {
    let m: TimestampMode = serde_json::from_str("\"random\"").unwrap();
    assert_eq!(m, TimestampMode::Random);
}
