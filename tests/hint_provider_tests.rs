use hint_portfolio::error::PortfolioError;
use hint_portfolio::hint::{HintProvider, MaReversionHint, NoisyOracleHint};
use rand_distr::Uniform;

#[test]
fn ma_reversion_empty_history_returns_ones() {
    let mut hinter = MaReversionHint::new(3, 5).unwrap();
    let hint = hinter.get_hint(&[1.1, 0.9, 1.0], &[]).unwrap();
    assert_eq!(hint, vec![1.0, 1.0, 1.0]);
}

#[test]
/// Verifies the moving-average reversion estimate:
/// with prices 1 -> 2 -> 4 the 3-period average relative to the last price is 7/12.
fn ma_reversion_matches_moving_average_over_last_price() {
    let mut hinter = MaReversionHint::new(2, 3).unwrap();
    let history = vec![vec![5.0, 1.0], vec![2.0, 1.0], vec![2.0, 1.0]];
    let hint = hinter.get_hint(&[1.0, 1.0], &history).unwrap();

    // Only the last two relatives fall in the window.
    assert!((hint[0] - (1.0 + 0.5 + 0.25) / 3.0).abs() < 1e-12);
    assert!((hint[1] - 1.0).abs() < 1e-12);
}

#[test]
fn ma_reversion_window_of_one_ignores_history() {
    let mut hinter = MaReversionHint::new(2, 1).unwrap();
    let hint = hinter
        .get_hint(&[1.0, 1.0], &[vec![3.0, 0.5], vec![0.2, 4.0]])
        .unwrap();
    assert_eq!(hint, vec![1.0, 1.0]);
}

#[test]
fn ma_reversion_short_history_uses_what_is_available() {
    let mut hinter = MaReversionHint::new(1, 10).unwrap();
    let hint = hinter.get_hint(&[1.0], &[vec![2.0]]).unwrap();
    assert!((hint[0] - 0.75).abs() < 1e-12);
}

#[test]
fn ma_reversion_rejects_zero_window_and_bad_rows() {
    assert!(matches!(
        MaReversionHint::new(2, 0),
        Err(PortfolioError::InvalidConfig(_))
    ));
    let mut hinter = MaReversionHint::new(2, 3).unwrap();
    assert!(hinter.get_hint(&[1.0, 1.0], &[vec![1.0, 1.0, 1.0]]).is_err());
    assert!(hinter.train(&[], &[]).is_ok());
}

#[test]
fn noisy_oracle_without_noise_returns_next_observation() {
    let mut oracle = NoisyOracleHint::gaussian(3, 0.0, 1).unwrap();
    let next_x = [1.02, 0.97, 1.10];
    assert_eq!(oracle.get_hint(&next_x, &[]).unwrap(), next_x.to_vec());
}

#[test]
fn noisy_oracle_is_reproducible_for_a_seed() {
    let next_x = [1.0, 1.0, 1.0, 1.0];
    let mut a = NoisyOracleHint::new(4, 99).unwrap();
    let mut b = NoisyOracleHint::new(4, 99).unwrap();
    let mut c = NoisyOracleHint::new(4, 100).unwrap();
    let ha = a.get_hint(&next_x, &[]).unwrap();
    assert_eq!(ha, b.get_hint(&next_x, &[]).unwrap());
    assert_ne!(ha, c.get_hint(&next_x, &[]).unwrap());
    // Fresh draws every call.
    assert_ne!(ha, a.get_hint(&next_x, &[]).unwrap());
}

#[test]
fn noisy_oracle_accepts_custom_noise() {
    let mut oracle = NoisyOracleHint::with_noise(2, Uniform::new(0.0, 0.1), 7);
    for _ in 0..100 {
        let hint = oracle.get_hint(&[1.0, 2.0], &[]).unwrap();
        assert!(hint[0] >= 1.0 && hint[0] <= 1.1);
        assert!(hint[1] >= 2.0 && hint[1] <= 2.1);
    }
    assert_eq!(oracle.n_assets(), 2);
}

#[test]
fn noisy_oracle_rejects_invalid_scale_and_length() {
    assert!(matches!(
        NoisyOracleHint::gaussian(2, -1.0, 0),
        Err(PortfolioError::InvalidConfig(_))
    ));
    let mut oracle = NoisyOracleHint::new(2, 0).unwrap();
    assert!(oracle.get_hint(&[1.0], &[]).is_err());
}
