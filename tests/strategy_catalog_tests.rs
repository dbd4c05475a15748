use hint_portfolio::config::{AllocatorConfig, HintConfig};
use hint_portfolio::error::PortfolioError;
use hint_portfolio::hint::HintProvider;
use hint_portfolio::strategy::Allocator;
use hint_portfolio::strategy_catalog::{
    build_allocator, build_hint_provider, AllocatorKind, HintKind,
};

fn allocator_cfg(kind: &str) -> AllocatorConfig {
    AllocatorConfig {
        kind: kind.to_string(),
        lambda: 0.5,
        mode: "add".to_string(),
        unhinted: "ucrp".to_string(),
        eval_points: 200,
        leverage: 1.0,
        mesh_seed: Some(1),
    }
}

fn hint_cfg(kind: &str) -> HintConfig {
    HintConfig {
        kind: kind.to_string(),
        ..HintConfig::default()
    }
}

#[test]
fn allocator_kinds_round_trip_through_labels() {
    for kind in AllocatorKind::ALL {
        assert_eq!(kind.label().parse::<AllocatorKind>(), Ok(kind));
    }
    assert_eq!(" UPSI ".parse::<AllocatorKind>(), Ok(AllocatorKind::Upsi));
    assert!("olmar".parse::<AllocatorKind>().is_err());
}

#[test]
fn hint_kinds_parse_aliases() {
    assert_eq!("ma".parse::<HintKind>(), Ok(HintKind::MaReversion));
    assert_eq!("noisy_oracle".parse::<HintKind>(), Ok(HintKind::NoisyOracle));
    assert!(matches!(
        "crystal_ball".parse::<HintKind>(),
        Err(PortfolioError::InvalidConfig(_))
    ));
}

#[test]
fn builds_every_allocator_kind() {
    for kind in AllocatorKind::ALL {
        let hinter = if kind.is_hinted() {
            Some(build_hint_provider(&hint_cfg("ma_reversion"), 3).unwrap())
        } else {
            None
        };
        let mut allocator = build_allocator(&allocator_cfg(kind.label()), hinter).unwrap();
        assert_eq!(allocator.name(), kind.label());
        assert_eq!(allocator.info().hinted, kind.is_hinted());
        assert_eq!(allocator.hinter_mut().is_some(), kind.is_hinted());
    }
}

#[test]
fn hinted_allocator_without_hint_provider_is_rejected() {
    let err = build_allocator(&allocator_cfg("upsi"), None).err();
    assert!(matches!(err, Some(PortfolioError::InvalidConfig(_))));
}

#[test]
fn invalid_combiner_settings_are_rejected() {
    let hinter = || Some(build_hint_provider(&hint_cfg("ma"), 2).unwrap());

    let mut cfg = allocator_cfg("hinted");
    cfg.mode = "harmonic".to_string();
    assert!(matches!(
        build_allocator(&cfg, hinter()).err(),
        Some(PortfolioError::InvalidConfig(_))
    ));

    let mut cfg = allocator_cfg("hinted");
    cfg.lambda = 2.0;
    assert!(build_allocator(&cfg, hinter()).is_err());

    let mut cfg = allocator_cfg("hinted");
    cfg.unhinted = "greedy".to_string();
    assert!(build_allocator(&cfg, hinter()).is_err());

    let mut cfg = allocator_cfg("hinted");
    cfg.unhinted = "up".to_string();
    assert!(build_allocator(&cfg, hinter()).is_ok());
}

#[test]
fn unknown_hint_kind_is_invalid_config() {
    assert!(matches!(
        build_hint_provider(&hint_cfg("tea_leaves"), 2).err(),
        Some(PortfolioError::InvalidConfig(_))
    ));
    let oracle = build_hint_provider(&hint_cfg("noisy_oracle"), 4).unwrap();
    assert_eq!(oracle.n_assets(), 4);
}
