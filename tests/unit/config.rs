use super::*;

#[test]
fn empty_json_uses_defaults() {
    let s = FlashSettings::from_json_str("{}").unwrap();
    assert_eq!(s, FlashSettings::default());
}

#[test]
fn partial_json_overrides_fields() {
    let s = FlashSettings::from_json_str(
        r#"{ "fade_in_ms": 100, "target_fps": 144, "max_fps": null, "fade_out_ease": "Linear" }"#,
    )
    .unwrap();
    assert_eq!(s.fade_in_ms, 100);
    assert_eq!(s.hold_ms, 50);
    assert_eq!(s.target_fps, Some(144));
    assert_eq!(s.max_fps, None);
    assert_eq!(s.fade_out_ease, Ease::Linear);
}

#[test]
fn invalid_values_are_rejected() {
    assert!(FlashSettings::from_json_str(r#"{ "frame_ms": 0 }"#).is_err());
    assert!(FlashSettings::from_json_str(r#"{ "max_fps": 0 }"#).is_err());
    assert!(FlashSettings::from_json_str(r#"{ "palette": { "min_contrast": 0.5 } }"#).is_err());
    assert!(FlashSettings::from_json_str("not json").is_err());
}

#[test]
fn frame_interval_rounds_from_effective_fps() {
    let s = FlashSettings {
        target_fps: Some(144),
        max_fps: None,
        ..FlashSettings::default()
    };
    let cfg = s.resolve(&UnknownDisplay).unwrap();
    assert_eq!(cfg.timing.frame_interval(), Duration::from_millis(7));

    let sixty = FlashSettings::default().resolve(&FixedDisplay(60.0)).unwrap();
    assert_eq!(sixty.timing.frame_interval(), Duration::from_millis(17));
}

#[test]
fn detected_rate_is_capped_by_max_fps() {
    let s = FlashSettings::default();
    assert_eq!(s.effective_fps(&FixedDisplay(144.0)), 60);

    let uncapped = FlashSettings {
        max_fps: None,
        ..FlashSettings::default()
    };
    assert_eq!(uncapped.effective_fps(&FixedDisplay(144.0)), 144);
}

#[test]
fn implausible_or_missing_rates_fall_back() {
    let s = FlashSettings {
        max_fps: None,
        ..FlashSettings::default()
    };
    assert_eq!(s.effective_fps(&FixedDisplay(12.0)), FALLBACK_REFRESH_HZ);
    assert_eq!(s.effective_fps(&FixedDisplay(1000.0)), FALLBACK_REFRESH_HZ);
    assert_eq!(s.effective_fps(&UnknownDisplay), FALLBACK_REFRESH_HZ);
}

#[test]
fn explicit_frame_ms_wins() {
    let s = FlashSettings {
        frame_ms: Some(25),
        target_fps: Some(240),
        ..FlashSettings::default()
    };
    let cfg = s.resolve(&FixedDisplay(240.0)).unwrap();
    assert_eq!(cfg.timing.frame_interval(), Duration::from_millis(25));
}

#[test]
fn standard_matches_default_settings_at_60hz() {
    let resolved = FlashSettings::default().resolve(&FixedDisplay(60.0)).unwrap();
    assert_eq!(FlashConfig::standard(), resolved);
}

#[test]
fn from_path_reports_missing_file() {
    let err = FlashSettings::from_path(Path::new("/definitely/not/here.json")).unwrap_err();
    assert!(err.to_string().contains("config error:"));
}
