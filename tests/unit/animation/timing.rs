use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

fn scenario_a() -> TimingConfig {
    TimingConfig::new(ms(200), ms(50), ms(600), ms(16)).unwrap()
}

fn alpha_at(t: u64) -> Option<u8> {
    let base = FlashColor::rgb(10, 20, 30);
    flash_color_at(
        Timestamp::from_millis(0),
        Timestamp::from_millis(t),
        &scenario_a(),
        base,
        255,
    )
    .map(|c| c.a)
}

#[test]
fn total_duration_is_sum_of_phases() {
    let t = TimingConfig::new(ms(7), ms(11), ms(13), ms(1)).unwrap();
    assert_eq!(t.total_duration(), ms(31));
    let zero = TimingConfig::new(ms(0), ms(0), ms(0), ms(1)).unwrap();
    assert_eq!(zero.total_duration(), ms(0));
}

#[test]
fn zero_frame_interval_is_rejected() {
    assert!(TimingConfig::new(ms(1), ms(1), ms(1), ms(0)).is_err());
}

#[test]
fn scenario_a_envelope() {
    let a100 = alpha_at(100).unwrap();
    let a110 = alpha_at(110).unwrap();
    assert!(a100 > 0 && a100 < 255);
    assert!(a110 > a100, "fade-in must increase");

    assert_eq!(alpha_at(225), Some(255));

    let a500 = alpha_at(500).unwrap();
    let a510 = alpha_at(510).unwrap();
    assert!(a500 > 0 && a500 < 255);
    assert!(a510 < a500, "fade-out must decrease");

    assert_eq!(alpha_at(850), None);
    assert_eq!(alpha_at(851), None);
}

#[test]
fn alpha_endpoints_and_hold() {
    assert_eq!(alpha_at(0), Some(0));
    for t in [200, 210, 249, 250] {
        assert_eq!(alpha_at(t), Some(255), "t={t}");
    }
    assert_eq!(alpha_at(849), Some(0));
}

#[test]
fn alpha_is_active_and_monotonic_per_phase() {
    let samples: Vec<u8> = (0..850).map(|t| alpha_at(t).expect("active")).collect();
    assert!(samples[..250].windows(2).all(|w| w[0] <= w[1]));
    assert!(samples[250..].windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn before_start_is_not_started() {
    let t = scenario_a();
    let phase = t.phase_between(Timestamp::from_millis(100), Timestamp::from_millis(50));
    assert_eq!(phase, FlashPhase::NotStarted);
    assert_eq!(t.intensity(phase), None);
}

#[test]
fn custom_easing_changes_ramp_shape() {
    let linear = scenario_a().with_easing(Ease::Linear, Ease::Linear);
    let c = flash_color_at(
        Timestamp::from_millis(0),
        Timestamp::from_millis(100),
        &linear,
        FlashColor::rgb(0, 0, 0),
        200,
    )
    .unwrap();
    assert_eq!(c.a, 100);
}

#[test]
fn zero_fade_in_starts_at_full_alpha() {
    let t = TimingConfig::new(ms(0), ms(10), ms(10), ms(1)).unwrap();
    assert_eq!(t.phase_at(ms(0)), FlashPhase::Hold);
}
