use super::*;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

#[test]
fn integer_lerp_truncates_toward_zero() {
    assert_eq!(i32::lerp(&0, &10, 0.55), 5);
    assert_eq!(i32::lerp(&10, &0, 0.55), 5);
    assert_eq!(i32::lerp(&0, &-10, 0.55), -5);
    assert_eq!(u8::lerp(&255, &0, 0.5), 128);
}

#[test]
fn keys_are_spread_evenly() {
    let kf = Keyframes::new(vec![0, 100, 0]);
    assert_eq!(kf.sample(0.0), Some(0));
    assert_eq!(kf.sample(0.25), Some(50));
    assert_eq!(kf.sample(0.5), Some(100));
    assert_eq!(kf.sample(0.75), Some(50));
    assert_eq!(kf.sample(1.0), Some(0));
}

#[test]
fn out_of_range_progress_holds_endpoints() {
    let kf = Keyframes::new(vec![Point::new(0, 0), Point::new(10, 20)]);
    assert_eq!(kf.sample(-1.0), Some(Point::new(0, 0)));
    assert_eq!(kf.sample(2.0), Some(Point::new(10, 20)));
}

#[test]
fn degenerate_key_counts() {
    assert_eq!(Keyframes::<i32>::new(vec![]).sample(0.5), None);
    assert_eq!(Keyframes::new(vec![7]).sample(0.0), Some(7));
    assert_eq!(Keyframes::new(vec![7]).sample(1.0), Some(7));
}

#[test]
fn segment_holds_during_delay_then_plays() {
    let seg = Segment::new(Keyframes::new(vec![0, 100]), ms(1000)).with_delay(ms(200));
    assert_eq!(seg.end(), ms(1200));
    assert_eq!(seg.sample_at(ms(0)), None);
    assert_eq!(seg.sample_at(ms(199)), None);
    assert_eq!(seg.sample_at(ms(200)), Some(0));
    assert_eq!(seg.sample_at(ms(700)), Some(50));
    assert_eq!(seg.sample_at(ms(1200)), Some(100));
    assert_eq!(seg.sample_at(ms(5000)), Some(100));
}

#[test]
fn zero_duration_segment_jumps_to_last_key() {
    let seg = Segment::new(Keyframes::new(vec![0, 100]), Duration::ZERO);
    assert_eq!(seg.sample_at(Duration::ZERO), Some(100));
}

#[test]
fn segment_applies_ease_before_interpolating() {
    let seg = Segment::new(Keyframes::new(vec![0, 1000]), ms(1000)).with_ease(Ease::InQuad);
    assert_eq!(seg.sample_at(ms(500)), Some(250));
}
