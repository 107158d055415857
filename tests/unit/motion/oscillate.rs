use super::*;

fn fps30() -> Fps {
    Fps::new(30, 1).unwrap()
}

#[test]
fn osc_is_zero_at_frame_zero_and_peaks_at_quarter_period() {
    assert_eq!(osc(FrameIndex(0), 1.0, 5.0, fps30()), 0.0);
    let peak = osc(FrameIndex(15), 0.5, 5.0, fps30());
    assert!((peak - 5.0).abs() < 1e-12);
    let trough = osc(FrameIndex(45), 0.5, 5.0, fps30());
    assert!((trough + 5.0).abs() < 1e-12);
}

#[test]
fn beat_doubles_and_kicks() {
    let m = ClassMotion {
        freq_hz: 0.5,
        amplitude_deg: 4.0,
        beat_gain: 2.0,
        beat_kick_deg: 15.0,
    };
    let off = m.angle_deg(FrameIndex(15), false, fps30());
    let on = m.angle_deg(FrameIndex(15), true, fps30());
    assert!((off - 4.0).abs() < 1e-12);
    assert!((on - 23.0).abs() < 1e-12);
}

#[test]
fn right_side_is_mirrored() {
    let cfg = MotionConfig::default();
    let f = FrameIndex(7);
    let l = cfg.pose(PartClass::Limb, Side::Left, f, true, fps30());
    let r = cfg.pose(PartClass::Limb, Side::Right, f, true, fps30());
    let c = cfg.pose(PartClass::Limb, Side::Center, f, true, fps30());
    assert_eq!(l.angle_rad, -r.angle_rad);
    assert_eq!(l.angle_rad, c.angle_rad);
    assert!(l.angle_rad != 0.0);
}

#[test]
fn bounce_only_on_beat() {
    let cfg = MotionConfig::default();
    let on = cfg.pose(PartClass::Torso, Side::Center, FrameIndex(3), true, fps30());
    let off = cfg.pose(PartClass::Torso, Side::Center, FrameIndex(3), false, fps30());
    assert_eq!(on.translate, Vec2::new(0.0, -10.0));
    assert_eq!(off.translate, Vec2::ZERO);
}

#[test]
fn idle_motion_never_repeats_on_consecutive_frames_with_default_rates() {
    let cfg = MotionConfig::default();
    for class in [PartClass::Torso, PartClass::Head, PartClass::Limb] {
        for i in 0..59u64 {
            let a = cfg.pose(class, Side::Left, FrameIndex(i), false, fps30());
            let b = cfg.pose(class, Side::Left, FrameIndex(i + 1), false, fps30());
            assert!(a.angle_rad != b.angle_rad, "{class:?} frame {i}");
        }
    }
}

#[test]
fn partial_motion_config_fills_defaults() {
    let cfg: MotionConfig = serde_json::from_str(r#"{"bounce_px": 0}"#).unwrap();
    assert_eq!(cfg.bounce_px, 0.0);
    assert_eq!(cfg.limb, MotionConfig::default().limb);
}
