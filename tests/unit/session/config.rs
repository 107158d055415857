use super::*;
use crate::rig::parts::PartClass;

#[test]
fn empty_document_is_all_defaults() {
    let cfg = AnimConfig::from_json("{}").unwrap();
    assert_eq!(cfg, AnimConfig::default());
    assert_eq!(cfg.frame_count(), 300);
    assert_eq!(cfg.model, MotionModelKind::Rotate2d);
    assert!(cfg.overlay.is_none());
}

#[test]
fn partial_document_overrides_named_fields() {
    let cfg = AnimConfig::from_json(
        r#"{
            "fps": {"num": 24, "den": 1},
            "duration_secs": 2.5,
            "motion": {"limb": {"freq_hz": 2.0, "amplitude_deg": 20.0, "beat_gain": 3.0, "beat_kick_deg": 0.0}},
            "model": {"kind": "perspective3d", "focal_px": 800.0, "depth_gain": 0.5},
            "rig": {"padding": {"head": 10, "torso": 10, "limb": 5}},
            "overlay": {"radius": 2.0}
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.frame_count(), 60);
    assert_eq!(cfg.motion.for_class(PartClass::Limb).amplitude_deg, 20.0);
    assert_eq!(cfg.motion.head, MotionConfig::default().head);
    assert_eq!(
        cfg.model,
        MotionModelKind::Perspective3d {
            focal_px: 800.0,
            depth_gain: 0.5
        }
    );
    assert_eq!(cfg.rig.padding.limb, 5);
    assert_eq!(cfg.rig.parts, RigConfig::default().parts);
    let overlay = cfg.overlay.unwrap();
    assert_eq!(overlay.radius, 2.0);
    assert_eq!(overlay.rgba, [0, 255, 0, 255]);
}

#[test]
fn frame_count_rounds() {
    let cfg = AnimConfig {
        fps: Fps::new(30, 1).unwrap(),
        duration_secs: 1.49 / 30.0 + 1.0,
        ..AnimConfig::default()
    };
    assert_eq!(cfg.frame_count(), 31);

    let cfg = AnimConfig {
        duration_secs: 0.0,
        ..AnimConfig::default()
    };
    assert_eq!(cfg.frame_count(), 0);
}

#[test]
fn invalid_documents_are_rejected() {
    assert!(matches!(
        AnimConfig::from_json("{not json"),
        Err(BeatposeError::Serde(_))
    ));
    assert!(AnimConfig::from_json(r#"{"fps": {"num": 0, "den": 1}}"#).is_err());
    assert!(AnimConfig::from_json(r#"{"duration_secs": -1.0}"#).is_err());
    assert!(AnimConfig::from_json(r#"{"rig": {"parts": []}}"#).is_err());
    assert!(
        AnimConfig::from_json(
            r#"{"model": {"kind": "perspective3d", "focal_px": 0.0, "depth_gain": 1.0}}"#
        )
        .is_err()
    );
}

#[test]
fn from_path_reports_missing_file() {
    let err = AnimConfig::from_path(Path::new("target/no_such_beatpose_config.json")).unwrap_err();
    assert!(err.to_string().contains("no_such_beatpose_config.json"));
}
