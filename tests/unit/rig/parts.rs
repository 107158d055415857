use super::*;

#[test]
fn default_rig_is_valid_and_fits_33_landmarks() {
    let rig = RigConfig::default();
    rig.validate().unwrap();
    assert_eq!(rig.parts.len(), 10);
    assert_eq!(rig.max_index(), Some(lm::RIGHT_ANKLE));
    assert!(rig.max_index().unwrap() < lm::COUNT);
}

#[test]
fn validate_rejects_short_parts_and_duplicates() {
    let single = BodyPart::new("x", vec![1], PartClass::Limb, Side::Left, Pivot::Joint(1));
    assert!(RigConfig::with_parts(vec![single]).validate().is_err());

    let a = BodyPart::new("a", vec![0, 1], PartClass::Limb, Side::Left, Pivot::Joint(0));
    assert!(RigConfig::with_parts(vec![a.clone(), a]).validate().is_err());

    assert!(RigConfig::with_parts(vec![]).validate().is_err());
}

#[test]
fn max_index_includes_pivot() {
    let p = BodyPart::new(
        "head",
        vec![0, 2],
        PartClass::Head,
        Side::Center,
        Pivot::Midpoint(11, 12),
    );
    assert_eq!(p.max_index(), Some(12));
}

#[test]
fn z_rank_orders_torso_head_limb() {
    assert!(PartClass::Torso.z_rank() < PartClass::Head.z_rank());
    assert!(PartClass::Head.z_rank() < PartClass::Limb.z_rank());
}

#[test]
fn padding_is_wider_for_torso_and_head() {
    let p = Padding::default();
    assert!(p.for_class(PartClass::Torso) > p.for_class(PartClass::Limb));
    assert!(p.for_class(PartClass::Head) > p.for_class(PartClass::Limb));
}

#[test]
fn rig_json_roundtrip_uses_snake_case_tags() {
    let json = r#"{
        "parts": [
            {"name": "arm", "keypoints": [0, 1], "class": "limb", "side": "right", "pivot": {"joint": 0}},
            {"name": "body", "keypoints": [2, 3], "class": "torso", "pivot": "center"}
        ],
        "padding": {"limb": 4}
    }"#;
    let rig: RigConfig = serde_json::from_str(json).unwrap();
    assert_eq!(rig.parts[0].pivot, Pivot::Joint(0));
    assert_eq!(rig.parts[0].side, Side::Right);
    assert_eq!(rig.parts[1].side, Side::Center);
    assert_eq!(rig.padding.limb, 4);
    assert_eq!(rig.padding.torso, Padding::default().torso);
    assert_eq!(rig.min_extent, 8);
}
