use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BeatposeError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        BeatposeError::evaluation("x")
            .to_string()
            .contains("evaluation error:")
    );
    assert!(
        BeatposeError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
    assert_eq!(
        BeatposeError::NoPoseDetected.to_string(),
        "no pose detected in input image"
    );
}

#[test]
fn missing_keypoint_names_part_and_index() {
    let err = BeatposeError::MissingKeypoint {
        part: "left_forearm".to_string(),
        index: 15,
        available: 12,
    };
    let msg = err.to_string();
    assert!(msg.contains("left_forearm"));
    assert!(msg.contains("15"));
    assert!(msg.contains("12"));
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BeatposeError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}
