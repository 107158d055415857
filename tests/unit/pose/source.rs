use super::*;

struct Fixed(Option<Skeleton>);

impl KeypointSource for Fixed {
    fn detect(&self, _image: &Path) -> BeatposeResult<Option<Skeleton>> {
        Ok(self.0.clone())
    }
}

#[test]
fn require_pose_maps_none_to_no_pose_detected() {
    let err = require_pose(&Fixed(None), Path::new("x.png")).unwrap_err();
    assert!(matches!(err, BeatposeError::NoPoseDetected));

    let s = Skeleton::from_points(vec![Keypoint2::new(1, 1), Keypoint2::new(2, 2)]);
    assert_eq!(
        require_pose(&Fixed(Some(s.clone())), Path::new("x.png")).unwrap(),
        s
    );
}

#[test]
fn normalized_doc_scales_and_truncates() {
    let doc: PoseDoc = serde_json::from_str(
        r#"{"space":"normalized","keypoints":[[0.5,0.25],[0.999,0.0]],"keypoints_3d":[[0.5,0.25,-0.1],[1,0,0]]}"#,
    )
    .unwrap();
    let s = doc.into_skeleton(200, 100).unwrap().unwrap();
    assert_eq!(s.points, vec![Keypoint2::new(100, 25), Keypoint2::new(199, 0)]);
    let p3 = s.get_3d(0).unwrap();
    assert!((p3.z + 20.0).abs() < 1e-9);
}

#[test]
fn pixel_doc_is_used_as_is() {
    let doc: PoseDoc = serde_json::from_str(r#"{"keypoints":[[40,40],[60,60]]}"#).unwrap();
    let s = doc.into_skeleton(1, 1).unwrap().unwrap();
    assert_eq!(s.points, vec![Keypoint2::new(40, 40), Keypoint2::new(60, 60)]);
    assert!(s.points_3d.is_none());
}

#[test]
fn empty_keypoints_means_no_pose() {
    let doc: PoseDoc = serde_json::from_str(r#"{"keypoints":[]}"#).unwrap();
    assert!(doc.into_skeleton(10, 10).unwrap().is_none());
}

#[test]
fn mismatched_3d_length_is_rejected() {
    let doc: PoseDoc =
        serde_json::from_str(r#"{"keypoints":[[1,1],[2,2]],"keypoints_3d":[[1,1,0]]}"#).unwrap();
    assert!(matches!(
        doc.into_skeleton(1, 1),
        Err(BeatposeError::Validation(_))
    ));
}

#[test]
fn pose_file_null_document_is_no_pose() {
    let dir = std::path::PathBuf::from("target").join("unit_pose_source");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("null.json");
    std::fs::write(&path, "null").unwrap();

    let src = PoseFile::new(&path);
    assert!(src.detect(Path::new("unused.png")).unwrap().is_none());

    let path = dir.join("two.json");
    std::fs::write(&path, r#"{"keypoints":[[3,4],[5,6]]}"#).unwrap();
    let s = PoseFile::new(&path)
        .detect(Path::new("unused.png"))
        .unwrap()
        .unwrap();
    assert_eq!(s.len(), 2);
}

#[test]
fn pose_file_bad_json_is_serde_error() {
    let dir = std::path::PathBuf::from("target").join("unit_pose_source");
    std::fs::create_dir_all(&dir).unwrap();
    let path = dir.join("bad.json");
    std::fs::write(&path, "{nope").unwrap();
    assert!(matches!(
        PoseFile::new(&path).detect(Path::new("unused.png")),
        Err(BeatposeError::Serde(_))
    ));
}
