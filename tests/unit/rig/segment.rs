use super::*;
use crate::pose::keypoint::{Keypoint2, Keypoint3};
use crate::rig::parts::Padding;

fn gradient(w: u32, h: u32) -> PreparedImage {
    let img = image::RgbaImage::from_fn(w, h, |x, y| {
        image::Rgba([(x % 256) as u8, (y % 256) as u8, 7, 255])
    });
    PreparedImage::from_rgba_image(img).unwrap()
}

fn limb(name: &str, a: usize, b: usize) -> BodyPart {
    BodyPart::new(name, vec![a, b], PartClass::Limb, Side::Left, Pivot::Joint(a))
}

fn rig(parts: Vec<BodyPart>, limb_pad: u32) -> RigConfig {
    RigConfig {
        parts,
        padding: Padding {
            head: 20,
            torso: 20,
            limb: limb_pad,
        },
        min_extent: 8,
    }
}

fn skel(points: &[(i32, i32)]) -> Skeleton {
    Skeleton::from_points(points.iter().map(|&(x, y)| Keypoint2::new(x, y)).collect())
}

#[test]
fn crop_is_padded_box_with_local_pivot() {
    let seg = Segmenter::new(rig(vec![limb("arm", 0, 1)], 15)).unwrap();
    let table = seg
        .segment(&gradient(100, 100), &skel(&[(40, 40), (60, 60)]))
        .unwrap();
    let c = table.get("arm").unwrap();
    assert_eq!(c.offset, (25, 25));
    assert_eq!((c.width, c.height), (51, 51));
    assert_eq!(c.pivot, Point::new(15.0, 15.0));
    assert_eq!(c.keypoints, vec![Point::new(15.0, 15.0), Point::new(35.0, 35.0)]);
    assert_eq!(c.rgba8_premul.len(), 51 * 51 * 4);
    assert_eq!(c.pixel(0, 0), [25, 25, 7, 255]);
    assert_eq!(c.pixel(50, 10), [75, 35, 7, 255]);
    assert_eq!(c.depth_slope, 0.0);
}

#[test]
fn crop_is_clamped_to_image() {
    let seg = Segmenter::new(rig(vec![limb("arm", 0, 1)], 15)).unwrap();
    let table = seg
        .segment(&gradient(100, 100), &skel(&[(5, 5), (95, 20)]))
        .unwrap();
    let c = table.get("arm").unwrap();
    assert_eq!(c.offset, (0, 0));
    assert_eq!(c.width, 100);
    assert_eq!(c.height, 36);
    assert_eq!(c.pivot, Point::new(5.0, 5.0));
}

#[test]
fn coincident_keypoints_are_widened() {
    let seg = Segmenter::new(rig(vec![limb("arm", 0, 1)], 0)).unwrap();
    let table = seg
        .segment(&gradient(100, 100), &skel(&[(50, 50), (50, 50)]))
        .unwrap();
    let c = table.get("arm").unwrap();
    assert!(c.width >= 8 && c.height >= 8);
    assert_eq!(c.offset, (46, 46));
}

#[test]
fn box_outside_image_still_yields_one_pixel() {
    let seg = Segmenter::new(rig(vec![limb("arm", 0, 1)], 0)).unwrap();
    let table = seg
        .segment(&gradient(100, 100), &skel(&[(200, 200), (210, 230)]))
        .unwrap();
    let c = table.get("arm").unwrap();
    assert_eq!((c.width, c.height), (1, 1));
    assert_eq!(c.offset, (99, 99));
}

#[test]
fn crops_are_z_ordered_torso_head_limb() {
    let parts = vec![
        limb("arm", 0, 1),
        BodyPart::new("head", vec![2, 3], PartClass::Head, Side::Center, Pivot::Center),
        BodyPart::new("torso", vec![0, 3], PartClass::Torso, Side::Center, Pivot::Center),
    ];
    let seg = Segmenter::new(rig(parts, 5)).unwrap();
    let table = seg
        .segment(
            &gradient(64, 64),
            &skel(&[(10, 10), (20, 20), (30, 5), (40, 15)]),
        )
        .unwrap();
    let names = table.crops.iter().map(|c| c.name.as_str()).collect::<Vec<_>>();
    assert_eq!(names, vec!["torso", "head", "arm"]);
    assert_eq!(table.canvas, Canvas { width: 64, height: 64 });
}

#[test]
fn short_skeleton_fails_with_missing_keypoint() {
    let seg = Segmenter::new(RigConfig::default()).unwrap();
    let err = seg
        .segment(&gradient(64, 64), &skel(&[(10, 10), (20, 20)]))
        .unwrap_err();
    match err {
        BeatposeError::MissingKeypoint {
            part,
            index,
            available,
        } => {
            assert_eq!(part, "torso");
            assert_eq!(index, 11);
            assert_eq!(available, 2);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_pivot_index_is_rejected() {
    let part = BodyPart::new("arm", vec![0, 1], PartClass::Limb, Side::Left, Pivot::Joint(5));
    let seg = Segmenter::new(rig(vec![part], 5)).unwrap();
    assert!(matches!(
        seg.segment(&gradient(32, 32), &skel(&[(1, 1), (2, 2)])),
        Err(BeatposeError::MissingKeypoint { index: 5, .. })
    ));
}

#[test]
fn depth_slope_from_3d_points() {
    let seg = Segmenter::new(rig(vec![limb("arm", 0, 1)], 5)).unwrap();
    let mut s = skel(&[(10, 10), (40, 50)]);
    s.points_3d = Some(vec![
        Keypoint3 {
            x: 10.0,
            y: 10.0,
            z: 0.0,
        },
        Keypoint3 {
            x: 40.0,
            y: 50.0,
            z: -25.0,
        },
    ]);
    let table = seg.segment(&gradient(64, 64), &s).unwrap();
    let slope = table.get("arm").unwrap().depth_slope;
    assert!((slope + 0.5).abs() < 1e-9);
}

#[test]
fn midpoint_pivot_is_local() {
    let part = BodyPart::new(
        "head",
        vec![0, 1],
        PartClass::Head,
        Side::Center,
        Pivot::Midpoint(2, 3),
    );
    let seg = Segmenter::new(rig(vec![part], 5)).unwrap();
    let table = seg
        .segment(
            &gradient(100, 100),
            &skel(&[(40, 20), (60, 30), (30, 50), (70, 50)]),
        )
        .unwrap();
    let c = table.get("head").unwrap();
    assert_eq!(c.offset, (20, 0));
    assert_eq!(c.pivot, Point::new(30.0, 50.0));
}

#[test]
fn crop_exports_straight_alpha() {
    let img = image::RgbaImage::from_pixel(20, 20, image::Rgba([200, 100, 50, 128]));
    let image = PreparedImage::from_rgba_image(img).unwrap();
    let seg = Segmenter::new(rig(vec![limb("arm", 0, 1)], 2)).unwrap();
    let table = seg.segment(&image, &skel(&[(5, 5), (14, 14)])).unwrap();
    let out = table.get("arm").unwrap().to_rgba_image().unwrap();
    assert_eq!(out.dimensions(), (14, 14));
    let px = out.get_pixel(3, 3).0;
    assert_eq!(px[3], 128);
    for (got, want) in px[..3].iter().zip([200u8, 100, 50]) {
        assert!(got.abs_diff(want) <= 1, "{got} vs {want}");
    }
}
