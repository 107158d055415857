use crate::foundation::core::Point;
use crate::foundation::math::mul_div255_u8;
use crate::render::composite::Raster;

/// Marker drawn at each transformed keypoint when the overlay is enabled.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct OverlayStyle {
    /// Disc radius in pixels.
    pub radius: f64,
    /// Straight-alpha RGBA8 color.
    pub rgba: [u8; 4],
}

impl Default for OverlayStyle {
    fn default() -> Self {
        Self {
            radius: 4.0,
            rgba: [0, 255, 0, 255],
        }
    }
}

/// Fill the pixels whose centers lie within `style.radius` of `center`. Clipped to the raster.
pub fn draw_disc(raster: &mut Raster, center: Point, style: OverlayStyle) {
    if !(center.x.is_finite() && center.y.is_finite()) || style.radius <= 0.0 {
        return;
    }
    let [r, g, b, a] = style.rgba;
    let a16 = u16::from(a);
    let px = [
        mul_div255_u8(u16::from(r), a16),
        mul_div255_u8(u16::from(g), a16),
        mul_div255_u8(u16::from(b), a16),
        a,
    ];

    let r2 = style.radius * style.radius;
    let clip = |v: f64, hi: u32| v.clamp(0.0, f64::from(hi)) as u32;
    let x0 = clip((center.x - style.radius).floor(), raster.width);
    let x1 = clip((center.x + style.radius).ceil() + 1.0, raster.width);
    let y0 = clip((center.y - style.radius).floor(), raster.height);
    let y1 = clip((center.y + style.radius).ceil() + 1.0, raster.height);

    for y in y0..y1 {
        let dy = f64::from(y) + 0.5 - center.y;
        for x in x0..x1 {
            let dx = f64::from(x) + 0.5 - center.x;
            if dx * dx + dy * dy <= r2 {
                raster.blend_pixel(x, y, px);
            }
        }
    }
}
