use image::{Rgb, RgbImage};
use ndarray::Array2;

/// Map `t` in [0, scale] to a blue-white-red heat colour.
fn heat_color(t: f64, scale: f64) -> Rgb<u8> {
    let x = (t / scale).max(0.0).min(1.0);

    let r = (255.0 * x) as u8;
    let b = (255.0 * (1.0 - x)) as u8;
    let g = (255.0 * (1.0 - (2.0 * (x - 0.5).abs()))).max(0.0).min(255.0) as u8;

    Rgb([r, g, b])
}

/// Save `x` as a heat-map PNG under out/, mapping [0, scale] through a
/// fixed blue-white-red colour ramp.
///
/// The scale is fixed by the caller so consecutive frames are comparable.
pub fn save_heatmap(prefix: &str, index: usize, x: &Array2<f64>, scale: f64) -> anyhow::Result<()> {
    let shape = x.dim();

    let mut img = RgbImage::new(shape.0 as u32, shape.1 as u32);

    for i in 0..shape.0 {
        for j in 0..shape.1 {
            img.put_pixel(i as u32, j as u32, heat_color(x[[i, j]], scale));
        }
    }

    img.save(format!("out/{}_{:06}.png", prefix, index))?;

    Ok(())
}

/// Save `x` as a monochrome PNG under out/, with `scale` mapping to white.
pub fn save_monochrome(
    prefix: &str,
    index: usize,
    x: &Array2<f64>,
    scale: f64,
) -> anyhow::Result<()> {
    let shape = x.dim();

    let mut img = RgbImage::new(shape.0 as u32, shape.1 as u32);

    for i in 0..shape.0 {
        for j in 0..shape.1 {
            let l = (x[[i, j]] / scale * 255.0).max(0.0).min(255.0) as u8;
            img.put_pixel(i as u32, j as u32, Rgb([l, l, l]));
        }
    }

    img.save(format!("out/{}_{:06}.png", prefix, index))?;

    Ok(())
}
