//! Software surface that rasterizes draw commands into an RGBA image

use image::{Rgba, RgbaImage};
use neon_core::{Color, DrawCommand, Result, Surface, Vec2, Viewport};
use std::cell::RefCell;
use std::rc::Rc;

/// 3x5 bitmaps for the binary glyphs, top row first
const GLYPH_ZERO: [u8; 5] = [0b111, 0b101, 0b101, 0b101, 0b111];
const GLYPH_ONE: [u8; 5] = [0b010, 0b110, 0b010, 0b010, 0b111];

/// Image shared with the caller so it can be saved after the engine
/// takes ownership of the surface
pub type SharedImage = Rc<RefCell<RgbaImage>>;

pub struct RasterSurface {
    image: SharedImage,
    background: Color,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32, background: Color) -> Self {
        let image = RgbaImage::from_pixel(width.max(1), height.max(1), Rgba(background.to_rgba8()));
        Self {
            image: Rc::new(RefCell::new(image)),
            background,
        }
    }

    pub fn image(&self) -> SharedImage {
        self.image.clone()
    }
}

impl Surface for RasterSurface {
    fn size(&self) -> Viewport {
        let image = self.image.borrow();
        Viewport::new(image.width() as f32, image.height() as f32)
    }

    fn resize(&mut self, width: f32, height: f32) {
        let width = width.max(1.0) as u32;
        let height = height.max(1.0) as u32;
        *self.image.borrow_mut() = RgbaImage::from_pixel(width, height, Rgba(self.background.to_rgba8()));
    }

    fn clear(&mut self) {
        let fill = Rgba(self.background.to_rgba8());
        for pixel in self.image.borrow_mut().pixels_mut() {
            *pixel = fill;
        }
    }

    fn draw(&mut self, command: &DrawCommand) -> Result<()> {
        let mut image = self.image.borrow_mut();
        match *command {
            DrawCommand::RadialGlow {
                center,
                radius,
                color,
                mid_stop,
                mid_alpha,
                alpha,
            } => {
                if radius <= 0.0 {
                    return Ok(());
                }
                let mid_stop = mid_stop.clamp(f32::EPSILON, 1.0 - f32::EPSILON);
                fill_region(&mut image, center, radius, color, |p| {
                    let t = p.distance(center) / radius;
                    if t >= 1.0 {
                        return 0.0;
                    }
                    let falloff = if t < mid_stop {
                        1.0 + (mid_alpha - 1.0) * (t / mid_stop)
                    } else {
                        mid_alpha * (1.0 - (t - mid_stop) / (1.0 - mid_stop))
                    };
                    falloff * alpha
                });
            }
            DrawCommand::FillCircle {
                center,
                radius,
                color,
                alpha,
            } => {
                fill_region(&mut image, center, radius, color, |p| {
                    coverage(radius - p.distance(center)) * alpha
                });
            }
            DrawCommand::StrokeRect {
                center,
                half_extent,
                rotation,
                line_width,
                color,
                alpha,
            } => {
                let reach = half_extent * std::f32::consts::SQRT_2 + line_width;
                let unrotate = Vec2::from_angle(-rotation);
                let half_width = line_width * 0.5;
                fill_region(&mut image, center, reach, color, |p| {
                    let local = unrotate.rotate(p - center).abs();
                    let edge = local.max_element();
                    coverage(half_width - (edge - half_extent).abs()) * alpha
                });
            }
            DrawCommand::Line {
                from,
                to,
                width,
                round_cap,
                color,
                alpha,
            } => {
                let half_width = (width * 0.5).max(0.5);
                let mid = (from + to) * 0.5;
                let reach = from.distance(to) * 0.5 + half_width + 1.0;
                fill_region(&mut image, mid, reach, color, |p| {
                    match segment_distance(p, from, to, round_cap) {
                        Some(d) => coverage(half_width - d) * alpha,
                        None => 0.0,
                    }
                });
            }
            DrawCommand::Text {
                position,
                glyph,
                font_size,
                color,
                alpha,
            } => {
                let rows = match glyph {
                    '0' => GLYPH_ZERO,
                    '1' => GLYPH_ONE,
                    _ => return Ok(()),
                };
                // Glyph box centered on `position`
                let cell = (font_size / 5.0).max(1.0);
                let origin = position - Vec2::new(cell * 1.5, cell * 2.5);
                for (row, bits) in rows.into_iter().enumerate() {
                    for col in 0..3u32 {
                        if (bits >> (2 - col)) & 1 == 0 {
                            continue;
                        }
                        let min = origin + Vec2::new(col as f32, row as f32) * cell;
                        fill_rect(&mut image, min, min + Vec2::splat(cell), color, alpha);
                    }
                }
            }
        }
        Ok(())
    }
}

/// Antialiasing ramp over one pixel around an edge
fn coverage(signed_distance: f32) -> f32 {
    (signed_distance + 0.5).clamp(0.0, 1.0)
}

/// Distance from `p` to the segment, or `None` past a flat end
fn segment_distance(p: Vec2, from: Vec2, to: Vec2, round_cap: bool) -> Option<f32> {
    let along = to - from;
    let length_sq = along.length_squared();
    if length_sq <= f32::EPSILON {
        return round_cap.then(|| p.distance(from));
    }
    let t = (p - from).dot(along) / length_sq;
    if !round_cap && !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(p.distance(from + along * t.clamp(0.0, 1.0)))
}

/// Blend `color` into every pixel within `reach` of `center`, weighted by
/// `weight` evaluated at the pixel center
fn fill_region<F>(image: &mut RgbaImage, center: Vec2, reach: f32, color: Color, weight: F)
where
    F: Fn(Vec2) -> f32,
{
    if !(reach.is_finite() && center.is_finite()) || reach <= 0.0 {
        return;
    }
    let Some((x0, y0, x1, y1)) = pixel_bounds(image, center - Vec2::splat(reach), center + Vec2::splat(reach)) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let w = weight(sample);
            if w > 0.0 {
                blend(image, x, y, color, w);
            }
        }
    }
}

fn fill_rect(image: &mut RgbaImage, min: Vec2, max: Vec2, color: Color, alpha: f32) {
    let Some((x0, y0, x1, y1)) = pixel_bounds(image, min, max) else {
        return;
    };
    for y in y0..y1 {
        for x in x0..x1 {
            blend(image, x, y, color, alpha);
        }
    }
}

/// Clip a float rectangle to the image, as half-open pixel ranges
fn pixel_bounds(image: &RgbaImage, min: Vec2, max: Vec2) -> Option<(u32, u32, u32, u32)> {
    let (w, h) = (image.width() as f32, image.height() as f32);
    let x0 = min.x.floor().clamp(0.0, w);
    let y0 = min.y.floor().clamp(0.0, h);
    let x1 = max.x.ceil().clamp(0.0, w);
    let y1 = max.y.ceil().clamp(0.0, h);
    if x0 >= x1 || y0 >= y1 {
        return None;
    }
    Some((x0 as u32, y0 as u32, x1 as u32, y1 as u32))
}

/// Source-over compositing of `color` at `alpha` onto one pixel
fn blend(image: &mut RgbaImage, x: u32, y: u32, color: Color, alpha: f32) {
    let color = color.with_alpha(alpha);
    let src_a = color.a;
    if src_a <= 0.0 {
        return;
    }
    let dst = image.get_pixel_mut(x, y);
    let dst_a = dst[3] as f32 / 255.0;
    let out_a = src_a + dst_a * (1.0 - src_a);
    let src = [color.r, color.g, color.b];
    for (i, channel) in src.iter().enumerate() {
        let d = dst[i] as f32 / 255.0;
        let value = (channel * src_a + d * dst_a * (1.0 - src_a)) / out_a;
        dst[i] = (value.clamp(0.0, 1.0) * 255.0).round() as u8;
    }
    dst[3] = (out_a * 255.0).round() as u8;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> RasterSurface {
        RasterSurface::new(64, 64, Color::BLACK)
    }

    fn pixel(surface: &RasterSurface, x: u32, y: u32) -> [u8; 4] {
        surface.image().borrow().get_pixel(x, y).0
    }

    #[test]
    fn filled_circle_covers_center_only() {
        let mut surface = surface();
        surface
            .draw(&DrawCommand::FillCircle {
                center: Vec2::new(32.0, 32.0),
                radius: 4.0,
                color: Color::WHITE,
                alpha: 1.0,
            })
            .unwrap();
        assert_eq!(pixel(&surface, 32, 32), [255, 255, 255, 255]);
        assert_eq!(pixel(&surface, 10, 10), [0, 0, 0, 255]);
    }

    #[test]
    fn glow_fades_outward() {
        let mut surface = surface();
        surface
            .draw(&DrawCommand::RadialGlow {
                center: Vec2::new(32.0, 32.0),
                radius: 20.0,
                color: Color::WHITE,
                mid_stop: 0.5,
                mid_alpha: 0.5,
                alpha: 1.0,
            })
            .unwrap();
        let near = pixel(&surface, 32, 32)[0];
        let mid = pixel(&surface, 42, 32)[0];
        let far = pixel(&surface, 51, 32)[0];
        assert!(near > mid && mid > far, "{near} {mid} {far}");
        assert_eq!(pixel(&surface, 60, 32)[0], 0);
    }

    #[test]
    fn butt_line_stops_at_endpoints() {
        let mut surface = surface();
        surface
            .draw(&DrawCommand::Line {
                from: Vec2::new(10.0, 20.5),
                to: Vec2::new(50.0, 20.5),
                width: 2.0,
                round_cap: false,
                color: Color::WHITE,
                alpha: 1.0,
            })
            .unwrap();
        assert_eq!(pixel(&surface, 30, 20)[0], 255);
        assert_eq!(pixel(&surface, 5, 20)[0], 0);
        assert_eq!(pixel(&surface, 55, 20)[0], 0);
    }

    #[test]
    fn rect_outline_leaves_inside_empty() {
        let mut surface = surface();
        surface
            .draw(&DrawCommand::StrokeRect {
                center: Vec2::new(32.0, 32.0),
                half_extent: 10.0,
                rotation: 0.0,
                line_width: 1.0,
                color: Color::WHITE,
                alpha: 1.0,
            })
            .unwrap();
        assert_eq!(pixel(&surface, 32, 32)[0], 0);
        assert!(pixel(&surface, 42, 32)[0] > 0);
    }

    #[test]
    fn glyph_one_is_narrower_than_zero() {
        let lit = |glyph| {
            let mut surface = surface();
            surface
                .draw(&DrawCommand::Text {
                    position: Vec2::new(32.0, 40.0),
                    glyph,
                    font_size: 10.0,
                    color: Color::WHITE,
                    alpha: 1.0,
                })
                .unwrap();
            let image = surface.image();
            let count = image.borrow().pixels().filter(|p| p[0] > 0).count();
            count
        };
        assert!(lit('0') > lit('1'));
        assert!(lit('1') > 0);
    }

    #[test]
    fn clear_and_resize_reset_background() {
        let mut surface = surface();
        surface
            .draw(&DrawCommand::FillCircle {
                center: Vec2::new(5.0, 5.0),
                radius: 3.0,
                color: Color::WHITE,
                alpha: 1.0,
            })
            .unwrap();
        surface.clear();
        assert_eq!(pixel(&surface, 5, 5), [0, 0, 0, 255]);

        surface.resize(100.0, 50.0);
        assert_eq!(surface.size(), Viewport::new(100.0, 50.0));
    }

    #[test]
    fn half_alpha_blends_over_background() {
        let mut surface = surface();
        surface
            .draw(&DrawCommand::FillCircle {
                center: Vec2::new(32.0, 32.0),
                radius: 8.0,
                color: Color::WHITE,
                alpha: 0.5,
            })
            .unwrap();
        let value = pixel(&surface, 32, 32)[0];
        assert!((126..=129).contains(&value), "{value}");
    }
}
