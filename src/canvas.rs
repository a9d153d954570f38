// Software drawing surface: strokes are rasterized straight into an RGBA buffer.
// Visual outcomes:
// - A thick, round-capped, anti-aliased line for each trail segment.
// - A soft glow (shadow) in the same color spreading `shadow_blur` pixels around it.
// - Transparent everywhere else, so the window shows its background through it.

use image::{Rgba as Pixel, RgbaImage};

use crate::color::Rgba;
use crate::host::{StrokeStyle, Surface, TrailPath};
use crate::types::{Point, Viewport};

/// Peak strength of the glow right at the line edge (a blurred edge is half covered).
const GLOW_EDGE_STRENGTH: f64 = 0.5;

/// The glow is cut off after this many standard deviations.
const GLOW_REACH_SIGMAS: f64 = 3.0;

pub struct Canvas {
    image: RgbaImage, // straight (non-premultiplied) alpha
}

impl Canvas {
    /// Create a fully transparent canvas.
    pub fn new(viewport: Viewport) -> Self {
        Self { image: RgbaImage::new(viewport.width, viewport.height) }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Write the canvas over an opaque `background` (0x00RRGGBB) into `out`,
    /// a row-major buffer `out_width` pixels wide, as minifb expects.
    /// Visual: this is the frame the window shows.
    pub fn composite_over(&self, background: u32, out: &mut [u32], out_width: usize) {
        out.fill(background);
        if out_width == 0 {
            return;
        }

        let out_height = out.len() / out_width;
        let w = (self.image.width() as usize).min(out_width);
        let h = (self.image.height() as usize).min(out_height);

        for y in 0..h {
            for x in 0..w {
                let [r, g, b, a] = self.image.get_pixel(x as u32, y as u32).0;
                if a == 0 {
                    continue;
                }
                let idx = y * out_width + x;
                out[idx] = blend_packed(out[idx], r, g, b, a);
            }
        }
    }

    /// Glow pass: a Gaussian falloff outside the stroke, like a blurred shadow.
    fn paint_glow(&mut self, path: TrailPath, half_width: f64, sigma: f64, color: Rgba) {
        let reach = half_width + GLOW_REACH_SIGMAS * sigma;
        let denom = 2.0 * sigma * sigma;
        self.paint(path, reach, color, |d| {
            let outside = (d - half_width).max(0.0);
            GLOW_EDGE_STRENGTH * (-(outside * outside) / denom).exp()
        });
    }

    /// Stroke pass: full coverage inside the line, 1px anti-aliased edge.
    fn paint_line(&mut self, path: TrailPath, half_width: f64, color: Rgba) {
        let edge = half_width + 0.5;
        self.paint(path, edge, color, |d| (edge - d).clamp(0.0, 1.0));
    }

    /// Visit every pixel within `reach` of `path`, blending `color` at
    /// `coverage(distance)` of its alpha.
    fn paint(&mut self, path: TrailPath, reach: f64, color: Rgba, coverage: impl Fn(f64) -> f64) {
        let (a, b) = endpoints(path);
        let width = self.image.width() as f64;
        let height = self.image.height() as f64;

        // Bounding box of the stroke, clamped to the canvas
        let x0 = (a.x.min(b.x) - reach).floor().max(0.0);
        let y0 = (a.y.min(b.y) - reach).floor().max(0.0);
        let x1 = (a.x.max(b.x) + reach).ceil().min(width);
        let y1 = (a.y.max(b.y) + reach).ceil().min(height);
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        for y in (y0 as u32)..(y1 as u32) {
            for x in (x0 as u32)..(x1 as u32) {
                // Sample at the pixel center
                let p = Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let d = distance_to(p, a, b);
                if d > reach {
                    continue;
                }
                let alpha = color.a * coverage(d);
                if alpha <= 0.0 {
                    continue;
                }
                blend_pixel(self.image.get_pixel_mut(x, y), color, alpha);
            }
        }
    }
}

impl Surface for Canvas {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.image.width(), self.image.height())
    }

    /// Resizing drops the old contents, like resizing an HTML canvas.
    fn resize(&mut self, viewport: Viewport) {
        self.image = RgbaImage::new(viewport.width, viewport.height);
    }

    fn clear(&mut self) {
        self.image.fill(0);
    }

    fn stroke(&mut self, path: TrailPath, style: &StrokeStyle) {
        let (a, b) = endpoints(path);
        if ![a.x, a.y, b.x, b.y].iter().all(|v| v.is_finite()) {
            return;
        }

        // Non-positive or NaN widths draw nothing; `max` maps NaN to 0
        let half_width = style.line_width.max(0.0) / 2.0;
        if half_width == 0.0 || !half_width.is_finite() {
            return;
        }

        /* 1) Glow underneath (only when blur > 0) */
        let sigma = style.shadow_blur.max(0.0) / 2.0;
        if sigma > 0.0 && sigma.is_finite() && style.shadow_color.a > 0.0 {
            let glow = clamp_alpha(style.shadow_color);
            self.paint_glow(path, half_width, sigma, glow);
        }

        /* 2) The line itself on top */
        if style.color.a > 0.0 {
            self.paint_line(path, half_width, clamp_alpha(style.color));
        }
    }
}

fn endpoints(path: TrailPath) -> (Point, Point) {
    match path {
        TrailPath::Dot(p) => (p, p),
        TrailPath::Segment(a, b) => (a, b),
    }
}

fn clamp_alpha(color: Rgba) -> Rgba {
    Rgba { a: color.a.clamp(0.0, 1.0), ..color }
}

/// Distance from `p` to the segment `a`-`b`. Strokes are round-capped, so a
/// dot (`a == b`) is a disc.
fn distance_to(p: Point, a: Point, b: Point) -> f64 {
    let (abx, aby) = (b.x - a.x, b.y - a.y);
    let len2 = abx * abx + aby * aby;
    let t = if len2 > 0.0 {
        (((p.x - a.x) * abx + (p.y - a.y) * aby) / len2).clamp(0.0, 1.0)
    } else {
        0.0
    };

    let (cx, cy) = (a.x + abx * t, a.y + aby * t);
    ((p.x - cx).powi(2) + (p.y - cy).powi(2)).sqrt()
}

/// Source-over blend of `color` at `alpha` onto a straight-alpha pixel.
#[inline]
fn blend_pixel(dst: &mut Pixel<u8>, color: Rgba, alpha: f64) {
    let sa = alpha.clamp(0.0, 1.0);
    let [dr, dg, db, da] = dst.0;
    let da = da as f64 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    let mix = |s: u8, d: u8| -> u8 {
        let c = (s as f64 * sa + d as f64 * da * (1.0 - sa)) / out_a;
        c.round().clamp(0.0, 255.0) as u8
    };

    dst.0 = [
        mix(color.r, dr),
        mix(color.g, dg),
        mix(color.b, db),
        (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    ];
}

/// Blend a straight-alpha RGBA pixel over an opaque 0x00RRGGBB pixel.
#[inline]
fn blend_packed(dst: u32, r: u8, g: u8, b: u8, a: u8) -> u32 {
    let a = a as u32;
    let mix = |s: u8, shift: u32| -> u32 {
        let d = (dst >> shift) & 0xFF;
        (s as u32 * a + d * (255 - a) + 127) / 255
    };
    (mix(r, 16) << 16) | (mix(g, 8) << 8) | mix(b, 0)
}
