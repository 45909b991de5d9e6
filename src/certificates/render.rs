use image::{imageops, ImageFormat, Rgba, RgbaImage};
use rusttype::{point, Font, Scale};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::style::{clamp_font_size, Style};
use crate::error::AppError;
use crate::fonts::{FontResolver, DEFAULT_FONT_FAMILY};
use crate::storage::sanitize_file_name;

/// Draws participant names onto copies of one template.
pub struct CertificateRenderer {
    template: RgbaImage,
    font: Arc<Font<'static>>,
    style: Style,
}

impl CertificateRenderer {
    /// Decodes the template and resolves the font up front so a bad
    /// template or empty registry fails before anything is written.
    pub fn new(
        template_bytes: &[u8],
        mut style: Style,
        fonts: &dyn FontResolver,
    ) -> Result<Self, AppError> {
        style.font_size = clamp_font_size(style.font_size);
        let template = image::load_from_memory(template_bytes)?.to_rgba8();
        let font = resolve_font(fonts, &style.font_family)?;
        Ok(Self {
            template,
            font,
            style,
        })
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.template.dimensions()
    }

    /// Renders one certificate in memory.
    pub fn render(&self, name: &str) -> RgbaImage {
        let (width, height) = self.template.dimensions();
        let mut canvas = RgbaImage::new(width, height);
        imageops::overlay(&mut canvas, &self.template, 0, 0);

        draw_text(
            &mut canvas,
            &self.font,
            self.style.font_size,
            self.style.x,
            self.style.y,
            self.style.color,
            name,
        );
        canvas
    }

    /// Renders `name` and writes it as `<name>.png` into `out_dir`.
    /// An existing file with the same name is overwritten.
    pub fn write_certificate(&self, name: &str, out_dir: &Path) -> Result<PathBuf, AppError> {
        let path = out_dir.join(format!("{}.png", sanitize_file_name(name)));
        self.render(name).save_with_format(&path, ImageFormat::Png)?;
        Ok(path)
    }

    /// Renders every name in order; the first failure aborts the batch.
    pub fn write_all(&self, names: &[String], out_dir: &Path) -> Result<Vec<PathBuf>, AppError> {
        let mut written = Vec::with_capacity(names.len());
        for name in names {
            let path = self.write_certificate(name, out_dir)?;
            tracing::debug!("Wrote certificate {}", path.display());
            written.push(path);
        }
        Ok(written)
    }
}

fn resolve_font(fonts: &dyn FontResolver, family: &str) -> Result<Arc<Font<'static>>, AppError> {
    if let Some(font) = fonts.resolve(family) {
        return Ok(font);
    }
    tracing::warn!("Font family {:?} is not registered; falling back", family);
    fonts
        .resolve(DEFAULT_FONT_FAMILY)
        .or_else(|| fonts.fallback())
        .ok_or_else(|| AppError::NoFont(family.to_string()))
}

/// Draws `text` with its baseline at `y`, starting at `x`, blending
/// source-over and clipping to the canvas.
fn draw_text(
    img: &mut RgbaImage,
    font: &Font<'static>,
    px: f32,
    x: i32,
    y: i32,
    color: Rgba<u8>,
    text: &str,
) {
    let scale = Scale::uniform(px);
    let color_alpha = color.0[3] as f32 / 255.0;

    for glyph in font.layout(text, scale, point(x as f32, y as f32)) {
        let Some(bb) = glyph.pixel_bounding_box() else {
            continue;
        };
        if bb.max.x <= 0
            || bb.max.y <= 0
            || bb.min.x >= img.width() as i32
            || bb.min.y >= img.height() as i32
        {
            continue;
        }
        glyph.draw(|gx, gy, coverage| {
            let px = gx as i32 + bb.min.x;
            let py = gy as i32 + bb.min.y;
            if px < 0 || py < 0 || px as u32 >= img.width() || py as u32 >= img.height() {
                return;
            }
            let sa = coverage.clamp(0.0, 1.0) * color_alpha;
            if sa <= 0.0 {
                return;
            }
            blend(img.get_pixel_mut(px as u32, py as u32), color, sa);
        });
    }
}

fn blend(dst: &mut Rgba<u8>, src: Rgba<u8>, sa: f32) {
    let da = dst.0[3] as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);
    if out_a <= 0.0 {
        return;
    }
    for c in 0..3 {
        let s = src.0[c] as f32;
        let d = dst.0[c] as f32;
        dst.0[c] = ((s * sa + d * da * (1.0 - sa)) / out_a).round().clamp(0.0, 255.0) as u8;
    }
    dst.0[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}
