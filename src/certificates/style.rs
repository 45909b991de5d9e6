use image::Rgba;
use std::str::FromStr;

use crate::fonts::DEFAULT_FONT_FAMILY;

pub const DEFAULT_FONT_SIZE: f32 = 80.0;
/// Glyph rasterization cost grows with the square of the size.
pub const MAX_FONT_SIZE: f32 = 1000.0;
pub const DEFAULT_FONT_COLOR: &str = "gold";

/// Form field names that carry styling.
pub const STYLE_FIELDS: [&str; 5] = ["fontFamily", "fontSize", "fontColor", "xPosition", "yPosition"];

/// Styling fields exactly as they arrived in the form.
#[derive(Debug, Default, Clone)]
pub struct StyleForm {
    pub font_family: Option<String>,
    pub font_size: Option<String>,
    pub font_color: Option<String>,
    pub x_position: Option<String>,
    pub y_position: Option<String>,
}

impl StyleForm {
    /// Records a form field; names outside `STYLE_FIELDS` are ignored.
    pub fn set(&mut self, field: &str, value: String) {
        let slot = match field {
            "fontFamily" => &mut self.font_family,
            "fontSize" => &mut self.font_size,
            "fontColor" => &mut self.font_color,
            "xPosition" => &mut self.x_position,
            "yPosition" => &mut self.y_position,
            _ => return,
        };
        *slot = Some(value);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub font_family: String,
    pub font_size: f32,
    pub color: Rgba<u8>,
    /// Left edge of the text.
    pub x: i32,
    /// Baseline of the text.
    pub y: i32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: DEFAULT_FONT_SIZE,
            color: gold(),
            x: 0,
            y: 0,
        }
    }
}

impl From<StyleForm> for Style {
    fn from(form: StyleForm) -> Self {
        let font_family = form
            .font_family
            .map(|f| f.trim().to_string())
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| DEFAULT_FONT_FAMILY.to_string());

        let font_size = form
            .font_size
            .as_deref()
            .and_then(|s| s.trim().parse::<f32>().ok())
            .filter(|s| s.is_finite() && *s > 0.0)
            .map(clamp_font_size)
            .unwrap_or(DEFAULT_FONT_SIZE);

        let color = match form.font_color.as_deref().map(str::trim) {
            None | Some("") => gold(),
            Some(spec) => parse_color(spec).unwrap_or_else(|| {
                tracing::warn!("Unrecognized font color {:?}; using {}", spec, DEFAULT_FONT_COLOR);
                gold()
            }),
        };

        Self {
            font_family,
            font_size,
            color,
            x: parse_position(form.x_position.as_deref()),
            y: parse_position(form.y_position.as_deref()),
        }
    }
}

/// Parses any CSS color: names, hex, `rgb()`, `rgba()`, `hsl()`.
pub fn parse_color(spec: &str) -> Option<Rgba<u8>> {
    svgtypes::Color::from_str(spec)
        .ok()
        .map(|c| Rgba([c.red, c.green, c.blue, c.alpha]))
}

/// Caps finite sizes at `MAX_FONT_SIZE`; anything unusable becomes the default.
pub fn clamp_font_size(size: f32) -> f32 {
    if !size.is_finite() || size <= 0.0 {
        return DEFAULT_FONT_SIZE;
    }
    if size > MAX_FONT_SIZE {
        tracing::warn!("Font size {} exceeds {}px; clamping", size, MAX_FONT_SIZE);
        return MAX_FONT_SIZE;
    }
    size
}

fn gold() -> Rgba<u8> {
    Rgba([255, 215, 0, 255])
}

/// Integer position; decimals truncate, anything else is 0.
fn parse_position(raw: Option<&str>) -> i32 {
    let Some(raw) = raw.map(str::trim) else {
        return 0;
    };
    if let Ok(v) = raw.parse::<i32>() {
        return v;
    }
    match raw.parse::<f64>() {
        Ok(v) if v.is_finite() => v.trunc().clamp(i32::MIN as f64, i32::MAX as f64) as i32,
        _ => 0,
    }
}
