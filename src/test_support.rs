//! Shared fixtures for the in-crate tests.

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request};
use axum::Router;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

use crate::config::{Config, DEFAULT_FONTS_API_URL};
use crate::fonts::FontRegistry;
use crate::routes::build_router;
use crate::state::AppState;

const FONT_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/noto/NotoSans-Regular.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// First TrueType font found on this machine, if any.
pub fn system_font() -> Option<PathBuf> {
    FONT_CANDIDATES
        .iter()
        .map(PathBuf::from)
        .find(|p| p.is_file())
}

pub fn registry_with_system_font(family: &str) -> Option<(TempDir, FontRegistry)> {
    let font = system_font()?;
    let dir = tempfile::tempdir().ok()?;
    std::fs::copy(font, dir.path().join(format!("{}.ttf", family))).ok()?;
    let registry = FontRegistry::load_dir(dir.path());
    Some((dir, registry))
}

/// Opaque white PNG.
pub fn png_template(width: u32, height: u32) -> Vec<u8> {
    let img = RgbaImage::from_pixel(width, height, Rgba([255, 255, 255, 255]));
    let mut buf = Vec::new();
    DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .unwrap();
    buf
}

pub struct TestDirs {
    pub root: TempDir,
}

impl TestDirs {
    pub fn fonts_dir(&self) -> PathBuf {
        self.root.path().join("fonts")
    }

    pub fn work_dir(&self) -> PathBuf {
        self.root.path().join("work")
    }

    /// Copies a system font into the fonts directory; false when none exists.
    pub fn install_system_font(&self, family: &str) -> bool {
        let Some(font) = system_font() else {
            return false;
        };
        std::fs::create_dir_all(self.fonts_dir()).unwrap();
        std::fs::copy(font, self.fonts_dir().join(format!("{}.ttf", family))).unwrap();
        true
    }

    /// True when no request workspace is left behind.
    pub fn work_is_empty(&self) -> bool {
        dir_is_empty(&self.work_dir())
    }
}

fn dir_is_empty(dir: &Path) -> bool {
    std::fs::read_dir(dir).map(|mut rd| rd.next().is_none()).unwrap_or(true)
}

pub fn test_app(configure: impl FnOnce(&mut Config)) -> (TestDirs, Router) {
    let dirs = TestDirs {
        root: tempfile::tempdir().unwrap(),
    };
    let mut config = Config {
        host: "127.0.0.1".into(),
        port: 0,
        fonts_dir: dirs.fonts_dir(),
        work_dir: dirs.work_dir(),
        static_dir: dirs.root.path().join("public"),
        fonts_api_key: None,
        fonts_api_url: DEFAULT_FONTS_API_URL.into(),
        max_upload_bytes: 10 * 1024 * 1024,
    };
    configure(&mut config);

    let state = Arc::new(AppState {
        config: Arc::new(config),
        http: reqwest::Client::new(),
    });
    (dirs, build_router(state))
}

pub fn get_req(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_bytes(resp: axum::response::Response) -> Vec<u8> {
    to_bytes(resp.into_body(), 64 * 1024 * 1024)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(resp: axum::response::Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(resp).await).unwrap()
}

/// Hand-built `multipart/form-data` request body.
pub struct MultipartBuilder {
    boundary: String,
    body: Vec<u8>,
}

impl MultipartBuilder {
    pub fn new() -> Self {
        Self {
            boundary: "----certgen-test-boundary".into(),
            body: Vec::new(),
        }
    }

    pub fn file(mut self, name: &str, file_name: &str, data: &[u8]) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
                self.boundary, name, file_name
            )
            .as_bytes(),
        );
        self.body.extend_from_slice(data);
        self.body.extend_from_slice(b"\r\n");
        self
    }

    pub fn text(mut self, name: &str, value: &str) -> Self {
        self.body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"\r\n\r\n{}\r\n",
                self.boundary, name, value
            )
            .as_bytes(),
        );
        self
    }

    pub fn into_request(mut self, uri: &str) -> Request<Body> {
        self.body
            .extend_from_slice(format!("--{}--\r\n", self.boundary).as_bytes());
        Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(
                "content-type",
                format!("multipart/form-data; boundary={}", self.boundary),
            )
            .body(Body::from(self.body))
            .unwrap()
    }
}
