use std::path::PathBuf;

pub const DEFAULT_FONTS_API_URL: &str = "https://www.googleapis.com/webfonts/v1/webfonts";
const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub fonts_dir: PathBuf,
    pub work_dir: PathBuf,
    pub static_dir: PathBuf,
    pub fonts_api_key: Option<String>,
    pub fonts_api_url: String,
    pub max_upload_bytes: usize,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        dotenvy::dotenv().ok();

        let base_dir = std::env::current_dir()?;
        let fonts_dir =
            base_dir.join(std::env::var("FONTS_DIR").unwrap_or_else(|_| "fonts".to_string()));
        let work_dir =
            base_dir.join(std::env::var("WORK_DIR").unwrap_or_else(|_| "tmp".to_string()));
        let static_dir =
            base_dir.join(std::env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()));

        // Optional: /fonts answers 500 without it, generation still works.
        let fonts_api_key = std::env::var("GOOGLE_FONTS_API_KEY")
            .ok()
            .filter(|k| !k.trim().is_empty());
        let fonts_api_url = std::env::var("GOOGLE_FONTS_API_URL")
            .unwrap_or_else(|_| DEFAULT_FONTS_API_URL.to_string());

        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "5000".to_string())
            .parse()
            .unwrap_or(5000);
        let max_upload_bytes = std::env::var("MAX_UPLOAD_BYTES")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_MAX_UPLOAD_BYTES);

        Ok(Self {
            host,
            port,
            fonts_dir,
            work_dir,
            static_dir,
            fonts_api_key,
            fonts_api_url,
            max_upload_bytes,
        })
    }
}
