use rusttype::Font;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

/// Family used when the requested one is not registered.
pub const DEFAULT_FONT_FAMILY: &str = "Lato";

const FONT_EXTENSIONS: [&str; 2] = ["ttf", "otf"];

/// Looks up a loaded font by family name.
pub trait FontResolver: Send + Sync {
    fn resolve(&self, family: &str) -> Option<Arc<Font<'static>>>;

    /// Any font at all, for when neither the requested nor the default family exists.
    fn fallback(&self) -> Option<Arc<Font<'static>>>;
}

/// Immutable set of fonts keyed by family name.
#[derive(Default)]
pub struct FontRegistry {
    fonts: BTreeMap<String, Arc<Font<'static>>>,
}

impl FontRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers every `.ttf`/`.otf` file in `dir` under its file stem.
    ///
    /// A missing directory yields an empty registry. Unreadable or
    /// unparsable files are skipped with a warning.
    pub fn load_dir(dir: &Path) -> Self {
        let mut registry = Self::new();

        let Ok(rd) = std::fs::read_dir(dir) else {
            tracing::warn!("Font directory {} not found; no fonts registered", dir.display());
            return registry;
        };

        for entry in rd.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(ext) = path.extension().and_then(|s| s.to_str()) else {
                continue;
            };
            if !FONT_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()) {
                continue;
            }
            let Some(family) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let data = match std::fs::read(&path) {
                Ok(d) => d,
                Err(e) => {
                    tracing::warn!("Skipping font {}: {}", path.display(), e);
                    continue;
                }
            };
            match Font::try_from_vec(data) {
                Some(font) => registry.register(family, font),
                None => tracing::warn!("Skipping font {}: not a usable font file", path.display()),
            }
        }

        if registry.is_empty() {
            tracing::warn!("No usable fonts in {}", dir.display());
            return registry;
        }

        tracing::info!(
            "Registered {} font(s) from {}: {:?}",
            registry.len(),
            dir.display(),
            registry.families().collect::<Vec<_>>()
        );
        registry
    }

    pub fn register(&mut self, family: &str, font: Font<'static>) {
        self.fonts.insert(family.to_string(), Arc::new(font));
    }

    pub fn families(&self) -> impl Iterator<Item = &str> {
        self.fonts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.fonts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fonts.is_empty()
    }
}

impl FontResolver for FontRegistry {
    fn resolve(&self, family: &str) -> Option<Arc<Font<'static>>> {
        let family = family.trim();
        self.fonts.get(family).cloned().or_else(|| {
            self.fonts
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(family))
                .map(|(_, font)| font.clone())
        })
    }

    fn fallback(&self) -> Option<Arc<Font<'static>>> {
        self.fonts.values().next().cloned()
    }
}
