pub mod catalog;
pub mod registry;

pub use catalog::fetch_catalog;
pub use registry::{FontRegistry, FontResolver, DEFAULT_FONT_FAMILY};
