//! Default values and functions for configuration

// Default constants
pub const DEFAULT_ANNOTATION_KEY: &str = "xpath";

pub(crate) fn default_annotation_key() -> String {
    DEFAULT_ANNOTATION_KEY.to_string()
}

pub(crate) fn default_strict_html() -> bool {
    false
}
