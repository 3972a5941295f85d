//! Text normalization applied between resolution and assignment

use crate::record::FieldDescriptor;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// Marker that makes a field name eligible for basename reduction
pub const ID_MARKER: &str = "ID";

/// Which fields get their value reduced to the final path segment
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum IdPolicy {
    /// Field name contains `"ID"` (case-sensitive)
    #[default]
    NameContainsId,
    /// Field descriptor is flagged `basename`
    Annotated,
    /// Either of the above
    NameOrAnnotated,
    /// Never reduce
    Disabled,
}

impl IdPolicy {
    /// Whether `field` gets basename reduction under this policy
    pub fn applies(self, field: &FieldDescriptor) -> bool {
        match self {
            Self::NameContainsId => field.name.contains(ID_MARKER),
            Self::Annotated => field.basename,
            Self::NameOrAnnotated => field.name.contains(ID_MARKER) || field.basename,
            Self::Disabled => false,
        }
    }

    /// Trim `raw` and apply basename reduction when the policy covers `field`
    pub fn normalize(self, field: &FieldDescriptor, raw: &str) -> String {
        let trimmed = raw.trim();
        if self.applies(field) {
            base_name(trimmed).to_string()
        } else {
            trimmed.to_string()
        }
    }
}

/// Trim `raw`; fields whose name contains `"ID"` keep only the last path segment
pub fn normalize(field_name: &str, raw: &str) -> String {
    let trimmed = raw.trim();
    if field_name.contains(ID_MARKER) {
        base_name(trimmed).to_string()
    } else {
        trimmed.to_string()
    }
}

/// Last `/`-separated element of a path
///
/// Trailing slashes are ignored. An empty path yields `"."` and a path made
/// only of slashes yields `"/"`.
pub fn base_name(path: &str) -> &str {
    if path.is_empty() {
        return ".";
    }
    let stripped = path.trim_end_matches('/');
    if stripped.is_empty() {
        return "/";
    }
    match stripped.rfind('/') {
        Some(idx) => &stripped[idx + 1..],
        None => stripped,
    }
}
