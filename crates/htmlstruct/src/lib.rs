#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

//! Declarative HTML-to-struct extraction
//!
//! Annotate struct fields with XPath selectors and let the builders fill
//! them from a parsed document:
//!
//! ```ignore
//! use htmlstruct::Record;
//!
//! #[derive(Debug, Default, Record)]
//! #[allow(non_snake_case)]
//! struct Product {
//!     #[tag(xpath = ".//h2")]
//!     name: String,
//!     #[tag(xpath = ".//a/@href")]
//!     productID: String,
//! }
//!
//! let products: Vec<Product> =
//!     htmlstruct::build_many_from_text(html, "//div[@class='product']", "xpath")?;
//! ```
//!
//! Fields without a match keep their default value. Fields whose name
//! contains `ID` receive only the last path segment of their text.

extern crate self as htmlstruct;

mod builder;
pub mod resolver;

pub use builder::Extractor;
pub use htmlstruct_core::{
    assign_field, base_name, build_tag_index, is_extractable, normalize, AssignmentError,
    Error, ExtractorConfig, ExtractorConfigBuilder, FieldDescriptor, FieldValue, IdPolicy,
    Record, Result, TagEntry, TagIndex, TagSyntaxError, Tags,
};
pub use htmlstruct_macros::Record;
pub use htmlstruct_xpath::{Document, Node, NodeType, ParseOptions, QueryTree, XPath};

/// The HTML and XPath engine used by the builders
pub use htmlstruct_xpath as xpath;

/// Populate one record from `root`, reading selectors under `key`
///
/// # Errors
///
/// An empty `key`, or one with a character outside `[A-Za-z0-9_.-]`, is
/// rejected with [`Error::Config`] before anything is resolved. The same
/// holds for every free build function.
pub fn build_one<R: Record>(root: Node<'_>, key: &str) -> Result<R> {
    Extractor::with_key(key)?.build_one(root)
}

/// Populate one record per node matched by `selector` under `root`
///
/// An invalid `key` is [`Error::Config`], as for [`build_one`].
pub fn build_many<R: Record>(root: Node<'_>, selector: &str, key: &str) -> Result<Vec<R>> {
    Extractor::with_key(key)?.build_many(root, selector)
}

/// Parse `html` and populate one record from it
///
/// An invalid `key` is [`Error::Config`], as for [`build_one`].
pub fn build_one_from_text<R: Record>(html: &str, key: &str) -> Result<R> {
    Extractor::with_key(key)?.build_one_from_text(html)
}

/// Parse `html` and populate one record per node matched by `selector`
///
/// An invalid `key` is [`Error::Config`], as for [`build_one`].
pub fn build_many_from_text<R: Record>(html: &str, selector: &str, key: &str) -> Result<Vec<R>> {
    Extractor::with_key(key)?.build_many_from_text(html, selector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq, Record)]
    struct Title {
        #[tag(xpath = "//title", css = "title")]
        text: String,
    }

    #[test]
    fn test_derive_inside_crate() {
        let title: Title = build_one_from_text("<title> Home </title>", "xpath").unwrap();
        assert_eq!(title.text, "Home");

        let index = build_tag_index::<Title>("css").unwrap();
        assert_eq!(index.get("text"), Some("title"));
    }

    #[test]
    fn test_invalid_key_is_config_error() {
        for key in ["", "x path", "xpath:"] {
            let err = build_one_from_text::<Title>("<title>Home</title>", key).unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{key:?}: {err:?}");

            let err = build_many_from_text::<Title>("<title>Home</title>", "//title", key)
                .unwrap_err();
            assert!(matches!(err, Error::Config(_)), "{key:?}: {err:?}");
        }

        let doc = Document::parse("<title>Home</title>").unwrap();
        assert!(matches!(build_one::<Title>(doc.root(), ""), Err(Error::Config(_))));
        assert!(matches!(
            build_many::<Title>(doc.root(), "//title", "a b"),
            Err(Error::Config(_))
        ));
    }
}
