//! Single- and multi-entity builders

use crate::resolver::{compile_fields, resolve_all, resolve_one, FieldSelector};
use htmlstruct_core::error::{Error, Result};
use htmlstruct_core::{ExtractorConfig, FieldValue, IdPolicy, Record, TagIndex};
use htmlstruct_xpath::{Document, Node, ParseOptions, QueryTree, XPath};
use std::any::type_name;
use tracing::{debug, trace};

/// Populates records from HTML according to their field annotations
///
/// An extractor is immutable after construction and can be shared across
/// threads; every build call owns the records it produces.
#[derive(Debug, Clone, Default)]
pub struct Extractor {
    config: ExtractorConfig,
}

impl Extractor {
    /// Create an extractor from a validated configuration
    pub fn new(config: ExtractorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Extractor with default settings reading selectors from `key`
    pub fn with_key(key: &str) -> Result<Self> {
        Self::new(ExtractorConfig::with_key(key))
    }

    pub fn config(&self) -> &ExtractorConfig {
        &self.config
    }

    /// Parse HTML text with this extractor's parse settings
    pub fn parse(&self, html: &str) -> Result<Document> {
        let options = ParseOptions {
            strict: self.config.strict_html,
            max_document_bytes: self.config.max_document_bytes,
        };
        Document::parse_with(html, &options)
    }

    /// Field selectors of `R` under the configured key, compiled once
    fn plan<R: Record>(&self) -> Result<Vec<FieldSelector>> {
        let index = TagIndex::from_fields(R::fields(), &self.config.annotation_key)?;
        let plan = compile_fields(&index)?;
        debug!(
            record = type_name::<R>(),
            key = %self.config.annotation_key,
            tagged = index.len(),
            extracted = plan.len(),
            "built tag index"
        );
        Ok(plan)
    }

    /// Populate one record from `root`
    ///
    /// Fields whose selector matches nothing, or whose text is blank, keep
    /// their default value. A value that cannot be assigned fails the build.
    pub fn build_one<R: Record>(&self, root: Node<'_>) -> Result<R> {
        let plan = self.plan::<R>()?;
        root.document().query(|tree| fill(&plan, tree, root, self.config.id_policy))
    }

    /// Populate one record per node matched by `selector` under `root`
    ///
    /// Records are returned in document order of their matched nodes, and
    /// field selectors are evaluated relative to each matched node. Any
    /// assignment failure aborts the whole build.
    pub fn build_many<R: Record>(&self, root: Node<'_>, selector: &str) -> Result<Vec<R>> {
        let plan = self.plan::<R>()?;
        let collection = XPath::compile(selector)?;
        root.document().query(|tree| {
            let scopes = resolve_all(tree, root, &collection)?;
            debug!(
                record = type_name::<R>(),
                selector,
                matched = scopes.len(),
                "resolved collection selector"
            );

            let mut records = Vec::with_capacity(scopes.len());
            for scope in scopes {
                records.push(fill(&plan, tree, scope, self.config.id_policy)?);
            }
            Ok(records)
        })
    }

    /// Parse `html` and populate one record from its root
    pub fn build_one_from_text<R: Record>(&self, html: &str) -> Result<R> {
        let document = self.parse(html)?;
        self.build_one(document.root())
    }

    /// Parse `html` and populate one record per node matched by `selector`
    pub fn build_many_from_text<R: Record>(&self, html: &str, selector: &str) -> Result<Vec<R>> {
        let document = self.parse(html)?;
        self.build_many(document.root(), selector)
    }
}

fn fill<'doc, R: Record>(
    plan: &[FieldSelector],
    tree: &QueryTree<'doc, '_>,
    scope: Node<'doc>,
    policy: IdPolicy,
) -> Result<R> {
    let mut record = R::default();
    for FieldSelector { field, xpath } in plan {
        let Some(node) = resolve_one(tree, scope, xpath)? else {
            trace!(field = field.name, selector = %xpath, "no match");
            continue;
        };
        let text = node.inner_text();
        if text.trim().is_empty() {
            trace!(field = field.name, selector = %xpath, "blank text");
            continue;
        }
        let value = policy.normalize(field, &text);
        trace!(field = field.name, value = %value, "assigning field");
        record
            .assign_field(field.name, FieldValue::from(value))
            .map_err(|source| Error::extraction(field.name, source))?;
    }
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use htmlstruct_core::{AssignmentError, FieldDescriptor};
    use pretty_assertions::assert_eq;

    #[derive(Debug, Default, PartialEq)]
    struct Headline {
        title: String,
        rank: u32,
    }

    impl Record for Headline {
        fn fields() -> &'static [FieldDescriptor] {
            static FIELDS: [FieldDescriptor; 2] = [
                FieldDescriptor::new("title", "String").with_tag(r#"xpath:".//h1""#),
                FieldDescriptor::new("rank", "u32").with_tag(r#"xpath:".//b""#),
            ];
            &FIELDS
        }

        fn assign_field(
            &mut self,
            field: &str,
            value: FieldValue,
        ) -> std::result::Result<(), AssignmentError> {
            match field {
                "title" => self.title = value.assign_to(field)?,
                "rank" => self.rank = value.assign_to(field)?,
                _ => return Err(AssignmentError::unknown_field(field)),
            }
            Ok(())
        }
    }

    #[test]
    fn test_fill_with_hand_written_record() {
        let extractor = Extractor::default();
        let headline: Headline = extractor
            .build_one_from_text("<h1> Breaking </h1>")
            .unwrap();
        assert_eq!(
            headline,
            Headline {
                title: "Breaking".to_string(),
                rank: 0,
            }
        );
    }

    #[test]
    fn test_mismatch_is_extraction_error() {
        let extractor = Extractor::default();
        let err = extractor
            .build_one_from_text::<Headline>("<h1>x</h1><b>1</b>")
            .unwrap_err();
        match &err {
            Error::Extraction { field, source } => {
                assert_eq!(field, "rank");
                assert_eq!(source.field(), "rank");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(err.assignment_error().is_some());
    }

    #[test]
    fn test_invalid_key_is_rejected() {
        assert!(Extractor::with_key("").is_err());
        assert!(Extractor::with_key("xpath").is_ok());
    }
}
