//! Record capability: static field descriptors plus name-based assignment
//!
//! A record type describes its fields once, at compile time, and accepts
//! dynamically typed values by field name. `#[derive(Record)]` from the
//! `htmlstruct` crate generates the implementation; hand-written impls work
//! the same way.

use crate::error::AssignmentError;
use std::any::{type_name, Any};
use std::fmt;

/// Static description of one declared field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Field identifier as declared
    pub name: &'static str,
    /// Declared type, as written in the source
    pub type_name: &'static str,
    /// Raw annotation string in the `key:"value"` grammar (empty when absent)
    pub tag: &'static str,
    /// Field is explicitly marked for path-basename reduction
    pub basename: bool,
}

impl FieldDescriptor {
    /// Descriptor with no annotation and no basename flag
    pub const fn new(name: &'static str, type_name: &'static str) -> Self {
        Self {
            name,
            type_name,
            tag: "",
            basename: false,
        }
    }

    /// Same descriptor with the given raw annotation
    pub const fn with_tag(mut self, tag: &'static str) -> Self {
        self.tag = tag;
        self
    }

    /// Same descriptor marked for basename reduction
    pub const fn with_basename(mut self) -> Self {
        self.basename = true;
        self
    }
}

/// A user-defined structured type that can be filled field by field
///
/// `Default` provides the zero-valued instance every build starts from.
pub trait Record: Default {
    /// Declared fields, in declaration order
    fn fields() -> &'static [FieldDescriptor];

    /// Store `value` into the field called `field`
    ///
    /// Fails without touching `self` when the field does not exist or the
    /// value's type is not assignable to the field's declared type.
    fn assign_field(&mut self, field: &str, value: FieldValue) -> Result<(), AssignmentError>;

    /// Look up a descriptor by exact field name
    fn field(name: &str) -> Option<&'static FieldDescriptor> {
        Self::fields().iter().find(|f| f.name == name)
    }
}

/// Assign `value` to the field named `field` on `dst`
pub fn assign_field<R: Record>(
    field: &str,
    dst: &mut R,
    value: impl Into<FieldValue>,
) -> Result<(), AssignmentError> {
    dst.assign_field(field, value.into())
}

/// A value whose concrete type is only known at run time
pub struct FieldValue {
    value: Box<dyn Any + Send>,
    type_name: &'static str,
}

impl FieldValue {
    /// Wrap any owned value
    pub fn new<T: Any + Send>(value: T) -> Self {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
        }
    }

    /// Fully qualified name of the wrapped value's type
    pub fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether the wrapped value is a `T`
    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    /// Take the wrapped value out as a `T`, or give `self` back unchanged
    pub fn downcast<T: Any>(self) -> Result<T, Self> {
        let type_name = self.type_name;
        match self.value.downcast::<T>() {
            Ok(value) => Ok(*value),
            Err(value) => Err(Self { value, type_name }),
        }
    }

    /// Take the value out for a field of type `T`
    ///
    /// Used by generated `assign_field` implementations.
    pub fn assign_to<T: Any>(self, field: &str) -> Result<T, AssignmentError> {
        self.downcast::<T>().map_err(|value| {
            AssignmentError::type_mismatch(field, value.type_name(), type_name::<T>())
        })
    }

    /// Take the value out for a field of type `Option<T>`
    ///
    /// Accepts either an `Option<T>` or a bare `T`.
    pub fn assign_to_option<T: Any>(self, field: &str) -> Result<Option<T>, AssignmentError> {
        match self.downcast::<Option<T>>() {
            Ok(value) => Ok(value),
            Err(value) => value.downcast::<T>().map(Some).map_err(|value| {
                AssignmentError::type_mismatch(field, value.type_name(), type_name::<Option<T>>())
            }),
        }
    }
}

impl fmt::Debug for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldValue")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::new(value.to_string())
    }
}
