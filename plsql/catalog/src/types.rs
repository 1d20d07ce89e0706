use std::fmt;

use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Scalar database type kinds supported as routine parameter and return types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScalarKind {
    Number,
    Varchar,
    Date,
    Timestamp,
    Boolean,
    Clob,
    Blob,
}

impl ScalarKind {
    #[inline]
    pub fn is_lob(&self) -> bool {
        matches!(self, ScalarKind::Clob | ScalarKind::Blob)
    }

    #[inline]
    pub fn is_temporal(&self) -> bool {
        matches!(self, ScalarKind::Date | ScalarKind::Timestamp)
    }
}

impl fmt::Display for ScalarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarKind::Number => write!(f, "NUMBER"),
            ScalarKind::Varchar => write!(f, "VARCHAR2"),
            ScalarKind::Date => write!(f, "DATE"),
            ScalarKind::Timestamp => write!(f, "TIMESTAMP"),
            ScalarKind::Boolean => write!(f, "BOOLEAN"),
            ScalarKind::Clob => write!(f, "CLOB"),
            ScalarKind::Blob => write!(f, "BLOB"),
        }
    }
}

/// One field of a record type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    name: SmolStr,
    ty: TypeDescriptor,
}

impl RecordField {
    #[inline]
    pub fn new(name: impl Into<SmolStr>, ty: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }

    #[inline]
    pub fn name(&self) -> &SmolStr {
        &self.name
    }

    #[inline]
    pub fn ty(&self) -> &TypeDescriptor {
        &self.ty
    }
}

impl fmt::Display for RecordField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.ty)
    }
}

/// A named record type resolved from catalog metadata.
///
/// `package_local` marks types declared inside a package body; those are not
/// usable as call parameter types and binding against them fails.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordType {
    type_name: SmolStr,
    fields: Vec<RecordField>,
    package_local: bool,
}

impl RecordType {
    pub fn new(
        type_name: impl Into<SmolStr>,
        fields: Vec<RecordField>,
        package_local: bool,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            fields,
            package_local,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &SmolStr {
        &self.type_name
    }

    #[inline]
    pub fn fields(&self) -> &[RecordField] {
        &self.fields
    }

    /// Case-insensitive field lookup.
    pub fn field(&self, name: &str) -> Option<&RecordField> {
        self.fields
            .iter()
            .find(|field| field.name.eq_ignore_ascii_case(name))
    }

    #[inline]
    pub fn is_package_local(&self) -> bool {
        self.package_local
    }
}

/// A named collection type resolved from catalog metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionType {
    type_name: SmolStr,
    element: Box<TypeDescriptor>,
    indexed: bool,
    package_local: bool,
}

impl CollectionType {
    pub fn new(
        type_name: impl Into<SmolStr>,
        element: TypeDescriptor,
        indexed: bool,
        package_local: bool,
    ) -> Self {
        Self {
            type_name: type_name.into(),
            element: Box::new(element),
            indexed,
            package_local,
        }
    }

    #[inline]
    pub fn type_name(&self) -> &SmolStr {
        &self.type_name
    }

    #[inline]
    pub fn element(&self) -> &TypeDescriptor {
        &self.element
    }

    /// True for index-by (associative) tables, false for nested tables and
    /// varrays.
    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.indexed
    }

    #[inline]
    pub fn is_package_local(&self) -> bool {
        self.package_local
    }
}

/// The resolved type of one routine parameter or return slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeDescriptor {
    Scalar(ScalarKind),
    Record(RecordType),
    Collection(CollectionType),
}

impl TypeDescriptor {
    /// Whether a value of this type can be bound as a call parameter.
    ///
    /// Record and collection types declared inside a package body are only
    /// visible to code in that package and cannot cross the call boundary.
    pub fn is_callable(&self) -> bool {
        match self {
            TypeDescriptor::Scalar(_) => true,
            TypeDescriptor::Record(record) => {
                !record.is_package_local()
                    && record.fields().iter().all(|field| field.ty().is_callable())
            }
            TypeDescriptor::Collection(collection) => {
                !collection.is_package_local() && collection.element().is_callable()
            }
        }
    }

    #[inline]
    pub fn as_scalar(&self) -> Option<ScalarKind> {
        match self {
            TypeDescriptor::Scalar(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl From<ScalarKind> for TypeDescriptor {
    #[inline]
    fn from(kind: ScalarKind) -> Self {
        TypeDescriptor::Scalar(kind)
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeDescriptor::Scalar(kind) => write!(f, "{kind}"),
            TypeDescriptor::Record(record) => {
                write!(
                    f,
                    "{} ({})",
                    record.type_name(),
                    record.fields().iter().join(", ")
                )
            }
            TypeDescriptor::Collection(collection) => {
                write!(
                    f,
                    "{} (TABLE OF {})",
                    collection.type_name(),
                    collection.element()
                )
            }
        }
    }
}
