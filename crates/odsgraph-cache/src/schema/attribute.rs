//! Attribute definitions.

use odsgraph_core::{DataType, InstanceId};
use serde::{Deserialize, Serialize};

/// A request to add an attribute to a type.
///
/// # Example
///
/// ```
/// use odsgraph_cache::schema::AttributeDef;
/// use odsgraph_core::{DataKind, DataType};
///
/// // Derived from a base attribute: data type comes from the base model.
/// let name = AttributeDef::new("iname").with_base("name");
///
/// // Free attribute with an explicit data type.
/// let comment = AttributeDef::new("comment")
///     .with_data_type(DataType::scalar(DataKind::String))
///     .with_length(1024);
/// # let _ = (name, comment);
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AttributeDef {
    /// Attribute name, unique within the type.
    pub name: String,
    /// Base attribute to derive from, if any.
    pub base_attribute: Option<String>,
    /// Explicit data type; must agree with the base attribute if both are set.
    pub data_type: Option<DataType>,
    /// Explicit length; the data type's default otherwise.
    pub length: Option<u32>,
    /// Obligatory flag.
    pub obligatory: bool,
    /// Unique flag.
    pub unique: bool,
    /// Autogenerated flag.
    pub autogenerated: bool,
    /// Enumeration name for enum-typed attributes.
    pub enum_type: Option<String>,
    /// Unit instance the values are expressed in.
    pub unit: Option<InstanceId>,
}

impl AttributeDef {
    /// Start a definition with just a name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ..Self::default() }
    }

    /// Derive from a base attribute.
    #[must_use]
    pub fn with_base(mut self, base_attribute: impl Into<String>) -> Self {
        self.base_attribute = Some(base_attribute.into());
        self
    }

    /// Set the data type.
    #[must_use]
    pub const fn with_data_type(mut self, data_type: DataType) -> Self {
        self.data_type = Some(data_type);
        self
    }

    /// Set the length.
    #[must_use]
    pub const fn with_length(mut self, length: u32) -> Self {
        self.length = Some(length);
        self
    }

    /// Set the obligatory flag.
    #[must_use]
    pub const fn obligatory(mut self, obligatory: bool) -> Self {
        self.obligatory = obligatory;
        self
    }

    /// Set the unique flag.
    #[must_use]
    pub const fn unique(mut self, unique: bool) -> Self {
        self.unique = unique;
        self
    }

    /// Set the autogenerated flag.
    #[must_use]
    pub const fn autogenerated(mut self, autogenerated: bool) -> Self {
        self.autogenerated = autogenerated;
        self
    }

    /// Set the enumeration name.
    #[must_use]
    pub fn with_enum_type(mut self, enum_type: impl Into<String>) -> Self {
        self.enum_type = Some(enum_type.into());
        self
    }

    /// Set the unit.
    #[must_use]
    pub const fn with_unit(mut self, unit: InstanceId) -> Self {
        self.unit = Some(unit);
        self
    }
}

/// An attribute as stored in the catalog.
///
/// The `obligatory` field holds the stored flag only; whether the attribute
/// is effectively obligatory also depends on the base model, see
/// [`TypeCatalog::is_obligatory`](super::TypeCatalog::is_obligatory).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub(crate) name: String,
    pub(crate) base_attribute: Option<String>,
    pub(crate) data_type: Option<DataType>,
    pub(crate) length: u32,
    pub(crate) obligatory: bool,
    pub(crate) unique: bool,
    pub(crate) autogenerated: bool,
    pub(crate) enum_type: Option<String>,
    pub(crate) unit: Option<InstanceId>,
}

impl Attribute {
    /// The attribute name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Canonical name of the base attribute this derives from.
    #[must_use]
    pub fn base_attribute(&self) -> Option<&str> {
        self.base_attribute.as_deref()
    }

    /// Returns `true` if derived from a base attribute.
    #[must_use]
    pub const fn is_derived(&self) -> bool {
        self.base_attribute.is_some()
    }

    /// The data type, `None` while still unknown.
    #[must_use]
    pub const fn data_type(&self) -> Option<DataType> {
        self.data_type
    }

    /// The length.
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// The stored obligatory flag.
    #[must_use]
    pub const fn obligatory_flag(&self) -> bool {
        self.obligatory
    }

    /// The unique flag.
    #[must_use]
    pub const fn is_unique(&self) -> bool {
        self.unique
    }

    /// The autogenerated flag.
    #[must_use]
    pub const fn is_autogenerated(&self) -> bool {
        self.autogenerated
    }

    /// The enumeration name.
    #[must_use]
    pub fn enum_type(&self) -> Option<&str> {
        self.enum_type.as_deref()
    }

    /// The unit instance.
    #[must_use]
    pub const fn unit(&self) -> Option<InstanceId> {
        self.unit
    }
}
