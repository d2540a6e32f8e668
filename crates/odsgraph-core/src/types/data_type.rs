//! Data kinds and data types of attributes and values.
//!
//! A [`DataType`] is a [`DataKind`] plus a flag telling whether the value is a
//! single scalar or a sequence of scalars. The textual form follows the usual
//! ODS spelling: `DT_` prefixes scalars and `DS_` prefixes sequences.
//!
//! # Example
//!
//! ```
//! use odsgraph_core::{DataKind, DataType};
//!
//! let dt: DataType = "DS_DOUBLE".parse().unwrap();
//! assert_eq!(dt, DataType::sequence(DataKind::Float64));
//! assert_eq!(dt.to_string(), "DS_DOUBLE");
//! assert_eq!(DataType::scalar(DataKind::String).default_length(), 254);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

/// The element kind carried by an attribute or value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataKind {
    /// Boolean flag.
    Boolean,
    /// Unsigned 8-bit integer.
    Byte,
    /// Signed 16-bit integer.
    Short,
    /// Signed 32-bit integer.
    Int32,
    /// Signed 64-bit integer.
    Int64,
    /// 32-bit floating point number.
    Float32,
    /// 64-bit floating point number.
    Float64,
    /// UTF-8 text.
    String,
    /// Date encoded as a string (`YYYYMMDDhhmmss...`).
    Date,
    /// Index into an enumeration.
    Enum,
    /// Raw byte string.
    ByteStr,
    /// Binary large object with a textual header.
    Blob,
    /// Reference to data held outside the model.
    ExternalReference,
    /// Complex number with 32-bit parts.
    Complex,
    /// Complex number with 64-bit parts.
    DComplex,
}

impl DataKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 15] = [
        Self::Boolean,
        Self::Byte,
        Self::Short,
        Self::Int32,
        Self::Int64,
        Self::Float32,
        Self::Float64,
        Self::String,
        Self::Date,
        Self::Enum,
        Self::ByteStr,
        Self::Blob,
        Self::ExternalReference,
        Self::Complex,
        Self::DComplex,
    ];

    /// The ODS suffix used in `DT_`/`DS_` names.
    #[must_use]
    pub const fn ods_suffix(self) -> &'static str {
        match self {
            Self::Boolean => "BOOLEAN",
            Self::Byte => "BYTE",
            Self::Short => "SHORT",
            Self::Int32 => "LONG",
            Self::Int64 => "LONGLONG",
            Self::Float32 => "FLOAT",
            Self::Float64 => "DOUBLE",
            Self::String => "STRING",
            Self::Date => "DATE",
            Self::Enum => "ENUM",
            Self::ByteStr => "BYTESTR",
            Self::Blob => "BLOB",
            Self::ExternalReference => "EXTERNALREFERENCE",
            Self::Complex => "COMPLEX",
            Self::DComplex => "DCOMPLEX",
        }
    }

    fn from_ods_suffix(suffix: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.ods_suffix() == suffix)
    }
}

/// A data kind together with its scalar/sequence shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DataType {
    /// The element kind.
    pub kind: DataKind,
    /// Whether values are sequences of `kind`.
    pub is_sequence: bool,
}

impl DataType {
    /// A scalar data type.
    #[inline]
    #[must_use]
    pub const fn scalar(kind: DataKind) -> Self {
        Self { kind, is_sequence: false }
    }

    /// A sequence data type.
    #[inline]
    #[must_use]
    pub const fn sequence(kind: DataKind) -> Self {
        Self { kind, is_sequence: true }
    }

    /// Returns `true` for scalar and sequence enumerations.
    #[inline]
    #[must_use]
    pub const fn is_enum(self) -> bool {
        matches!(self.kind, DataKind::Enum)
    }

    /// The length an attribute of this type gets unless one is given.
    #[must_use]
    pub const fn default_length(self) -> u32 {
        match self.kind {
            DataKind::String | DataKind::ExternalReference => 254,
            DataKind::Date => 30,
            _ => 1,
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = if self.is_sequence { "DS_" } else { "DT_" };
        write!(f, "{prefix}{}", self.kind.ods_suffix())
    }
}

impl FromStr for DataType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        let (is_sequence, suffix) = if let Some(rest) = upper.strip_prefix("DT_") {
            (false, rest)
        } else if let Some(rest) = upper.strip_prefix("DS_") {
            (true, rest)
        } else {
            return Err(CoreError::UnknownDataType(s.to_owned()));
        };
        DataKind::from_ods_suffix(suffix)
            .map(|kind| Self { kind, is_sequence })
            .ok_or_else(|| CoreError::UnknownDataType(s.to_owned()))
    }
}
