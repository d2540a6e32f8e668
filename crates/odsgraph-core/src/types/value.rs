//! Typed values stored on instances.
//!
//! A [`Value`] is either a single [`Scalar`] or a homogeneous [`Sequence`].
//! A [`TypedValue`] wraps an optional value together with its [`DataType`],
//! which is how "no value" is kept apart from "present but empty sequence".
//!
//! # Example
//!
//! ```
//! use odsgraph_core::{DataKind, DataType, Sequence, TypedValue, Value};
//!
//! let unset = TypedValue::unset(DataType::sequence(DataKind::Float64));
//! assert!(!unset.is_set());
//!
//! let empty = TypedValue::from(Value::Sequence(Sequence::Float64(vec![])));
//! assert!(empty.is_set());
//! assert_eq!(empty.data_type(), unset.data_type());
//!
//! let name = TypedValue::from("engine speed");
//! assert_eq!(name.value().and_then(Value::as_str), Some("engine speed"));
//! ```

use serde::{Deserialize, Serialize};

use super::{DataKind, DataType};

/// A binary large object with a textual header.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Blob {
    /// Free-text header describing the payload.
    pub header: String,
    /// The payload.
    pub data: Vec<u8>,
}

/// A reference to data held outside the model (typically a file).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExternalReference {
    /// Human readable description.
    pub description: String,
    /// MIME type of the referenced data.
    pub mime_type: String,
    /// Location (URL or path) of the referenced data.
    pub location: String,
}

/// A complex number with 32-bit parts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex32 {
    /// Real part.
    pub re: f32,
    /// Imaginary part.
    pub im: f32,
}

/// A complex number with 64-bit parts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Complex64 {
    /// Real part.
    pub re: f64,
    /// Imaginary part.
    pub im: f64,
}

/// A single value of one data kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Scalar {
    Boolean(bool),
    Byte(u8),
    Short(i16),
    Int32(i32),
    Int64(i64),
    Float32(f32),
    Float64(f64),
    String(String),
    Date(String),
    Enum(i32),
    ByteStr(Vec<u8>),
    Blob(Blob),
    ExternalReference(ExternalReference),
    Complex(Complex32),
    DComplex(Complex64),
}

impl Scalar {
    /// The data kind of this scalar.
    #[must_use]
    pub const fn data_kind(&self) -> DataKind {
        match self {
            Self::Boolean(_) => DataKind::Boolean,
            Self::Byte(_) => DataKind::Byte,
            Self::Short(_) => DataKind::Short,
            Self::Int32(_) => DataKind::Int32,
            Self::Int64(_) => DataKind::Int64,
            Self::Float32(_) => DataKind::Float32,
            Self::Float64(_) => DataKind::Float64,
            Self::String(_) => DataKind::String,
            Self::Date(_) => DataKind::Date,
            Self::Enum(_) => DataKind::Enum,
            Self::ByteStr(_) => DataKind::ByteStr,
            Self::Blob(_) => DataKind::Blob,
            Self::ExternalReference(_) => DataKind::ExternalReference,
            Self::Complex(_) => DataKind::Complex,
            Self::DComplex(_) => DataKind::DComplex,
        }
    }
}

/// A homogeneous sequence of values of one data kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[allow(missing_docs)]
pub enum Sequence {
    Boolean(Vec<bool>),
    Byte(Vec<u8>),
    Short(Vec<i16>),
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    Float32(Vec<f32>),
    Float64(Vec<f64>),
    String(Vec<String>),
    Date(Vec<String>),
    Enum(Vec<i32>),
    ByteStr(Vec<Vec<u8>>),
    Blob(Vec<Blob>),
    ExternalReference(Vec<ExternalReference>),
    Complex(Vec<Complex32>),
    DComplex(Vec<Complex64>),
}

impl Sequence {
    /// The data kind of the elements.
    #[must_use]
    pub const fn data_kind(&self) -> DataKind {
        match self {
            Self::Boolean(_) => DataKind::Boolean,
            Self::Byte(_) => DataKind::Byte,
            Self::Short(_) => DataKind::Short,
            Self::Int32(_) => DataKind::Int32,
            Self::Int64(_) => DataKind::Int64,
            Self::Float32(_) => DataKind::Float32,
            Self::Float64(_) => DataKind::Float64,
            Self::String(_) => DataKind::String,
            Self::Date(_) => DataKind::Date,
            Self::Enum(_) => DataKind::Enum,
            Self::ByteStr(_) => DataKind::ByteStr,
            Self::Blob(_) => DataKind::Blob,
            Self::ExternalReference(_) => DataKind::ExternalReference,
            Self::Complex(_) => DataKind::Complex,
            Self::DComplex(_) => DataKind::DComplex,
        }
    }

    /// Number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Boolean(v) => v.len(),
            Self::Byte(v) => v.len(),
            Self::Short(v) => v.len(),
            Self::Int32(v) | Self::Enum(v) => v.len(),
            Self::Int64(v) => v.len(),
            Self::Float32(v) => v.len(),
            Self::Float64(v) => v.len(),
            Self::String(v) | Self::Date(v) => v.len(),
            Self::ByteStr(v) => v.len(),
            Self::Blob(v) => v.len(),
            Self::ExternalReference(v) => v.len(),
            Self::Complex(v) => v.len(),
            Self::DComplex(v) => v.len(),
        }
    }

    /// Returns `true` if the sequence has no elements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A present value: a scalar or a sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// A single value.
    Scalar(Scalar),
    /// A sequence of values.
    Sequence(Sequence),
}

impl Value {
    /// The data type of this value.
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        match self {
            Self::Scalar(s) => DataType::scalar(s.data_kind()),
            Self::Sequence(s) => DataType::sequence(s.data_kind()),
        }
    }

    /// Returns the text of a string or date scalar.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Scalar(Scalar::String(s) | Scalar::Date(s)) => Some(s),
            _ => None,
        }
    }

    /// Returns any integral scalar widened to i64.
    #[must_use]
    pub const fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Scalar(Scalar::Byte(v)) => Some(*v as i64),
            Self::Scalar(Scalar::Short(v)) => Some(*v as i64),
            Self::Scalar(Scalar::Int32(v) | Scalar::Enum(v)) => Some(*v as i64),
            Self::Scalar(Scalar::Int64(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns a floating point scalar widened to f64.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Scalar(Scalar::Float32(v)) => Some(f64::from(*v)),
            Self::Scalar(Scalar::Float64(v)) => Some(*v),
            _ => None,
        }
    }

    /// Returns the sequence if this is one.
    #[must_use]
    pub const fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(s) => Some(s),
            Self::Scalar(_) => None,
        }
    }
}

impl From<Scalar> for Value {
    fn from(s: Scalar) -> Self {
        Self::Scalar(s)
    }
}

impl From<Sequence> for Value {
    fn from(s: Sequence) -> Self {
        Self::Sequence(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Scalar(Scalar::String(s.to_owned()))
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Scalar(Scalar::String(s))
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Scalar(Scalar::Boolean(b))
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Scalar(Scalar::Int32(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Scalar(Scalar::Int64(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Scalar(Scalar::Float64(v))
    }
}

impl From<Vec<f64>> for Value {
    fn from(v: Vec<f64>) -> Self {
        Self::Sequence(Sequence::Float64(v))
    }
}

/// A possibly unset value of a fixed data type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TypedValue {
    data_type: DataType,
    value: Option<Value>,
}

impl TypedValue {
    /// A typed "no value".
    #[inline]
    #[must_use]
    pub const fn unset(data_type: DataType) -> Self {
        Self { data_type, value: None }
    }

    /// Returns `true` if a value is present (an empty sequence counts).
    #[inline]
    #[must_use]
    pub const fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// The data type, known whether or not a value is present.
    #[inline]
    #[must_use]
    pub const fn data_type(&self) -> DataType {
        self.data_type
    }

    /// The value, if present.
    #[inline]
    #[must_use]
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Consume and return the value, if present.
    #[inline]
    #[must_use]
    pub fn into_value(self) -> Option<Value> {
        self.value
    }
}

impl From<Value> for TypedValue {
    fn from(value: Value) -> Self {
        Self { data_type: value.data_type(), value: Some(value) }
    }
}

impl From<Scalar> for TypedValue {
    fn from(s: Scalar) -> Self {
        Value::Scalar(s).into()
    }
}

impl From<Sequence> for TypedValue {
    fn from(s: Sequence) -> Self {
        Value::Sequence(s).into()
    }
}

impl From<&str> for TypedValue {
    fn from(s: &str) -> Self {
        Value::from(s).into()
    }
}

impl From<String> for TypedValue {
    fn from(s: String) -> Self {
        Value::from(s).into()
    }
}

impl From<i32> for TypedValue {
    fn from(v: i32) -> Self {
        Value::from(v).into()
    }
}

impl From<i64> for TypedValue {
    fn from(v: i64) -> Self {
        Value::from(v).into()
    }
}

impl From<f64> for TypedValue {
    fn from(v: f64) -> Self {
        Value::from(v).into()
    }
}

impl From<bool> for TypedValue {
    fn from(b: bool) -> Self {
        Value::from(b).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_differs_from_empty_sequence() {
        let dt = DataType::sequence(DataKind::Int32);
        let unset = TypedValue::unset(dt);
        let empty = TypedValue::from(Sequence::Int32(Vec::new()));
        assert_ne!(unset, empty);
        assert_eq!(unset.data_type(), empty.data_type());
        assert!(empty.value().and_then(Value::as_sequence).is_some_and(Sequence::is_empty));
    }

    #[test]
    fn scalar_data_types() {
        assert_eq!(Value::from(3i32).data_type(), DataType::scalar(DataKind::Int32));
        assert_eq!(
            Value::Scalar(Scalar::Date("20240101".into())).data_type(),
            DataType::scalar(DataKind::Date)
        );
        assert_eq!(Value::from(vec![1.0, 2.0]).data_type(), DataType::sequence(DataKind::Float64));
    }

    #[test]
    fn integral_widening() {
        assert_eq!(Value::Scalar(Scalar::Short(-4)).as_i64(), Some(-4));
        assert_eq!(Value::Scalar(Scalar::Enum(2)).as_i64(), Some(2));
        assert_eq!(Value::from("x").as_i64(), None);
    }

    #[test]
    fn serde_keeps_unset_flag() {
        let unset = TypedValue::unset(DataType::scalar(DataKind::String));
        let json = serde_json::to_string(&unset).unwrap();
        let back: TypedValue = serde_json::from_str(&json).unwrap();
        assert!(!back.is_set());
        assert_eq!(back.data_type(), DataType::scalar(DataKind::String));
    }
}
