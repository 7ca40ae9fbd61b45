//! Filter values and the value types rules declare.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use criters_schema::ScalarType;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A value produced by a filter accessor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Null value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// Integer value.
    Int(i64),
    /// Float value.
    Float(f64),
    /// String value.
    String(String),
    /// UUID value.
    Uuid(uuid::Uuid),
    /// Exact decimal value.
    Decimal(Decimal),
    /// Timestamp in UTC.
    DateTime(DateTime<Utc>),
    /// Calendar date.
    Date(NaiveDate),
    /// Time of day.
    Time(NaiveTime),
    /// List of values.
    List(Vec<FilterValue>),
    /// Raw bytes.
    Bytes(Vec<u8>),
    /// JSON document.
    Json(serde_json::Value),
}

impl FilterValue {
    /// Check if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// The list elements, if this is a list.
    pub fn as_list(&self) -> Option<&[FilterValue]> {
        match self {
            Self::List(values) => Some(values),
            _ => None,
        }
    }

    /// Short name of the runtime variant, for error messages.
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "bool",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::String(_) => "string",
            Self::Uuid(_) => "uuid",
            Self::Decimal(_) => "decimal",
            Self::DateTime(_) => "datetime",
            Self::Date(_) => "date",
            Self::Time(_) => "time",
            Self::List(_) => "list",
            Self::Bytes(_) => "bytes",
            Self::Json(_) => "json",
        }
    }

    /// Whether this value can be stored in a field of `scalar` type.
    ///
    /// Null fits every type. Lists are checked element by element and never
    /// fit when an element is itself a list.
    pub fn fits(&self, scalar: ScalarType) -> bool {
        use ScalarType as S;
        match self {
            Self::Null => true,
            Self::Bool(_) => scalar == S::Boolean,
            Self::Int(_) => matches!(scalar, S::Int | S::BigInt),
            Self::Float(_) => scalar == S::Float,
            Self::String(_) => scalar == S::String,
            Self::Uuid(_) => scalar == S::Uuid,
            Self::Decimal(_) => scalar == S::Decimal,
            Self::DateTime(_) => scalar == S::DateTime,
            Self::Date(_) => scalar == S::Date,
            Self::Time(_) => scalar == S::Time,
            Self::Bytes(_) => scalar == S::Bytes,
            Self::Json(_) => scalar == S::Json,
            Self::List(values) => values
                .iter()
                .all(|v| !matches!(v, Self::List(_)) && v.fits(scalar)),
        }
    }

    /// Whether this value has a total order usable by ordering restrictions.
    pub fn is_totally_ordered(&self) -> bool {
        match self {
            Self::Int(_)
            | Self::String(_)
            | Self::Uuid(_)
            | Self::Decimal(_)
            | Self::DateTime(_)
            | Self::Date(_)
            | Self::Time(_) => true,
            Self::Float(f) => !f.is_nan(),
            Self::Null | Self::Bool(_) | Self::List(_) | Self::Bytes(_) | Self::Json(_) => false,
        }
    }
}

impl fmt::Display for FilterValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => write!(f, "NULL"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(x) => write!(f, "{x}"),
            Self::String(s) => write!(f, "'{s}'"),
            Self::Uuid(u) => write!(f, "'{u}'"),
            Self::Decimal(d) => write!(f, "{d}"),
            Self::DateTime(dt) => write!(f, "'{}'", dt.to_rfc3339()),
            Self::Date(d) => write!(f, "'{d}'"),
            Self::Time(t) => write!(f, "'{t}'"),
            Self::Json(v) => write!(f, "'{v}'"),
            Self::Bytes(bytes) => {
                write!(f, "'\\x")?;
                for b in bytes {
                    write!(f, "{b:02x}")?;
                }
                write!(f, "'")
            }
            Self::List(values) => {
                write!(f, "[")?;
                for (i, v) in values.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
        }
    }
}

impl From<bool> for FilterValue {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for FilterValue {
    fn from(v: i32) -> Self {
        Self::Int(v as i64)
    }
}

impl From<i64> for FilterValue {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<f64> for FilterValue {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for FilterValue {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for FilterValue {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<uuid::Uuid> for FilterValue {
    fn from(v: uuid::Uuid) -> Self {
        Self::Uuid(v)
    }
}

impl From<Decimal> for FilterValue {
    fn from(v: Decimal) -> Self {
        Self::Decimal(v)
    }
}

impl From<DateTime<Utc>> for FilterValue {
    fn from(v: DateTime<Utc>) -> Self {
        Self::DateTime(v)
    }
}

impl From<NaiveDate> for FilterValue {
    fn from(v: NaiveDate) -> Self {
        Self::Date(v)
    }
}

impl From<NaiveTime> for FilterValue {
    fn from(v: NaiveTime) -> Self {
        Self::Time(v)
    }
}

impl From<serde_json::Value> for FilterValue {
    fn from(v: serde_json::Value) -> Self {
        Self::Json(v)
    }
}

impl<T: Into<FilterValue>> From<Vec<T>> for FilterValue {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<FilterValue>> From<Option<T>> for FilterValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Self::Null,
        }
    }
}

/// The value type a rule declares, derived from its accessor's return type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    /// Element scalar type.
    pub scalar: ScalarType,
    /// Whether the accessor yields a collection of `scalar`.
    pub collection: bool,
}

impl ValueType {
    /// A single value of `scalar`.
    pub const fn single(scalar: ScalarType) -> Self {
        Self {
            scalar,
            collection: false,
        }
    }

    /// A collection of `scalar`.
    pub const fn collection(scalar: ScalarType) -> Self {
        Self {
            scalar,
            collection: true,
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.collection {
            write!(f, "{}[]", self.scalar)
        } else {
            write!(f, "{}", self.scalar)
        }
    }
}

/// Rust types an accessor may return.
///
/// The associated [`ValueType`] is what the schema field is checked against
/// before any accessor runs.
pub trait FilterType {
    /// The declared value type.
    const VALUE_TYPE: ValueType;

    /// Convert into a runtime value.
    fn into_value(self) -> FilterValue;
}

/// Filter types that declare a single value, usable as list elements.
///
/// Only these may appear inside `Vec<T>`, so a collection of collections is
/// rejected at compile time:
///
/// ```compile_fail
/// use criters_query::FilterType;
///
/// let _ = <Vec<Vec<i32>> as FilterType>::VALUE_TYPE;
/// ```
pub trait ScalarFilterType: FilterType {}

macro_rules! scalar_filter_type {
    ($($ty:ty => $scalar:ident),* $(,)?) => {
        $(
            impl FilterType for $ty {
                const VALUE_TYPE: ValueType = ValueType::single(ScalarType::$scalar);

                fn into_value(self) -> FilterValue {
                    self.into()
                }
            }

            impl ScalarFilterType for $ty {}
        )*
    };
}

scalar_filter_type! {
    i32 => Int,
    i64 => BigInt,
    f64 => Float,
    bool => Boolean,
    String => String,
    &'static str => String,
    uuid::Uuid => Uuid,
    Decimal => Decimal,
    DateTime<Utc> => DateTime,
    NaiveDate => Date,
    NaiveTime => Time,
    serde_json::Value => Json,
}

impl FilterType for Vec<u8> {
    const VALUE_TYPE: ValueType = ValueType::single(ScalarType::Bytes);

    fn into_value(self) -> FilterValue {
        FilterValue::Bytes(self)
    }
}

impl<T: FilterType> FilterType for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE;

    fn into_value(self) -> FilterValue {
        match self {
            Some(v) => v.into_value(),
            None => FilterValue::Null,
        }
    }
}

impl<T: ScalarFilterType> ScalarFilterType for Option<T> {}

impl<T: ScalarFilterType> FilterType for Vec<T> {
    const VALUE_TYPE: ValueType = ValueType::collection(T::VALUE_TYPE.scalar);

    fn into_value(self) -> FilterValue {
        FilterValue::List(self.into_iter().map(FilterType::into_value).collect())
    }
}
