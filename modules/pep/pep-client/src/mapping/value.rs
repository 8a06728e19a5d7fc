//! Conversion between payload values and `google.protobuf.Value`.
//!
//! The accepted domain is closed: string, number, boolean, null, maps with
//! string keys, and lists, nested arbitrarily. Any `T: Serialize` can be
//! offered; values outside the domain (bytes, enum variants, non-string map
//! keys, 128-bit integers) fail with [`PdpClientError::UnsupportedValueType`]
//! and nothing is produced.

use std::collections::BTreeMap;
use std::fmt::Display;

use pep_sdk::PdpClientError;
use prost_types::value::Kind;
use prost_types::{ListValue, NullValue, Struct, Value};
use serde::Serialize;
use serde::ser::{self, Impossible};

/// Largest magnitude at which every integer is exactly representable in f64.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Error raised while serializing a value into its wire form.
#[derive(Debug, thiserror::Error)]
pub enum ValueError {
    #[error("unsupported value type: {0}")]
    Unsupported(String),

    #[error("value serialization failed: {0}")]
    Custom(String),
}

impl ser::Error for ValueError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Custom(msg.to_string())
    }
}

impl From<ValueError> for PdpClientError {
    fn from(e: ValueError) -> Self {
        match e {
            ValueError::Unsupported(type_name) => Self::unsupported_value_type(type_name),
            ValueError::Custom(_) => Self::unexpected_with("payload value serialization failed", e),
        }
    }
}

/// Convert a value into `google.protobuf.Value`.
///
/// # Errors
///
/// [`PdpClientError::UnsupportedValueType`] naming the offending type.
pub fn to_wire_value<T: Serialize + ?Sized>(value: &T) -> Result<Value, PdpClientError> {
    Ok(value.serialize(ValueSerializer)?)
}

/// Convert a string-keyed map (or struct) into `google.protobuf.Struct`.
///
/// # Errors
///
/// [`PdpClientError::UnsupportedValueType`] if any nested value is outside the
/// accepted domain, or if `map` itself does not serialize to a map.
pub fn to_wire_struct<T: Serialize + ?Sized>(map: &T) -> Result<Struct, PdpClientError> {
    match to_wire_value(map)?.kind {
        Some(Kind::StructValue(s)) => Ok(s),
        other => Err(PdpClientError::unsupported_value_type(format!(
            "{} where a map was expected",
            kind_name(other.as_ref())
        ))),
    }
}

/// Convert `google.protobuf.Value` back into a JSON value.
///
/// Integral numbers within the exactly-representable range come back as JSON
/// integers; non-finite numbers become `null`.
#[must_use]
pub fn from_wire_value(value: &Value) -> serde_json::Value {
    match &value.kind {
        None | Some(Kind::NullValue(_)) => serde_json::Value::Null,
        Some(Kind::BoolValue(b)) => serde_json::Value::Bool(*b),
        Some(Kind::NumberValue(n)) => number_to_json(*n),
        Some(Kind::StringValue(s)) => serde_json::Value::String(s.clone()),
        Some(Kind::ListValue(list)) => {
            serde_json::Value::Array(list.values.iter().map(from_wire_value).collect())
        }
        Some(Kind::StructValue(s)) => serde_json::Value::Object(from_wire_struct(s)),
    }
}

/// Convert `google.protobuf.Struct` back into a JSON object.
#[must_use]
pub fn from_wire_struct(value: &Struct) -> serde_json::Map<String, serde_json::Value> {
    value
        .fields
        .iter()
        .map(|(k, v)| (k.clone(), from_wire_value(v)))
        .collect()
}

/// Whole-valued doubles within ±2^53 become JSON integers, so `1.0` reads
/// back as `1`. Non-finite values become `null`.
#[allow(clippy::cast_possible_truncation)] // integral and within ±2^53
fn number_to_json(n: f64) -> serde_json::Value {
    if n.is_finite() && n.trunc().to_bits() == n.to_bits() && n.abs() <= MAX_EXACT_INTEGER {
        return serde_json::Value::from(n as i64);
    }
    serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
}

fn kind_name(kind: Option<&Kind>) -> &'static str {
    match kind {
        None | Some(Kind::NullValue(_)) => "null",
        Some(Kind::BoolValue(_)) => "boolean",
        Some(Kind::NumberValue(_)) => "number",
        Some(Kind::StringValue(_)) => "string",
        Some(Kind::ListValue(_)) => "list",
        Some(Kind::StructValue(_)) => "map",
    }
}

fn wire(kind: Kind) -> Value {
    Value { kind: Some(kind) }
}

fn null() -> Value {
    wire(Kind::NullValue(NullValue::NullValue.into()))
}

fn number(n: f64) -> Value {
    wire(Kind::NumberValue(n))
}

fn unsupported(type_name: impl Into<String>) -> ValueError {
    ValueError::Unsupported(type_name.into())
}

struct ValueSerializer;

impl ser::Serializer for ValueSerializer {
    type Ok = Value;
    type Error = ValueError;
    type SerializeSeq = ListSerializer;
    type SerializeTuple = ListSerializer;
    type SerializeTupleStruct = ListSerializer;
    type SerializeTupleVariant = Impossible<Value, ValueError>;
    type SerializeMap = StructSerializer;
    type SerializeStruct = StructSerializer;
    type SerializeStructVariant = Impossible<Value, ValueError>;

    fn serialize_bool(self, v: bool) -> Result<Value, ValueError> {
        Ok(wire(Kind::BoolValue(v)))
    }

    fn serialize_i8(self, v: i8) -> Result<Value, ValueError> {
        Ok(number(f64::from(v)))
    }

    fn serialize_i16(self, v: i16) -> Result<Value, ValueError> {
        Ok(number(f64::from(v)))
    }

    fn serialize_i32(self, v: i32) -> Result<Value, ValueError> {
        Ok(number(f64::from(v)))
    }

    #[allow(clippy::cast_precision_loss)] // wire numbers are f64
    fn serialize_i64(self, v: i64) -> Result<Value, ValueError> {
        Ok(number(v as f64))
    }

    fn serialize_i128(self, _v: i128) -> Result<Value, ValueError> {
        Err(unsupported("i128"))
    }

    fn serialize_u8(self, v: u8) -> Result<Value, ValueError> {
        Ok(number(f64::from(v)))
    }

    fn serialize_u16(self, v: u16) -> Result<Value, ValueError> {
        Ok(number(f64::from(v)))
    }

    fn serialize_u32(self, v: u32) -> Result<Value, ValueError> {
        Ok(number(f64::from(v)))
    }

    #[allow(clippy::cast_precision_loss)] // wire numbers are f64
    fn serialize_u64(self, v: u64) -> Result<Value, ValueError> {
        Ok(number(v as f64))
    }

    fn serialize_u128(self, _v: u128) -> Result<Value, ValueError> {
        Err(unsupported("u128"))
    }

    fn serialize_f32(self, v: f32) -> Result<Value, ValueError> {
        Ok(number(f64::from(v)))
    }

    fn serialize_f64(self, v: f64) -> Result<Value, ValueError> {
        Ok(number(v))
    }

    fn serialize_char(self, v: char) -> Result<Value, ValueError> {
        Ok(wire(Kind::StringValue(v.to_string())))
    }

    fn serialize_str(self, v: &str) -> Result<Value, ValueError> {
        Ok(wire(Kind::StringValue(v.to_owned())))
    }

    fn serialize_bytes(self, _v: &[u8]) -> Result<Value, ValueError> {
        Err(unsupported("bytes"))
    }

    fn serialize_none(self) -> Result<Value, ValueError> {
        Ok(null())
    }

    fn serialize_some<T: ?Sized + Serialize>(self, value: &T) -> Result<Value, ValueError> {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Value, ValueError> {
        Ok(null())
    }

    fn serialize_unit_struct(self, _name: &'static str) -> Result<Value, ValueError> {
        Ok(null())
    }

    fn serialize_unit_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
    ) -> Result<Value, ValueError> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_newtype_struct<T: ?Sized + Serialize>(
        self,
        _name: &'static str,
        value: &T,
    ) -> Result<Value, ValueError> {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T: ?Sized + Serialize>(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _value: &T,
    ) -> Result<Value, ValueError> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<ListSerializer, ValueError> {
        Ok(ListSerializer {
            values: Vec::with_capacity(len.unwrap_or_default()),
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<ListSerializer, ValueError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_struct(
        self,
        _name: &'static str,
        len: usize,
    ) -> Result<ListSerializer, ValueError> {
        self.serialize_seq(Some(len))
    }

    fn serialize_tuple_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeTupleVariant, ValueError> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }

    fn serialize_map(self, _len: Option<usize>) -> Result<StructSerializer, ValueError> {
        Ok(StructSerializer::default())
    }

    fn serialize_struct(
        self,
        _name: &'static str,
        _len: usize,
    ) -> Result<StructSerializer, ValueError> {
        Ok(StructSerializer::default())
    }

    fn serialize_struct_variant(
        self,
        name: &'static str,
        _variant_index: u32,
        variant: &'static str,
        _len: usize,
    ) -> Result<Self::SerializeStructVariant, ValueError> {
        Err(unsupported(format!("enum variant {name}::{variant}")))
    }
}

struct ListSerializer {
    values: Vec<Value>,
}

impl ser::SerializeSeq for ListSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        self.values.push(value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(wire(Kind::ListValue(ListValue {
            values: self.values,
        })))
    }
}

impl ser::SerializeTuple for ListSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_element<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        ser::SerializeSeq::end(self)
    }
}

impl ser::SerializeTupleStruct for ListSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Value, ValueError> {
        ser::SerializeSeq::end(self)
    }
}

#[derive(Default)]
struct StructSerializer {
    fields: BTreeMap<String, Value>,
    next_key: Option<String>,
}

impl ser::SerializeMap for StructSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_key<T: ?Sized + Serialize>(&mut self, key: &T) -> Result<(), ValueError> {
        match key.serialize(ValueSerializer)?.kind {
            Some(Kind::StringValue(key)) => {
                self.next_key = Some(key);
                Ok(())
            }
            other => Err(unsupported(format!(
                "map key of type {}",
                kind_name(other.as_ref())
            ))),
        }
    }

    fn serialize_value<T: ?Sized + Serialize>(&mut self, value: &T) -> Result<(), ValueError> {
        let key = self
            .next_key
            .take()
            .ok_or_else(|| ValueError::Custom("map value without a key".to_owned()))?;
        self.fields.insert(key, value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        Ok(wire(Kind::StructValue(Struct {
            fields: self.fields,
        })))
    }
}

impl ser::SerializeStruct for StructSerializer {
    type Ok = Value;
    type Error = ValueError;

    fn serialize_field<T: ?Sized + Serialize>(
        &mut self,
        key: &'static str,
        value: &T,
    ) -> Result<(), ValueError> {
        self.fields
            .insert(key.to_owned(), value.serialize(ValueSerializer)?);
        Ok(())
    }

    fn end(self) -> Result<Value, ValueError> {
        ser::SerializeMap::end(self)
    }
}
