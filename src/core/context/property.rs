//! Property values and ordered property bags

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use std::fmt;

const TIMESTAMP_TAG: &str = "$ts";
const FLOAT_TAG: &str = "$f";

/// A single scalar property value
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Timestamp(DateTime<Utc>),
    Boolean(bool),
}

impl PropertyValue {
    /// Borrow the value as a string slice if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Convert to a JSON value for structured output
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Self::String(s) => serde_json::Value::String(s.clone()),
            Self::Integer(i) => serde_json::Value::from(*i),
            Self::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            Self::Timestamp(ts) => {
                serde_json::Value::String(ts.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            Self::Boolean(b) => serde_json::Value::Bool(*b),
        }
    }

    /// JSON form that keeps the variant: timestamps and non-finite floats
    /// become single-key tagged objects
    pub fn to_typed_json(&self) -> serde_json::Value {
        match self {
            Self::Timestamp(ts) => serde_json::json!({
                TIMESTAMP_TAG: ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
            }),
            Self::Float(f) if !f.is_finite() => serde_json::json!({ FLOAT_TAG: f.to_string() }),
            other => other.to_json(),
        }
    }

    /// Inverse of [`to_typed_json`](Self::to_typed_json)
    pub fn from_typed_json(value: &serde_json::Value) -> Option<Self> {
        if let Some(object) = value.as_object().filter(|o| o.len() == 1) {
            if let Some(text) = object.get(TIMESTAMP_TAG).and_then(|v| v.as_str()) {
                return DateTime::parse_from_rfc3339(text)
                    .ok()
                    .map(|ts| Self::Timestamp(ts.with_timezone(&Utc)));
            }
            if let Some(text) = object.get(FLOAT_TAG).and_then(|v| v.as_str()) {
                return text.parse::<f64>().ok().map(Self::Float);
            }
        }
        Self::from_json(value)
    }

    /// Convert from a JSON scalar. Arrays, objects and null have no scalar form.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::String(s) => Some(Self::String(s.clone())),
            serde_json::Value::Bool(b) => Some(Self::Boolean(*b)),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map(Self::Integer)
                .or_else(|| n.as_f64().map(Self::Float)),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            Self::Integer(i) => write!(f, "{}", i),
            Self::Float(v) => write!(f, "{}", v),
            Self::Timestamp(ts) => f.write_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true)),
            Self::Boolean(b) => write!(f, "{}", b),
        }
    }
}

impl Serialize for PropertyValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::String(s) => serializer.serialize_str(s),
            Self::Integer(i) => serializer.serialize_i64(*i),
            Self::Float(f) => serializer.serialize_f64(*f),
            Self::Timestamp(ts) => {
                serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Micros, true))
            }
            Self::Boolean(b) => serializer.serialize_bool(*b),
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&String> for PropertyValue {
    fn from(value: &String) -> Self {
        Self::String(value.clone())
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<i32> for PropertyValue {
    fn from(value: i32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<u16> for PropertyValue {
    fn from(value: u16) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<u32> for PropertyValue {
    fn from(value: u32) -> Self {
        Self::Integer(value as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for PropertyValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Timestamp(value)
    }
}

/// Ordered mapping from case-sensitive field name to value
///
/// Names are unique. Inserting an existing name replaces its value in place,
/// so the first-insertion position is kept for serialization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyBag {
    entries: Vec<(String, PropertyValue)>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.insert(name, value);
        self
    }

    /// Insert or replace a property, returning the previous value
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Option<PropertyValue> {
        let name = name.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((name, value));
                None
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&PropertyValue> {
        self.entries.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn remove(&mut self, name: &str) -> Option<PropertyValue> {
        let index = self.entries.iter().position(|(n, _)| n == name)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// Left-biased merge: every entry of `self` wins, `other` only fills gaps
    pub fn merged_over(&self, other: &PropertyBag) -> PropertyBag {
        let mut merged = self.clone();
        for (name, value) in other.iter() {
            if !merged.contains(name) {
                merged.entries.push((name.to_string(), value.clone()));
            }
        }
        merged
    }

    /// Overlay `other` on top of `self`: entries of `other` win
    pub fn extend_from(&mut self, other: &PropertyBag) {
        for (name, value) in other.iter() {
            self.insert(name, value.clone());
        }
    }

    /// Convert to a JSON object, preserving insertion order where the map allows
    pub fn to_json(&self) -> serde_json::Value {
        let map = self
            .entries
            .iter()
            .map(|(n, v)| (n.clone(), v.to_json()))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(map)
    }

    /// Rebuild a bag from a JSON object. Non-scalar members are kept as their
    /// JSON text so nothing is silently lost.
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        let object = value.as_object()?;
        let mut bag = Self::new();
        for (name, member) in object {
            let value = PropertyValue::from_json(member)
                .unwrap_or_else(|| PropertyValue::String(member.to_string()));
            bag.insert(name.clone(), value);
        }
        Some(bag)
    }
}

impl<K, V> FromIterator<(K, V)> for PropertyBag
where
    K: Into<String>,
    V: Into<PropertyValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut bag = Self::new();
        for (k, v) in iter {
            bag.insert(k, v);
        }
        bag
    }
}

impl Serialize for PropertyBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (name, value) in &self.entries {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

struct BagVisitor {
    decode: fn(&serde_json::Value) -> Option<PropertyValue>,
}

impl<'de> Visitor<'de> for BagVisitor {
    type Value = PropertyBag;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of property names to scalar values")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
        let mut bag = PropertyBag::new();
        while let Some((name, member)) = access.next_entry::<String, serde_json::Value>()? {
            let value = (self.decode)(&member)
                .unwrap_or_else(|| PropertyValue::String(member.to_string()));
            bag.insert(name, value);
        }
        Ok(bag)
    }
}

impl<'de> Deserialize<'de> for PropertyBag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_map(BagVisitor {
            decode: PropertyValue::from_json,
        })
    }
}

/// Type-preserving encoding of a bag, used for the overflow column
///
/// Plain JSON cannot tell a timestamp from a string or carry NaN and
/// infinities, so those values are written as single-key tagged objects.
pub struct TypedBag<'a>(&'a PropertyBag);

impl Serialize for TypedBag<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.entries.len()))?;
        for (name, value) in &self.0.entries {
            map.serialize_entry(name, &value.to_typed_json())?;
        }
        map.end()
    }
}

struct TypedBagOwned(PropertyBag);

impl<'de> Deserialize<'de> for TypedBagOwned {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer
            .deserialize_map(BagVisitor {
                decode: PropertyValue::from_typed_json,
            })
            .map(TypedBagOwned)
    }
}

impl PropertyBag {
    /// Serializable view using the typed encoding
    pub fn typed(&self) -> TypedBag<'_> {
        TypedBag(self)
    }

    /// Decode text written through [`PropertyBag::typed`]
    pub fn from_typed_str(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str::<TypedBagOwned>(text).map(|typed| typed.0)
    }
}
