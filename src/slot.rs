use serde::{Deserialize, Deserializer};
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{WeaveError, WeaveResult};

/// The one slot name whose object value is read as an outer/inner pair
pub const SUMMARY_KEY: &str = "summary";

/// Ordered mapping from slot name to the value that fills it.
///
/// Matching is by key, so order only matters for the documented
/// first-match edge cases. Re-inserting a key replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SlotMap {
    entries: Vec<(String, SlotValue)>,
}

/// What a single slot is filled with, decided once at ingestion time
#[derive(Debug, Clone, PartialEq)]
pub enum SlotValue {
    /// Replacement HTML, possibly carrying a `{{name}}` placeholder
    Fragment(String),
    /// Slots to fill inside the matched element
    Nested(SlotMap),
    /// Two-stage shell: `outer` wraps the slot, `inner` is populated at its `{{inner}}` marker.
    /// A summary without a usable `outer` leaves its slot untouched.
    Summary {
        outer: Option<String>,
        inner: Option<SlotMap>,
    },
}

impl SlotMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a slot, returning the previous value if there was one
    pub fn insert(&mut self, key: impl Into<String>, value: SlotValue) -> Option<SlotValue> {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Builder-style insert, handy for assembling data in code
    pub fn with(mut self, key: impl Into<String>, value: SlotValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&SlotValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &SlotValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Build a slot map from a JSON object.
    ///
    /// Strings become fragments, objects become nested maps (or a summary
    /// pair under the `summary` key). Numbers, booleans, nulls and arrays
    /// carry no HTML and are dropped.
    pub fn from_json(value: &Value) -> WeaveResult<Self> {
        match value {
            Value::Object(map) => Ok(Self::from_object(map)),
            other => Err(WeaveError::InvalidData(format!(
                "expected an object at the top level, found {}",
                json_kind(other)
            ))),
        }
    }

    /// Parse a JSON document into a slot map
    pub fn from_json_str(json: &str) -> WeaveResult<Self> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_json(&value)
    }

    /// Parse a YAML document into a slot map (same shapes as JSON)
    pub fn from_yaml(yaml: &str) -> WeaveResult<Self> {
        let value: Value = serde_yaml::from_str(yaml)?;
        Self::from_json(&value)
    }

    fn from_object(map: &Map<String, Value>) -> Self {
        let mut slots = SlotMap::new();
        for (key, value) in map {
            match SlotValue::from_json(key, value) {
                Some(slot) => {
                    slots.insert(key.clone(), slot);
                }
                None => {
                    debug!(slot = %key, kind = json_kind(value), "dropping data value with no HTML");
                }
            }
        }
        slots
    }
}

impl SlotValue {
    /// Shorthand for a fragment value
    pub fn fragment(html: impl Into<String>) -> Self {
        SlotValue::Fragment(html.into())
    }

    /// Shorthand for a summary value with both stages present
    pub fn summary(outer: impl Into<String>, inner: SlotMap) -> Self {
        SlotValue::Summary {
            outer: Some(outer.into()),
            inner: Some(inner),
        }
    }

    fn from_json(key: &str, value: &Value) -> Option<Self> {
        match value {
            Value::String(html) => Some(SlotValue::Fragment(html.clone())),
            Value::Object(map) if key == SUMMARY_KEY => Some(SlotValue::Summary {
                outer: map
                    .get("outer")
                    .and_then(Value::as_str)
                    .filter(|outer| !outer.is_empty())
                    .map(str::to_owned),
                inner: map
                    .get("inner")
                    .and_then(Value::as_object)
                    .map(SlotMap::from_object),
            }),
            Value::Object(map) => Some(SlotValue::Nested(SlotMap::from_object(map))),
            _ => None,
        }
    }
}

impl IntoIterator for SlotMap {
    type Item = (String, SlotValue);
    type IntoIter = std::vec::IntoIter<(String, SlotValue)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, SlotValue)> for SlotMap {
    fn from_iter<I: IntoIterator<Item = (String, SlotValue)>>(iter: I) -> Self {
        let mut slots = SlotMap::new();
        for (key, value) in iter {
            slots.insert(key, value);
        }
        slots
    }
}

impl<'de> Deserialize<'de> for SlotMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        SlotMap::from_json(&value).map_err(serde::de::Error::custom)
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
