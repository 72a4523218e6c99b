//! The record type and field name normalization.
//!
//! A [`Record`] is one stanza: a set of uniquely named string fields. Field
//! names are case-insensitive and space-normalized; every name that enters a
//! record goes through [`normalize_field_name`], so lookups with any casing
//! or spacing variant find the same field.
//!
//! Records keep their fields in insertion order (backed by [`IndexMap`]), but
//! two records compare equal whenever they hold the same fields, regardless
//! of order.
//!
//! ## Examples
//!
//! ```rust
//! use serde_stanza::Record;
//!
//! let mut record = Record::new();
//! record.insert("ISO 3166", "AR-C");
//! record.insert("Name", "Ciudad Autónoma de Buenos Aires");
//!
//! assert_eq!(record.get("iso-3166"), Some("AR-C"));
//! assert_eq!(record.get("NAME"), Some("Ciudad Autónoma de Buenos Aires"));
//! ```

use indexmap::IndexMap;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// Returns the canonical form of a field name.
///
/// Leading and trailing whitespace is removed, every interior run of
/// whitespace (or `:`) becomes a single `-`, and the result is lower-cased.
/// Normalizing an already normalized name returns it unchanged.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::normalize_field_name;
///
/// assert_eq!(normalize_field_name("ISO 3166"), "iso-3166");
/// assert_eq!(normalize_field_name("  Postal \t Code "), "postal-code");
/// assert_eq!(normalize_field_name("iso-3166"), "iso-3166");
/// ```
#[must_use]
pub fn normalize_field_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut gap = false;
    for ch in name.chars() {
        if ch.is_whitespace() || ch == ':' {
            gap = true;
            continue;
        }
        if gap && !out.is_empty() {
            out.push('-');
        }
        gap = false;
        out.extend(ch.to_lowercase());
    }
    out
}

/// Returns `true` if `name` is non-empty and already in canonical form.
pub(crate) fn is_normalized(name: &str) -> bool {
    !name.is_empty() && normalize_field_name(name) == name
}

/// A single stanza record: an insertion-ordered map of normalized field
/// names to string values.
///
/// # Examples
///
/// ```rust
/// use serde_stanza::Record;
///
/// let mut record = Record::new();
/// record.insert("name", "Chaco");
/// record.insert("category", "Province");
///
/// let keys: Vec<_> = record.keys().cloned().collect();
/// assert_eq!(keys, vec!["name", "category"]);
/// assert_eq!(record.sorted_keys(), vec!["category", "name"]);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Record(IndexMap<String, String>);

impl Record {
    /// Creates an empty `Record`.
    #[must_use]
    pub fn new() -> Self {
        Record(IndexMap::new())
    }

    /// Creates an empty `Record` with the specified capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Record(IndexMap::with_capacity(capacity))
    }

    /// Sets a field, normalizing its name first.
    ///
    /// If the record already held the field, its old value is returned and
    /// the field keeps its original position.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use serde_stanza::Record;
    ///
    /// let mut record = Record::new();
    /// assert!(record.insert("Name", "Salta").is_none());
    /// assert_eq!(record.insert("NAME", "Jujuy"), Some("Salta".to_string()));
    /// assert_eq!(record.len(), 1);
    /// ```
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) -> Option<String> {
        self.0
            .insert(normalize_field_name(name.as_ref()), value.into())
    }

    /// Inserts a field whose name is already normalized.
    pub(crate) fn insert_normalized(&mut self, name: String, value: String) {
        self.0.insert(name, value);
    }

    /// Returns the value of a field, looked up by any spelling of its name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&normalize_field_name(name)).map(String::as_str)
    }

    /// Looks up a field by a name that is already normalized.
    pub(crate) fn get_normalized(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns the value of a field, or `""` when the field is absent.
    #[must_use]
    pub fn get_or_empty(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    /// Returns `true` if the record holds the field.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(&normalize_field_name(name))
    }

    /// Removes a field, returning its value. Remaining fields keep their order.
    pub fn remove(&mut self, name: &str) -> Option<String> {
        self.0.shift_remove(&normalize_field_name(name))
    }

    /// Returns the number of fields in the record.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the record holds no fields.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Returns an iterator over the field names, in insertion order.
    pub fn keys(&self) -> indexmap::map::Keys<'_, String, String> {
        self.0.keys()
    }

    /// Returns an iterator over the fields, in insertion order.
    pub fn iter(&self) -> indexmap::map::Iter<'_, String, String> {
        self.0.iter()
    }

    /// Returns the field names in lexicographic order.
    #[must_use]
    pub fn sorted_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.0.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}

impl From<HashMap<String, String>> for Record {
    fn from(map: HashMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<BTreeMap<String, String>> for Record {
    fn from(map: BTreeMap<String, String>) -> Self {
        map.into_iter().collect()
    }
}

impl From<Record> for HashMap<String, String> {
    fn from(record: Record) -> Self {
        record.0.into_iter().collect()
    }
}

impl IntoIterator for Record {
    type Item = (String, String);
    type IntoIter = indexmap::map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Record {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut record = Record::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, value) in &self.0 {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of field names to string values")
            }

            fn visit_map<A>(self, mut access: A) -> std::result::Result<Record, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, value)) = access.next_entry::<String, String>()? {
                    record.insert(name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}
