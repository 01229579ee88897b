//! Per-source adapters.
//!
//! Each adapter knows its upstream endpoints and maps the raw JSON into the
//! canonical records from `komik_core::models`. Raw payloads are decoded
//! leniently: wrong-typed or missing fields fall back to defaults instead of
//! failing the whole record, and a bad list element only drops itself.

pub mod asia;
pub mod doujin;
pub mod international;
pub mod komiku;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use komik_core::{ChapterContent, MangaCard, MangaDetail, SourceTag};

use crate::fetch::ApiDocument;

pub use asia::AsiaAdapter;
pub use international::InternationalAdapter;
pub use komiku::KomikuAdapter;

/// What one adapter made of one lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum Lookup<T> {
    /// A valid record.
    Found(T),
    /// The source answered, but had nothing usable.
    Missing,
    /// The source could not be reached at all.
    Unreachable,
}

/// A content source that can serve manga details and chapters.
#[async_trait]
pub trait SourceAdapter: Send + Sync {
    fn tag(&self) -> SourceTag;

    /// Look up a manga by this source's identifier (slug or id).
    async fn manga_detail(&self, id: &str) -> Lookup<MangaDetail>;

    /// Look up a chapter by this source's chapter identifier.
    async fn chapter(&self, id: &str) -> Lookup<ChapterContent>;

    /// First page of latest updates; empty when the source is down.
    async fn latest(&self, now: DateTime<Utc>) -> Vec<MangaCard>;
}

/// Turn a fetched document into a lookup outcome.
pub(crate) fn lookup<T>(doc: ApiDocument, normalize: impl FnOnce(Value) -> T, usable: impl FnOnce(&T) -> bool) -> Lookup<T> {
    if doc.is_unreachable() {
        return Lookup::Unreachable;
    }
    if !doc.success {
        return Lookup::Missing;
    }
    let record = normalize(doc.data);
    if usable(&record) { Lookup::Found(record) } else { Lookup::Missing }
}

/// Listing items out of `data`, which is either the array itself or an object
/// wrapping it under a well-known key.
pub(crate) fn list_items(data: &Value) -> &[Value] {
    if let Some(items) = data.as_array() {
        return items;
    }
    ["results", "mangaList", "items", "list", "data"]
        .iter()
        .find_map(|key| data.get(key).and_then(Value::as_array))
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// A raw upstream record.
///
/// `ALIASES` lists the keys one field may arrive under, serialized name first.
/// When several are present the first non-blank one wins and the rest are
/// dropped, so a record carrying both `cover` and `thumbnail` still decodes.
pub(crate) trait RawRecord: DeserializeOwned + Default {
    const ALIASES: &'static [&'static [&'static str]] = &[];
}

/// Decode a raw record field by field. Anything that is not an object yields
/// the all-default record.
pub(crate) fn decode<T: RawRecord>(value: Value) -> T {
    match value {
        Value::Object(map) => serde_json::from_value(Value::Object(resolve_aliases(map, T::ALIASES))).unwrap_or_default(),
        _ => T::default(),
    }
}

fn resolve_aliases(mut map: Map<String, Value>, aliases: &[&[&str]]) -> Map<String, Value> {
    for group in aliases {
        let Some(canonical) = group.first() else { continue };
        let mut present: Vec<Value> = group.iter().filter_map(|key| map.remove(*key)).collect();
        if present.is_empty() {
            continue;
        }
        let pick = present.iter().position(|value| !is_blank(value)).unwrap_or(0);
        map.insert(canonical.to_string(), present.swap_remove(pick));
    }
    map
}

fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

/// Tolerant field deserializers for raw upstream records. None of them fail.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use super::{RawRecord, decode};

    /// Any scalar as text; everything else as empty.
    pub fn text<'de, D: Deserializer<'de>>(de: D) -> Result<String, D::Error> {
        Ok(scalar(Value::deserialize(de)?))
    }

    /// A list of names: strings, or objects with `name` / `title`.
    pub fn names<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        Ok(pluck(Value::deserialize(de)?, &["name", "title"]))
    }

    /// A list of URLs: strings, or objects with `url` / `src` / `image`.
    pub fn urls<'de, D: Deserializer<'de>>(de: D) -> Result<Vec<String>, D::Error> {
        Ok(pluck(Value::deserialize(de)?, &["url", "src", "image"]))
    }

    /// A non-negative count from a number or a numeric string; 0 otherwise.
    pub fn number<'de, D: Deserializer<'de>>(de: D) -> Result<u32, D::Error> {
        let n = match Value::deserialize(de)? {
            Value::Number(n) => n.as_u64().or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64)),
            Value::String(s) => s.trim().parse::<u64>().ok(),
            _ => None,
        };
        Ok(n.map(|n| u32::try_from(n).unwrap_or(u32::MAX)).unwrap_or_default())
    }

    /// A list of records, decoded one element at a time. Elements that are
    /// not objects are dropped; the rest keep their per-field defaults.
    pub fn list<'de, D, T>(de: D) -> Result<Vec<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: RawRecord,
    {
        Ok(match Value::deserialize(de)? {
            Value::Array(items) => items.into_iter().filter(Value::is_object).map(decode).collect(),
            _ => Vec::new(),
        })
    }

    /// A nested record, all-default when missing or not an object.
    pub fn record<'de, D, T>(de: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: RawRecord,
    {
        Ok(decode(Value::deserialize(de)?))
    }

    /// A nested record that may be absent (`null`, `false`, or any non-object).
    pub fn optional<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: RawRecord,
    {
        let value = Value::deserialize(de)?;
        Ok(value.is_object().then(|| decode(value)))
    }

    fn scalar(value: Value) -> String {
        match value {
            Value::String(s) => s.trim().to_string(),
            Value::Number(n) => n.to_string(),
            _ => String::new(),
        }
    }

    fn pluck(value: Value, keys: &[&str]) -> Vec<String> {
        let items = match value {
            Value::Array(items) => items,
            Value::String(s) => s.split(',').map(|part| Value::String(part.to_string())).collect(),
            _ => return Vec::new(),
        };
        items
            .into_iter()
            .map(|item| match item {
                Value::Object(mut map) => {
                    keys.iter().find_map(|key| map.remove(*key)).map(scalar).unwrap_or_default()
                }
                other => scalar(other),
            })
            .filter(|s| !s.is_empty())
            .collect()
    }
}
