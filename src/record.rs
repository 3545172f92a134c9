use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Map, Value};
use tracing::warn;

use crate::error::CatalogError;
use crate::normalize::{self, Band, Status};

/// Nested country object shape (`{"alpha3": ..., "name": ...}`).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CountryRef {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alpha3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Operating organisation, as some upstream sources report it.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Org {
    #[serde(rename = "authorityName", skip_serializing_if = "Option::is_none")]
    pub authority_name: Option<String>,
    #[serde(rename = "ownerName", skip_serializing_if = "Option::is_none")]
    pub owner_name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Links {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub web: Option<String>,
}

/// Site coordinates. Any component may be missing; records without both
/// lat and lon stay searchable but are excluded from map projection.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct Location {
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub elevation_m: Option<f64>,
}

/// One radar station record from the merged catalog.
///
/// The catalog is semi-structured: every field except the identifier may
/// be absent or oddly shaped. Free-text `band` and `status` are kept as
/// raw JSON and read through the normalizers.
#[derive(Debug, Clone, Serialize)]
pub struct RadarRecord {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_iso3: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<CountryRef>,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub band: Value,
    #[serde(skip_serializing_if = "Value::is_null")]
    pub status: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Location>,
    /// Pre-joined search corpus baked in by the upstream ETL.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub tags: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operator: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub org: Option<Org>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub polarization: Option<String>,
    #[serde(rename = "txType", skip_serializing_if = "Option::is_none")]
    pub tx_type: Option<String>,
    #[serde(rename = "rxType", skip_serializing_if = "Option::is_none")]
    pub rx_type: Option<String>,
    #[serde(rename = "installDate", skip_serializing_if = "Option::is_none")]
    pub install_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Links>,
}

fn str_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

fn f64_field(obj: &Map<String, Value>, key: &str) -> Option<f64> {
    obj.get(key).and_then(Value::as_f64)
}

impl RadarRecord {
    /// Field-tolerant extraction from one catalog entry.
    ///
    /// Returns `None` only for non-object entries or entries without a
    /// usable identifier; every other malformation degrades to an absent
    /// field.
    pub fn from_value(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;

        let id = match obj.get("id") {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return None,
        };

        let country = obj.get("country").and_then(Value::as_object).map(|c| CountryRef {
            alpha3: str_field(c, "alpha3"),
            name: str_field(c, "name"),
        });

        let org = obj.get("org").and_then(Value::as_object).map(|o| Org {
            authority_name: str_field(o, "authorityName"),
            owner_name: str_field(o, "ownerName"),
        });

        let links = obj.get("links").and_then(Value::as_object).map(|l| Links {
            details: str_field(l, "details"),
            web: str_field(l, "web"),
        });

        let location = obj.get("location").and_then(Value::as_object).map(|l| Location {
            lat: f64_field(l, "lat"),
            lon: f64_field(l, "lon"),
            elevation_m: f64_field(l, "elevation_m"),
        });

        Some(RadarRecord {
            id,
            site_name: str_field(obj, "site_name"),
            name: str_field(obj, "name"),
            country_iso3: str_field(obj, "country_iso3"),
            country_name: str_field(obj, "country_name"),
            country,
            band: obj.get("band").cloned().unwrap_or(Value::Null),
            status: obj.get("status").cloned().unwrap_or(Value::Null),
            location,
            tags: str_field(obj, "tags").unwrap_or_default(),
            operator: str_field(obj, "operator"),
            org,
            polarization: str_field(obj, "polarization"),
            tx_type: str_field(obj, "txType"),
            rx_type: str_field(obj, "rxType"),
            install_date: str_field(obj, "installDate"),
            source_type: str_field(obj, "source_type"),
            source: str_field(obj, "source"),
            source_url: str_field(obj, "source_url"),
            links,
        })
    }

    /// Canonical band code, if the free-text band resolves to one.
    pub fn band(&self) -> Option<Band> {
        normalize::normalize_band(&self.band)
    }

    /// Canonical status bucket, if the free-text status resolves to one.
    pub fn status(&self) -> Option<Status> {
        normalize::normalize_status(&self.status)
    }

    /// Canonical country token (ISO3 or free-text name).
    pub fn country_code(&self) -> Option<String> {
        normalize::normalize_country(self)
    }

    /// Site name with fallback chain: site_name, then name.
    pub fn site_label(&self) -> Option<&str> {
        self.site_name.as_deref().or(self.name.as_deref())
    }

    /// Like [`site_label`](Self::site_label) but falling back to the id,
    /// for contexts that need something non-empty (map popups).
    pub fn site_or_id(&self) -> &str {
        self.site_label().unwrap_or(&self.id)
    }

    /// Raw country display label (not normalized): ISO3 field, name
    /// field, nested alpha3, nested name.
    pub fn country_label(&self) -> &str {
        let nested = self.country.as_ref();
        self.country_iso3
            .as_deref()
            .filter(|s| !s.is_empty())
            .or(self.country_name.as_deref())
            .or_else(|| nested.and_then(|c| c.alpha3.as_deref()))
            .or_else(|| nested.and_then(|c| c.name.as_deref()))
            .unwrap_or("")
    }

    /// Raw band text for display.
    pub fn band_label(&self) -> String {
        normalize::coerce_str(&self.band)
    }

    /// Raw status text for display.
    pub fn status_label(&self) -> String {
        normalize::coerce_str(&self.status)
    }

    pub fn operator_label(&self) -> &str {
        let org = self.org.as_ref();
        self.operator
            .as_deref()
            .or_else(|| org.and_then(|o| o.authority_name.as_deref()))
            .or_else(|| org.and_then(|o| o.owner_name.as_deref()))
            .unwrap_or("")
    }

    pub fn source_label(&self) -> &str {
        self.source_type
            .as_deref()
            .or(self.source.as_deref())
            .unwrap_or("")
    }

    /// Tags split back into individual tokens (space / comma / semicolon
    /// delimited) for display.
    pub fn tag_list(&self) -> Vec<&str> {
        self.tags
            .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
            .filter(|t| !t.is_empty())
            .collect()
    }
}

/// The immutable loaded record set.
///
/// Populated once at startup; every derived view (search results, facet
/// output, map points) is a pure recomputation over this store.
#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<RadarRecord>,
}

impl RecordStore {
    pub fn new(records: Vec<RadarRecord>) -> Self {
        RecordStore { records }
    }

    /// Read and parse the static catalog file. One-shot: on failure the
    /// caller decides between aborting and an empty store.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let raw: Value = serde_json::from_str(&text)?;
        Ok(Self::from_json(&raw))
    }

    /// Build a store from an already-parsed JSON document. Entries that
    /// are not objects or lack an id are skipped with a warning.
    pub fn from_json(raw: &Value) -> Self {
        let Some(items) = raw.as_array() else {
            warn!("catalog root is not an array; starting with an empty store");
            return Self::default();
        };

        let mut records = Vec::with_capacity(items.len());
        for (i, item) in items.iter().enumerate() {
            match RadarRecord::from_value(item) {
                Some(r) => records.push(r),
                None => warn!(entry = i, "skipping catalog entry without an id"),
            }
        }
        Self::new(records)
    }

    pub fn records(&self) -> &[RadarRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn from_value_tolerates_missing_fields() {
        let r = RadarRecord::from_value(&json!({"id": "wrd:1"})).unwrap();
        assert_eq!(r.id, "wrd:1");
        assert!(r.site_name.is_none());
        assert!(r.location.is_none());
        assert_eq!(r.tags, "");
        assert_eq!(r.band(), None);
        assert_eq!(r.status(), None);
    }

    #[test]
    fn from_value_accepts_numeric_ids() {
        let r = RadarRecord::from_value(&json!({"id": 42})).unwrap();
        assert_eq!(r.id, "42");
    }

    #[test]
    fn from_value_rejects_unaddressable_entries() {
        assert!(RadarRecord::from_value(&json!({"site_name": "Tokyo"})).is_none());
        assert!(RadarRecord::from_value(&json!({"id": ""})).is_none());
        assert!(RadarRecord::from_value(&json!("not an object")).is_none());
        assert!(RadarRecord::from_value(&Value::Null).is_none());
    }

    #[test]
    fn from_value_keeps_records_with_malformed_fields() {
        // Wrong-typed fields degrade to absent, never drop the record.
        let r = RadarRecord::from_value(&json!({
            "id": "x",
            "site_name": 5,
            "band": {"weird": true},
            "status": 3,
            "location": {"lat": "35", "lon": 139.0},
        }))
        .unwrap();
        assert!(r.site_name.is_none());
        assert_eq!(r.band(), None);
        assert_eq!(r.status(), None);
        let loc = r.location.unwrap();
        assert_eq!(loc.lat, None);
        assert_eq!(loc.lon, Some(139.0));
    }

    #[test]
    fn store_from_json_skips_junk_entries() {
        let store = RecordStore::from_json(&json!([
            {"id": "a"},
            "garbage",
            {"no_id": true},
            {"id": "b"},
        ]));
        let ids: Vec<&str> = store.records().iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn store_from_non_array_root_is_empty() {
        assert!(RecordStore::from_json(&json!({"records": []})).is_empty());
    }

    #[test]
    fn load_reads_a_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": "wrd:1", "tags": "japan tokyo c", "band": "C"}}]"#
        )
        .unwrap();

        let store = RecordStore::load(file.path()).unwrap();
        assert_eq!(store.len(), 1);
        assert_eq!(store.records()[0].band(), Some(crate::normalize::Band::C));
    }

    #[test]
    fn load_failure_is_an_error_not_a_panic() {
        assert!(RecordStore::load("no/such/file.json").is_err());
    }

    #[test]
    fn display_fallback_chains() {
        let r = RadarRecord::from_value(&json!({
            "id": "x",
            "name": "Backup Name",
            "org": {"ownerName": "Owner Co"},
            "source": "opera",
            "tags": "a, b;c  d"
        }))
        .unwrap();
        assert_eq!(r.site_label(), Some("Backup Name"));
        assert_eq!(r.site_or_id(), "Backup Name");
        assert_eq!(r.operator_label(), "Owner Co");
        assert_eq!(r.source_label(), "opera");
        assert_eq!(r.tag_list(), ["a", "b", "c", "d"]);

        let bare = RadarRecord::from_value(&json!({"id": "y"})).unwrap();
        assert_eq!(bare.site_label(), None);
        assert_eq!(bare.site_or_id(), "y");
        assert_eq!(bare.country_label(), "");
    }
}
