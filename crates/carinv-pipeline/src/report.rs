//! Deterministic inventory report.
//!
//! Two runs over the same listings must produce byte-identical output no
//! matter which task finished first, so ordering is imposed here rather
//! than at append time:
//!
//! - records are sorted by VIN, absent VIN last, ties broken by the
//!   record's compact JSON;
//! - every nested array of objects (the package list) is sorted by the
//!   compact JSON of its elements;
//! - object keys are emitted in sorted order.

use std::cmp::Ordering;

use carinv_core::CanonicalRecord;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::PipelineError;

#[derive(Debug, Clone, PartialEq)]
pub struct InventoryReport {
    records: Vec<CanonicalRecord>,
}

impl InventoryReport {
    /// Takes ownership of a finalized batch, sorted by VIN (absent last).
    #[must_use]
    pub fn from_records(mut records: Vec<CanonicalRecord>) -> Self {
        records.sort_by(|a, b| vin_order(a.vin.as_deref(), b.vin.as_deref()));
        Self { records }
    }

    #[must_use]
    pub fn records(&self) -> &[CanonicalRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The report as a canonicalized JSON array.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Serialize`] if a record cannot be serialized.
    pub fn to_value(&self) -> Result<Value, PipelineError> {
        let mut entries = self
            .records
            .iter()
            .map(|record| -> Result<_, PipelineError> {
                let mut value = serde_json::to_value(record)?;
                canonicalize(&mut value);
                let key = value.to_string();
                Ok((record.vin.as_deref(), key, value))
            })
            .collect::<Result<Vec<_>, _>>()?;

        entries.sort_by(|(vin_a, key_a, _), (vin_b, key_b, _)| {
            vin_order(*vin_a, *vin_b).then_with(|| key_a.cmp(key_b))
        });

        Ok(Value::Array(
            entries.into_iter().map(|(_, _, value)| value).collect(),
        ))
    }

    /// Pretty-printed, newline-terminated JSON.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Serialize`] if a record cannot be serialized.
    pub fn to_json(&self) -> Result<String, PipelineError> {
        let mut json = serde_json::to_string_pretty(&self.to_value()?)?;
        json.push('\n');
        Ok(json)
    }

    /// Hex SHA-256 of [`Self::to_json`], for comparing successive runs.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Serialize`] if a record cannot be serialized.
    pub fn digest(&self) -> Result<String, PipelineError> {
        Ok(format!("{:x}", Sha256::digest(self.to_json()?.as_bytes())))
    }
}

fn vin_order(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Recursively sorts arrays whose elements are all objects.
fn canonicalize(value: &mut Value) {
    match value {
        Value::Array(items) => {
            items.iter_mut().for_each(canonicalize);
            if !items.is_empty() && items.iter().all(Value::is_object) {
                items.sort_by_cached_key(Value::to_string);
            }
        }
        Value::Object(map) => map.values_mut().for_each(canonicalize),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use carinv_core::Package;

    use super::*;

    fn record(vin: Option<&str>, trim: &str) -> CanonicalRecord {
        CanonicalRecord {
            vin: vin.map(str::to_string),
            trim: Some(trim.to_string()),
            ..CanonicalRecord::default()
        }
    }

    #[test]
    fn records_sort_by_vin_with_absent_last() {
        let report = InventoryReport::from_records(vec![
            record(None, "LE"),
            record(Some("C"), "XLE"),
            record(Some("A"), "SE"),
        ]);
        let vins: Vec<_> = report.records().iter().map(|r| r.vin.as_deref()).collect();
        assert_eq!(vins, vec![Some("A"), Some("C"), None]);
    }

    #[test]
    fn nested_package_lists_are_sorted() {
        let mut rec = record(Some("A"), "XLE");
        rec.packages = Some(vec![
            Package::new("Weather", Some(375)),
            Package::new("Carpet Mats", Some(289)),
        ]);
        let value = InventoryReport::from_records(vec![rec]).to_value().unwrap();
        let names: Vec<_> = value[0]["packages"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["Carpet Mats", "Weather"]);
    }

    #[test]
    fn duplicate_vins_are_kept_and_ordered_by_content() {
        let forward = InventoryReport::from_records(vec![
            record(Some("A"), "XLE"),
            record(Some("A"), "LE"),
        ]);
        let reverse = InventoryReport::from_records(vec![
            record(Some("A"), "LE"),
            record(Some("A"), "XLE"),
        ]);
        assert_eq!(forward.len(), 2);
        assert_eq!(forward.to_json().unwrap(), reverse.to_json().unwrap());
        assert_eq!(forward.digest().unwrap(), reverse.digest().unwrap());
    }

    #[test]
    fn to_json_is_newline_terminated_array() {
        let json = InventoryReport::from_records(vec![record(Some("A"), "SE")])
            .to_json()
            .unwrap();
        assert!(json.starts_with('['));
        assert!(json.ends_with("]\n"));
    }

    #[test]
    fn digest_is_sha256_hex() {
        let digest = InventoryReport::from_records(vec![record(Some("A"), "SE")])
            .digest()
            .unwrap();
        assert_eq!(digest.len(), 64);
        assert!(digest.chars().all(|c| c.is_ascii_hexdigit()));
    }
}
