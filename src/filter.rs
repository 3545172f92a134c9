use std::collections::{BTreeSet, HashSet};

use crate::normalize::{normalize_country, Band, Status};
use crate::record::RadarRecord;

/// Selected facet values.
///
/// An empty band/status set or an unset country means "All": that facet
/// passes everything through. Non-empty selections keep only records
/// whose normalized field value is a member, so records normalizing to
/// unknown never pass a specific selection.
#[derive(Debug, Clone, Default)]
pub struct FacetSelection {
    pub bands: HashSet<Band>,
    pub statuses: HashSet<Status>,
    pub country: Option<String>,
}

impl FacetSelection {
    pub fn is_unrestricted(&self) -> bool {
        self.bands.is_empty() && self.statuses.is_empty() && self.country.is_none()
    }

    /// Run the filter chain in its fixed order: band, status, country.
    /// Each stage operates on the previous stage's output.
    pub fn apply<'a>(&self, records: Vec<&'a RadarRecord>) -> Vec<&'a RadarRecord> {
        let records = self.filter_band(records);
        let records = self.filter_status(records);
        self.filter_country(records)
    }

    fn filter_band<'a>(&self, records: Vec<&'a RadarRecord>) -> Vec<&'a RadarRecord> {
        if self.bands.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|r| r.band().is_some_and(|b| self.bands.contains(&b)))
            .collect()
    }

    fn filter_status<'a>(&self, records: Vec<&'a RadarRecord>) -> Vec<&'a RadarRecord> {
        if self.statuses.is_empty() {
            return records;
        }
        records
            .into_iter()
            .filter(|r| r.status().is_some_and(|s| self.statuses.contains(&s)))
            .collect()
    }

    fn filter_country<'a>(&self, records: Vec<&'a RadarRecord>) -> Vec<&'a RadarRecord> {
        let Some(country) = self.country.as_deref() else {
            return records;
        };
        records
            .into_iter()
            .filter(|r| normalize_country(r).as_deref() == Some(country))
            .collect()
    }
}

/// Country choices offered to the user: the normalized country of every
/// record in the full loaded set, deduplicated and sorted. Derived once
/// per session, never from the filtered subset.
pub fn countries_available(records: &[RadarRecord]) -> Vec<String> {
    let set: BTreeSet<String> = records.iter().filter_map(normalize_country).collect();
    set.into_iter().collect()
}
