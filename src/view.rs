use serde::Serialize;

use crate::record::RadarRecord;

/// Lightweight marker for the spatial view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapPoint {
    pub id: String,
    pub site: String,
    pub country: String,
    pub band: String,
    pub lat: f64,
    pub lon: f64,
}

/// Project one record to a map point.
///
/// Records missing either coordinate yield `None`; they stay visible in
/// list output, only the spatial view drops them.
pub fn map_point(record: &RadarRecord) -> Option<MapPoint> {
    let location = record.location.as_ref()?;
    let lat = location.lat?;
    let lon = location.lon?;

    Some(MapPoint {
        id: record.id.clone(),
        site: record.site_or_id().to_string(),
        country: record.country_label().to_string(),
        band: record.band_label(),
        lat,
        lon,
    })
}

/// Project a filtered subset, preserving input order.
pub fn project(records: &[&RadarRecord]) -> Vec<MapPoint> {
    records.iter().copied().filter_map(map_point).collect()
}

/// Bounding envelope of a point set, for fitting the map viewport.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min_lat: f64,
    pub min_lon: f64,
    pub max_lat: f64,
    pub max_lon: f64,
}

pub fn bounds(points: &[MapPoint]) -> Option<Bounds> {
    let first = points.first()?;
    let mut b = Bounds {
        min_lat: first.lat,
        min_lon: first.lon,
        max_lat: first.lat,
        max_lon: first.lon,
    };
    for p in &points[1..] {
        b.min_lat = b.min_lat.min(p.lat);
        b.min_lon = b.min_lon.min(p.lon);
        b.max_lat = b.max_lat.max(p.lat);
        b.max_lon = b.max_lon.max(p.lon);
    }
    Some(b)
}
