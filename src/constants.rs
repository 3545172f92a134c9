use std::time::Duration;

// Query pipeline
/// Delay between the last raw-input change and the query commit.
pub const DEBOUNCE: Duration = Duration::from_millis(200);

/// URL parameter carrying the committed search string.
pub const QUERY_PARAM: &str = "q";

// Data source
pub const DEFAULT_DATA_PATH: &str = "radars_v2.json";
