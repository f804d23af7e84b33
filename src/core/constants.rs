//! Engine-wide defaults for the quake map.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom range supported by the tile providers.
pub const MIN_ZOOM: f64 = 0.0;
pub const MAX_ZOOM: f64 = 18.0;

/// Initial map view (continental United States).
pub const DEFAULT_CENTER: (f64, f64) = (37.09, -95.71);
pub const DEFAULT_ZOOM: f64 = 2.0;

/// USGS summary feed: all earthquakes in the past seven days.
pub const EARTHQUAKES_URL: &str =
    "https://earthquake.usgs.gov/earthquakes/feed/v1.0/summary/all_week.geojson";

/// PB2002 tectonic plate boundaries.
pub const PLATES_URL: &str =
    "https://raw.githubusercontent.com/fraxen/tectonicplates/master/GeoJSON/PB2002_boundaries.json";

/// Overlay names as shown in the layer control.
pub const EARTHQUAKES_OVERLAY: &str = "Earthquakes";
pub const PLATES_OVERLAY: &str = "Tectonic plates";

/// Layer ids of the two overlay groups.
pub const EARTHQUAKES_LAYER_ID: &str = "earthquakes";
pub const PLATES_LAYER_ID: &str = "plates";

/// Fallback text when a feature has no place.
pub const UNKNOWN_PLACE: &str = "Unknown location";

/// Plate boundary line style.
pub const PLATE_LINE_COLOR: &str = "#FFA500";
pub const PLATE_LINE_WEIGHT: f64 = 2.0;

/// Hit radius floor in pixels when clicking small markers.
pub const MIN_HIT_RADIUS: f64 = 4.0;

/// Markers with a zero or negative radius are still drawn this large.
pub const MIN_DRAW_RADIUS: f64 = 1.0;

/// Default number of decoded tiles kept in memory.
pub const DEFAULT_TILE_CACHE_SIZE: usize = 256;

/// Default HTTP timeout for the GeoJSON feeds.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

pub const USER_AGENT: &str = "quakemap/0.1.0 (https://github.com/quakemap/quakemap)";
