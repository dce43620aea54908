//! Static description of the remote map source.

/// Geographic bounds in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl BoundingBox {
    /// Whole world.
    pub const WORLD: BoundingBox = BoundingBox {
        min_lon: -180.0,
        min_lat: -90.0,
        max_lon: 180.0,
        max_lat: 90.0,
    };

    pub fn contains(&self, lat: f64, lon: f64) -> bool {
        (self.min_lat..=self.max_lat).contains(&lat) && (self.min_lon..=self.max_lon).contains(&lon)
    }
}

/// What a map view needs to know before requesting tiles.
#[derive(Debug, Clone, PartialEq)]
pub struct MapInfo {
    pub bounding_box: BoundingBox,
    /// Initial view center as (lat, lon)
    pub start_position: (f64, f64),
    pub start_zoom: u8,
    /// Language of name tags
    pub language: String,
    pub comment: String,
    pub created_by: String,
}

impl Default for MapInfo {
    /// The world-wide tile server, centered on Bremen.
    fn default() -> Self {
        Self {
            bounding_box: BoundingBox::WORLD,
            start_position: (53.11, 8.85),
            start_zoom: 4,
            language: "de".to_string(),
            comment: "comment".to_string(),
            created_by: "author".to_string(),
        }
    }
}
