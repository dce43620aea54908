//! Process-wide constant tag dictionary.

use super::{Tag, TagTable};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

/// Tag ids at or above this value reference the current tile's
/// [`TagTable`](super::TagTable) at `id - TAG_LIMIT`.
pub const TAG_LIMIT: u32 = 1024;

/// Keys addressable from a tile's `TAG_KEYS` field, by position.
const KEYS: &[&str] = &[
    "access",
    "addr:housename",
    "addr:housenumber",
    "addr:interpolation",
    "admin_level",
    "aerialway",
    "aeroway",
    "amenity",
    "area",
    "barrier",
    "bicycle",
    "boundary",
    "bridge",
    "building",
    "construction",
    "covered",
    "cutting",
    "denomination",
    "ele",
    "embankment",
    "foot",
    "highway",
    "historic",
    "landuse",
    "layer",
    "leisure",
    "lock",
    "man_made",
    "military",
    "motorcar",
    "name",
    "natural",
    "oneway",
    "operator",
    "place",
    "population",
    "power",
    "railway",
    "ref",
    "religion",
    "route",
    "service",
    "shop",
    "sport",
    "surface",
    "tourism",
    "tracktype",
    "tunnel",
    "water",
    "waterway",
    "wetland",
    "width",
    "wood",
];

/// Constant tags addressable from an element's `TAGS` field, by position.
///
/// Order is part of the wire format; append only.
const TAGS: &[(&str, &str)] = &[
    ("building", "yes"),
    ("highway", "residential"),
    ("highway", "service"),
    ("waterway", "stream"),
    ("highway", "unclassified"),
    ("highway", "track"),
    ("oneway", "yes"),
    ("natural", "water"),
    ("highway", "footway"),
    ("access", "private"),
    ("highway", "tertiary"),
    ("highway", "path"),
    ("highway", "secondary"),
    ("landuse", "forest"),
    ("bridge", "yes"),
    ("natural", "tree"),
    ("surface", "paved"),
    ("natural", "wood"),
    ("highway", "primary"),
    ("landuse", "grass"),
    ("landuse", "residential"),
    ("surface", "unpaved"),
    ("highway", "bus_stop"),
    ("surface", "asphalt"),
    ("bicycle", "yes"),
    ("amenity", "parking"),
    ("place", "locality"),
    ("railway", "rail"),
    ("service", "parking_aisle"),
    ("boundary", "administrative"),
    ("building", "house"),
    ("place", "village"),
    ("natural", "coastline"),
    ("tracktype", "grade2"),
    ("oneway", "no"),
    ("service", "driveway"),
    ("highway", "turning_circle"),
    ("place", "hamlet"),
    ("natural", "wetland"),
    ("tracktype", "grade3"),
    ("waterway", "river"),
    ("highway", "cycleway"),
    ("barrier", "fence"),
    ("building", "residential"),
    ("amenity", "school"),
    ("highway", "crossing"),
    ("admin_level", "8"),
    ("highway", "trunk"),
    ("amenity", "place_of_worship"),
    ("tracktype", "grade1"),
    ("highway", "steps"),
    ("landuse", "farmland"),
    ("waterway", "canal"),
    ("power", "line"),
    ("power", "tower"),
    ("landuse", "meadow"),
    ("highway", "motorway"),
    ("tunnel", "yes"),
    ("leisure", "park"),
    ("leisure", "pitch"),
    ("highway", "motorway_link"),
    ("highway", "living_street"),
    ("highway", "pedestrian"),
    ("amenity", "restaurant"),
    ("railway", "tram"),
    ("highway", "primary_link"),
    ("natural", "scrub"),
    ("waterway", "ditch"),
    ("religion", "christian"),
    ("landuse", "industrial"),
    ("amenity", "fuel"),
    ("shop", "supermarket"),
    ("natural", "heath"),
    ("landuse", "farmyard"),
    ("amenity", "bank"),
    ("amenity", "hospital"),
    ("highway", "trunk_link"),
    ("highway", "secondary_link"),
    ("landuse", "cemetery"),
    ("leisure", "garden"),
    ("tourism", "hotel"),
    ("amenity", "cafe"),
    ("railway", "station"),
    ("aeroway", "runway"),
    ("aeroway", "taxiway"),
    ("aeroway", "aerodrome"),
    ("landuse", "retail"),
    ("landuse", "commercial"),
    ("landuse", "railway"),
    ("natural", "beach"),
    ("natural", "glacier"),
    ("natural", "peak"),
    ("place", "town"),
    ("place", "city"),
    ("place", "suburb"),
    ("railway", "subway"),
    ("railway", "light_rail"),
    ("leisure", "sports_centre"),
    ("leisure", "stadium"),
    ("man_made", "pier"),
    ("military", "barracks"),
    ("amenity", "university"),
    ("tourism", "attraction"),
    ("historic", "memorial"),
    ("area", "yes"),
    ("water", "lake"),
    ("wetland", "marsh"),
    ("wood", "coniferous"),
    ("wood", "deciduous"),
    ("route", "ferry"),
];

/// Immutable table mapping small integer ids to well-known tags.
///
/// Built once per process and shared read-only by every fetcher; see
/// [`TagDictionary::global`].
#[derive(Debug)]
pub struct TagDictionary {
    keys: Vec<Arc<str>>,
    tags: Vec<Tag>,
    tag_ids: HashMap<(Arc<str>, Arc<str>), u32>,
}

impl TagDictionary {
    /// Returns the process-wide dictionary, building it on first use.
    pub fn global() -> &'static TagDictionary {
        static DICTIONARY: OnceLock<TagDictionary> = OnceLock::new();
        DICTIONARY.get_or_init(TagDictionary::build)
    }

    fn build() -> Self {
        let keys: Vec<Arc<str>> = KEYS.iter().map(|k| Arc::from(*k)).collect();

        let mut tags = Vec::with_capacity(TAGS.len());
        let mut tag_ids = HashMap::with_capacity(TAGS.len());
        for (id, (key, value)) in TAGS.iter().enumerate() {
            // Every constant's key is listed in KEYS (checked by tests)
            let key = keys
                .iter()
                .find(|k| &***k == *key)
                .cloned()
                .unwrap_or_else(|| Arc::from(*key));
            let tag = Tag::constant(key, *value);
            tag_ids.insert((tag.key.clone(), tag.value.clone()), id as u32);
            tags.push(tag);
        }

        Self {
            keys,
            tags,
            tag_ids,
        }
    }

    /// Number of constant tags. Ids in `len()..TAG_LIMIT` are unassigned.
    pub fn len(&self) -> usize {
        self.tags.len()
    }

    /// Returns true if the dictionary holds no constants.
    pub fn is_empty(&self) -> bool {
        self.tags.is_empty()
    }

    /// Looks up a constant tag by id.
    #[inline]
    pub fn tag(&self, id: u32) -> Option<&Tag> {
        self.tags.get(id as usize)
    }

    /// Looks up a key by key id.
    #[inline]
    pub fn key(&self, key_id: u32) -> Option<&Arc<str>> {
        self.keys.get(key_id as usize)
    }

    /// Resolves an element tag id.
    ///
    /// Ids below [`TAG_LIMIT`] select dictionary constants; ids at or above it
    /// select `id - TAG_LIMIT` in the tile's table. Returns `None` for ids that
    /// address neither an assigned constant nor a bound variable tag.
    #[inline]
    pub fn resolve<'a>(&'a self, table: &'a TagTable, id: u32) -> Option<&'a Tag> {
        if id < TAG_LIMIT {
            self.tag(id)
        } else {
            table.get((id - TAG_LIMIT) as usize)
        }
    }

    /// Reverse lookup of a key id, used when encoding tiles.
    pub fn key_id(&self, key: &str) -> Option<u32> {
        self.keys.iter().position(|k| &**k == key).map(|i| i as u32)
    }

    /// Reverse lookup of a constant tag id, used when encoding tiles.
    pub fn tag_id(&self, key: &str, value: &str) -> Option<u32> {
        self.tag_ids
            .get(&(Arc::from(key), Arc::from(value)))
            .copied()
    }
}
