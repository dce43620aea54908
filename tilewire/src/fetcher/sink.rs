//! Receiver interface for decoded elements.

use crate::tags::Tag;

/// Geometry kind of a decoded element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Open polyline, possibly multi-part
    Line,
    /// Closed ring(s); the first subpath is the outer ring
    Polygon,
    /// Single point of interest
    Point,
}

/// Receives each accepted element of a tile, in wire order.
///
/// All slices are scratch buffers owned by the fetcher and reused for the next
/// element and the next tile. Implementations must copy whatever they keep
/// before returning.
pub trait TileSink {
    /// A line or polygon.
    ///
    /// `coords` holds interleaved x/y values in render-tile units.
    /// `subpath_lengths` holds the coordinate count (twice the node count) of
    /// each subpath, in order.
    fn render_way(
        &mut self,
        layer: u8,
        tags: &[Tag],
        coords: &[f32],
        subpath_lengths: &[i32],
        is_polygon: bool,
    );

    /// A point of interest. `lat` is the y and `lon` the x tile coordinate.
    fn render_point_of_interest(&mut self, layer: u8, tags: &[Tag], lat: f32, lon: f32);
}

/// An owned copy of one decoded element.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub kind: ElementKind,
    pub layer: u8,
    pub tags: Vec<Tag>,
    /// Interleaved x/y tile coordinates
    pub coordinates: Vec<f32>,
    /// Coordinate count per subpath; empty for points
    pub subpath_lengths: Vec<i32>,
}

impl Element {
    /// Returns the value of the first tag with `key`.
    pub fn tag_value(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| &*t.key == key)
            .map(|t| &*t.value)
    }
}

/// Sink that copies every element into a vector.
#[derive(Debug, Default)]
pub struct ElementCollector {
    pub elements: Vec<Element>,
}

impl ElementCollector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Takes the collected elements, leaving the collector empty.
    pub fn take(&mut self) -> Vec<Element> {
        std::mem::take(&mut self.elements)
    }
}

impl TileSink for ElementCollector {
    fn render_way(
        &mut self,
        layer: u8,
        tags: &[Tag],
        coords: &[f32],
        subpath_lengths: &[i32],
        is_polygon: bool,
    ) {
        self.elements.push(Element {
            kind: if is_polygon {
                ElementKind::Polygon
            } else {
                ElementKind::Line
            },
            layer,
            tags: tags.to_vec(),
            coordinates: coords.to_vec(),
            subpath_lengths: subpath_lengths.to_vec(),
        });
    }

    fn render_point_of_interest(&mut self, layer: u8, tags: &[Tag], lat: f32, lon: f32) {
        self.elements.push(Element {
            kind: ElementKind::Point,
            layer,
            tags: tags.to_vec(),
            coordinates: vec![lon, lat],
            subpath_lengths: Vec::new(),
        });
    }
}
