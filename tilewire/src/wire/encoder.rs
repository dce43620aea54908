//! Reference encoder for the tile wire format.
//!
//! The tile server is the producer in production. This encoder exists so
//! tests and local tile servers can build well-formed (or deliberately
//! broken) tiles without hand-assembling bytes.

use super::varint::{encode_varint32, zigzag_encode};
use super::{
    ELEM_COORDS, ELEM_INDEX, ELEM_LAYER, ELEM_NUM_INDICES, ELEM_TAGS, TILE_LINE, TILE_NUM_TAGS,
    TILE_POINT, TILE_POLY, TILE_TAG_KEYS, TILE_TAG_VALUES,
};
use crate::fetcher::ElementKind;

const WIRE_VARINT: u32 = 0;
const WIRE_LENGTH_DELIMITED: u32 = 2;

fn put_key(out: &mut Vec<u8>, field: u32, wire_type: u32) {
    encode_varint32(field << 3 | wire_type, out);
}

fn put_bytes(out: &mut Vec<u8>, field: u32, bytes: &[u8]) {
    put_key(out, field, WIRE_LENGTH_DELIMITED);
    encode_varint32(bytes.len() as u32, out);
    out.extend_from_slice(bytes);
}

fn put_packed(out: &mut Vec<u8>, field: u32, values: impl IntoIterator<Item = u32>) {
    let mut span = Vec::new();
    for value in values {
        encode_varint32(value, &mut span);
    }
    put_bytes(out, field, &span);
}

/// Builds a tile body field by field.
#[derive(Debug, Default, Clone)]
pub struct TileEncoder {
    out: Vec<u8>,
}

impl TileEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes `NUM_TAGS`, `TAG_KEYS` and one `TAG_VALUES` per tag.
    ///
    /// Each tag is a dictionary key id and a value.
    pub fn variable_tags(&mut self, tags: &[(u32, &str)]) -> &mut Self {
        self.num_tags(tags.len() as u32);
        self.tag_keys(tags.iter().map(|(key_id, _)| *key_id));
        for (_, value) in tags {
            self.tag_value(value);
        }
        self
    }

    pub fn num_tags(&mut self, count: u32) -> &mut Self {
        self.field_varint(TILE_NUM_TAGS, count)
    }

    pub fn tag_keys(&mut self, key_ids: impl IntoIterator<Item = u32>) -> &mut Self {
        put_packed(&mut self.out, TILE_TAG_KEYS, key_ids);
        self
    }

    pub fn tag_value(&mut self, value: &str) -> &mut Self {
        put_bytes(&mut self.out, TILE_TAG_VALUES, value.as_bytes());
        self
    }

    /// Appends a complete element.
    pub fn element(&mut self, element: &ElementBuilder) -> &mut Self {
        let field = match element.kind {
            ElementKind::Line => TILE_LINE,
            ElementKind::Polygon => TILE_POLY,
            ElementKind::Point => TILE_POINT,
        };
        put_bytes(&mut self.out, field, &element.body);
        self
    }

    /// Writes a varint field with an arbitrary field number.
    pub fn field_varint(&mut self, field: u32, value: u32) -> &mut Self {
        put_key(&mut self.out, field, WIRE_VARINT);
        encode_varint32(value, &mut self.out);
        self
    }

    /// Appends bytes verbatim.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.out.extend_from_slice(bytes);
        self
    }

    /// Writes the zero key that ends a tile before its declared length.
    pub fn end(&mut self) -> &mut Self {
        self.out.push(0);
        self
    }

    pub fn len(&self) -> usize {
        self.out.len()
    }

    pub fn is_empty(&self) -> bool {
        self.out.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.out
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.out
    }
}

/// Builds the body of one line, polygon or point element.
///
/// Fields are written in call order, which lets tests produce invalid
/// orderings on purpose.
#[derive(Debug, Clone)]
pub struct ElementBuilder {
    kind: ElementKind,
    body: Vec<u8>,
}

impl ElementBuilder {
    pub fn new(kind: ElementKind) -> Self {
        Self {
            kind,
            body: Vec::new(),
        }
    }

    pub fn line() -> Self {
        Self::new(ElementKind::Line)
    }

    pub fn polygon() -> Self {
        Self::new(ElementKind::Polygon)
    }

    pub fn point() -> Self {
        Self::new(ElementKind::Point)
    }

    /// Tag references: dictionary ids below the limit, table slots above.
    pub fn tags(mut self, ids: &[u32]) -> Self {
        put_packed(&mut self.body, ELEM_TAGS, ids.iter().copied());
        self
    }

    pub fn num_indices(mut self, count: u32) -> Self {
        put_key(&mut self.body, ELEM_NUM_INDICES, WIRE_VARINT);
        encode_varint32(count, &mut self.body);
        self
    }

    /// Node count of each subpath.
    pub fn index(mut self, node_counts: &[u32]) -> Self {
        put_packed(&mut self.body, ELEM_INDEX, node_counts.iter().copied());
        self
    }

    /// Absolute grid coordinates, written as zigzag deltas.
    pub fn coords(mut self, points: &[(i32, i32)]) -> Self {
        let mut last = (0i32, 0i32);
        let mut values = Vec::with_capacity(points.len() * 2);
        for &(x, y) in points {
            values.push(zigzag_encode(x.wrapping_sub(last.0)));
            values.push(zigzag_encode(y.wrapping_sub(last.1)));
            last = (x, y);
        }
        put_packed(&mut self.body, ELEM_COORDS, values);
        self
    }

    /// Raw packed coordinate values, bypassing delta encoding.
    pub fn raw_coords(mut self, values: &[u32]) -> Self {
        put_packed(&mut self.body, ELEM_COORDS, values.iter().copied());
        self
    }

    pub fn layer(mut self, layer: u32) -> Self {
        put_key(&mut self.body, ELEM_LAYER, WIRE_VARINT);
        encode_varint32(layer, &mut self.body);
        self
    }

    /// Writes a varint field with an arbitrary field number.
    pub fn field_varint(mut self, field: u32, value: u32) -> Self {
        put_key(&mut self.body, field, WIRE_VARINT);
        encode_varint32(value, &mut self.body);
        self
    }

    /// Convenience for a single-subpath way: index plus coordinates.
    pub fn path(self, points: &[(i32, i32)]) -> Self {
        self.index(&[points.len() as u32]).coords(points)
    }
}
