//! Streaming tile decoder.

use super::buffer::{ByteStream, ReadBuffer};
use super::error::{ElementError, FormatError};
use super::varint::zigzag_decode;
use super::{
    ELEM_COORDS, ELEM_INDEX, ELEM_LAYER, ELEM_NUM_INDICES, ELEM_TAGS, TILE_LINE, TILE_NUM_TAGS,
    TILE_POINT, TILE_POLY, TILE_TAG_KEYS, TILE_TAG_VALUES,
};
use crate::fetcher::{ElementKind, TileSink};
use crate::tags::{Tag, TagDictionary, TagTable};
use tracing::{debug, trace, warn};

/// Layer assigned to elements without a `LAYER` field.
pub const DEFAULT_LAYER: u8 = 5;

/// Marker written to the index scratch after the last subpath.
pub const SUBPATH_END: i32 = -1;

/// Outcome of decoding one tile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DecodeSummary {
    /// Elements passed to the sink
    pub emitted: usize,
    /// Elements rejected by validation
    pub dropped: usize,
    /// Content bytes consumed
    pub bytes: usize,
    /// False if decoding stopped at an unknown tile field
    pub complete: bool,
}

/// Fields collected while reading one element.
struct ElementFields {
    layer: u8,
    num_indices: usize,
    expected_coords: usize,
    has_tags: bool,
    fault: Option<ElementError>,
}

impl ElementFields {
    fn new(kind: ElementKind) -> Self {
        Self {
            layer: DEFAULT_LAYER,
            num_indices: 1,
            // A point carries one coordinate pair and no index
            expected_coords: if kind == ElementKind::Point { 2 } else { 0 },
            has_tags: false,
            fault: None,
        }
    }

    fn fail(&mut self, err: ElementError) {
        if self.fault.is_none() {
            self.fault = Some(err);
        }
    }
}

/// Stateful decoder for the tile wire format.
///
/// Owns the read buffer and all scratch vectors. They keep their capacity
/// between elements and tiles, so one decoder should be reused for every
/// tile a worker fetches. Slices handed to the sink point into this scratch
/// space and are overwritten by the next element.
pub struct WireDecoder {
    dictionary: &'static TagDictionary,
    scale: f32,
    buffer: ReadBuffer,
    table: TagTable,
    key_ids: Vec<u32>,
    tags: Vec<Tag>,
    indices: Vec<i32>,
    coords: Vec<f32>,
}

impl WireDecoder {
    /// Creates a decoder dividing wire coordinates by `scale`.
    pub fn new(scale: f32) -> Self {
        Self::with_buffer(scale, ReadBuffer::new())
    }

    /// Creates a decoder with a custom read buffer.
    pub fn with_buffer(scale: f32, buffer: ReadBuffer) -> Self {
        Self {
            dictionary: TagDictionary::global(),
            scale,
            buffer,
            table: TagTable::new(),
            key_ids: Vec::with_capacity(100),
            tags: Vec::with_capacity(10),
            indices: Vec::with_capacity(10),
            coords: Vec::with_capacity(32768),
        }
    }

    /// Wire units per render-tile unit.
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Read buffer, shared with the connection for header parsing.
    pub fn buffer_mut(&mut self) -> &mut ReadBuffer {
        &mut self.buffer
    }

    /// Zeroes all per-tile state. Scratch capacity is kept.
    pub fn reset(&mut self) {
        self.buffer.reset();
        self.table.reset();
        self.key_ids.clear();
        self.tags.clear();
        self.indices.clear();
        self.coords.clear();
    }

    /// Decodes the content announced on the read buffer, calling `sink` for
    /// every accepted element.
    ///
    /// The whole body is consumed from the stream even when decoding stops
    /// early, so a persistent connection stays aligned.
    pub fn decode(
        &mut self,
        stream: &mut ByteStream<'_>,
        sink: &mut dyn TileSink,
    ) -> Result<DecodeSummary, FormatError> {
        self.table.reset();
        self.buffer.mirror_buffered(stream);

        let mut summary = DecodeSummary {
            complete: true,
            ..Default::default()
        };

        while self.buffer.remaining() > 0 {
            let key = self.buffer.read_varint(stream)?;
            if key == 0 {
                break;
            }

            match key >> 3 {
                TILE_NUM_TAGS => {
                    let count = self.buffer.read_varint(stream)? as usize;
                    self.table.declare(count);
                }
                TILE_TAG_KEYS => self.read_tag_keys(stream)?,
                TILE_TAG_VALUES => {
                    let value = self.buffer.read_string(stream)?;
                    let tag = self.table.bind_next(self.dictionary, value)?;
                    trace!(tag = %tag, "Bound variable tag");
                }
                TILE_LINE => self.decode_element(ElementKind::Line, stream, sink, &mut summary)?,
                TILE_POLY => {
                    self.decode_element(ElementKind::Polygon, stream, sink, &mut summary)?
                }
                TILE_POINT => self.decode_element(ElementKind::Point, stream, sink, &mut summary)?,
                field => {
                    warn!(
                        field,
                        offset = self.buffer.consumed(),
                        "Unknown tile field, ignoring rest of tile"
                    );
                    summary.complete = false;
                    break;
                }
            }
        }

        self.buffer.finish(stream)?;
        summary.bytes = self.buffer.consumed();

        trace!(
            emitted = summary.emitted,
            dropped = summary.dropped,
            bytes = summary.bytes,
            "Tile decoded"
        );
        Ok(summary)
    }

    fn read_tag_keys(&mut self, stream: &mut ByteStream<'_>) -> Result<(), FormatError> {
        let key_ids = &mut self.key_ids;
        key_ids.clear();
        self.buffer.read_packed(stream, |id| key_ids.push(id))?;

        if self.key_ids.len() > self.table.declared() {
            return Err(FormatError::TagCountExceeded {
                declared: self.table.declared(),
                found: self.key_ids.len(),
            });
        }
        self.table.set_key_ids(self.key_ids.iter().copied());
        Ok(())
    }

    fn decode_element(
        &mut self,
        kind: ElementKind,
        stream: &mut ByteStream<'_>,
        sink: &mut dyn TileSink,
        summary: &mut DecodeSummary,
    ) -> Result<(), FormatError> {
        let offset = self.buffer.consumed();
        let length = self.buffer.read_varint(stream)? as usize;
        let end = self.buffer.consumed() + length;

        let fields = self.read_element_fields(kind, end, stream)?;

        match self.validate(kind, &fields) {
            Ok(()) => {
                self.emit(kind, &fields, sink);
                summary.emitted += 1;
            }
            Err(reason) => {
                debug!(
                    kind = ?kind,
                    offset,
                    length,
                    reason = %reason,
                    "Dropping element"
                );
                summary.dropped += 1;
            }
        }
        Ok(())
    }

    fn read_element_fields(
        &mut self,
        kind: ElementKind,
        end: usize,
        stream: &mut ByteStream<'_>,
    ) -> Result<ElementFields, FormatError> {
        let mut fields = ElementFields::new(kind);
        self.tags.clear();
        self.indices.clear();
        self.coords.clear();

        while self.buffer.consumed() < end {
            let key = self.buffer.read_varint(stream)?;
            if key == 0 {
                break;
            }

            match key >> 3 {
                ELEM_NUM_INDICES => {
                    fields.num_indices = self.buffer.read_varint(stream)? as usize;
                }
                ELEM_TAGS => {
                    self.read_element_tags(stream)?;
                    fields.has_tags = true;
                }
                ELEM_INDEX => self.read_index(&mut fields, stream)?,
                ELEM_COORDS => self.read_coordinates(&mut fields, stream)?,
                ELEM_LAYER => {
                    let layer = self.buffer.read_varint(stream)?;
                    fields.layer = u8::try_from(layer).unwrap_or(u8::MAX);
                }
                field => {
                    // Length of an unknown field is not known; skip the element
                    let rest = end.saturating_sub(self.buffer.consumed());
                    self.buffer.skip(stream, rest)?;
                    fields.fail(ElementError::UnknownField(field));
                    break;
                }
            }
        }
        Ok(fields)
    }

    fn read_element_tags(&mut self, stream: &mut ByteStream<'_>) -> Result<(), FormatError> {
        let dictionary = self.dictionary;
        let table = &self.table;
        let tags = &mut self.tags;
        tags.clear();

        let mut unresolved = 0usize;
        let count = self.buffer.read_packed(stream, |id| {
            match dictionary.resolve(table, id) {
                Some(tag) => tags.push(tag.clone()),
                None => {
                    trace!(id, "Unresolvable tag id");
                    unresolved += 1;
                }
            }
        })?;

        if unresolved > 0 {
            debug!(
                unresolved,
                bound = self.table.bound(),
                "Dropped tag references outside dictionary and tile table"
            );
        }
        if count == 0 {
            debug!("Element has an empty tag list");
        }
        Ok(())
    }

    fn read_index(
        &mut self,
        fields: &mut ElementFields,
        stream: &mut ByteStream<'_>,
    ) -> Result<(), FormatError> {
        let indices = &mut self.indices;
        indices.clear();
        let found = self.buffer.read_packed(stream, |nodes| {
            let coords = nodes.saturating_mul(2);
            indices.push(i32::try_from(coords).unwrap_or(i32::MAX));
        })?;

        if found < fields.num_indices {
            fields.fail(ElementError::IndexCount {
                declared: fields.num_indices,
                found,
            });
            return Ok(());
        }

        self.indices.truncate(fields.num_indices);
        fields.expected_coords += self.indices.iter().map(|&n| n as usize).sum::<usize>();
        self.indices.push(SUBPATH_END);
        Ok(())
    }

    fn read_coordinates(
        &mut self,
        fields: &mut ElementFields,
        stream: &mut ByteStream<'_>,
    ) -> Result<(), FormatError> {
        if fields.expected_coords == 0 {
            let length = self.buffer.read_varint(stream)? as usize;
            self.buffer.skip(stream, length)?;
            fields.fail(ElementError::EmptyGeometry);
            return Ok(());
        }

        let scale = self.scale;
        let coords = &mut self.coords;
        coords.clear();

        // Deltas alternate between x and y
        let mut last = [0i32; 2];
        let mut axis = 0;
        let decoded = self.buffer.read_packed(stream, |value| {
            last[axis] = last[axis].wrapping_add(zigzag_decode(value));
            coords.push(last[axis] as f32 / scale);
            axis ^= 1;
        })?;

        if decoded != fields.expected_coords {
            fields.fail(ElementError::CoordinateMismatch {
                expected: fields.expected_coords,
                decoded,
            });
        }
        Ok(())
    }

    fn validate(&self, kind: ElementKind, fields: &ElementFields) -> Result<(), ElementError> {
        if !fields.has_tags {
            return Err(ElementError::MissingTags);
        }
        if fields.num_indices == 0 {
            return Err(ElementError::NoSubpaths);
        }
        if let Some(fault) = &fields.fault {
            return Err(fault.clone());
        }
        if fields.expected_coords == 0 {
            return Err(ElementError::EmptyGeometry);
        }
        if self.coords.len() != fields.expected_coords {
            return Err(ElementError::CoordinateMismatch {
                expected: fields.expected_coords,
                decoded: self.coords.len(),
            });
        }
        if kind != ElementKind::Point && self.indices.len() <= fields.num_indices {
            return Err(ElementError::IndexCount {
                declared: fields.num_indices,
                found: self.indices.len(),
            });
        }
        Ok(())
    }

    fn emit(&self, kind: ElementKind, fields: &ElementFields, sink: &mut dyn TileSink) {
        match kind {
            ElementKind::Line | ElementKind::Polygon => sink.render_way(
                fields.layer,
                &self.tags,
                &self.coords,
                &self.indices[..fields.num_indices],
                kind == ElementKind::Polygon,
            ),
            ElementKind::Point => sink.render_point_of_interest(
                fields.layer,
                &self.tags,
                self.coords[1],
                self.coords[0],
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetcher::{Element, ElementCollector};
    use crate::wire::encoder::{ElementBuilder, TileEncoder};
    use crate::tags::TAG_LIMIT;
    use crate::wire::DEFAULT_SCALE;
    use std::io::Cursor;

    const HIGHWAY_PRIMARY: u32 = 18;
    const BUILDING_YES: u32 = 0;

    fn key(name: &str) -> u32 {
        TagDictionary::global().key_id(name).unwrap()
    }

    fn decode_with(
        decoder: &mut WireDecoder,
        bytes: &[u8],
    ) -> (Result<DecodeSummary, FormatError>, Vec<Element>) {
        let mut reader = Cursor::new(bytes.to_vec());
        let mut stream = ByteStream::new(&mut reader);
        decoder.reset();
        decoder.buffer_mut().begin_content(bytes.len());

        let mut sink = ElementCollector::new();
        let result = decoder.decode(&mut stream, &mut sink);
        (result, sink.take())
    }

    fn decode(bytes: &[u8]) -> (Result<DecodeSummary, FormatError>, Vec<Element>) {
        decode_with(&mut WireDecoder::new(DEFAULT_SCALE), bytes)
    }

    fn assert_close(actual: &[f32], grid: &[i32]) {
        assert_eq!(actual.len(), grid.len());
        for (a, g) in actual.iter().zip(grid) {
            let expected = *g as f32 / DEFAULT_SCALE;
            assert!(
                (a - expected).abs() <= 1.0 / DEFAULT_SCALE,
                "{} != {}",
                a,
                expected
            );
        }
    }

    fn named_line(name_slot: u32) -> ElementBuilder {
        ElementBuilder::line()
            .tags(&[TAG_LIMIT + name_slot, HIGHWAY_PRIMARY])
            .path(&[(0, 0), (100, 50), (200, 80)])
            .layer(3)
    }

    fn primary_line() -> ElementBuilder {
        ElementBuilder::line()
            .tags(&[HIGHWAY_PRIMARY])
            .path(&[(0, 0), (100, 50), (200, 80)])
    }

    #[test]
    fn test_decodes_line_polygon_and_point() {
        let mut tile = TileEncoder::new();
        tile.variable_tags(&[(key("name"), "Foo"), (key("ref"), "B 6")])
            .element(&named_line(0))
            .element(
                &ElementBuilder::polygon()
                    .tags(&[BUILDING_YES, TAG_LIMIT + 1])
                    .num_indices(2)
                    .index(&[4, 3])
                    .coords(&[
                        (10, 10),
                        (50, 10),
                        (50, 50),
                        (10, 10),
                        (20, 20),
                        (30, 20),
                        (20, 20),
                    ]),
            )
            .element(&ElementBuilder::point().tags(&[TAG_LIMIT]).coords(&[(4000, 123)]));
        let bytes = tile.into_bytes();

        let (result, elements) = decode(&bytes);
        let summary = result.unwrap();

        assert_eq!(summary.emitted, 3);
        assert_eq!(summary.dropped, 0);
        assert_eq!(summary.bytes, bytes.len());
        assert!(summary.complete);

        let line = &elements[0];
        assert_eq!(line.kind, ElementKind::Line);
        assert_eq!(line.layer, 3);
        assert!(line.tags[0].is("name", "Foo"));
        assert!(line.tags[0].is_variable);
        assert!(line.tags[1].is("highway", "primary"));
        assert!(!line.tags[1].is_variable);
        assert_eq!(line.subpath_lengths, vec![6]);
        assert_close(&line.coordinates, &[0, 0, 100, 50, 200, 80]);

        let polygon = &elements[1];
        assert_eq!(polygon.kind, ElementKind::Polygon);
        assert_eq!(polygon.layer, DEFAULT_LAYER);
        assert_eq!(polygon.tag_value("ref"), Some("B 6"));
        assert_eq!(polygon.subpath_lengths, vec![8, 6]);
        assert_eq!(polygon.coordinates.len(), 14);

        let point = &elements[2];
        assert_eq!(point.kind, ElementKind::Point);
        assert!(point.subpath_lengths.is_empty());
        // Stored as [lon, lat] = [x, y]
        assert_close(&point.coordinates, &[4000, 123]);
    }

    #[test]
    fn test_coordinate_mismatch_drops_only_that_element() {
        let mut tile = TileEncoder::new();
        tile.element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .index(&[3])
                .coords(&[(0, 0), (1, 1)]),
        )
        .element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .path(&[(5, 5), (6, 6)]),
        );

        let (result, elements) = decode(tile.as_bytes());
        let summary = result.unwrap();

        assert_eq!(summary.emitted, 1);
        assert_eq!(summary.dropped, 1);
        assert_close(&elements[0].coordinates, &[5, 5, 6, 6]);
    }

    #[test]
    fn test_element_without_tags_is_dropped() {
        let mut tile = TileEncoder::new();
        tile.element(&ElementBuilder::line().path(&[(0, 0), (1, 1)]));

        let (result, elements) = decode(tile.as_bytes());

        assert_eq!(result.unwrap().dropped, 1);
        assert!(elements.is_empty());
    }

    #[test]
    fn test_empty_tag_list_is_emitted() {
        let mut tile = TileEncoder::new();
        tile.element(&ElementBuilder::line().tags(&[]).path(&[(0, 0), (1, 1)]));

        let (result, elements) = decode(tile.as_bytes());

        assert_eq!(result.unwrap().emitted, 1);
        assert!(elements[0].tags.is_empty());
    }

    #[test]
    fn test_zero_subpaths_is_dropped() {
        let mut tile = TileEncoder::new();
        tile.element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .num_indices(0)
                .path(&[(0, 0), (1, 1)]),
        );

        let (result, _) = decode(tile.as_bytes());
        assert_eq!(result.unwrap().dropped, 1);
    }

    #[test]
    fn test_short_index_is_dropped() {
        let mut tile = TileEncoder::new();
        tile.element(
            &ElementBuilder::polygon()
                .tags(&[BUILDING_YES])
                .num_indices(2)
                .index(&[2])
                .coords(&[(0, 0), (1, 1)]),
        );

        let (result, _) = decode(tile.as_bytes());
        assert_eq!(result.unwrap().dropped, 1);
    }

    #[test]
    fn test_extra_index_entries_are_ignored() {
        let mut tile = TileEncoder::new();
        tile.element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .index(&[2, 7])
                .coords(&[(0, 0), (1, 1)]),
        );

        let (result, elements) = decode(tile.as_bytes());

        assert_eq!(result.unwrap().emitted, 1);
        assert_eq!(elements[0].subpath_lengths, vec![4]);
    }

    #[test]
    fn test_empty_geometry_is_dropped() {
        let mut tile = TileEncoder::new();
        tile.element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .index(&[0])
                .coords(&[(1, 1)]),
        )
        .element(&primary_line());

        let (result, elements) = decode(tile.as_bytes());
        let summary = result.unwrap();

        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.emitted, 1);
        assert_eq!(elements.len(), 1);
    }

    #[test]
    fn test_unknown_element_field_drops_element() {
        let mut tile = TileEncoder::new();
        tile.element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .field_varint(7, 1)
                .path(&[(0, 0), (1, 1)]),
        )
        .element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .path(&[(2, 2), (3, 3)]),
        );

        let (result, elements) = decode(tile.as_bytes());
        let summary = result.unwrap();

        assert_eq!(summary.dropped, 1);
        assert_eq!(summary.emitted, 1);
        assert_close(&elements[0].coordinates, &[2, 2, 3, 3]);
    }

    #[test]
    fn test_unknown_tile_field_stops_decoding() {
        let mut tile = TileEncoder::new();
        tile.element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .path(&[(0, 0), (1, 1)]),
        )
        .field_varint(5, 42)
        .element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY])
                .path(&[(2, 2), (3, 3)]),
        );
        let bytes = tile.into_bytes();

        let (result, elements) = decode(&bytes);
        let summary = result.unwrap();

        assert!(!summary.complete);
        assert_eq!(summary.emitted, 1);
        assert_eq!(elements.len(), 1);
        assert_eq!(summary.bytes, bytes.len());
    }

    #[test]
    fn test_zero_key_ends_tile_and_drains_body() {
        let mut tile = TileEncoder::new();
        tile.element(&primary_line())
            .end()
            .raw(&[0xde, 0xad, 0xbe, 0xef]);
        let bytes = tile.into_bytes();

        let (result, elements) = decode(&bytes);
        let summary = result.unwrap();

        assert!(summary.complete);
        assert_eq!(elements.len(), 1);
        assert_eq!(summary.bytes, bytes.len());
    }

    #[test]
    fn test_malformed_varint_aborts_tile() {
        let mut tile = TileEncoder::new();
        tile.element(&primary_line())
            .raw(&[0xff; 12]);

        let (result, _) = decode(tile.as_bytes());

        assert!(matches!(result, Err(FormatError::MalformedVarint { .. })));
    }

    #[test]
    fn test_unresolvable_tag_ids_are_skipped() {
        let mut tile = TileEncoder::new();
        tile.variable_tags(&[(key("name"), "Foo")]).element(
            &ElementBuilder::line()
                .tags(&[HIGHWAY_PRIMARY, TAG_LIMIT + 5, TAG_LIMIT - 1, TAG_LIMIT])
                .path(&[(0, 0), (1, 1)]),
        );

        let (result, elements) = decode(tile.as_bytes());

        assert_eq!(result.unwrap().emitted, 1);
        let tags = &elements[0].tags;
        assert_eq!(tags.len(), 2);
        assert!(tags[0].is("highway", "primary"));
        assert!(tags[1].is("name", "Foo"));
    }

    #[test]
    fn test_more_keys_than_declared_tags_fails() {
        let mut tile = TileEncoder::new();
        tile.num_tags(1).tag_keys([key("name"), key("ref")]);

        let (result, _) = decode(tile.as_bytes());

        assert!(matches!(
            result,
            Err(FormatError::TagCountExceeded {
                declared: 1,
                found: 2
            })
        ));
    }

    #[test]
    fn test_value_without_key_fails() {
        let mut tile = TileEncoder::new();
        tile.num_tags(1).tag_keys([key("name")]).tag_value("Foo").tag_value("Bar");

        let (result, _) = decode(tile.as_bytes());

        assert!(matches!(result, Err(FormatError::TagBind(_))));
    }

    #[test]
    fn test_layer_is_clamped() {
        let mut tile = TileEncoder::new();
        tile.element(&primary_line().layer(300));

        let (_, elements) = decode(tile.as_bytes());
        assert_eq!(elements[0].layer, u8::MAX);
    }

    #[test]
    fn test_variable_tags_do_not_leak_between_tiles() {
        let mut decoder = WireDecoder::new(DEFAULT_SCALE);

        let mut first = TileEncoder::new();
        first
            .variable_tags(&[(key("name"), "Foo")])
            .element(&named_line(0));
        let (_, elements) = decode_with(&mut decoder, first.as_bytes());
        assert_eq!(elements[0].tag_value("name"), Some("Foo"));

        let mut second = TileEncoder::new();
        second.element(&named_line(0));
        let (result, elements) = decode_with(&mut decoder, second.as_bytes());

        assert_eq!(result.unwrap().emitted, 1);
        assert_eq!(elements[0].tag_value("name"), None);
        assert!(elements[0].tags[0].is("highway", "primary"));
    }

    #[test]
    fn test_packed_span_larger_than_buffer_is_fatal() {
        let points: Vec<(i32, i32)> = (0..40).map(|i| (i * 1000, i * 1000)).collect();
        let mut tile = TileEncoder::new();
        tile.element(&ElementBuilder::line().tags(&[HIGHWAY_PRIMARY]).path(&points));

        let mut decoder = WireDecoder::with_buffer(DEFAULT_SCALE, ReadBuffer::with_capacity(64));
        let (result, _) = decode_with(&mut decoder, tile.as_bytes());

        assert!(matches!(result, Err(FormatError::SpanTooLarge { .. })));
    }

    #[test]
    fn test_large_tile_streams_through_small_buffer() {
        let mut tile = TileEncoder::new();
        for i in 0..50 {
            tile.element(
                &ElementBuilder::line()
                    .tags(&[HIGHWAY_PRIMARY])
                    .path(&[(i, i), (i + 1, i + 2)]),
            );
        }

        let mut decoder = WireDecoder::with_buffer(DEFAULT_SCALE, ReadBuffer::with_capacity(32));
        let (result, elements) = decode_with(&mut decoder, tile.as_bytes());

        assert_eq!(result.unwrap().emitted, 50);
        assert_close(&elements[49].coordinates, &[49, 49, 50, 51]);
    }
}
