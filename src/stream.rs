//! The stream value type: an append-only log of `(id, fields)` entries.
//!
//! Stream IDs are `<ms>-<seq>` pairs ordered lexicographically by
//! `(ms, seq)`. XADD may supply the ID in three modes: explicit
//! (`1526919030474-0`), auto-sequence (`1526919030474-*`), or fully
//! auto-generated (`*`). All three funnel through [`StreamValue::resolve_id`],
//! which enforces strict monotonicity against the last appended entry,
//! including across backward wall-clock jumps.

use std::collections::HashMap;
use std::fmt;

use bytes::Bytes;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("The ID specified in XADD is equal or smaller than the target stream top item")]
    IdNotGreaterThanTop,
    #[error("The ID specified in XADD must be greater than 0-0")]
    IdIsZero,
    #[error("invalid stream ID for XRANGE start")]
    InvalidRangeStart,
    #[error("invalid stream ID for XRANGE end")]
    InvalidRangeEnd,
}

/// A fully resolved stream entry ID.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StreamId {
    pub ms: u64,
    pub seq: u64,
}

impl StreamId {
    pub const MIN: StreamId = StreamId { ms: 0, seq: 0 };
    pub const MAX: StreamId = StreamId {
        ms: u64::MAX,
        seq: u64::MAX,
    };

    pub fn new(ms: u64, seq: u64) -> Self {
        StreamId { ms, seq }
    }

    /// Parses the strict `<digits>-<digits>` form.
    pub fn parse(raw: &[u8]) -> Option<StreamId> {
        let sep = raw.iter().position(|&b| b == b'-')?;
        let ms = parse_u64_digits(&raw[..sep])?;
        let seq = parse_u64_digits(&raw[sep + 1..])?;
        Some(StreamId { ms, seq })
    }

    /// The canonical next ID: `(ms, seq + 1)`.
    ///
    /// Turns a "strictly after this ID" cursor into an inclusive lower
    /// bound for range queries.
    pub fn next(self) -> StreamId {
        StreamId {
            ms: self.ms,
            seq: self.seq.saturating_add(1),
        }
    }

    /// Renders the wire form, e.g. `1526919030474-0`.
    pub fn render(self) -> Bytes {
        Bytes::from(self.to_string().into_bytes())
    }
}

impl fmt::Display for StreamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ms, self.seq)
    }
}

fn parse_u64_digits(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() || !digits.iter().all(|b| b.is_ascii_digit()) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

/// Classification of an ID argument supplied to XADD.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdSpec {
    /// `*` or `*-*`: both parts generated from the wall clock.
    AutoGenerated,
    /// `<ms>-*`: fixed timestamp, generated sequence.
    AutoSequence(u64),
    /// `<ms>-<seq>`: taken as given, validated against the top entry.
    Explicit(StreamId),
    /// Anything else.
    Invalid,
}

/// Classifies a raw XADD ID argument.
pub fn classify(raw: &[u8]) -> IdSpec {
    if raw == b"*" || raw == b"*-*" {
        return IdSpec::AutoGenerated;
    }
    if let Some(ms_part) = raw.strip_suffix(b"-*") {
        return match parse_u64_digits(ms_part) {
            Some(ms) => IdSpec::AutoSequence(ms),
            None => IdSpec::Invalid,
        };
    }
    match StreamId::parse(raw) {
        Some(id) => IdSpec::Explicit(id),
        None => IdSpec::Invalid,
    }
}

/// One item of the log. Field order is insertion order and is preserved on
/// the wire.
#[derive(Debug, Clone, PartialEq)]
pub struct StreamEntry {
    pub id: Bytes,
    pub ms: u64,
    pub seq: u64,
    pub fields: Vec<(Bytes, Bytes)>,
}

impl StreamEntry {
    pub fn stream_id(&self) -> StreamId {
        StreamId::new(self.ms, self.seq)
    }
}

/// Backing value for stream keys.
///
/// `entries` is append-only and strictly increasing under `(ms, seq)`;
/// `id_index` maps every rendered ID to its position for O(1) lookups.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StreamValue {
    entries: Vec<StreamEntry>,
    id_index: HashMap<Bytes, usize>,
}

impl StreamValue {
    pub fn new() -> Self {
        StreamValue::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The ID of the newest entry, if any.
    pub fn last_id(&self) -> Option<StreamId> {
        self.entries.last().map(StreamEntry::stream_id)
    }

    /// Resolves an ID spec into the concrete ID a new entry would get.
    ///
    /// `wall_now_ms` is the wall clock reading used for the auto-generated
    /// mode; passing it in keeps the ID logic deterministic under test.
    ///
    /// Rules, given the last entry `(Lms, Lseq)`:
    /// - explicit: rejected if `0-0` or not strictly greater than the top;
    /// - `<ms>-*`: `<ms>-1` on an empty stream, `<ms>-0` when `ms > Lms`,
    ///   `<ms>-(Lseq+1)` when `ms == Lms`, rejected when `ms < Lms`;
    /// - `*`: `<now>-0` when the wall clock is ahead of the top, otherwise
    ///   `<Lms>-(Lseq+1)` so ordering survives backward clock jumps.
    pub fn resolve_id(&self, spec: IdSpec, wall_now_ms: u64) -> Result<StreamId, StreamError> {
        match spec {
            IdSpec::Invalid => Err(StreamError::IdNotGreaterThanTop),
            IdSpec::Explicit(id) => {
                if id == StreamId::MIN {
                    return Err(StreamError::IdIsZero);
                }
                match self.last_id() {
                    Some(last) if id <= last => Err(StreamError::IdNotGreaterThanTop),
                    _ => Ok(id),
                }
            }
            IdSpec::AutoSequence(ms) => match self.last_id() {
                None => Ok(StreamId::new(ms, 1)),
                Some(last) => {
                    if ms < last.ms {
                        Err(StreamError::IdNotGreaterThanTop)
                    } else if ms > last.ms {
                        Ok(StreamId::new(ms, 0))
                    } else {
                        let seq = last
                            .seq
                            .checked_add(1)
                            .ok_or(StreamError::IdNotGreaterThanTop)?;
                        Ok(StreamId::new(ms, seq))
                    }
                }
            },
            IdSpec::AutoGenerated => match self.last_id() {
                None => Ok(StreamId::new(wall_now_ms, 0)),
                Some(last) if wall_now_ms > last.ms => Ok(StreamId::new(wall_now_ms, 0)),
                Some(last) => {
                    let seq = last
                        .seq
                        .checked_add(1)
                        .ok_or(StreamError::IdNotGreaterThanTop)?;
                    Ok(StreamId::new(last.ms, seq))
                }
            },
        }
    }

    /// Appends an entry under a resolved ID and returns the rendered ID.
    ///
    /// The caller must have obtained `id` from [`resolve_id`] against the
    /// current top entry; this keeps the log strictly increasing.
    pub fn append(&mut self, id: StreamId, fields: Vec<(Bytes, Bytes)>) -> Bytes {
        let rendered = id.render();
        self.id_index.insert(rendered.clone(), self.entries.len());
        self.entries.push(StreamEntry {
            id: rendered.clone(),
            ms: id.ms,
            seq: id.seq,
            fields,
        });
        rendered
    }

    /// O(1) lookup of an entry by its rendered ID.
    pub fn entry_by_id(&self, raw: &[u8]) -> Option<&StreamEntry> {
        self.id_index.get(raw).map(|&index| &self.entries[index])
    }

    /// All entries with `start <= id <= end`, in ascending order.
    ///
    /// Binary-searches both bounds over the append-only log, so the cost is
    /// O(log n + k) for k returned entries.
    pub fn range(&self, start: StreamId, end: StreamId) -> &[StreamEntry] {
        if start > end {
            return &[];
        }
        let lo = self.entries.partition_point(|e| e.stream_id() < start);
        let hi = self.entries.partition_point(|e| e.stream_id() <= end);
        &self.entries[lo..hi]
    }

    /// Range with an unbounded lower end (`XRANGE key - end`).
    pub fn from_start(&self, end: StreamId) -> &[StreamEntry] {
        self.range(StreamId::MIN, end)
    }

    /// Range with an unbounded upper end (`XRANGE key start +`, XREAD).
    pub fn from_id_to_end(&self, start: StreamId) -> &[StreamEntry] {
        self.range(start, StreamId::MAX)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields(value: &str) -> Vec<(Bytes, Bytes)> {
        vec![(
            Bytes::from("f"),
            Bytes::copy_from_slice(value.as_bytes()),
        )]
    }

    fn stream_with_ids(ids: &[(u64, u64)]) -> StreamValue {
        let mut stream = StreamValue::new();
        for &(ms, seq) in ids {
            stream.append(StreamId::new(ms, seq), fields("x"));
        }
        stream
    }

    #[test]
    fn test_classify_id_formats() {
        let test_cases: Vec<(&[u8], IdSpec)> = vec![
            (b"*", IdSpec::AutoGenerated),
            (b"*-*", IdSpec::AutoGenerated),
            (b"1-0", IdSpec::Explicit(StreamId::new(1, 0))),
            (
                b"1526919030474-12",
                IdSpec::Explicit(StreamId::new(1526919030474, 12)),
            ),
            (b"1-*", IdSpec::AutoSequence(1)),
            (b"0-*", IdSpec::AutoSequence(0)),
            (b"abc", IdSpec::Invalid),
            (b"5", IdSpec::Invalid),
            (b"", IdSpec::Invalid),
            (b"1-", IdSpec::Invalid),
            (b"-1", IdSpec::Invalid),
            (b"1-2-3", IdSpec::Invalid),
            (b"abc-*", IdSpec::Invalid),
            (b"1-abc", IdSpec::Invalid),
            (b"1.5-0", IdSpec::Invalid),
        ];

        for (input, expected) in test_cases {
            assert_eq!(
                classify(input),
                expected,
                "classifying {:?}",
                String::from_utf8_lossy(input)
            );
        }
    }

    #[test]
    fn test_stream_id_ordering_and_parse() {
        assert!(StreamId::new(1, 9) < StreamId::new(2, 0));
        assert!(StreamId::new(2, 0) < StreamId::new(2, 1));
        assert_eq!(StreamId::parse(b"12-34"), Some(StreamId::new(12, 34)));
        assert_eq!(StreamId::parse(b"12"), None);
        assert_eq!(StreamId::new(5, 3).next(), StreamId::new(5, 4));
        assert_eq!(StreamId::new(12, 34).render(), Bytes::from("12-34"));
    }

    #[test]
    fn test_explicit_id_validation() {
        let empty = StreamValue::new();
        assert_eq!(
            empty.resolve_id(IdSpec::Explicit(StreamId::MIN), 0),
            Err(StreamError::IdIsZero)
        );
        assert_eq!(
            empty.resolve_id(IdSpec::Explicit(StreamId::new(0, 1)), 0),
            Ok(StreamId::new(0, 1))
        );

        let stream = stream_with_ids(&[(5, 0)]);
        let test_cases = vec![
            ((5, 0), Err(StreamError::IdNotGreaterThanTop)),
            ((4, 9), Err(StreamError::IdNotGreaterThanTop)),
            ((5, 1), Ok(StreamId::new(5, 1))),
            ((6, 0), Ok(StreamId::new(6, 0))),
            ((0, 0), Err(StreamError::IdIsZero)),
        ];
        for ((ms, seq), expected) in test_cases {
            assert_eq!(
                stream.resolve_id(IdSpec::Explicit(StreamId::new(ms, seq)), 0),
                expected,
                "explicit {}-{}",
                ms,
                seq
            );
        }
    }

    #[test]
    fn test_auto_sequence_resolution() {
        let empty = StreamValue::new();
        // first auto-sequence on an empty stream starts at 1
        assert_eq!(
            empty.resolve_id(IdSpec::AutoSequence(5), 0),
            Ok(StreamId::new(5, 1))
        );
        assert_eq!(
            empty.resolve_id(IdSpec::AutoSequence(0), 0),
            Ok(StreamId::new(0, 1))
        );

        let stream = stream_with_ids(&[(5, 2)]);
        assert_eq!(
            stream.resolve_id(IdSpec::AutoSequence(5), 0),
            Ok(StreamId::new(5, 3))
        );
        assert_eq!(
            stream.resolve_id(IdSpec::AutoSequence(7), 0),
            Ok(StreamId::new(7, 0))
        );
        assert_eq!(
            stream.resolve_id(IdSpec::AutoSequence(4), 0),
            Err(StreamError::IdNotGreaterThanTop)
        );
    }

    #[test]
    fn test_auto_generated_resolution() {
        let empty = StreamValue::new();
        assert_eq!(
            empty.resolve_id(IdSpec::AutoGenerated, 1000),
            Ok(StreamId::new(1000, 0))
        );

        let stream = stream_with_ids(&[(1000, 4)]);
        // wall clock moved forward
        assert_eq!(
            stream.resolve_id(IdSpec::AutoGenerated, 1001),
            Ok(StreamId::new(1001, 0))
        );
        // same millisecond: bump the sequence
        assert_eq!(
            stream.resolve_id(IdSpec::AutoGenerated, 1000),
            Ok(StreamId::new(1000, 5))
        );
        // backward clock jump: hold the top timestamp
        assert_eq!(
            stream.resolve_id(IdSpec::AutoGenerated, 900),
            Ok(StreamId::new(1000, 5))
        );
    }

    #[test]
    fn test_invalid_spec_resolution() {
        let stream = StreamValue::new();
        assert_eq!(
            stream.resolve_id(IdSpec::Invalid, 0),
            Err(StreamError::IdNotGreaterThanTop)
        );
    }

    #[test]
    fn test_append_maintains_id_index() {
        let mut stream = StreamValue::new();
        let first = stream.append(StreamId::new(1, 0), fields("a"));
        let second = stream.append(StreamId::new(2, 0), fields("b"));

        assert_eq!(first, Bytes::from("1-0"));
        assert_eq!(second, Bytes::from("2-0"));
        assert_eq!(stream.len(), 2);
        assert_eq!(stream.last_id(), Some(StreamId::new(2, 0)));

        let entry = stream.entry_by_id(b"1-0").expect("entry 1-0 present");
        assert_eq!(entry.fields[0].1, Bytes::from("a"));
        assert!(stream.entry_by_id(b"9-9").is_none());
    }

    #[test]
    fn test_range_queries() {
        let stream = stream_with_ids(&[(1, 0), (2, 0), (2, 5), (3, 0)]);

        let ids = |entries: &[StreamEntry]| -> Vec<StreamId> {
            entries.iter().map(StreamEntry::stream_id).collect()
        };

        assert_eq!(
            ids(stream.range(StreamId::new(2, 0), StreamId::new(2, 5))),
            vec![StreamId::new(2, 0), StreamId::new(2, 5)]
        );
        // bounds that fall between entries
        assert_eq!(
            ids(stream.range(StreamId::new(1, 1), StreamId::new(2, 4))),
            vec![StreamId::new(2, 0)]
        );
        // inclusive on both ends
        assert_eq!(
            ids(stream.range(StreamId::new(1, 0), StreamId::new(3, 0))).len(),
            4
        );
        // start beyond the top
        assert!(stream
            .range(StreamId::new(4, 0), StreamId::MAX)
            .is_empty());
        // start > end
        assert!(stream
            .range(StreamId::new(3, 0), StreamId::new(1, 0))
            .is_empty());

        assert_eq!(
            ids(stream.from_start(StreamId::new(2, 0))),
            vec![StreamId::new(1, 0), StreamId::new(2, 0)]
        );
        assert_eq!(
            ids(stream.from_id_to_end(StreamId::new(2, 5))),
            vec![StreamId::new(2, 5), StreamId::new(3, 0)]
        );
    }

    #[test]
    fn test_range_on_empty_stream() {
        let stream = StreamValue::new();
        assert!(stream.range(StreamId::MIN, StreamId::MAX).is_empty());
    }
}
