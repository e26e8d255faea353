//! Line framing for the inbound serial stream.
//!
//! The controller prints one record per line. Reads arrive at arbitrary byte
//! boundaries, so [`LineDecoder`] keeps the trailing partial line between
//! calls to [`LineDecoder::feed`]. After every `feed` the buffer holds no
//! complete line.

/// Marker that opens a structured state record.
pub const STRUCTURED_MARKER: char = '{';

/// One line extracted from the stream, classified by its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    /// Trimmed text beginning with `{`; handed to the state parser.
    Structured(String),
    /// Any other trimmed text; logged, never parsed.
    Diagnostic(String),
}

impl Record {
    /// Classifies one line. Surrounding whitespace, including `\r`, is trimmed.
    #[must_use]
    pub fn classify(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.starts_with(STRUCTURED_MARKER) {
            Self::Structured(trimmed.to_string())
        } else {
            Self::Diagnostic(trimmed.to_string())
        }
    }
}

/// Output of one [`LineDecoder::feed`] call.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Decoded {
    /// Complete records in stream order.
    pub records: Vec<Record>,
    /// Completed lines dropped because they were not valid UTF-8.
    pub invalid_utf8: usize,
    /// Times the partial line exceeded the limit and was discarded.
    pub overflows: usize,
}

/// Splits a byte stream into newline-terminated records.
#[derive(Debug, Clone)]
pub struct LineDecoder {
    /// Bytes of the current partial line.
    buffer: Vec<u8>,
    /// Longest partial line kept before discarding.
    max_line_bytes: usize,
    /// Set after an overflow; input is dropped up to the next newline.
    resyncing: bool,
}

impl LineDecoder {
    /// Creates a decoder that discards partial lines longer than `max_line_bytes`.
    #[must_use]
    pub fn new(max_line_bytes: usize) -> Self {
        Self { buffer: Vec::new(), max_line_bytes: max_line_bytes.max(1), resyncing: false }
    }

    /// Number of buffered bytes belonging to the current partial line.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true while dropping input after an overflow.
    #[must_use]
    pub fn is_resyncing(&self) -> bool {
        self.resyncing
    }

    /// Appends `bytes` and extracts every complete line.
    pub fn feed(&mut self, bytes: &[u8]) -> Decoded {
        let mut out = Decoded::default();
        let mut rest = bytes;

        while !rest.is_empty() {
            match rest.iter().position(|&b| b == b'\n') {
                Some(pos) => {
                    let (head, tail) = rest.split_at(pos);
                    rest = &tail[1..];

                    if self.resyncing {
                        self.resyncing = false;
                        continue;
                    }

                    self.buffer.extend_from_slice(head);
                    let line = std::mem::take(&mut self.buffer);
                    if line.len() > self.max_line_bytes {
                        out.overflows += 1;
                        continue;
                    }
                    match String::from_utf8(line) {
                        Ok(text) => out.records.push(Record::classify(&text)),
                        Err(_) => out.invalid_utf8 += 1,
                    }
                }
                None => {
                    if !self.resyncing {
                        self.buffer.extend_from_slice(rest);
                        if self.buffer.len() > self.max_line_bytes {
                            self.buffer.clear();
                            self.resyncing = true;
                            out.overflows += 1;
                        }
                    }
                    rest = &[];
                }
            }
        }

        out
    }
}


// ============================================================================
// Property-based tests with proptest
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    /// Splits `data` at the given (unsorted, possibly duplicate) cut points.
    fn fragment(data: &[u8], cuts: &[usize]) -> Vec<Vec<u8>> {
        let mut points: Vec<usize> = cuts.iter().map(|c| c % (data.len() + 1)).collect();
        points.sort_unstable();
        points.dedup();

        let mut chunks = Vec::new();
        let mut start = 0;
        for p in points {
            chunks.push(data[start..p].to_vec());
            start = p;
        }
        chunks.push(data[start..].to_vec());
        chunks
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        /// Extracted lines do not depend on how the stream was fragmented.
        #[test]
        fn prop_fragmentation_independent(
            lines in prop::collection::vec("[a-zA-Z0-9{}:\" ]{0,40}", 0..20),
            cuts in prop::collection::vec(any::<usize>(), 0..30)
        ) {
            let stream: Vec<u8> = lines.iter().flat_map(|l| format!("{l}\n").into_bytes()).collect();

            let mut decoder = LineDecoder::new(4096);
            let mut records = Vec::new();
            for chunk in fragment(&stream, &cuts) {
                records.extend(decoder.feed(&chunk).records);
            }

            let expected: Vec<Record> = lines.iter().map(|l| Record::classify(l)).collect();
            prop_assert_eq!(records, expected);
            prop_assert_eq!(decoder.pending(), 0);
        }

        /// The buffer never holds a complete line after a feed.
        #[test]
        fn prop_no_complete_line_left(
            data in prop::collection::vec(any::<u8>(), 0..512),
            cuts in prop::collection::vec(any::<usize>(), 0..10)
        ) {
            let mut decoder = LineDecoder::new(64);
            for chunk in fragment(&data, &cuts) {
                decoder.feed(&chunk);
                prop_assert!(!decoder.buffer.contains(&b'\n'));
                prop_assert!(decoder.pending() <= 64);
            }
        }
    }
}
