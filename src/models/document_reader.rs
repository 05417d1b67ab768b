use crate::constants::DOCUMENT_ROW_ELEMENT;
use crate::utils::{open_input, parse_creation_timestamp};
use crate::{Document, Error, PostType};
use log::{error, warn};
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{self, BufRead};
use std::path::Path;

/// Counters kept by the reader while it walks the corpus.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReaderStats {
    /// `row` units read, well-formed or not.
    pub scanned: u64,

    /// Units skipped because they could not be parsed.
    pub malformed: u64,

    /// Every anomaly: skipped units plus fields which fell back to a default.
    pub anomalies: u64,
}

/// Outcome of scanning the raw input for the next `row` unit.
enum UnitScan {
    /// A complete `<row ...>` or `<row .../>` tag is in the unit buffer.
    Complete,
    /// A `row` tag interrupted by a raw `<` before it was closed.
    Unterminated,
    /// Input ended inside a `row` tag.
    Truncated,
    EndOfInput,
}

#[derive(Clone, Copy)]
enum ScanState {
    Seeking,
    ElementName,
    Attributes { quote: Option<u8> },
}

/// A forward-only, constant-memory iterator over the `row` elements of a post dump.
///
/// Units are located directly in the byte stream and only the tag of the current unit is
/// buffered; quick-xml then decodes its attributes. Anything between units (other
/// elements, end tags, broken markup) is skipped, so a corrupt unit never hides the
/// well-formed units after it.
///
/// Malformed units are logged, counted and skipped. The iterator ends at end of input, on
/// an IO failure, or once `row_limit` units have been scanned.
pub struct DocumentReader<R: BufRead> {
    source: R,
    unit: Vec<u8>,
    byte_offset: u64,
    row_limit: Option<u64>,
    stats: ReaderStats,
    is_finished: bool,
}

impl DocumentReader<Box<dyn BufRead>> {
    /// Opens a corpus file, decompressing `*.gz` files on the fly.
    pub fn from_path(path: &Path) -> Result<Self, Error> {
        Ok(Self::new(open_input(path)?))
    }
}

impl<R: BufRead> DocumentReader<R> {
    pub fn new(source: R) -> Self {
        DocumentReader {
            source,
            unit: Vec::new(),
            byte_offset: 0,
            row_limit: None,
            stats: ReaderStats::default(),
            is_finished: false,
        }
    }

    /// Stops after `row_limit` units have been scanned. `0` means unlimited.
    pub fn with_row_limit(mut self, row_limit: u64) -> Self {
        self.row_limit = (row_limit > 0).then_some(row_limit);
        self
    }

    pub fn stats(&self) -> ReaderStats {
        self.stats
    }

    fn next_document(&mut self) -> Option<Document> {
        while !self.is_finished {
            if let Some(row_limit) = self.row_limit {
                if self.stats.scanned >= row_limit {
                    self.is_finished = true;
                    break;
                }
            }

            match self.scan_unit() {
                Ok(UnitScan::Complete) => {
                    self.stats.scanned += 1;

                    match Self::decode_unit(&self.unit, &mut self.stats) {
                        Ok(document) => return Some(document),
                        Err(reason) => self.skip_malformed(&reason),
                    }
                }
                Ok(UnitScan::Unterminated) => {
                    self.stats.scanned += 1;
                    self.skip_malformed("tag interrupted by another element");
                }
                Ok(UnitScan::Truncated) => {
                    self.stats.scanned += 1;
                    self.skip_malformed("input ended inside the tag");
                    self.is_finished = true;
                }
                Ok(UnitScan::EndOfInput) => self.is_finished = true,
                Err(e) => {
                    error!("Failed to read corpus at byte {}: {}", self.byte_offset, e);
                    self.is_finished = true;
                }
            }
        }

        None
    }

    fn skip_malformed(&mut self, reason: &str) {
        self.stats.malformed += 1;
        self.stats.anomalies += 1;
        warn!(
            "Skipping malformed row #{} before byte {}: {}",
            self.stats.scanned, self.byte_offset, reason
        );
    }

    /// Advances to the end of the next `row` tag, collecting the tag into `unit`.
    ///
    /// Attribute values cannot contain a raw `<`, so one outside a quoted value and inside
    /// a `row` tag ends the unit as unterminated and is left for the next scan.
    fn scan_unit(&mut self) -> io::Result<UnitScan> {
        let mut state = ScanState::Seeking;
        self.unit.clear();

        loop {
            let chunk = match self.source.fill_buf() {
                Ok(chunk) => chunk,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };

            if chunk.is_empty() {
                return Ok(match state {
                    ScanState::Attributes { .. } => UnitScan::Truncated,
                    _ => UnitScan::EndOfInput,
                });
            }

            let mut consumed = 0;
            let mut outcome = None;

            while consumed < chunk.len() {
                let byte = chunk[consumed];

                match state {
                    ScanState::Seeking => {
                        if byte == b'<' {
                            self.unit.clear();
                            self.unit.push(byte);
                            state = ScanState::ElementName;
                        }
                        consumed += 1;
                    }
                    ScanState::ElementName => {
                        if byte.is_ascii_whitespace() || matches!(byte, b'/' | b'>' | b'<') {
                            // The delimiter is handled again by the next state
                            state = if self.unit[1..] == *DOCUMENT_ROW_ELEMENT {
                                ScanState::Attributes { quote: None }
                            } else {
                                ScanState::Seeking
                            };
                        } else {
                            if self.unit.len() > DOCUMENT_ROW_ELEMENT.len() {
                                state = ScanState::Seeking;
                            } else {
                                self.unit.push(byte);
                            }
                            consumed += 1;
                        }
                    }
                    ScanState::Attributes { quote } => {
                        if byte == b'<' {
                            outcome = Some(UnitScan::Unterminated);
                            break;
                        }

                        self.unit.push(byte);
                        consumed += 1;

                        match quote {
                            Some(open_quote) if byte == open_quote => {
                                state = ScanState::Attributes { quote: None };
                            }
                            Some(_) => {}
                            None if byte == b'"' || byte == b'\'' => {
                                state = ScanState::Attributes { quote: Some(byte) };
                            }
                            None if byte == b'>' => {
                                outcome = Some(UnitScan::Complete);
                                break;
                            }
                            None => {}
                        }
                    }
                }
            }

            self.source.consume(consumed);
            self.byte_offset += consumed as u64;

            if let Some(outcome) = outcome {
                return Ok(outcome);
            }
        }
    }

    /// Decodes one complete `row` tag.
    fn decode_unit(unit: &[u8], stats: &mut ReaderStats) -> Result<Document, String> {
        let mut reader = Reader::from_reader(unit);

        match reader.read_event() {
            Ok(Event::Empty(element)) | Ok(Event::Start(element)) => {
                Self::parse_row(&element, stats)
            }
            Ok(_) => Err("not a row element".to_string()),
            Err(e) => Err(format!("invalid markup: {}", e)),
        }
    }

    /// Extracts a `Document` from the attributes of one `row` element.
    ///
    /// An unparsable view count falls back to `0` and an unparsable creation date to
    /// `None`; both are counted as anomalies. A unit without an `Id` or with broken
    /// attribute syntax is rejected.
    fn parse_row(element: &BytesStart, stats: &mut ReaderStats) -> Result<Document, String> {
        let mut document = Document {
            id: String::new(),
            post_type: PostType::Other(String::new()),
            title: String::new(),
            body: String::new(),
            tags: String::new(),
            view_count: 0,
            created_at: None,
        };

        let mut raw_view_count: Option<String> = None;
        let mut raw_creation_date: Option<String> = None;

        for attribute in element.attributes() {
            let attribute = attribute.map_err(|e| format!("invalid attribute: {}", e))?;

            let value = attribute
                .unescape_value()
                .map(|value| value.into_owned())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attribute.value).into_owned());

            match attribute.key.as_ref() {
                b"Id" => document.id = value,
                b"PostTypeId" => document.post_type = PostType::from_code(&value),
                b"Title" => document.title = value,
                b"Body" => document.body = value,
                b"Tags" => document.tags = value,
                b"ViewCount" => raw_view_count = Some(value),
                b"CreationDate" => raw_creation_date = Some(value),
                _ => {}
            }
        }

        if document.id.trim().is_empty() {
            return Err("missing Id attribute".to_string());
        }

        if let Some(raw_view_count) = raw_view_count {
            match raw_view_count.trim().parse::<u64>() {
                Ok(view_count) => document.view_count = view_count,
                Err(_) => {
                    stats.anomalies += 1;
                    warn!(
                        "Post {}: unparsable ViewCount '{}', using 0",
                        document.id, raw_view_count
                    );
                }
            }
        }

        if let Some(raw_creation_date) = raw_creation_date {
            document.created_at = parse_creation_timestamp(&raw_creation_date);

            if document.created_at.is_none() {
                stats.anomalies += 1;
                warn!(
                    "Post {}: unparsable CreationDate '{}'",
                    document.id, raw_creation_date
                );
            }
        }

        Ok(document)
    }
}

impl<R: BufRead> Iterator for DocumentReader<R> {
    type Item = Document;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_document()
    }
}
