//! Pull reader for SMS Backup & Restore XML files.
//!
//! Backups are structured as:
//! ```xml
//! <?xml version='1.0' encoding='UTF-8' standalone='yes' ?>
//! <smses count="2">
//!   <sms address="+15550100" date="1705314600000" type="1" body="Hi" contact_name="Alice" />
//!   <sms address="+15550100" date="1705314660000" type="2" body="Hello!" contact_name="Alice" />
//! </smses>
//! ```
//!
//! Only `sms` elements are turned into messages. `mms` elements, comments
//! and everything else are skipped. No tree is built: the event buffer is
//! reused for every tag, so memory stays flat regardless of file size.
//!
//! A document with no root element, or one that ends while elements are
//! still open (an interrupted copy), is malformed.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use crate::config::StreamingConfig;
use crate::error::{MalformedKind, Result, SmsSlicerError};
use crate::message::{Direction, SmsMessage};

use super::MessageIterator;

/// Element name of a single message.
pub const SMS_TAG: &[u8] = b"sms";

/// Streaming reader yielding one [`SmsMessage`] per `sms` element.
///
/// # Example
///
/// ```rust,no_run
/// use smsslicer::config::StreamingConfig;
/// use smsslicer::streaming::SmsReader;
///
/// let reader = SmsReader::open("sms-backup.xml", &StreamingConfig::default()).unwrap();
///
/// for result in reader {
///     let msg = result.unwrap();
///     println!("{} {}: {}", msg.timestamp, msg.direction, msg.body);
/// }
/// ```
pub struct SmsReader<R: BufRead> {
    reader: Reader<R>,
    buf: Vec<u8>,
    path: PathBuf,
    total_bytes: u64,
    read_bodies: bool,
    depth: usize,
    saw_root: bool,
    finished: bool,
}

impl SmsReader<BufReader<File>> {
    /// Opens a backup file for streaming.
    ///
    /// # Errors
    ///
    /// Returns [`SmsSlicerError::FileAccess`] if the file cannot be opened
    /// or its size cannot be read.
    pub fn open(path: impl AsRef<Path>, config: &StreamingConfig) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| SmsSlicerError::file_access(path, e))?;
        let total_bytes = file
            .metadata()
            .map_err(|e| SmsSlicerError::file_access(path, e))?
            .len();

        let reader = BufReader::with_capacity(config.effective_buffer_size(), file);
        Ok(Self::from_reader(reader, total_bytes, path))
    }
}

impl<R: BufRead> SmsReader<R> {
    /// Wraps an already-open reader.
    ///
    /// `total_bytes` is used for progress only; `path` is used in errors.
    pub fn from_reader(reader: R, total_bytes: u64, path: impl Into<PathBuf>) -> Self {
        Self {
            reader: Reader::from_reader(reader),
            buf: Vec::with_capacity(4096),
            path: path.into(),
            total_bytes,
            read_bodies: true,
            depth: 0,
            saw_root: false,
            finished: false,
        }
    }

    /// Stops decoding `body` attributes; every yielded body is empty.
    ///
    /// The aggregator never looks at bodies, and they dominate the size of
    /// a typical backup.
    #[must_use]
    pub fn skip_bodies(mut self) -> Self {
        self.read_bodies = false;
        self
    }

    /// The path this reader reports in errors.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn next_message(&mut self) -> Result<Option<SmsMessage>> {
        loop {
            self.buf.clear();
            let element = match self.reader.read_event_into(&mut self.buf) {
                Ok(Event::Start(e)) => {
                    self.depth += 1;
                    e
                }
                Ok(Event::Empty(e)) => e,
                Ok(Event::End(_)) => {
                    self.depth = self.depth.saturating_sub(1);
                    continue;
                }
                // quick-xml reports EOF even with elements still open.
                Ok(Event::Eof) if self.depth > 0 || !self.saw_root => {
                    return Err(SmsSlicerError::malformed(
                        &self.path,
                        self.reader.buffer_position(),
                        MalformedKind::UnexpectedEof,
                    ));
                }
                Ok(Event::Eof) => return Ok(None),
                Ok(_) => continue,
                Err(err) => {
                    return Err(read_error(&self.path, self.reader.error_position(), err));
                }
            };

            self.saw_root = true;
            if element.local_name().as_ref() == SMS_TAG {
                return parse_sms(&element, self.read_bodies)
                    .map(Some)
                    .map_err(|kind| SmsSlicerError::malformed(&self.path, self.reader.buffer_position(), kind));
            }
        }
    }
}

impl<R: BufRead> Iterator for SmsReader<R> {
    type Item = Result<SmsMessage>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        match self.next_message() {
            Ok(Some(msg)) => Some(Ok(msg)),
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

impl<R: BufRead> MessageIterator for SmsReader<R> {
    fn bytes_processed(&self) -> u64 {
        self.reader.buffer_position()
    }

    fn total_bytes(&self) -> Option<u64> {
        Some(self.total_bytes)
    }
}

/// Splits reader failures into I/O problems and malformed XML.
fn read_error(path: &Path, position: u64, err: quick_xml::Error) -> SmsSlicerError {
    match err {
        quick_xml::Error::Io(shared) => {
            let source = Arc::try_unwrap(shared)
                .unwrap_or_else(|shared| io::Error::new(shared.kind(), shared.to_string()));
            SmsSlicerError::file_access(path, source)
        }
        other => SmsSlicerError::malformed(path, position, other),
    }
}

/// Extracts message fields from an `sms` element.
///
/// `address` and `date` are required. A missing `type` counts as received,
/// a missing or empty `contact_name` as no name, a missing `body` as empty.
fn parse_sms(element: &BytesStart<'_>, read_body: bool) -> std::result::Result<SmsMessage, MalformedKind> {
    let mut address = None;
    let mut contact_name = None;
    let mut date = None;
    let mut type_code = None;
    let mut body = None;

    for attr in element.attributes() {
        let attr = attr?;
        match attr.key.as_ref() {
            b"address" => address = Some(attr.unescape_value()?.into_owned()),
            b"contact_name" => contact_name = Some(attr.unescape_value()?.into_owned()),
            b"date" => date = Some(attr.unescape_value()?.into_owned()),
            b"type" => type_code = Some(attr.unescape_value()?.into_owned()),
            b"body" if read_body => body = Some(attr.unescape_value()?.into_owned()),
            _ => {}
        }
    }

    let address = address.ok_or(MalformedKind::MissingAttribute("address"))?;
    let raw_date = date.ok_or(MalformedKind::MissingAttribute("date"))?;
    let timestamp = raw_date
        .trim()
        .parse::<i64>()
        .map_err(|_| MalformedKind::InvalidAttribute {
            name: "date",
            value: raw_date.clone(),
        })?;

    let direction = type_code
        .as_deref()
        .map_or(Direction::Received, Direction::from_type_code);

    Ok(SmsMessage {
        address,
        contact_name: contact_name.filter(|name| !name.is_empty()),
        timestamp,
        direction,
        body: body.unwrap_or_default(),
    })
}
