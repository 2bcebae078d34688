//! Tag store boundary: the [`TagSource`] trait and its production adapter.
//!
//! The resolver never touches EXIF bytes itself — it sees a typed tag store
//! through [`TagSource`]. The production implementation is [`ExifStore`],
//! backed by the `kamadak-exif` parser. Tests substitute an in-memory store.
//!
//! Lookups are deliberately lossy about *why* a value is unavailable: an
//! absent tag and a present-but-wrongly-typed tag both read as `None`, and
//! the resolver maps either to its tag-not-found failure atom.

use std::io::Cursor;
use std::path::Path;

use exif::{Exif, Field, In, Tag, Value};

use crate::resolver::ExposureError;

/// Read-only typed access to a decoded metadata block.
///
/// `int`, `float`, and `text` return the tag's value converted to the
/// requested representation, or `None` when the tag is absent or its EXIF
/// type does not convert. Numeric EXIF types (BYTE/SHORT/LONG, the signed
/// variants, RATIONAL/SRATIONAL, FLOAT/DOUBLE) all convert to `float`;
/// only the integer types convert to `int`.
pub trait TagSource {
    fn int(&self, tag: Tag) -> Option<i64>;
    fn float(&self, tag: Tag) -> Option<f64>;
    fn text(&self, tag: Tag) -> Option<String>;

    /// Byte offset of the metadata block within the source file.
    ///
    /// Offsets stored *in* the metadata (such as the thumbnail location)
    /// are relative to this position.
    fn base_offset(&self) -> u64 {
        0
    }
}

/// Production [`TagSource`] over a parsed [`exif::Exif`] structure.
pub struct ExifStore {
    exif: Exif,
    base: u64,
}

impl ExifStore {
    /// Parse the EXIF block out of an image file.
    ///
    /// Accepts any container `kamadak-exif` understands (JPEG, TIFF, PNG,
    /// WebP, HEIF). For JPEG the offset of the embedded TIFF header is
    /// recorded so thumbnail offsets can be mapped back to file positions;
    /// for raw TIFF the base is zero, and for other containers it is left
    /// at zero.
    pub fn from_path(path: &Path) -> Result<Self, ExposureError> {
        let data = std::fs::read(path)?;
        let exif = exif::Reader::new().read_from_container(&mut Cursor::new(&data))?;
        let base = tiff_header_offset(&data).unwrap_or(0);
        Ok(Self { exif, base })
    }

    /// Wrap a raw TIFF-structured EXIF buffer (no container scan, base 0).
    pub fn from_tiff_buf(buf: Vec<u8>) -> Result<Self, ExposureError> {
        let exif = exif::Reader::new().read_raw(buf)?;
        Ok(Self { exif, base: 0 })
    }

    /// Look a tag up in the primary IFD, then in the thumbnail IFD.
    ///
    /// The thumbnail fallback exists because the thumbnail-offset tag lives
    /// in IFD1, and the resolver addresses every tag through the same
    /// lookup atom.
    fn field(&self, tag: Tag) -> Option<&Field> {
        self.exif
            .get_field(tag, In::PRIMARY)
            .or_else(|| self.exif.get_field(tag, In::THUMBNAIL))
    }
}

impl TagSource for ExifStore {
    fn int(&self, tag: Tag) -> Option<i64> {
        self.field(tag).and_then(|f| to_i64(&f.value))
    }

    fn float(&self, tag: Tag) -> Option<f64> {
        self.field(tag).and_then(|f| to_f64(&f.value))
    }

    fn text(&self, tag: Tag) -> Option<String> {
        self.field(tag).and_then(|f| to_text(&f.value))
    }

    fn base_offset(&self) -> u64 {
        self.base
    }
}

/// First element of an integer-typed value as `i64`.
fn to_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Byte(v) => v.first().map(|&x| i64::from(x)),
        Value::Short(v) => v.first().map(|&x| i64::from(x)),
        Value::Long(v) => v.first().map(|&x| i64::from(x)),
        Value::SByte(v) => v.first().map(|&x| i64::from(x)),
        Value::SShort(v) => v.first().map(|&x| i64::from(x)),
        Value::SLong(v) => v.first().map(|&x| i64::from(x)),
        _ => None,
    }
}

/// First element of any numeric value as `f64`.
fn to_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Rational(v) => v.first().map(|r| r.to_f64()),
        Value::SRational(v) => v.first().map(|r| r.to_f64()),
        Value::Float(v) => v.first().map(|&x| f64::from(x)),
        Value::Double(v) => v.first().copied(),
        _ => to_i64(value).map(|x| x as f64),
    }
}

/// First ASCII component, NUL- and whitespace-trimmed.
fn to_text(value: &Value) -> Option<String> {
    match value {
        Value::Ascii(v) => v.first().map(|bytes| {
            String::from_utf8_lossy(bytes)
                .trim_matches(char::from(0))
                .trim()
                .to_string()
        }),
        _ => None,
    }
}

const EXIF_HEADER: &[u8] = b"Exif\0\0";

/// Find the byte offset of the TIFF header inside an image file.
///
/// TIFF files start with it. For JPEG, walk the marker segments
/// (length-prefixed, until SOS starts the entropy-coded data) and return
/// the position just past the `Exif\0\0` signature of the first APP1
/// segment that carries it.
fn tiff_header_offset(data: &[u8]) -> Option<u64> {
    if data.starts_with(b"II") || data.starts_with(b"MM") {
        return Some(0);
    }
    if !data.starts_with(&[0xFF, 0xD8]) {
        return None;
    }

    let mut pos = 2;
    while pos + 4 <= data.len() {
        if data[pos] != 0xFF {
            return None;
        }
        let marker = data[pos + 1];
        // SOS starts entropy-coded data; EOI ends the stream
        if marker == 0xDA || marker == 0xD9 {
            break;
        }
        // Standalone markers (TEM, RSTn) carry no length field
        if marker == 0x01 || (0xD0..=0xD7).contains(&marker) {
            pos += 2;
            continue;
        }
        let len = u16::from_be_bytes([data[pos + 2], data[pos + 3]]) as usize;
        if len < 2 {
            return None;
        }
        let seg_start = pos + 4;
        let seg_end = (pos + 2 + len).min(data.len());
        if marker == 0xE1 && data[seg_start..seg_end].starts_with(EXIF_HEADER) {
            return Some((seg_start + EXIF_HEADER.len()) as u64);
        }
        pos += 2 + len;
    }
    None
}
