//! Byte-level document inspection.
//!
//! Formats are identified by magic bytes, with the caller's declared
//! extension as a fallback for inconclusive payloads. The profiles parsed
//! here are the raw material the structural and forensic checks run over:
//! PDF syntax is scanned for pages, shown text and authoring metadata; PNG
//! chunks and JPEG segments are walked for dimensions, density and the
//! embedded software tag. Checksums inside the containers (PNG chunk CRCs)
//! are not verified.

use serde::{Deserialize, Serialize};

use crate::error::{AnalysisError, Result};

/// PNG file signature.
pub const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

/// Extracted text below this length marks a document as low-content.
pub const MIN_TEXT_LENGTH: usize = 50;

fn malformed(format: &'static str, reason: impl Into<String>) -> AnalysisError {
    AnalysisError::Malformed {
        format,
        reason: reason.into(),
    }
}

/// Document formats the pipeline understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentFormat {
    Pdf,
    Png,
    Jpeg,
}

impl DocumentFormat {
    /// Whether this format goes down the raster (forensic) path.
    pub fn is_raster(self) -> bool {
        matches!(self, DocumentFormat::Png | DocumentFormat::Jpeg)
    }

    /// Identify the format from magic bytes alone.
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"%PDF-") {
            Some(DocumentFormat::Pdf)
        } else if bytes.starts_with(PNG_SIGNATURE) {
            Some(DocumentFormat::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(DocumentFormat::Jpeg)
        } else {
            None
        }
    }

    /// Identify the format, preferring magic bytes over the declared
    /// extension. The hint only decides when the bytes are inconclusive.
    pub fn detect(bytes: &[u8], hint: Option<&str>) -> Result<Self> {
        if let Some(format) = Self::sniff(bytes) {
            return Ok(format);
        }
        let Some(hint) = hint else {
            return Err(AnalysisError::UnsupportedFormat("unrecognized bytes".into()));
        };
        match hint.trim_start_matches('.').to_ascii_lowercase().as_str() {
            "pdf" => Ok(DocumentFormat::Pdf),
            "png" => Ok(DocumentFormat::Png),
            "jpg" | "jpeg" => Ok(DocumentFormat::Jpeg),
            other => Err(AnalysisError::UnsupportedFormat(other.to_string())),
        }
    }
}

impl std::fmt::Display for DocumentFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocumentFormat::Pdf => write!(f, "pdf"),
            DocumentFormat::Png => write!(f, "png"),
            DocumentFormat::Jpeg => write!(f, "jpeg"),
        }
    }
}

// ─── PDF ────────────────────────────────────────────────────────────────────

/// Structural profile of a text document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PdfProfile {
    pub pages: u32,
    /// Total length of text shown by the content streams.
    pub text_length: usize,
    /// Whether any image XObject is embedded.
    pub has_images: bool,
    pub creation_date: Option<String>,
    pub producer: Option<String>,
    pub creator: Option<String>,
}

impl PdfProfile {
    /// Scan a PDF for the fields the structural checks need.
    ///
    /// This is a syntactic scan, not a full object-model parse: page
    /// objects are counted by their `/Type /Page` entries, shown text is
    /// summed from string literals inside `BT`/`ET` blocks, and the Info
    /// fields are read as literal strings after their names.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        if !bytes.starts_with(b"%PDF-") {
            return Err(malformed("pdf", "missing %PDF header"));
        }
        Ok(Self {
            pages: count_pages(bytes),
            text_length: shown_text_length(bytes),
            has_images: find(bytes, b"/Subtype /Image").is_some()
                || find(bytes, b"/Subtype/Image").is_some(),
            creation_date: name_string(bytes, b"/CreationDate"),
            producer: name_string(bytes, b"/Producer"),
            creator: name_string(bytes, b"/Creator"),
        })
    }
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

/// Count `/Type /Page` entries, excluding the `/Pages` tree node.
fn count_pages(bytes: &[u8]) -> u32 {
    let mut count = 0u32;
    let mut i = 0usize;
    while let Some(rel) = find(&bytes[i..], b"/Type") {
        let token_end = i + rel + b"/Type".len();
        let mut j = token_end;
        while j < bytes.len() && bytes[j].is_ascii_whitespace() {
            j += 1;
        }
        if bytes[j..].starts_with(b"/Page") && bytes.get(j + b"/Page".len()) != Some(&b's') {
            count += 1;
        }
        i = token_end;
    }
    count
}

/// Total length of string literals inside BT/ET text blocks.
fn shown_text_length(bytes: &[u8]) -> usize {
    let mut total = 0usize;
    let mut i = 0usize;
    while let Some(rel) = find(&bytes[i..], b"BT") {
        let begin = i + rel + 2;
        match find(&bytes[begin..], b"ET") {
            Some(rel_end) => {
                total += literal_text_len(&bytes[begin..begin + rel_end]);
                i = begin + rel_end + 2;
            }
            None => {
                total += literal_text_len(&bytes[begin..]);
                break;
            }
        }
    }
    total
}

/// Character count inside `(...)` literals, honoring escapes and balanced
/// nested parentheses.
fn literal_text_len(span: &[u8]) -> usize {
    let mut len = 0usize;
    let mut depth = 0usize;
    let mut i = 0usize;
    while i < span.len() {
        match span[i] {
            b'\\' if depth > 0 => {
                // escaped byte is one shown character
                len += 1;
                i += 1;
            }
            b'(' => {
                if depth > 0 {
                    len += 1;
                }
                depth += 1;
            }
            b')' => {
                depth = depth.saturating_sub(1);
                if depth > 0 {
                    len += 1;
                }
            }
            _ if depth > 0 => len += 1,
            _ => {}
        }
        i += 1;
    }
    len
}

/// The literal string following a dictionary name, e.g. `/Producer (...)`.
fn name_string(bytes: &[u8], name: &[u8]) -> Option<String> {
    let pos = find(bytes, name)?;
    let mut i = pos + name.len();
    while i < bytes.len() && bytes[i].is_ascii_whitespace() {
        i += 1;
    }
    if bytes.get(i) != Some(&b'(') {
        return None;
    }
    i += 1;

    let mut value = Vec::new();
    let mut depth = 1usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                if let Some(&next) = bytes.get(i + 1) {
                    value.push(next);
                    i += 1;
                }
            }
            b'(' => {
                depth += 1;
                value.push(b'(');
            }
            b')' => {
                depth -= 1;
                if depth == 0 {
                    break;
                }
                value.push(b')');
            }
            b => value.push(b),
        }
        i += 1;
    }
    Some(String::from_utf8_lossy(&value).into_owned())
}

// ─── Raster images ──────────────────────────────────────────────────────────

/// Forensic profile of a raster image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RasterProfile {
    pub format: DocumentFormat,
    pub width: u32,
    pub height: u32,
    pub channels: u8,
    pub bit_depth: u8,
    pub has_alpha: bool,
    /// Declared pixel density in dots per inch, where the file carries one.
    pub density: Option<u32>,
    /// Authoring software tag (PNG `tEXt` Software keyword, JPEG EXIF 0x0131).
    pub software: Option<String>,
}

impl RasterProfile {
    /// Parse the headers of a raster image.
    pub fn parse(format: DocumentFormat, bytes: &[u8]) -> Result<Self> {
        match format {
            DocumentFormat::Png => parse_png(bytes),
            DocumentFormat::Jpeg => parse_jpeg(bytes),
            DocumentFormat::Pdf => Err(malformed("pdf", "not a raster image")),
        }
    }
}

fn parse_png(bytes: &[u8]) -> Result<RasterProfile> {
    if !bytes.starts_with(PNG_SIGNATURE) {
        return Err(malformed("png", "bad signature"));
    }

    let mut profile = RasterProfile {
        format: DocumentFormat::Png,
        width: 0,
        height: 0,
        channels: 0,
        bit_depth: 0,
        has_alpha: false,
        density: None,
        software: None,
    };
    let mut saw_ihdr = false;

    // Chunk layout: length u32 BE, type [u8; 4], data, crc u32
    let mut i = PNG_SIGNATURE.len();
    while i + 8 <= bytes.len() {
        let length =
            u32::from_be_bytes([bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]]) as usize;
        let ctype = &bytes[i + 4..i + 8];
        let data_start = i + 8;
        let data_end = data_start
            .checked_add(length)
            .filter(|&end| end <= bytes.len())
            .ok_or_else(|| malformed("png", "chunk overruns file"))?;
        let data = &bytes[data_start..data_end];

        match ctype {
            b"IHDR" => {
                if data.len() < 13 {
                    return Err(malformed("png", "short IHDR"));
                }
                profile.width = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
                profile.height = u32::from_be_bytes([data[4], data[5], data[6], data[7]]);
                profile.bit_depth = data[8];
                let color_type = data[9];
                profile.channels = match color_type {
                    0 | 3 => 1, // greyscale / palette
                    2 => 3,
                    4 => 2,
                    6 => 4,
                    other => {
                        return Err(malformed("png", format!("unknown color type {}", other)))
                    }
                };
                profile.has_alpha = matches!(color_type, 4 | 6);
                saw_ihdr = true;
            }
            b"pHYs" => {
                // unit 1 = pixels per metre
                if data.len() >= 9 && data[8] == 1 {
                    let ppm = u32::from_be_bytes([data[0], data[1], data[2], data[3]]);
                    profile.density = Some((f64::from(ppm) * 0.0254).round() as u32);
                }
            }
            b"tEXt" => {
                if let Some(nul) = data.iter().position(|&b| b == 0) {
                    if &data[..nul] == b"Software" {
                        profile.software =
                            Some(String::from_utf8_lossy(&data[nul + 1..]).into_owned());
                    }
                }
            }
            b"IEND" => break,
            _ => {}
        }

        // Skip the CRC; chunk checksums are not this layer's business
        i = data_end + 4;
    }

    if !saw_ihdr {
        return Err(malformed("png", "missing IHDR"));
    }
    Ok(profile)
}

fn parse_jpeg(bytes: &[u8]) -> Result<RasterProfile> {
    if !bytes.starts_with(&[0xFF, 0xD8]) {
        return Err(malformed("jpeg", "bad signature"));
    }

    let mut profile = RasterProfile {
        format: DocumentFormat::Jpeg,
        width: 0,
        height: 0,
        channels: 0,
        bit_depth: 0,
        has_alpha: false,
        density: None,
        software: None,
    };
    let mut saw_sof = false;

    let mut i = 2usize;
    while i + 2 <= bytes.len() {
        if bytes[i] != 0xFF {
            return Err(malformed("jpeg", "lost marker sync"));
        }
        let marker = bytes[i + 1];

        // Standalone markers carry no length
        match marker {
            0x01 | 0xD0..=0xD7 => {
                i += 2;
                continue;
            }
            0xD9 => break, // EOI
            _ => {}
        }

        if i + 4 > bytes.len() {
            return Err(malformed("jpeg", "truncated segment header"));
        }
        let length = u16::from_be_bytes([bytes[i + 2], bytes[i + 3]]) as usize;
        if length < 2 || i + 2 + length > bytes.len() {
            return Err(malformed("jpeg", "segment overruns file"));
        }
        let data = &bytes[i + 4..i + 2 + length];

        match marker {
            // Baseline, extended sequential, progressive frame headers
            0xC0 | 0xC1 | 0xC2 => {
                if data.len() < 6 {
                    return Err(malformed("jpeg", "short SOF"));
                }
                profile.bit_depth = data[0];
                profile.height = u32::from(u16::from_be_bytes([data[1], data[2]]));
                profile.width = u32::from(u16::from_be_bytes([data[3], data[4]]));
                profile.channels = data[5];
                saw_sof = true;
            }
            // APP0: JFIF density
            0xE0 => {
                if data.len() >= 12 && data.starts_with(b"JFIF\0") {
                    let x_density = u32::from(u16::from_be_bytes([data[8], data[9]]));
                    profile.density = match data[7] {
                        1 => Some(x_density),
                        2 => Some((f64::from(x_density) * 2.54).round() as u32),
                        _ => None,
                    };
                }
            }
            // APP1: EXIF
            0xE1 => {
                if let Some(tiff) = data.strip_prefix(b"Exif\0\0".as_slice()) {
                    if profile.software.is_none() {
                        profile.software = exif_software(tiff);
                    }
                }
            }
            // Start of scan: entropy-coded data follows, headers are done
            0xDA => break,
            _ => {}
        }

        i += 2 + length;
    }

    if !saw_sof {
        return Err(malformed("jpeg", "missing SOF"));
    }
    Ok(profile)
}

/// Pull the ASCII Software tag (0x0131) out of a TIFF-format EXIF block.
fn exif_software(tiff: &[u8]) -> Option<String> {
    let little_endian = match tiff.get(0..2)? {
        b"II" => true,
        b"MM" => false,
        _ => return None,
    };
    let read_u16 = |at: usize| -> Option<u16> {
        let b = tiff.get(at..at + 2)?;
        Some(if little_endian {
            u16::from_le_bytes([b[0], b[1]])
        } else {
            u16::from_be_bytes([b[0], b[1]])
        })
    };
    let read_u32 = |at: usize| -> Option<u32> {
        let b = tiff.get(at..at + 4)?;
        Some(if little_endian {
            u32::from_le_bytes([b[0], b[1], b[2], b[3]])
        } else {
            u32::from_be_bytes([b[0], b[1], b[2], b[3]])
        })
    };

    if read_u16(2)? != 42 {
        return None;
    }
    let ifd = read_u32(4)? as usize;
    let entries = read_u16(ifd)? as usize;

    for n in 0..entries {
        let at = ifd + 2 + n * 12;
        if read_u16(at)? != 0x0131 {
            continue;
        }
        if read_u16(at + 2)? != 2 {
            // Software must be an ASCII tag
            return None;
        }
        let count = read_u32(at + 4)? as usize;
        let start = if count <= 4 {
            at + 8
        } else {
            read_u32(at + 8)? as usize
        };
        let raw = tiff.get(start..start.checked_add(count)?)?;
        let text = raw.split(|&b| b == 0).next().unwrap_or(raw);
        return Some(String::from_utf8_lossy(text).into_owned());
    }
    None
}
