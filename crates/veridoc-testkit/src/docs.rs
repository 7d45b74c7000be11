//! Synthetic documents small enough to read in a hex dump.
//!
//! Every builder emits framing the analysis crate parses for real: page
//! objects and text runs for PDFs, chunk and segment structure for PNG
//! and JPEG. CRCs are left zeroed; the parsers do not check them.

const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

// ─── PDF ────────────────────────────────────────────────────────────────────

/// One-page PDF with the given info-dictionary fields and text run.
pub fn pdf(creation_date: Option<&str>, producer: &str, text: &str) -> Vec<u8> {
    let mut body = String::from("%PDF-1.4\n");
    body.push_str("1 0 obj << /Type /Catalog /Pages 2 0 R >> endobj\n");
    body.push_str("2 0 obj << /Type /Pages /Kids [3 0 R] /Count 1 >> endobj\n");
    body.push_str("3 0 obj << /Type /Page /Parent 2 0 R >> endobj\n");
    body.push_str(&format!(
        "4 0 obj << /Length 0 >> stream\nBT /F1 12 Tf ({}) Tj ET\nendstream endobj\n",
        text
    ));
    let mut info = format!("/Producer ({})", producer);
    if let Some(date) = creation_date {
        info.push_str(&format!(" /CreationDate ({})", date));
    }
    body.push_str(&format!("5 0 obj << {} >> endobj\n", info));
    body.push_str("trailer << /Root 1 0 R /Info 5 0 R >>\n%%EOF\n");
    body.into_bytes()
}

/// PDF that passes every structural check: dated, ordinary authoring
/// tool, enough text.
pub fn clean_pdf() -> Vec<u8> {
    pdf(
        Some("D:20240115103000Z"),
        "LibreOffice 7.6",
        "Republic records office hereby certifies the attached identity document as issued.",
    )
}

/// PDF with no creation date and almost no text; trips the metadata and
/// content checks.
pub fn sparse_pdf() -> Vec<u8> {
    pdf(None, "LibreOffice 7.6", "stub")
}

/// PDF whose producer names an image editor; trips the authoring-tool
/// check.
pub fn editor_pdf() -> Vec<u8> {
    pdf(
        Some("D:20240115103000Z"),
        "Adobe Photoshop 25.1",
        "Certificate body with a perfectly reasonable amount of visible text in it.",
    )
}

// ─── PNG ────────────────────────────────────────────────────────────────────

fn png_chunk(ctype: &[u8; 4], data: &[u8]) -> Vec<u8> {
    let mut out = Vec::new();
    out.extend_from_slice(&(data.len() as u32).to_be_bytes());
    out.extend_from_slice(ctype);
    out.extend_from_slice(data);
    out.extend_from_slice(&[0, 0, 0, 0]); // CRC, unchecked
    out
}

fn dpi_to_ppm(dpi: u32) -> u32 {
    (f64::from(dpi) / 0.0254).round() as u32
}

/// 800x600 8-bit PNG with the given color type, optional Software tag,
/// and optional pixel density.
pub fn png(color_type: u8, software: Option<&str>, dpi: Option<u32>) -> Vec<u8> {
    let mut bytes = PNG_SIGNATURE.to_vec();
    let mut ihdr = Vec::new();
    ihdr.extend_from_slice(&800u32.to_be_bytes());
    ihdr.extend_from_slice(&600u32.to_be_bytes());
    ihdr.push(8);
    ihdr.push(color_type);
    ihdr.extend_from_slice(&[0, 0, 0]); // compression, filter, interlace
    bytes.extend(png_chunk(b"IHDR", &ihdr));
    if let Some(dpi) = dpi {
        let ppm = dpi_to_ppm(dpi);
        let mut phys = Vec::new();
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.extend_from_slice(&ppm.to_be_bytes());
        phys.push(1); // meters
        bytes.extend(png_chunk(b"pHYs", &phys));
    }
    if let Some(software) = software {
        let mut text = b"Software".to_vec();
        text.push(0);
        text.extend_from_slice(software.as_bytes());
        bytes.extend(png_chunk(b"tEXt", &text));
    }
    bytes.extend(png_chunk(b"IDAT", &[0u8; 16]));
    bytes.extend(png_chunk(b"IEND", &[]));
    bytes
}

/// RGB PNG at print density with no authoring tag.
pub fn clean_png() -> Vec<u8> {
    png(2, None, Some(300))
}

/// PNG whose Software tag names an image editor.
pub fn edited_png() -> Vec<u8> {
    png(2, Some("GIMP 2.10"), Some(300))
}

/// PNG with no density information; reads as screen resolution.
pub fn low_density_png() -> Vec<u8> {
    png(2, None, None)
}

// ─── JPEG ───────────────────────────────────────────────────────────────────

fn jpeg_segment(marker: u8, data: &[u8]) -> Vec<u8> {
    let mut out = vec![0xFF, marker];
    out.extend_from_slice(&((data.len() + 2) as u16).to_be_bytes());
    out.extend_from_slice(data);
    out
}

fn exif_block(software: &str) -> Vec<u8> {
    // Little-endian TIFF with one IFD0 entry: Software (0x0131)
    let mut value = software.as_bytes().to_vec();
    value.push(0);
    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes()); // IFD0 offset
    tiff.extend_from_slice(&1u16.to_le_bytes()); // entry count
    tiff.extend_from_slice(&0x0131u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes()); // ASCII
    tiff.extend_from_slice(&(value.len() as u32).to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes()); // 8 header + 2 count + 12 entry + 4 next
    tiff.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
    tiff.extend_from_slice(&value);
    tiff
}

/// 800x600 baseline JPEG with optional JFIF density (dots per inch) and
/// optional EXIF Software tag.
pub fn jpeg(dpi: Option<u16>, software: Option<&str>) -> Vec<u8> {
    let mut bytes = vec![0xFF, 0xD8];
    if let Some(dpi) = dpi {
        let mut app0 = b"JFIF\0".to_vec();
        app0.extend_from_slice(&[1, 2]); // version
        app0.push(1); // density in dots per inch
        app0.extend_from_slice(&dpi.to_be_bytes());
        app0.extend_from_slice(&dpi.to_be_bytes());
        app0.extend_from_slice(&[0, 0]); // no thumbnail
        bytes.extend(jpeg_segment(0xE0, &app0));
    }
    if let Some(software) = software {
        let mut app1 = b"Exif\0\0".to_vec();
        app1.extend(exif_block(software));
        bytes.extend(jpeg_segment(0xE1, &app1));
    }
    let mut sof = vec![8]; // precision
    sof.extend_from_slice(&600u16.to_be_bytes());
    sof.extend_from_slice(&800u16.to_be_bytes());
    sof.push(3);
    sof.extend_from_slice(&[1, 0x22, 0, 2, 0x11, 1, 3, 0x11, 1]);
    bytes.extend(jpeg_segment(0xC0, &sof));
    bytes.extend([0xFF, 0xD9]);
    bytes
}

/// JPEG at print density with no authoring tag.
pub fn clean_jpeg() -> Vec<u8> {
    jpeg(Some(300), None)
}

/// JPEG whose EXIF Software tag names an image editor.
pub fn edited_jpeg() -> Vec<u8> {
    jpeg(Some(300), Some("Photoshop CC 2024"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use veridoc_analysis::{DocumentFormat, PdfProfile, RasterProfile};

    #[test]
    fn test_pdf_builders_parse() {
        let profile = PdfProfile::parse(&clean_pdf()).unwrap();
        assert_eq!(profile.pages, 1);
        assert!(profile.text_length >= 50);
        assert!(profile.creation_date.is_some());
        assert_eq!(profile.producer.as_deref(), Some("LibreOffice 7.6"));

        let sparse = PdfProfile::parse(&sparse_pdf()).unwrap();
        assert!(sparse.creation_date.is_none());
        assert!(sparse.text_length < 50);

        let edited = PdfProfile::parse(&editor_pdf()).unwrap();
        assert_eq!(edited.producer.as_deref(), Some("Adobe Photoshop 25.1"));
    }

    #[test]
    fn test_png_builders_parse() {
        let clean = RasterProfile::parse(DocumentFormat::Png, &clean_png()).unwrap();
        assert_eq!((clean.width, clean.height), (800, 600));
        assert_eq!(clean.channels, 3);
        assert_eq!(clean.density, Some(300));
        assert_eq!(clean.software, None);

        let edited = RasterProfile::parse(DocumentFormat::Png, &edited_png()).unwrap();
        assert_eq!(edited.software.as_deref(), Some("GIMP 2.10"));

        assert_eq!(
            RasterProfile::parse(DocumentFormat::Png, &low_density_png())
                .unwrap()
                .density,
            None
        );
    }

    #[test]
    fn test_jpeg_builders_parse() {
        let clean = RasterProfile::parse(DocumentFormat::Jpeg, &clean_jpeg()).unwrap();
        assert_eq!((clean.width, clean.height), (800, 600));
        assert_eq!(clean.channels, 3);
        assert_eq!(clean.density, Some(300));

        let edited = RasterProfile::parse(DocumentFormat::Jpeg, &edited_jpeg()).unwrap();
        assert_eq!(edited.software.as_deref(), Some("Photoshop CC 2024"));
    }

    #[test]
    fn test_builders_carry_magic_bytes() {
        assert_eq!(
            DocumentFormat::sniff(&clean_pdf()),
            Some(DocumentFormat::Pdf)
        );
        assert_eq!(
            DocumentFormat::sniff(&clean_png()),
            Some(DocumentFormat::Png)
        );
        assert_eq!(
            DocumentFormat::sniff(&clean_jpeg()),
            Some(DocumentFormat::Jpeg)
        );
    }
}
