//! Detection of files that are clearly not plain text.
//!
//! Users regularly upload word processor documents, compressed archives or
//! text saved in a wide encoding. These are recognised from the first bytes of
//! the file (and sometimes its name) before any characters are parsed.

/// The default number of bytes scanned for NUL bytes.
pub const DEFAULT_MAX_SCAN: usize = 40;

/// The smallest number of bytes scanned for NUL bytes.
const MIN_SCAN: usize = 4;

/// The offset of the subheader within a legacy Microsoft Office document.
const OFFICE_SUBHEADER_OFFSET: usize = 512;

/// The kind of problem with a file format.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum FormatKind {
    /// Text in an encoding other than UTF-8 (or UTF-8 with a byte order mark).
    Encoding,
    /// A binary document format.
    Binary,
    /// A compressed archive.
    Compressed,
}

/// A recognised file format that cannot be read as plain text.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Format {
    /// The kind of format.
    kind: FormatKind,

    /// The display name of the format.
    name: &'static str,
}

impl Format {
    /// Creates a new [`Format`].
    fn new(kind: FormatKind, name: &'static str) -> Self {
        Self { kind, name }
    }

    /// Gets the kind of the format.
    pub fn kind(&self) -> FormatKind {
        self.kind
    }

    /// Gets the display name of the format.
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Returns whether the data begins with the given bytes.
fn starts_with(data: &[u8], prefix: &[u8]) -> bool {
    data.starts_with(prefix)
}

/// Recognises legacy Microsoft Office documents by their subheader.
fn office_document(chunk: &[u8], extension: &str) -> Format {
    const WORD: &[&[u8]] = &[&[0xEC, 0xA5, 0xC1, 0x00]];
    const POWERPOINT: &[&[u8]] = &[
        &[0x00, 0x6E, 0x1E, 0xF0],
        &[0x0F, 0x00, 0xE8, 0x03],
        &[0xA0, 0x46, 0x1D, 0xF0],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x0E, 0x00, 0x00, 0x00],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x1C, 0x00, 0x00, 0x00],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x43, 0x00, 0x00, 0x00],
    ];
    const EXCEL: &[&[u8]] = &[
        &[0x09, 0x08, 0x10, 0x00, 0x00, 0x06, 0x05, 0x00],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x10],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x1F],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x22],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x23],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x28],
        &[0xFD, 0xFF, 0xFF, 0xFF, 0x29],
    ];

    if let Some(sub) = chunk.get(OFFICE_SUBHEADER_OFFSET..OFFICE_SUBHEADER_OFFSET + 8) {
        let matches = |patterns: &[&[u8]]| patterns.iter().any(|p| starts_with(sub, p));

        if matches(WORD) {
            return Format::new(FormatKind::Binary, "Microsoft Word document");
        }

        if extension == "ppt" || matches(POWERPOINT) {
            return Format::new(FormatKind::Binary, "Microsoft PowerPoint presentation");
        }

        if extension == "xls" || matches(EXCEL) {
            return Format::new(FormatKind::Binary, "Microsoft Excel spreadsheet");
        }
    }

    Format::new(FormatKind::Binary, "Microsoft Office document")
}

/// Looks at the start of a file and returns its format if it is clearly not
/// plain UTF-8 text.
///
/// `max_scan` bounds how many bytes are scanned for NUL bytes (at least four
/// are always scanned when available).
///
/// # Examples
///
/// ```
/// use bgfile::sniff;
/// use bgfile::sniff::FormatKind;
///
/// assert_eq!(sniff::sniff(b"A 0.25\n", sniff::DEFAULT_MAX_SCAN, Some("bg.txt")), None);
///
/// let format = sniff::sniff(&[0x1F, 0x8B, 0x08, 0x00], sniff::DEFAULT_MAX_SCAN, None).unwrap();
/// assert_eq!(format.kind(), FormatKind::Compressed);
/// assert_eq!(format.name(), "GZIP archive");
/// ```
pub fn sniff(chunk: &[u8], max_scan: usize, file_name: Option<&str>) -> Option<Format> {
    let extension = file_name
        .map(|name| match name.rsplit_once('.') {
            Some((_, extension)) => extension,
            None => name,
        })
        .unwrap_or_default()
        .to_ascii_lowercase();

    if starts_with(chunk, &[0xFE, 0xFF]) {
        return Some(Format::new(FormatKind::Encoding, "UTF-16"));
    }

    if starts_with(chunk, &[0xFF, 0xFE])
        && (chunk.len() < 4 || chunk[2] != 0x00 || chunk[3] != 0x00)
    {
        return Some(Format::new(FormatKind::Encoding, "UTF-16"));
    }

    if starts_with(chunk, &[0xEF, 0xBB, 0xBF]) {
        return Some(Format::new(
            FormatKind::Encoding,
            "UTF-8 with a byte order mark",
        ));
    }

    if starts_with(chunk, &[0xFF, 0xFE, 0x00, 0x00]) || starts_with(chunk, &[0x00, 0x00, 0xFE, 0xFF])
    {
        return Some(Format::new(FormatKind::Encoding, "UTF-32"));
    }

    if starts_with(chunk, b"{\\rtf1") {
        return Some(Format::new(FormatKind::Binary, "rich text"));
    }

    if starts_with(chunk, &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1]) {
        return Some(office_document(chunk, &extension));
    }

    if starts_with(chunk, &[0x50, 0x4B, 0x03, 0x04]) {
        let format = match extension.as_str() {
            "docx" => Some(Format::new(FormatKind::Binary, "Microsoft Word document")),
            "pptx" => Some(Format::new(
                FormatKind::Binary,
                "Microsoft PowerPoint presentation",
            )),
            "xlsx" => Some(Format::new(FormatKind::Binary, "Microsoft Excel spreadsheet")),
            "zip" => Some(Format::new(FormatKind::Compressed, "ZIP archive")),
            _ => None,
        };

        if format.is_some() {
            return format;
        }
    }

    if starts_with(chunk, &[0x1F, 0x8B, 0x08]) {
        return Some(Format::new(FormatKind::Compressed, "GZIP archive"));
    }

    if starts_with(chunk, b"%PDF") && extension == "pdf" {
        return Some(Format::new(FormatKind::Binary, "Adobe PDF"));
    }

    // With no magic number, text should be mostly ASCII without NUL bytes, so
    // the pattern of NUL bytes gives away the wide encodings.
    let scan = max_scan.max(MIN_SCAN).min(chunk.len());
    let mut nulls = [0usize; 4];

    for (i, byte) in chunk[..scan].iter().enumerate() {
        if *byte == 0x00 {
            nulls[i % 4] += 1;
        }
    }

    let format = match nulls {
        [0, 0, 0, 0] => return None,
        [a, b, c, 0] if a != 0 && b != 0 && c != 0 => Format::new(FormatKind::Encoding, "UTF-32"),
        [0, b, c, d] if b != 0 && c != 0 && d != 0 => Format::new(FormatKind::Encoding, "UTF-32"),
        [a, b, c, d] if (a + c) != 0 && (b + d) == 0 => {
            Format::new(FormatKind::Encoding, "UTF-16")
        }
        [a, b, c, d] if (a + c) == 0 && (b + d) != 0 => {
            Format::new(FormatKind::Encoding, "UTF-16")
        }
        _ => Format::new(FormatKind::Binary, "unknown binary"),
    };

    Some(format)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sniff_name(chunk: &[u8], name: Option<&str>) -> Option<&'static str> {
        sniff(chunk, DEFAULT_MAX_SCAN, name).map(|format| format.name())
    }

    #[test]
    fn test_plain_text() {
        assert_eq!(sniff_name(b"", None), None);
        assert_eq!(sniff_name(b"# order 0\nA 0.25\n", Some("bg")), None);
        assert_eq!(sniff_name("A 0.25 # λ\n".as_bytes(), None), None);
    }

    #[test]
    fn test_byte_order_marks() {
        assert_eq!(sniff_name(&[0xFE, 0xFF, 0x00, 0x41], None), Some("UTF-16"));
        assert_eq!(sniff_name(&[0xFF, 0xFE, 0x41, 0x00], None), Some("UTF-16"));
        assert_eq!(sniff_name(&[0xFF, 0xFE, 0x00, 0x00], None), Some("UTF-32"));
        assert_eq!(sniff_name(&[0x00, 0x00, 0xFE, 0xFF], None), Some("UTF-32"));
        assert_eq!(
            sniff_name(&[0xEF, 0xBB, 0xBF, 0x41], None),
            Some("UTF-8 with a byte order mark")
        );
    }

    #[test]
    fn test_documents() {
        assert_eq!(sniff_name(b"{\\rtf1\\ansi", None), Some("rich text"));
        assert_eq!(
            sniff_name(b"%PDF-1.4", Some("model.PDF")),
            Some("Adobe PDF")
        );
        assert_eq!(sniff_name(b"%PDF-1.4", Some("model.txt")), None);
        assert_eq!(
            sniff_name(&[0x50, 0x4B, 0x03, 0x04], Some("bg.docx")),
            Some("Microsoft Word document")
        );
        assert_eq!(
            sniff_name(&[0x50, 0x4B, 0x03, 0x04], Some("bg.zip")),
            Some("ZIP archive")
        );
        assert_eq!(sniff_name(&[0x50, 0x4B, 0x03, 0x04], Some("bg.txt")), None);
    }

    #[test]
    fn test_office_subheaders() {
        let mut chunk = vec![0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];
        assert_eq!(sniff_name(&chunk, None), Some("Microsoft Office document"));

        chunk.resize(OFFICE_SUBHEADER_OFFSET, 0x20);
        chunk.extend_from_slice(&[0xEC, 0xA5, 0xC1, 0x00, 0x00, 0x00, 0x00, 0x00]);
        assert_eq!(sniff_name(&chunk, None), Some("Microsoft Word document"));

        chunk.truncate(OFFICE_SUBHEADER_OFFSET);
        chunk.extend_from_slice(&[0xFD, 0xFF, 0xFF, 0xFF, 0x10, 0x00, 0x00, 0x00]);
        assert_eq!(sniff_name(&chunk, None), Some("Microsoft Excel spreadsheet"));
    }

    #[test]
    fn test_nul_patterns() {
        let utf16be = [0x00, b'A', 0x00, b' ', 0x00, b'0'];
        assert_eq!(sniff_name(&utf16be, None), Some("UTF-16"));

        let utf16le = [b'A', 0x00, b' ', 0x00, b'0', 0x00];
        assert_eq!(sniff_name(&utf16le, None), Some("UTF-16"));

        let utf32le = [b'A', 0x00, 0x00, 0x00, b' ', 0x00, 0x00, 0x00];
        assert_eq!(sniff_name(&utf32le, None), Some("UTF-32"));

        let binary = [b'A', 0x00, 0x00, b'B', b'C', b'D', b'E', b'F'];
        assert_eq!(sniff_name(&binary, None), Some("unknown binary"));
    }

    #[test]
    fn test_format_kind() {
        let format = sniff(&[0xFE, 0xFF], DEFAULT_MAX_SCAN, None).unwrap();
        assert_eq!(format.kind(), FormatKind::Encoding);
        assert_eq!(format.to_string(), "UTF-16");
    }
}
