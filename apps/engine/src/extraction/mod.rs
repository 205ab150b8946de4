//! Text Extractor — PDF and DOCX to normalized plain text.
//!
//! Parsing is CPU-bound and `pdf-extract` can panic on malformed files, so the controller goes
//! through `extract_blocking`, which runs the parser inside `tokio::task::spawn_blocking` and maps
//! a panicked task to `EngineError::Extraction`.

use std::error::Error;
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};

use quick_xml::events::Event;
use quick_xml::Reader;
use tracing::debug;

use crate::errors::EngineError;

type ParseError = Box<dyn Error + Send + Sync>;

const DOCX_BODY_PART: &str = "word/document.xml";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DocumentFormat {
    Pdf,
    Docx,
}

impl DocumentFormat {
    fn from_path(path: &Path) -> Result<Self, EngineError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();
        match ext.as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "" => Err(EngineError::UnsupportedFormat("(no extension)".to_string())),
            other => Err(EngineError::UnsupportedFormat(format!(".{other}"))),
        }
    }
}

/// Reads a PDF or DOCX file and returns its cleaned text.
pub fn extract(path: &Path) -> Result<String, EngineError> {
    if !path.exists() {
        return Err(EngineError::NotFound(path.display().to_string()));
    }
    let format = DocumentFormat::from_path(path)?;

    let wrap = |source: ParseError| EngineError::Extraction {
        path: path.display().to_string(),
        source,
    };
    let bytes = std::fs::read(path).map_err(|e| wrap(Box::new(e)))?;

    let raw = match format {
        DocumentFormat::Pdf => extract_pdf(&bytes),
        DocumentFormat::Docx => extract_docx(&bytes),
    }
    .map_err(wrap)?;

    debug!(path = %path.display(), ?format, chars = raw.chars().count(), "document parsed");
    Ok(clean_text(&raw))
}

/// Runs [`extract`] on the blocking pool.
pub async fn extract_blocking(path: &Path) -> Result<String, EngineError> {
    let owned: PathBuf = path.to_path_buf();
    tokio::task::spawn_blocking(move || extract(&owned))
        .await
        .map_err(|e| EngineError::Extraction {
            path: path.display().to_string(),
            source: format!("parser task failed: {e}").into(),
        })?
}

fn extract_pdf(bytes: &[u8]) -> Result<String, ParseError> {
    pdf_extract::extract_text_from_mem(bytes).map_err(|e| e.to_string().into())
}

/// Concatenates `<w:t>` runs; each paragraph ends with a newline.
fn extract_docx(bytes: &[u8]) -> Result<String, ParseError> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes))?;
    let mut xml = String::new();
    archive.by_name(DOCX_BODY_PART)?.read_to_string(&mut xml)?;

    let mut reader = Reader::from_str(&xml);
    let mut text = String::new();
    let mut in_run_text = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) if e.name().as_ref() == b"w:t" => in_run_text = true,
            Event::End(e) => match e.name().as_ref() {
                b"w:t" => in_run_text = false,
                b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Empty(e) => match e.name().as_ref() {
                b"w:tab" => text.push('\t'),
                b"w:br" | b"w:cr" | b"w:p" => text.push('\n'),
                _ => {}
            },
            Event::Text(t) if in_run_text => text.push_str(&t.unescape()?),
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(text)
}

/// Normalizes extracted text:
/// - non-breaking spaces become spaces, `\r\n` and `\r` become `\n`
/// - runs of spaces and tabs collapse to one space
/// - any whitespace run holding two or more newlines becomes exactly one blank line
/// - both ends trimmed
pub fn clean_text(text: &str) -> String {
    let unified = text.replace('\u{a0}', " ").replace("\r\n", "\n").replace('\r', "\n");

    let mut spaced = String::with_capacity(unified.len());
    let mut in_blank_run = false;
    for c in unified.chars() {
        if c == ' ' || c == '\t' {
            if !in_blank_run {
                spaced.push(' ');
            }
            in_blank_run = true;
        } else {
            spaced.push(c);
            in_blank_run = false;
        }
    }

    let chars: Vec<char> = spaced.chars().collect();
    let mut out = String::with_capacity(spaced.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '\n' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        // the whitespace run starting at this newline, and its last newline
        let mut j = i + 1;
        let mut last_newline = i;
        while j < chars.len() && chars[j].is_whitespace() {
            if chars[j] == '\n' {
                last_newline = j;
            }
            j += 1;
        }
        if last_newline > i {
            out.push_str("\n\n");
            i = last_newline + 1;
        } else {
            out.push('\n');
            i += 1;
        }
    }

    out.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_docx(path: &Path, document_xml: &str) {
        let file = std::fs::File::create(path).unwrap();
        let mut zip = zip::ZipWriter::new(file);
        zip.start_file(DOCX_BODY_PART, zip::write::FileOptions::default())
            .unwrap();
        zip.write_all(document_xml.as_bytes()).unwrap();
        zip.finish().unwrap();
    }

    #[test]
    fn test_clean_text() {
        assert_eq!(clean_text("  a\u{a0}\u{a0}b\t\tc  "), "a b c");
        assert_eq!(clean_text("line1\r\nline2\rline3"), "line1\nline2\nline3");
        assert_eq!(clean_text("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(clean_text("a\n  \n\t\nb"), "a\n\nb");
        assert_eq!(clean_text("a\n b"), "a\n b");
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let err = extract(Path::new("/definitely/not/here.pdf")).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        assert!(err.is_input_validation());
    }

    #[test]
    fn test_unsupported_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, "Python developer").unwrap();
        let err = extract(&path).unwrap_err();
        assert!(matches!(err, EngineError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_extension_is_case_insensitive() {
        assert_eq!(
            DocumentFormat::from_path(Path::new("CV.PDF")).unwrap(),
            DocumentFormat::Pdf
        );
        assert_eq!(
            DocumentFormat::from_path(Path::new("cv.Docx")).unwrap(),
            DocumentFormat::Docx
        );
    }

    #[test]
    fn test_docx_paragraphs_tabs_and_breaks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        write_docx(
            &path,
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main"><w:body>
<w:p><w:r><w:t>SKILLS</w:t></w:r></w:p>
<w:p><w:r><w:t xml:space="preserve">Python </w:t></w:r><w:r><w:t>&amp; Rust</w:t></w:r></w:p>
<w:p/>
<w:p/>
<w:p><w:r><w:t>Go</w:t><w:tab/><w:t>Docker</w:t><w:br/><w:t>AWS</w:t></w:r></w:p>
</w:body></w:document>"#,
        );

        let text = extract(&path).unwrap();
        assert_eq!(text, "SKILLS\nPython & Rust\n\nGo Docker\nAWS");
    }

    #[test]
    fn test_garbage_docx_is_extraction_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.docx");
        std::fs::write(&path, b"not a zip archive").unwrap();
        let err = extract(&path).unwrap_err();
        assert!(matches!(err, EngineError::Extraction { .. }));
        assert_eq!(err.code(), "EXTRACTION_ERROR");
    }

    #[tokio::test]
    async fn test_extract_blocking_matches_sync() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.docx");
        write_docx(
            &path,
            r#"<w:document xmlns:w="x"><w:body><w:p><w:r><w:t>Hello</w:t></w:r></w:p></w:body></w:document>"#,
        );
        assert_eq!(extract_blocking(&path).await.unwrap(), "Hello");
    }
}
