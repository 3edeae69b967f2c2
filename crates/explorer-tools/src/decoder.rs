use std::fs;
use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use explorer_core::{ExplorerConfig, ExplorerError};

/// Placeholder emitted instead of content when a file is classified as
/// binary during multi-file assembly.
pub const BINARY_PLACEHOLDER: &str = "[binary file - content not decoded]";

/// Seam for PDF text extraction, which is handled by an external decoder.
pub trait PdfTextExtractor: Send + Sync {
    fn extract_text(&self, path: &Path) -> Result<String, ExplorerError>;
}

/// Default extractor: reports extraction as unavailable. Deployments wire a
/// real implementation through [`ContentDecoder::with_pdf_extractor`].
pub struct UnsupportedPdfExtractor;

impl PdfTextExtractor for UnsupportedPdfExtractor {
    fn extract_text(&self, path: &Path) -> Result<String, ExplorerError> {
        Err(ExplorerError::read_failure(
            path,
            "PDF text extraction is not available",
        ))
    }
}

/// Dispatches a resolved file path to the right extraction strategy based on
/// its extension: PDF via the injected extractor, images as base64, anything
/// else as text with an encoding fallback and binary rejection.
pub struct ContentDecoder {
    config: ExplorerConfig,
    pdf_extractor: Box<dyn PdfTextExtractor>,
}

impl ContentDecoder {
    pub fn new(config: &ExplorerConfig) -> Self {
        Self::with_pdf_extractor(config, Box::new(UnsupportedPdfExtractor))
    }

    pub fn with_pdf_extractor(
        config: &ExplorerConfig,
        pdf_extractor: Box<dyn PdfTextExtractor>,
    ) -> Self {
        Self {
            config: config.clone(),
            pdf_extractor,
        }
    }

    /// Decode the file at `path` into display text.
    pub fn decode(&self, path: &Path) -> Result<String, ExplorerError> {
        if self.config.is_pdf_file(path) {
            self.pdf_extractor.extract_text(path)
        } else if self.config.is_image_file(path) {
            self.decode_image(path)
        } else {
            self.decode_text(path)
        }
    }

    fn decode_image(&self, path: &Path) -> Result<String, ExplorerError> {
        let bytes =
            fs::read(path).map_err(|e| ExplorerError::read_failure(path, e.to_string()))?;
        let encoded = STANDARD.encode(&bytes);
        let extension = path
            .extension()
            .map(|ext| format!(".{}", ext.to_string_lossy()))
            .unwrap_or_default();
        log::info!("Encoded image file: {}", path.display());
        Ok(format!(
            "Image file ({}) - Base64 encoded:\n{}",
            extension, encoded
        ))
    }

    fn decode_text(&self, path: &Path) -> Result<String, ExplorerError> {
        let bytes =
            fs::read(path).map_err(|e| ExplorerError::read_failure(path, e.to_string()))?;

        let sniff = &bytes[..bytes.len().min(self.config.binary_sniff_len)];
        if sniff.contains(&0u8) {
            return Err(ExplorerError::InvalidContentType {
                path: path.to_path_buf(),
                reason: "File contains null bytes and cannot be read as text".to_string(),
            });
        }

        match String::from_utf8(bytes) {
            Ok(text) => {
                log::debug!("Read text file as UTF-8: {}", path.display());
                Ok(text)
            }
            Err(err) => {
                // Latin-1 maps every byte to a code point, so the fallback
                // cannot fail.
                log::debug!("Falling back to Latin-1 for: {}", path.display());
                Ok(err.into_bytes().iter().map(|&b| b as char).collect())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn decoder() -> ContentDecoder {
        ContentDecoder::new(&ExplorerConfig::new("/s", "/u"))
    }

    #[test]
    fn utf8_text_decodes_verbatim() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("notes.txt");
        fs::write(&path, "héllo wörld").unwrap();

        assert_eq!(decoder().decode(&path).unwrap(), "héllo wörld");
    }

    #[test]
    fn invalid_utf8_falls_back_to_latin1() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("legacy.txt");
        // 0xE9 is 'é' in Latin-1 but not valid standalone UTF-8.
        fs::write(&path, [b'c', b'a', b'f', 0xE9]).unwrap();

        assert_eq!(decoder().decode(&path).unwrap(), "café");
    }

    #[test]
    fn null_bytes_classify_as_binary() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("blob.dat");
        fs::write(&path, [1u8, 2, 0, 3]).unwrap();

        let err = decoder().decode(&path).unwrap_err();
        assert!(err.is_invalid_content_type());
    }

    #[test]
    fn images_are_base64_encoded() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("pixel.png");
        let bytes = [0x89u8, b'P', b'N', b'G'];
        fs::write(&path, bytes).unwrap();

        let output = decoder().decode(&path).unwrap();
        assert!(output.starts_with("Image file (.png) - Base64 encoded:\n"));
        assert!(output.ends_with(&STANDARD.encode(bytes)));
    }

    #[test]
    fn pdf_extraction_is_unavailable_by_default() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        fs::write(&path, "%PDF-1.4").unwrap();

        let err = decoder().decode(&path).unwrap_err();
        assert!(matches!(err, ExplorerError::ReadFailure { .. }));
    }

    #[test]
    fn pdf_dispatches_to_injected_extractor() {
        struct FixedExtractor;
        impl PdfTextExtractor for FixedExtractor {
            fn extract_text(&self, _path: &Path) -> Result<String, ExplorerError> {
                Ok("extracted text".to_string())
            }
        }

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("paper.pdf");
        fs::write(&path, "%PDF-1.4").unwrap();

        let decoder = ContentDecoder::with_pdf_extractor(
            &ExplorerConfig::new("/s", "/u"),
            Box::new(FixedExtractor),
        );
        assert_eq!(decoder.decode(&path).unwrap(), "extracted text");
    }

    #[test]
    fn missing_file_is_a_read_failure() {
        let err = decoder().decode(Path::new("/no/such/file.txt")).unwrap_err();
        assert!(matches!(err, ExplorerError::ReadFailure { .. }));
    }
}
