use std::collections::VecDeque;
use std::io::{Cursor, Write};
use std::sync::Mutex;

use image::{DynamicImage, GrayImage, ImageFormat};
use log::debug;
use tempfile::NamedTempFile;
use tesseract::Tesseract;

use crate::utils::ScanError;

/// Language hint for one recognition pass. Hints map to installed Tesseract
/// language packs; the MRZ hint additionally restricts the character set to
/// the uppercase-ASCII alphabet the zone is printed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LangHint {
    /// Combined Spanish + English, for the general card layout text.
    SpanishEnglish,
    /// Spanish only, used by the single-image variant.
    Spanish,
    /// Latin-only pass for the MRZ band; avoids accent substitutions.
    MrzLatin,
}

impl LangHint {
    pub fn tesseract_lang(&self) -> &'static str {
        match self {
            LangHint::SpanishEnglish => "spa+eng",
            LangHint::Spanish => "spa",
            LangHint::MrzLatin => "eng",
        }
    }

    fn char_whitelist(&self) -> Option<&'static str> {
        match self {
            LangHint::MrzLatin => Some("ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789<"),
            _ => None,
        }
    }
}

/// Abstraction over the OCR backend. The extraction pipeline depends on this
/// seam only, so decoding and heuristics stay testable without an engine
/// installed.
pub trait OcrEngine {
    fn recognize(&self, image: &GrayImage, hint: LangHint) -> Result<String, ScanError>;
}

/// Tesseract-backed engine. The raster is handed over through a temporary PNG
/// file because the tesseract bindings take a path.
pub struct TesseractEngine;

impl TesseractEngine {
    pub fn new() -> Self {
        TesseractEngine
    }
}

impl Default for TesseractEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl OcrEngine for TesseractEngine {
    fn recognize(&self, image: &GrayImage, hint: LangHint) -> Result<String, ScanError> {
        let mut png = Vec::new();
        DynamicImage::ImageLuma8(image.clone()).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

        let mut temp_file = NamedTempFile::new()?;
        temp_file.write_all(&png)?;
        let path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| ScanError::Ocr("temp file path is not valid UTF-8".to_string()))?;

        let mut tess = Tesseract::new(None, Some(hint.tesseract_lang()))
            .map_err(|e| ScanError::Ocr(format!("failed to initialize Tesseract: {}", e)))?;
        if let Some(whitelist) = hint.char_whitelist() {
            tess = tess
                .set_variable("tessedit_char_whitelist", whitelist)
                .map_err(|e| ScanError::Ocr(format!("failed to set character whitelist: {}", e)))?;
        }
        tess = tess
            .set_image(path)
            .map_err(|e| ScanError::Ocr(format!("failed to set image: {}", e)))?;
        let text = tess
            .get_text()
            .map_err(|e| ScanError::Ocr(format!("recognition failed: {}", e)))?;

        debug!("OCR pass {:?} produced {} bytes", hint, text.len());
        Ok(text)
    }
}

/// Scripted engine for tests: returns the queued texts in order, one per
/// `recognize` call, and an empty string once the script runs out. A two-sided
/// read consumes three entries (front full image, back full image, back MRZ
/// band).
pub struct MockOcr {
    script: Mutex<VecDeque<String>>,
}

impl MockOcr {
    pub fn with_script<I, S>(texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        MockOcr {
            script: Mutex::new(texts.into_iter().map(Into::into).collect()),
        }
    }
}

impl OcrEngine for MockOcr {
    fn recognize(&self, _image: &GrayImage, _hint: LangHint) -> Result<String, ScanError> {
        let mut script = self.script.lock().expect("mock script lock poisoned");
        Ok(script.pop_front().unwrap_or_default())
    }
}
