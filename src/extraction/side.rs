use image::DynamicImage;
use log::{debug, info};

use crate::extraction::heuristics::{ocr_lines, FieldScanner, LabelKind};
use crate::extraction::mrz::MrzDecoder;
use crate::models::SideFields;
use crate::processing::image::ImagePreprocessor;
use crate::processing::ocr::{LangHint, OcrEngine};
use crate::utils::ScanError;

/// Fraction of the image height where the MRZ band begins; the crop keeps
/// everything below it. The zone sits in the bottom third of the card, the
/// wider band tolerates loose framing.
const MRZ_BAND_FRACTION: f32 = 0.55;

/// Runs the preprocessing, OCR and extraction chain for one physical side of
/// the card. The image is borrowed for the duration of the call only.
pub struct SideExtractor<'a> {
    ocr: &'a dyn OcrEngine,
}

impl<'a> SideExtractor<'a> {
    pub fn new(ocr: &'a dyn OcrEngine) -> Self {
        SideExtractor { ocr }
    }

    /// Front face: the printed document number plus the labeled name fields.
    /// The front carries no address block.
    pub fn extract_front(&self, image: &DynamicImage) -> Result<SideFields, ScanError> {
        let prepared = ImagePreprocessor::prepare(image);
        let enhanced = ImagePreprocessor::enhance_for_ocr(&prepared);
        let text = self.ocr.recognize(&enhanced, LangHint::SpanishEnglish)?;
        debug!("front OCR text:\n{}", text);

        let lines = ocr_lines(&text);
        let document_number = FieldScanner::document_number(&lines);
        let surname = FieldScanner::labeled_field(&lines, LabelKind::Surname);
        let given_names = FieldScanner::labeled_field(&lines, LabelKind::GivenNames);
        info!(
            "front side read: {} lines, document number {}",
            lines.len(),
            if document_number.is_some() { "found" } else { "not found" }
        );

        Ok(SideFields {
            document_number,
            surname,
            given_names,
            raw_text: text,
            ..SideFields::default()
        })
    }

    /// Back face: the address block heuristics over the full image, plus a
    /// dedicated MRZ pass over the bottom band. MRZ values fill whatever the
    /// label heuristics left unset.
    pub fn extract_back(&self, image: &DynamicImage) -> Result<SideFields, ScanError> {
        let prepared = ImagePreprocessor::prepare(image);
        let enhanced = ImagePreprocessor::enhance_for_ocr(&prepared);
        let text = self.ocr.recognize(&enhanced, LangHint::SpanishEnglish)?;
        debug!("back OCR text:\n{}", text);

        let lines = ocr_lines(&text);
        let address = FieldScanner::address(&lines);
        let department = FieldScanner::labeled_field(&lines, LabelKind::Department);
        let municipality = FieldScanner::labeled_field(&lines, LabelKind::Municipality);

        let band = ImagePreprocessor::crop_bottom_band(&prepared, MRZ_BAND_FRACTION);
        let band = ImagePreprocessor::enhance_for_ocr(&band);
        let band_text = self.ocr.recognize(&band, LangHint::MrzLatin)?;
        debug!("MRZ band text:\n{}", band_text);
        let mrz = MrzDecoder::decode(&band_text);
        info!(
            "back side read: MRZ {}",
            if mrz.is_empty() { "not decoded" } else { "decoded" }
        );

        let mut fields = SideFields {
            address,
            department,
            municipality,
            raw_text: text,
            ..SideFields::default()
        };
        fields.merge_missing_from(&mrz);
        Ok(fields)
    }

    /// Single-image variant: a Spanish-only pass, the printed-name scoring
    /// heuristic, no MRZ stage.
    pub fn extract_single(&self, image: &DynamicImage) -> Result<SideFields, ScanError> {
        let prepared = ImagePreprocessor::prepare(image);
        let enhanced = ImagePreprocessor::enhance_for_ocr(&prepared);
        let text = self.ocr.recognize(&enhanced, LangHint::Spanish)?;
        debug!("single-image OCR text:\n{}", text);

        let lines = ocr_lines(&text);
        let document_number = FieldScanner::document_number(&lines);
        let full_name = FieldScanner::name_line(&lines);
        let surname = FieldScanner::labeled_field(&lines, LabelKind::Surname);
        let given_names = FieldScanner::labeled_field(&lines, LabelKind::GivenNames);

        Ok(SideFields {
            document_number,
            full_name,
            surname,
            given_names,
            raw_text: text,
            ..SideFields::default()
        })
    }
}
