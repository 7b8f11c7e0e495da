use image::DynamicImage;
use log::info;

use crate::extraction::{Reconciler, SideExtractor};
use crate::models::{ReconciledFields, SideFields};
use crate::processing::ocr::{OcrEngine, TesseractEngine};
use crate::utils::ScanError;

/// Top-level reader: owns the OCR engine and runs the full extraction
/// synchronously. Every call is pure given its input images; nothing is
/// retained between reads.
pub struct DocumentReader {
    ocr: Box<dyn OcrEngine>,
}

impl DocumentReader {
    pub fn new(ocr: Box<dyn OcrEngine>) -> Self {
        DocumentReader { ocr }
    }

    /// Reader backed by the system Tesseract installation.
    pub fn with_tesseract() -> Self {
        Self::new(Box::new(TesseractEngine::new()))
    }

    /// Read both faces and reconcile them into one field set.
    pub fn read_document(
        &self,
        front: &DynamicImage,
        back: &DynamicImage,
    ) -> Result<ReconciledFields, ScanError> {
        let extractor = SideExtractor::new(self.ocr.as_ref());
        let front_fields = extractor.extract_front(front)?;
        let back_fields = extractor.extract_back(back)?;
        let reconciled = Reconciler::reconcile(&front_fields, &back_fields);
        info!("document read complete");
        Ok(reconciled)
    }

    /// Single-image read, the degenerate variant without an MRZ stage.
    pub fn read_single(&self, image: &DynamicImage) -> Result<SideFields, ScanError> {
        let extractor = SideExtractor::new(self.ocr.as_ref());
        extractor.extract_single(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sex;
    use crate::processing::ocr::MockOcr;
    use chrono::NaiveDate;

    fn card_image() -> DynamicImage {
        DynamicImage::new_luma8(120, 80)
    }

    const FRONT_TEXT: &str = "DOCUMENTO UNICO DE IDENTIDAD\n\
        01234567-8\n\
        Apellidos: PERES G0MES\n\
        Nombres: JUAN\n";

    const BACK_TEXT: &str = "Residencia: Calle Los Almendros 12\n\
        Departamento: San Salvador\n\
        Municipio: Santa Tecla\n";

    const BACK_MRZ: &str = "SLV87654321<0<<<<<<<<\n920510F300101SLV<<<<<\nPEREZ<GOMEZ<<MARIA<ELENA<<<<<\n";

    #[test]
    fn two_sided_read_reconciles_both_faces() {
        let reader = DocumentReader::new(Box::new(MockOcr::with_script([
            FRONT_TEXT, BACK_TEXT, BACK_MRZ,
        ])));

        let fields = reader.read_document(&card_image(), &card_image()).unwrap();

        // The MRZ read replaces the noisier front OCR for identity fields.
        assert_eq!(fields.document_number.as_deref(), Some("876543210"));
        assert_eq!(fields.surname.as_deref(), Some("PEREZ GOMEZ"));
        assert_eq!(fields.given_names.as_deref(), Some("MARIA ELENA"));
        // Address fields only exist on the back.
        assert_eq!(fields.address.as_deref(), Some("Calle Los Almendros 12"));
        assert_eq!(fields.department.as_deref(), Some("San Salvador"));
        assert_eq!(fields.municipality.as_deref(), Some("Santa Tecla"));
        assert_eq!(fields.birth_date, NaiveDate::from_ymd_opt(1992, 5, 10));
        assert_eq!(fields.expiration_date, NaiveDate::from_ymd_opt(2030, 1, 1));
        assert_eq!(fields.sex, Some(Sex::Female));
        assert_eq!(fields.raw_front, FRONT_TEXT);
        assert_eq!(fields.raw_back, BACK_TEXT);
    }

    #[test]
    fn unreadable_scans_produce_an_empty_result_not_an_error() {
        let reader = DocumentReader::new(Box::new(MockOcr::with_script(["", "", ""])));
        let fields = reader.read_document(&card_image(), &card_image()).unwrap();
        assert_eq!(fields, ReconciledFields::default());
    }

    #[test]
    fn single_read_skips_the_mrz_stage() {
        let reader = DocumentReader::new(Box::new(MockOcr::with_script([
            "Registro\nJUAN PEREZ GOMEZ\n01234567-8\n",
        ])));

        let fields = reader.read_single(&card_image()).unwrap();
        assert_eq!(fields.full_name.as_deref(), Some("JUAN PEREZ GOMEZ"));
        assert_eq!(fields.document_number.as_deref(), Some("01234567-8"));
        assert!(fields.birth_date.is_none());
    }
}
