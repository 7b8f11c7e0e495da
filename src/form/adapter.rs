use image::DynamicImage;
use log::info;

use crate::document_reader::DocumentReader;
use crate::models::{FinalRecord, ReconciledFields, Side, SideFields};
use crate::utils::ScanError;

/// Form lifecycle: images first, extraction next, submission last.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    AwaitingImages,
    Extracted,
    Submitted,
}

/// Consumes a submitted record. Real persistence lives outside this crate;
/// the shipped implementation only echoes the record.
pub trait RecordSink {
    fn save(&mut self, record: &FinalRecord) -> Result<(), ScanError>;
}

/// Logs the submitted record as JSON.
pub struct EchoSink;

impl RecordSink for EchoSink {
    fn save(&mut self, record: &FinalRecord) -> Result<(), ScanError> {
        let json = serde_json::to_string_pretty(record)
            .unwrap_or_else(|_| format!("{:?}", record));
        info!("record submitted:\n{}", json);
        Ok(())
    }
}

/// Owns the editable record and the per-session images. The extraction
/// pipeline runs exactly once, on the AwaitingImages -> Extracted
/// transition; every later correction is an in-place edit of the record the
/// adapter owns exclusively.
pub struct FormAdapter {
    state: FormState,
    front: Option<DynamicImage>,
    back: Option<DynamicImage>,
    extracted: Option<ReconciledFields>,
    record: FinalRecord,
}

impl FormAdapter {
    pub fn new() -> Self {
        FormAdapter {
            state: FormState::AwaitingImages,
            front: None,
            back: None,
            extracted: None,
            record: FinalRecord::default(),
        }
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn attach_front(&mut self, image: DynamicImage) {
        self.front = Some(image);
    }

    pub fn attach_back(&mut self, image: DynamicImage) {
        self.back = Some(image);
    }

    /// Two-sided read. Requires both images; a missing side is a blocking
    /// validation error and the form stays in AwaitingImages. The stored
    /// document number is digits-only in this variant.
    pub fn extract(&mut self, reader: &DocumentReader) -> Result<(), ScanError> {
        if self.state != FormState::AwaitingImages {
            return Err(ScanError::InvalidState("document already read"));
        }
        let front = self.front.as_ref().ok_or(ScanError::MissingImage(Side::Front))?;
        let back = self.back.as_ref().ok_or(ScanError::MissingImage(Side::Back))?;

        let reconciled = reader.read_document(front, back)?;
        self.extracted = Some(reconciled);
        self.seed_record(false);
        self.state = FormState::Extracted;
        Ok(())
    }

    /// Single-image read, the degenerate front-only flow. The printed
    /// document number keeps its hyphen here.
    pub fn extract_single(&mut self, reader: &DocumentReader) -> Result<(), ScanError> {
        if self.state != FormState::AwaitingImages {
            return Err(ScanError::InvalidState("document already read"));
        }
        let image = self.front.as_ref().ok_or(ScanError::MissingImage(Side::Front))?;

        let fields = reader.read_single(image)?;
        self.extracted = Some(reconciled_from_single(fields));
        self.seed_record(true);
        self.state = FormState::Extracted;
        Ok(())
    }

    /// The reconciled read backing the editable defaults, with the raw OCR
    /// dumps for the review screen.
    pub fn extracted(&self) -> Option<&ReconciledFields> {
        self.extracted.as_ref()
    }

    /// The editable record. Human corrections and the manual-entry fields are
    /// in-place updates.
    pub fn record_mut(&mut self) -> &mut FinalRecord {
        &mut self.record
    }

    pub fn record(&self) -> &FinalRecord {
        &self.record
    }

    /// Forward the record to the persistence collaborator.
    pub fn submit(&mut self, sink: &mut dyn RecordSink) -> Result<(), ScanError> {
        if self.state != FormState::Extracted {
            return Err(ScanError::InvalidState("record not ready for submission"));
        }
        sink.save(&self.record)?;
        self.state = FormState::Submitted;
        Ok(())
    }

    fn seed_record(&mut self, keep_hyphen: bool) {
        let fields = match &self.extracted {
            Some(fields) => fields,
            None => return,
        };
        self.record.full_name = compose_full_name(fields);
        let number = fields.document_number.clone().unwrap_or_default();
        self.record.document_number = if keep_hyphen {
            number
        } else {
            number.replace('-', "")
        };
        self.record.address = fields.address.clone().unwrap_or_default();
        self.record.department = fields.department.clone().unwrap_or_default();
        self.record.municipality = fields.municipality.clone().unwrap_or_default();
    }
}

impl Default for FormAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// Prefer the printed name line when the simple heuristic found one,
/// otherwise join the MRZ name blocks in the order the card prints them.
fn compose_full_name(fields: &ReconciledFields) -> String {
    if let Some(name) = &fields.full_name {
        return name.clone();
    }
    match (&fields.surname, &fields.given_names) {
        (Some(surname), Some(given)) => format!("{} {}", surname, given),
        (Some(surname), None) => surname.clone(),
        (None, Some(given)) => given.clone(),
        (None, None) => String::new(),
    }
}

fn reconciled_from_single(fields: SideFields) -> ReconciledFields {
    ReconciledFields {
        document_number: fields.document_number,
        surname: fields.surname,
        given_names: fields.given_names,
        full_name: fields.full_name,
        birth_date: fields.birth_date,
        expiration_date: fields.expiration_date,
        sex: fields.sex,
        address: fields.address,
        department: fields.department,
        municipality: fields.municipality,
        raw_front: fields.raw_text,
        raw_back: String::new(),
    }
}
