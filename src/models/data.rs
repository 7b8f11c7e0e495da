use std::fmt;

use chrono::NaiveDate;
use serde::Serialize;

/// Which physical face of the card an image shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Front,
    Back,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Front => write!(f, "front"),
            Side::Back => write!(f, "back"),
        }
    }
}

/// Sex as encoded in the MRZ. The filler character means "not recorded" and
/// maps to an unset field, never to a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    pub fn from_mrz_char(c: char) -> Option<Sex> {
        match c {
            'M' => Some(Sex::Male),
            'F' => Some(Sex::Female),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

/// Typed fields decoded from the machine-readable zone. Every field is
/// independently optional: a sub-field the OCR mangled stays unset instead of
/// failing the whole decode.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MrzFields {
    pub document_number: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub surname: Option<String>,
    pub given_names: Option<String>,
}

impl MrzFields {
    pub fn is_empty(&self) -> bool {
        self.document_number.is_none()
            && self.birth_date.is_none()
            && self.expiration_date.is_none()
            && self.sex.is_none()
            && self.surname.is_none()
            && self.given_names.is_none()
    }
}

/// Everything extracted from one physical side of the card, plus the raw OCR
/// text for audit and display.
#[derive(Debug, Clone, Default)]
pub struct SideFields {
    pub document_number: Option<String>,
    pub surname: Option<String>,
    pub given_names: Option<String>,
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub municipality: Option<String>,
    pub raw_text: String,
}

impl SideFields {
    /// Copy MRZ-decoded values into every slot that is still unset. A value a
    /// heuristic already found is never displaced. The MRZ carries no address
    /// data, so the address slots are untouched.
    pub fn merge_missing_from(&mut self, mrz: &MrzFields) {
        if self.document_number.is_none() {
            self.document_number = mrz.document_number.clone();
        }
        if self.surname.is_none() {
            self.surname = mrz.surname.clone();
        }
        if self.given_names.is_none() {
            self.given_names = mrz.given_names.clone();
        }
        if self.birth_date.is_none() {
            self.birth_date = mrz.birth_date;
        }
        if self.expiration_date.is_none() {
            self.expiration_date = mrz.expiration_date;
        }
        if self.sex.is_none() {
            self.sex = mrz.sex;
        }
    }
}

/// The single merged field set handed to the form, with both raw OCR dumps
/// retained for the review screen.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReconciledFields {
    pub document_number: Option<String>,
    pub surname: Option<String>,
    pub given_names: Option<String>,
    pub full_name: Option<String>,
    pub birth_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,
    pub sex: Option<Sex>,
    pub address: Option<String>,
    pub department: Option<String>,
    pub municipality: Option<String>,
    pub raw_front: String,
    pub raw_back: String,
}

/// The record the form submits: the human-editable extracted defaults plus
/// the manual-entry fields that never pass through the extraction pipeline.
/// Empty strings are blank form inputs.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FinalRecord {
    pub full_name: String,
    pub document_number: String,
    pub address: String,
    pub department: String,
    pub municipality: String,
    pub contact_phone: String,
    pub billing_email: String,
    pub bank_name: String,
    pub bank_account: String,
    pub account_type: String,
    pub recharge_number: String,
    pub carrier: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sex_from_mrz_char_accepts_only_m_and_f() {
        assert_eq!(Sex::from_mrz_char('M'), Some(Sex::Male));
        assert_eq!(Sex::from_mrz_char('F'), Some(Sex::Female));
        assert_eq!(Sex::from_mrz_char('<'), None);
        assert_eq!(Sex::from_mrz_char('X'), None);
    }

    #[test]
    fn merge_missing_fills_only_unset_slots() {
        let mut side = SideFields {
            document_number: Some("01234567-8".to_string()),
            ..SideFields::default()
        };
        let mrz = MrzFields {
            document_number: Some("012345678".to_string()),
            surname: Some("PEREZ GOMEZ".to_string()),
            sex: Some(Sex::Female),
            ..MrzFields::default()
        };

        side.merge_missing_from(&mrz);

        // The heuristic value survives, the unset slots take the MRZ values.
        assert_eq!(side.document_number.as_deref(), Some("01234567-8"));
        assert_eq!(side.surname.as_deref(), Some("PEREZ GOMEZ"));
        assert_eq!(side.sex, Some(Sex::Female));
        assert!(side.given_names.is_none());
    }

    #[test]
    fn empty_mrz_reports_empty() {
        assert!(MrzFields::default().is_empty());
        let with_sex = MrzFields {
            sex: Some(Sex::Male),
            ..MrzFields::default()
        };
        assert!(!with_sex.is_empty());
    }
}
