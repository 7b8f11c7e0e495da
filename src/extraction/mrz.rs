use chrono::NaiveDate;
use lazy_static::lazy_static;
use log::debug;
use regex::Regex;

use crate::models::{MrzFields, Sex};

lazy_static! {
    /// Document line: issuing prefix letters followed by the number block,
    /// possibly padded with filler characters.
    static ref DOC_LINE: Regex = Regex::new(r"[A-Z]{2,3}([A-Z0-9<]{8,12})").unwrap();
    /// Date/sex line: birth date, then sex or filler, then the expiry right
    /// behind it when the OCR kept the line intact.
    static ref DATE_SEX_LINE: Regex = Regex::new(r"(\d{6})([MF<])(\d{6})?").unwrap();
}

/// Parses the fixed-structure machine-readable zone printed on the card's
/// rear face. Every sub-field is best-effort: an OCR-mangled segment leaves
/// its field unset and never fails the decode.
pub struct MrzDecoder;

impl MrzDecoder {
    pub fn decode(text: &str) -> MrzFields {
        let lines: Vec<&str> = text.lines().map(str::trim).filter(|l| !l.is_empty()).collect();
        let mut fields = MrzFields::default();
        if lines.len() < 2 {
            debug!("MRZ block has {} usable lines, skipping", lines.len());
            return fields;
        }

        // The real zone sits at the bottom of the crop; keeping only the last
        // three lines tolerates OCR noise above it.
        let block = &lines[lines.len().saturating_sub(3)..];

        if let Some(caps) = DOC_LINE.captures(block[0]) {
            let number: String = caps[1].chars().filter(|&c| c != '<').collect();
            if !number.is_empty() {
                fields.document_number = Some(number);
            }
        }

        if let Some(line) = block.get(1) {
            let compact: String = line.chars().filter(|c| !c.is_whitespace()).collect();
            if let Some(caps) = DATE_SEX_LINE.captures(&compact) {
                fields.birth_date = Self::decode_yymmdd(&caps[1]);
                fields.sex = caps[2].chars().next().and_then(Sex::from_mrz_char);
                if let Some(expiry) = caps.get(3) {
                    fields.expiration_date = Self::decode_yymmdd(expiry.as_str());
                }
            }
        }

        if let Some(line) = block.get(2) {
            if let Some((surname, given)) = line.split_once("<<") {
                fields.surname = clean_name_block(surname);
                fields.given_names = clean_name_block(given);
            }
        }

        fields
    }

    /// Two-digit-year rule: 50 and above is 19xx, below 50 is 20xx. An
    /// invalid calendar combination (an OCR misread like month 13) decodes to
    /// an unset date.
    pub fn decode_yymmdd(digits: &str) -> Option<NaiveDate> {
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_digit()) {
            return None;
        }
        let yy: i32 = digits[0..2].parse().ok()?;
        let month: u32 = digits[2..4].parse().ok()?;
        let day: u32 = digits[4..6].parse().ok()?;
        let year = if yy >= 50 { 1900 + yy } else { 2000 + yy };
        NaiveDate::from_ymd_opt(year, month, day)
    }
}

/// Single fillers inside a name segment are word separators.
fn clean_name_block(block: &str) -> Option<String> {
    let cleaned = block.replace('<', " ");
    let cleaned = cleaned.trim();
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn yymmdd_century_threshold() {
        assert_eq!(MrzDecoder::decode_yymmdd("990101"), Some(ymd(1999, 1, 1)));
        assert_eq!(MrzDecoder::decode_yymmdd("050101"), Some(ymd(2005, 1, 1)));
        assert_eq!(MrzDecoder::decode_yymmdd("500101"), Some(ymd(1950, 1, 1)));
        assert_eq!(MrzDecoder::decode_yymmdd("490101"), Some(ymd(2049, 1, 1)));
    }

    #[test]
    fn yymmdd_invalid_calendar_combination_is_unset() {
        assert_eq!(MrzDecoder::decode_yymmdd("021301"), None);
        assert_eq!(MrzDecoder::decode_yymmdd("020230"), None);
    }

    #[test]
    fn yymmdd_rejects_wrong_length_and_non_digits() {
        assert_eq!(MrzDecoder::decode_yymmdd("99010"), None);
        assert_eq!(MrzDecoder::decode_yymmdd("9901011"), None);
        assert_eq!(MrzDecoder::decode_yymmdd("99O101"), None);
    }

    #[test]
    fn fewer_than_two_lines_decodes_to_all_unset() {
        assert!(MrzDecoder::decode("").is_empty());
        assert!(MrzDecoder::decode("   \n \n").is_empty());
        assert!(MrzDecoder::decode("SLV01234567<8").is_empty());
    }

    #[test]
    fn full_block_decodes_every_field() {
        let text = "SLV01234567<8<<<<<<<<\n920510F300101SLV<<<<<\nPEREZ<GOMEZ<<MARIA<ELENA<<<<<\n";
        let fields = MrzDecoder::decode(text);
        assert_eq!(fields.document_number.as_deref(), Some("012345678"));
        assert_eq!(fields.birth_date, Some(ymd(1992, 5, 10)));
        assert_eq!(fields.sex, Some(Sex::Female));
        assert_eq!(fields.expiration_date, Some(ymd(2030, 1, 1)));
        assert_eq!(fields.surname.as_deref(), Some("PEREZ GOMEZ"));
        assert_eq!(fields.given_names.as_deref(), Some("MARIA ELENA"));
    }

    #[test]
    fn leading_noise_lines_are_tolerated() {
        let text = "dui gob sv\nregistro nacional\nSLV01234567<8<<<<<<<<\n920510M300101SLV<<<<<\nPEREZ<GOMEZ<<JUAN<<<<<\n";
        let fields = MrzDecoder::decode(text);
        assert_eq!(fields.document_number.as_deref(), Some("012345678"));
        assert_eq!(fields.sex, Some(Sex::Male));
        assert_eq!(fields.surname.as_deref(), Some("PEREZ GOMEZ"));
        assert_eq!(fields.given_names.as_deref(), Some("JUAN"));
    }

    #[test]
    fn filler_sex_stays_unset_while_dates_decode() {
        let text = "SLV01234567<8<<<<<<<<\n920510<300101SLV<<<<<\nPEREZ<<JUAN<<<<<\n";
        let fields = MrzDecoder::decode(text);
        assert_eq!(fields.sex, None);
        assert_eq!(fields.birth_date, Some(ymd(1992, 5, 10)));
        assert_eq!(fields.expiration_date, Some(ymd(2030, 1, 1)));
    }

    #[test]
    fn spaces_inside_the_date_line_are_stripped_before_matching() {
        let text = "SLV01234567<8<<<<<<<<\n92 0510 F 300101 SLV\nPEREZ<<JUAN<<<<<\n";
        let fields = MrzDecoder::decode(text);
        assert_eq!(fields.birth_date, Some(ymd(1992, 5, 10)));
        assert_eq!(fields.sex, Some(Sex::Female));
    }

    #[test]
    fn name_line_without_double_filler_leaves_names_unset() {
        let text = "SLV01234567<8<<<<<<<<\n920510F300101SLV<<<<<\nPEREZ GOMEZ MARIA\n";
        let fields = MrzDecoder::decode(text);
        assert!(fields.surname.is_none());
        assert!(fields.given_names.is_none());
    }

    #[test]
    fn mangled_date_line_leaves_dates_unset_but_keeps_the_rest() {
        let text = "SLV01234567<8<<<<<<<<\nXXXXXXXXXXX\nPEREZ<<JUAN<<<<<\n";
        let fields = MrzDecoder::decode(text);
        assert_eq!(fields.document_number.as_deref(), Some("012345678"));
        assert!(fields.birth_date.is_none());
        assert!(fields.sex.is_none());
        assert_eq!(fields.surname.as_deref(), Some("PEREZ"));
        assert_eq!(fields.given_names.as_deref(), Some("JUAN"));
    }
}
