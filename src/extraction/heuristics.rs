use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Printed DUI number format: eight digits, a hyphen, one check digit.
    static ref DUI_PATTERN: Regex = Regex::new(r"\b\d{8}-\d\b").unwrap();
}

/// Split raw OCR output into trimmed, non-empty lines. All heuristics operate
/// on this line form.
pub fn ocr_lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).filter(|l| !l.is_empty()).collect()
}

/// Field kinds located through a label keyword printed next to or above the
/// value. The card is printed in Spanish with English subtitles, so both are
/// listed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelKind {
    Address,
    Department,
    Municipality,
    Surname,
    GivenNames,
}

impl LabelKind {
    const ALL: [LabelKind; 5] = [
        LabelKind::Address,
        LabelKind::Department,
        LabelKind::Municipality,
        LabelKind::Surname,
        LabelKind::GivenNames,
    ];

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            LabelKind::Address => &["residencia", "direccion", "dirección", "address"],
            LabelKind::Department => &["departamento", "department", "state"],
            LabelKind::Municipality => &["municipio", "distrito", "city", "district"],
            LabelKind::Surname => &["apellidos", "surname"],
            LabelKind::GivenNames => &["nombres", "given names"],
        }
    }

    fn matches(&self, line: &str) -> bool {
        let lower = line.to_lowercase();
        self.keywords().iter().any(|kw| lower.contains(kw))
    }
}

/// Pattern heuristics over raw OCR lines. Every function is pure; none of
/// them touches the OCR engine.
pub struct FieldScanner;

impl FieldScanner {
    /// First substring matching the printed DUI number format, scanning lines
    /// top to bottom. Earlier lines on the card are less noisy, so the first
    /// hit wins.
    pub fn document_number(lines: &[&str]) -> Option<String> {
        lines
            .iter()
            .find_map(|line| DUI_PATTERN.find(line).map(|m| m.as_str().to_string()))
    }

    /// Value for a label-anchored field: the text after the colon on the
    /// label line, or the following line when the label stands alone. Only
    /// the first matching label line is honored.
    pub fn labeled_field(lines: &[&str], kind: LabelKind) -> Option<String> {
        let idx = lines.iter().position(|line| kind.matches(line))?;
        if let Some(value) = after_colon(lines[idx]) {
            return Some(value);
        }
        lines.get(idx + 1).map(|line| line.to_string())
    }

    /// Address values commonly wrap onto a second printed line, so the one or
    /// two lines after the label are joined. A line carrying another field
    /// label ends the address.
    pub fn address(lines: &[&str]) -> Option<String> {
        let idx = lines.iter().position(|line| LabelKind::Address.matches(line))?;
        let mut parts: Vec<String> = Vec::new();
        if let Some(lead) = after_colon(lines[idx]) {
            parts.push(lead);
        }
        for line in lines.iter().skip(idx + 1).take(2) {
            if LabelKind::ALL.iter().any(|kind| kind.matches(line)) {
                break;
            }
            parts.push(line.to_string());
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(" "))
        }
    }

    /// Printed-name heuristic for cards without usable labels: no digits, at
    /// least two words, and the share of uppercase letters strictly above
    /// 0.6. Names are rendered in full capitals, which separates them from
    /// the mixed-case text around them. The first line reaching the best
    /// score wins.
    pub fn name_line(lines: &[&str]) -> Option<String> {
        let mut best: Option<&str> = None;
        let mut best_score = 0.0f32;
        for line in lines {
            if line.chars().any(|c| c.is_ascii_digit()) {
                continue;
            }
            if line.split_whitespace().count() < 2 {
                continue;
            }
            let letters = line.chars().filter(|c| c.is_alphabetic()).count();
            if letters == 0 {
                continue;
            }
            let upper = line
                .chars()
                .filter(|c| c.is_alphabetic() && c.is_uppercase())
                .count();
            let score = upper as f32 / letters as f32;
            if score > best_score && score > 0.6 {
                best_score = score;
                best = Some(line);
            }
        }
        best.map(|line| line.to_string())
    }
}

fn after_colon(line: &str) -> Option<String> {
    line.split_once(':')
        .map(|(_, rest)| rest.trim().to_string())
        .filter(|value| !value.is_empty())
}
