use crate::models::{ReconciledFields, SideFields};

/// Merges the two per-side field sets under the per-field precedence policy.
pub struct Reconciler;

impl Reconciler {
    /// The MRZ on the rear face is the authoritative machine-readable source
    /// for the identity fields, so a non-empty back value replaces the front
    /// read outright for document number, surname and given names. Every
    /// other field keeps the first value found, front first, and a later
    /// empty read never clears an earlier value. Pure function of its two
    /// inputs.
    pub fn reconcile(front: &SideFields, back: &SideFields) -> ReconciledFields {
        ReconciledFields {
            document_number: back
                .document_number
                .clone()
                .or_else(|| front.document_number.clone()),
            surname: back.surname.clone().or_else(|| front.surname.clone()),
            given_names: back.given_names.clone().or_else(|| front.given_names.clone()),
            full_name: front.full_name.clone().or_else(|| back.full_name.clone()),
            birth_date: front.birth_date.or(back.birth_date),
            expiration_date: front.expiration_date.or(back.expiration_date),
            sex: front.sex.or(back.sex),
            address: front.address.clone().or_else(|| back.address.clone()),
            department: front.department.clone().or_else(|| back.department.clone()),
            municipality: front
                .municipality
                .clone()
                .or_else(|| back.municipality.clone()),
            raw_front: front.raw_text.clone(),
            raw_back: back.raw_text.clone(),
        }
    }
}
