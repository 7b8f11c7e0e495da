pub mod data;

pub use data::{FinalRecord, MrzFields, ReconciledFields, Sex, Side, SideFields};
