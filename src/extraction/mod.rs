pub mod heuristics;
pub mod mrz;
pub mod reconcile;
pub mod side;

pub use heuristics::FieldScanner;
pub use mrz::MrzDecoder;
pub use reconcile::Reconciler;
pub use side::SideExtractor;
