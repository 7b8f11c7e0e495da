pub mod models;
pub mod processing;
pub mod extraction;
pub mod form;
pub mod utils;
pub mod document_reader;

pub use document_reader::DocumentReader;
