use thiserror::Error;

use crate::models::Side;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("OCR engine error: {0}")]
    Ocr(String),
    #[error("missing {0} image")]
    MissingImage(Side),
    #[error("invalid form state: {0}")]
    InvalidState(&'static str),
}
