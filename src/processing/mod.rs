pub mod image;
pub mod ocr;

pub use image::ImagePreprocessor;
pub use ocr::{LangHint, MockOcr, OcrEngine, TesseractEngine};
