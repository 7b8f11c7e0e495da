use image::{imageops, DynamicImage, GrayImage};
use log::debug;

/// Normalizes a raw photograph into an OCR-ready raster.
pub struct ImagePreprocessor;

impl ImagePreprocessor {
    /// Portrait captures are rotated 90 degrees onto a landscape canvas (the
    /// common case of a phone photo of a landscape card), then the image is
    /// reduced to single-channel grayscale. The output is always
    /// landscape-or-square oriented.
    pub fn prepare(image: &DynamicImage) -> GrayImage {
        let gray = image.to_luma8();
        if gray.height() > gray.width() {
            debug!(
                "rotating portrait capture {}x{}",
                gray.width(),
                gray.height()
            );
            imageops::rotate90(&gray)
        } else {
            gray
        }
    }

    /// The horizontal band from `height * fraction` down to the bottom edge,
    /// full width. Used to isolate the MRZ for a dedicated OCR pass.
    pub fn crop_bottom_band(image: &GrayImage, fraction: f32) -> GrayImage {
        let (width, height) = image.dimensions();
        let top = ((height as f32) * fraction).min(height as f32) as u32;
        imageops::crop_imm(image, 0, top, width, height - top).to_image()
    }

    /// Contrast and brightness boost ahead of the OCR call. Kept out of
    /// `prepare` so orientation and color normalization stay a separate,
    /// deterministic step.
    pub fn enhance_for_ocr(image: &GrayImage) -> GrayImage {
        let high_res = image.width() > 1200 && image.height() > 800;
        let contrast_factor = if high_res { 10.0 } else { 20.0 };
        let brightness = if high_res { 5 } else { 10 };
        imageops::brighten(&imageops::contrast(image, contrast_factor), brightness)
    }
}
