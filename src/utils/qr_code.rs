use std::io::Cursor;

use image::{ImageFormat, Luma};
use qrcode::QrCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum QrCodeError {
    #[error("Could not encode QR code: {0}")]
    Encode(#[from] qrcode::types::QrError),
    #[error("Could not write QR code image: {0}")]
    Image(#[from] image::ImageError),
}

/// Renders `data` as a black-on-white QR code and returns the PNG bytes.
pub fn render_png(data: &str) -> Result<Vec<u8>, QrCodeError> {
    let code = QrCode::new(data.as_bytes())?;
    let image = code.render::<Luma<u8>>().min_dimensions(240, 240).build();

    let mut png = Vec::new();
    image.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;

    Ok(png)
}
