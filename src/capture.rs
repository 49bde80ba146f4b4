use crate::buffer::PixelBuffer;
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use std::io::Cursor;

pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Encodes the canvas pixels as an in-memory PNG.
pub fn encode_png(buffer: &PixelBuffer) -> Result<Vec<u8>> {
    let image = image::RgbaImage::from_raw(buffer.width, buffer.height, buffer.pixels.clone())
        .ok_or_else(|| anyhow!("pixel buffer does not match its dimensions"))?;
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), image::ImageOutputFormat::Png)
        .context("failed to encode canvas as PNG")?;
    Ok(bytes)
}

/// Encodes the canvas as the base64 PNG data URL the recognition API
/// expects in its request body.
pub fn png_data_url(buffer: &PixelBuffer) -> Result<String> {
    let png = encode_png(buffer)?;
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    url.push_str(&general_purpose::STANDARD.encode(png));
    Ok(url)
}
