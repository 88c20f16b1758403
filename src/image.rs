use crate::session::{HwpUnit, PictureOptions};
use anyhow::{Context, Result, anyhow};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Enough bytes to reach the size fields of every supported header.
/// JPEG frames can sit further in, so JPEG reads the whole file.
const HEADER_PROBE_LEN: usize = 64;

/// Image format and pixel dimensions read from a file header
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageInfo {
    pub format: ImageFormat,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ImageFormat {
    Jpeg,
    Png,
    Bmp,
    Gif,
}

/// Detect format from the leading magic bytes
pub fn detect_image_format(data: &[u8]) -> Result<ImageFormat> {
    if data.len() < 4 {
        return Err(anyhow!("Image data too short"));
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Ok(ImageFormat::Jpeg)
    } else if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        Ok(ImageFormat::Png)
    } else if data.starts_with(b"BM") {
        Ok(ImageFormat::Bmp)
    } else if data.starts_with(b"GIF8") {
        Ok(ImageFormat::Gif)
    } else {
        Err(anyhow!("Unsupported image format"))
    }
}

/// Read an image file header and report its format and pixel size
pub fn probe_image(path: &Path) -> Result<ImageInfo> {
    let mut file =
        File::open(path).with_context(|| format!("Cannot open image {}", path.display()))?;
    let mut head = Vec::with_capacity(HEADER_PROBE_LEN);
    file.by_ref()
        .take(HEADER_PROBE_LEN as u64)
        .read_to_end(&mut head)?;
    let format = detect_image_format(&head)?;
    let (width, height) = match format {
        ImageFormat::Jpeg => {
            file.read_to_end(&mut head)?;
            parse_jpeg_dimensions(&head)?
        }
        ImageFormat::Png => parse_png_dimensions(&head)?,
        ImageFormat::Bmp => parse_bmp_dimensions(&head)?,
        ImageFormat::Gif => parse_gif_dimensions(&head)?,
    };
    Ok(ImageInfo { format, width, height })
}

/// Walk JPEG segments up to the first SOF marker
fn parse_jpeg_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    let mut i = 2; // skip SOI
    while i + 1 < data.len() {
        if data[i] != 0xFF {
            i += 1;
            continue;
        }
        let marker = data[i + 1];
        i += 2;

        // SOF0..SOF15 except DHT (C4), JPG (C8) and DAC (CC)
        if (0xC0..=0xCF).contains(&marker) && !matches!(marker, 0xC4 | 0xC8 | 0xCC) {
            if i + 7 > data.len() {
                return Err(anyhow!("JPEG SOF marker truncated"));
            }
            let height = u16::from_be_bytes([data[i + 3], data[i + 4]]) as u32;
            let width = u16::from_be_bytes([data[i + 5], data[i + 6]]) as u32;
            return Ok((width, height));
        }

        if i + 1 >= data.len() {
            break;
        }
        let seg_len = u16::from_be_bytes([data[i], data[i + 1]]) as usize;
        i += seg_len;
    }
    Err(anyhow!("Could not find JPEG SOF marker"))
}

/// Width and height live in the IHDR chunk right after the signature
fn parse_png_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    if data.len() < 24 || &data[12..16] != b"IHDR" {
        return Err(anyhow!("PNG IHDR chunk missing"));
    }
    let width = u32::from_be_bytes([data[16], data[17], data[18], data[19]]);
    let height = u32::from_be_bytes([data[20], data[21], data[22], data[23]]);
    Ok((width, height))
}

fn parse_bmp_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    if data.len() < 26 {
        return Err(anyhow!("BMP data too short"));
    }
    // Height is negative for top-down bitmaps
    let width = i32::from_le_bytes([data[18], data[19], data[20], data[21]]).unsigned_abs();
    let height = i32::from_le_bytes([data[22], data[23], data[24], data[25]]).unsigned_abs();
    Ok((width, height))
}

fn parse_gif_dimensions(data: &[u8]) -> Result<(u32, u32)> {
    if data.len() < 10 {
        return Err(anyhow!("GIF data too short"));
    }
    let width = u16::from_le_bytes([data[6], data[7]]) as u32;
    let height = u16::from_le_bytes([data[8], data[9]]) as u32;
    Ok((width, height))
}

/// Fill in a missing picture dimension from the pixel aspect ratio.
///
/// Only applies when the ratio is kept and exactly one side was requested.
pub fn complete_picture_size(options: &PictureOptions, info: &ImageInfo) -> PictureOptions {
    if !options.maintain_ratio || info.width == 0 || info.height == 0 {
        return *options;
    }
    let ratio = info.height as f64 / info.width as f64;
    let scaled = |value: HwpUnit, factor: f64| (value as f64 * factor).round() as HwpUnit;
    match (options.width, options.height) {
        (Some(w), None) => PictureOptions {
            height: Some(scaled(w, ratio)),
            ..*options
        },
        (None, Some(h)) => PictureOptions {
            width: Some(scaled(h, 1.0 / ratio)),
            ..*options
        },
        _ => *options,
    }
}
