//! Image payloads: decoded image plus its base64 JPEG form

use std::borrow::Cow;
use std::io::Cursor;
use std::path::Path;

use base64::{engine::general_purpose, Engine as _};
use image::codecs::jpeg::JpegEncoder;
use image::{ColorType, DynamicImage, ImageFormat, ImageReader, RgbImage, RgbaImage};
use tracing::debug;

use crate::error::EncodeError;

/// JPEG quality used for every payload
pub const JPEG_QUALITY: u8 = 75;

/// An image ready to be attached to generate requests
///
/// Built once per selected image and reused across requests.
#[derive(Debug, Clone)]
pub struct ImagePayload {
    image: DynamicImage,
    base64: String,
    source_format: Option<ImageFormat>,
}

/// Display information about a loaded image
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageInfo {
    pub format: Option<ImageFormat>,
    pub width: u32,
    pub height: u32,
    pub mode: &'static str,
}

impl ImagePayload {
    /// Encode an already decoded image
    pub fn from_image(image: DynamicImage) -> Result<Self, EncodeError> {
        let base64 = encode_image(&image)?;
        Ok(Self {
            image,
            base64,
            source_format: None,
        })
    }

    /// Decode an image from raw file bytes (jpg, png, bmp, gif, tiff...)
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, EncodeError> {
        let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
        let source_format = reader.format();
        let image = reader.decode()?;
        let mut payload = Self::from_image(image)?;
        payload.source_format = source_format;
        Ok(payload)
    }

    /// Load and encode an image file
    ///
    /// The format is guessed from content, not from the extension.
    ///
    /// # Arguments
    /// * `path` - Image file to read
    ///
    /// # Returns
    /// A payload carrying the decoded image, its base64 JPEG and source format
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EncodeError> {
        let path = path.as_ref();
        debug!("Loading image from {}", path.display());

        let reader = ImageReader::open(path)?.with_guessed_format()?;
        let source_format = reader.format();
        let image = reader.decode()?;
        let mut payload = Self::from_image(image)?;
        payload.source_format = source_format;
        Ok(payload)
    }

    pub fn image(&self) -> &DynamicImage {
        &self.image
    }

    /// Base64 of the normalized JPEG bytes
    pub fn base64(&self) -> &str {
        &self.base64
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            format: self.source_format,
            width: self.image.width(),
            height: self.image.height(),
            mode: color_mode(self.image.color()),
        }
    }
}

/// Encode an image as base64 JPEG
///
/// RGBA input is flattened onto opaque white using alpha as the blend mask.
/// RGB and 8-bit grayscale pass through unchanged. Every other layout is
/// converted to RGB without blending.
pub fn encode_image(image: &DynamicImage) -> Result<String, EncodeError> {
    let normalized = normalize(image);

    let mut buffer = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buffer, JPEG_QUALITY);
    normalized.write_with_encoder(encoder)?;

    debug!(
        "Encoded {}x{} {} image to {} JPEG bytes",
        image.width(),
        image.height(),
        color_mode(image.color()),
        buffer.len()
    );

    Ok(general_purpose::STANDARD.encode(&buffer))
}

/// Bring an image into a JPEG-encodable layout (RGB or 8-bit grayscale)
pub fn normalize(image: &DynamicImage) -> Cow<'_, DynamicImage> {
    match image {
        DynamicImage::ImageRgb8(_) | DynamicImage::ImageLuma8(_) => Cow::Borrowed(image),
        DynamicImage::ImageRgba8(rgba) => {
            Cow::Owned(DynamicImage::ImageRgb8(flatten_onto_white(rgba)))
        }
        DynamicImage::ImageRgba16(_) | DynamicImage::ImageRgba32F(_) => Cow::Owned(
            DynamicImage::ImageRgb8(flatten_onto_white(&image.to_rgba8())),
        ),
        DynamicImage::ImageLuma16(_) => Cow::Owned(DynamicImage::ImageLuma8(image.to_luma8())),
        _ => Cow::Owned(DynamicImage::ImageRgb8(image.to_rgb8())),
    }
}

fn flatten_onto_white(rgba: &RgbaImage) -> RgbImage {
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let px = rgba.get_pixel(x, y);
        let alpha = u32::from(px[3]);
        let blend = |c: u8| ((u32::from(c) * alpha + 255 * (255 - alpha) + 127) / 255) as u8;
        image::Rgb([blend(px[0]), blend(px[1]), blend(px[2])])
    })
}

/// Short color-mode label for display
pub fn color_mode(color: ColorType) -> &'static str {
    match color {
        ColorType::L8 => "L",
        ColorType::La8 => "LA",
        ColorType::Rgb8 => "RGB",
        ColorType::Rgba8 => "RGBA",
        ColorType::L16 => "L16",
        ColorType::La16 => "LA16",
        ColorType::Rgb16 => "RGB16",
        ColorType::Rgba16 => "RGBA16",
        ColorType::Rgb32F => "RGB32F",
        ColorType::Rgba32F => "RGBA32F",
        _ => "unknown",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{GrayImage, LumaA, Rgb, Rgba};

    fn decode(base64_data: &str) -> DynamicImage {
        let bytes = general_purpose::STANDARD.decode(base64_data).unwrap();
        assert_eq!(image::guess_format(&bytes).unwrap(), ImageFormat::Jpeg);
        image::load_from_memory(&bytes).unwrap()
    }

    fn close(a: u8, b: u8) -> bool {
        a.abs_diff(b) <= 6
    }

    #[test]
    fn test_transparent_rgba_becomes_white() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 0]));
        let decoded = decode(&encode_image(&DynamicImage::ImageRgba8(img)).unwrap());

        assert!(!decoded.color().has_alpha());
        for px in decoded.to_rgb8().pixels() {
            assert!(px.0.iter().all(|&c| c >= 249), "pixel {:?} is not white", px);
        }
    }

    #[test]
    fn test_half_transparent_rgba_blends_with_white() {
        let img = RgbaImage::from_pixel(16, 16, Rgba([255, 0, 0, 128]));
        let flat = flatten_onto_white(&img);
        assert_eq!(flat.get_pixel(0, 0), &Rgb([255, 127, 127]));

        let decoded = decode(&encode_image(&DynamicImage::ImageRgba8(img)).unwrap()).to_rgb8();
        let px = decoded.get_pixel(8, 8);
        assert!(close(px[0], 255) && close(px[1], 127) && close(px[2], 127));
    }

    #[test]
    fn test_opaque_rgba_keeps_color() {
        let img = RgbaImage::from_pixel(8, 8, Rgba([10, 200, 30, 255]));
        let flat = flatten_onto_white(&img);
        assert_eq!(flat.get_pixel(3, 3), &Rgb([10, 200, 30]));
    }

    #[test]
    fn test_rgb_roundtrip_keeps_dimensions() {
        let img = RgbImage::from_pixel(37, 21, Rgb([0, 0, 255]));
        let decoded = decode(&encode_image(&DynamicImage::ImageRgb8(img)).unwrap());
        let rgb = decoded.to_rgb8();
        assert_eq!(rgb.dimensions(), (37, 21));
    }

    #[test]
    fn test_grayscale_roundtrip_keeps_dimensions() {
        let img = GrayImage::from_pixel(20, 10, image::Luma([128]));
        let decoded = decode(&encode_image(&DynamicImage::ImageLuma8(img)).unwrap());
        assert!(!decoded.color().has_alpha());
        assert_eq!(decoded.to_rgb8().dimensions(), (20, 10));
    }

    #[test]
    fn test_luma_alpha_drops_alpha_without_blending() {
        let img = image::ImageBuffer::from_pixel(4, 4, LumaA([40u8, 0u8]));
        let img = DynamicImage::ImageLumaA8(img);
        let normalized = normalize(&img);
        assert_eq!(normalized.color(), ColorType::Rgb8);
        assert_eq!(normalized.to_rgb8().get_pixel(0, 0), &Rgb([40, 40, 40]));
    }

    #[test]
    fn test_rgb_is_not_copied() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(2, 2));
        assert!(matches!(normalize(&img), Cow::Borrowed(_)));
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(32, 32, |x, y| {
            Rgb([(x * 8) as u8, (y * 8) as u8, 64])
        }));
        assert_eq!(encode_image(&img).unwrap(), encode_image(&img).unwrap());
    }

    #[test]
    fn test_payload_from_png_bytes() {
        let img = RgbaImage::from_pixel(5, 7, Rgba([0, 0, 0, 0]));
        let mut png = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let payload = ImagePayload::from_bytes(&png).unwrap();
        let info = payload.info();
        assert_eq!(info.format, Some(ImageFormat::Png));
        assert_eq!((info.width, info.height), (5, 7));
        assert_eq!(info.mode, "RGBA");
        assert!(!decode(payload.base64()).color().has_alpha());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let result = ImagePayload::open("/definitely/not/here.png");
        assert!(matches!(result, Err(EncodeError::Io(_))));
    }

    #[test]
    fn test_garbage_bytes_fail() {
        assert!(ImagePayload::from_bytes(b"not an image").is_err());
    }
}
