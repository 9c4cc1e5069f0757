//! Builds a multi-page PDF from a batch of scanned images.
//!
//! Every image is decoded, checked to re-encode losslessly as PNG, and
//! placed on its own page whose media box equals the image's pixel size.
//! Transparency is kept as a soft mask. Decoding happens for the
//! whole batch before anything is produced, so one bad image fails the
//! batch.

use std::io::Cursor;

use bytes::Bytes;
use image::{DynamicImage, ImageFormat};
use lopdf::content::{Content, Operation};
use lopdf::{Document, Object, Stream, dictionary};

use lexvault_core::error::{AppError, ErrorKind};
use lexvault_core::result::AppResult;

/// One uploaded scan.
#[derive(Debug, Clone)]
pub struct ScanImage {
    /// Original file name as uploaded.
    pub name: String,
    /// Raw image bytes in any format the `image` crate decodes.
    pub data: Bytes,
}

impl ScanImage {
    /// Create a scan from its name and bytes.
    pub fn new(name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }
}

/// A scan decoded into memory, ready to embed.
#[derive(Debug, Clone)]
struct NormalizedScan {
    image: DynamicImage,
}

/// Converts image batches into PDF documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScanConverter;

impl ScanConverter {
    /// Create a converter.
    pub fn new() -> Self {
        Self
    }

    /// Convert `images` into PDF bytes on the blocking thread pool.
    pub async fn convert(&self, images: Vec<ScanImage>) -> AppResult<Vec<u8>> {
        tokio::task::spawn_blocking(move || Self::convert_blocking(&images))
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Internal, "Scan conversion task panicked", e))?
    }

    /// Convert `images` into PDF bytes on the current thread.
    pub fn convert_blocking(images: &[ScanImage]) -> AppResult<Vec<u8>> {
        if images.is_empty() {
            return Err(AppError::invalid_input("No images uploaded"));
        }

        let normalized = images
            .iter()
            .enumerate()
            .map(|(index, image)| normalize(index, image))
            .collect::<AppResult<Vec<_>>>()?;

        build_pdf(&normalized)
    }
}

/// Decode one scan, verifying it survives a lossless PNG round of encoding.
fn normalize(index: usize, scan: &ScanImage) -> AppResult<NormalizedScan> {
    let image = image::load_from_memory(&scan.data).map_err(|e| {
        AppError::with_source(
            ErrorKind::InvalidInput,
            format!("Image {index} ('{}') could not be decoded: {e}", scan.name),
            e,
        )
    })?;

    image
        .write_to(&mut Cursor::new(Vec::new()), ImageFormat::Png)
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::InvalidInput,
                format!("Image {index} ('{}') could not be re-encoded: {e}", scan.name),
                e,
            )
        })?;

    Ok(NormalizedScan { image })
}

/// Raw 8-bit RGB samples and, for images with transparency, the matching
/// 8-bit alpha plane.
fn split_samples(image: &DynamicImage) -> (Vec<u8>, Option<Vec<u8>>) {
    if !image.color().has_alpha() {
        return (image.to_rgb8().into_raw(), None);
    }

    let rgba = image.to_rgba8();
    let pixels = rgba.width() as usize * rgba.height() as usize;
    let mut rgb = Vec::with_capacity(pixels * 3);
    let mut alpha = Vec::with_capacity(pixels);
    for pixel in rgba.pixels() {
        let [r, g, b, a] = pixel.0;
        rgb.extend_from_slice(&[r, g, b]);
        alpha.push(a);
    }
    (rgb, Some(alpha))
}

fn pdf_error(action: &str, err: impl std::fmt::Display) -> AppError {
    AppError::internal(format!("Failed to {action} PDF: {err}"))
}

fn build_pdf(scans: &[NormalizedScan]) -> AppResult<Vec<u8>> {
    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let mut kids: Vec<Object> = Vec::with_capacity(scans.len());

    for scan in scans {
        let width = i64::from(scan.image.width());
        let height = i64::from(scan.image.height());
        let (rgb, alpha) = split_samples(&scan.image);

        let mut image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => width,
            "Height" => height,
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
        };
        if let Some(alpha) = alpha {
            let mask_id = doc.add_object(Stream::new(
                dictionary! {
                    "Type" => "XObject",
                    "Subtype" => "Image",
                    "Width" => width,
                    "Height" => height,
                    "ColorSpace" => "DeviceGray",
                    "BitsPerComponent" => 8_i64,
                },
                alpha,
            ));
            image_dict.set("SMask", mask_id);
        }
        let image_id = doc.add_object(Stream::new(image_dict, rgb));

        let content = Content {
            operations: vec![
                Operation::new("q", vec![]),
                Operation::new(
                    "cm",
                    vec![
                        Object::Integer(width),
                        Object::Integer(0),
                        Object::Integer(0),
                        Object::Integer(height),
                        Object::Integer(0),
                        Object::Integer(0),
                    ],
                ),
                Operation::new("Do", vec![Object::Name(b"Im0".to_vec())]),
                Operation::new("Q", vec![]),
            ],
        };
        let content_id = doc.add_object(Stream::new(
            dictionary! {},
            content.encode().map_err(|e| pdf_error("encode page of", e))?,
        ));

        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "MediaBox" => vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Integer(width),
                Object::Integer(height),
            ],
            "Contents" => content_id,
            "Resources" => dictionary! {
                "XObject" => dictionary! {
                    "Im0" => image_id,
                },
            },
        });
        kids.push(page_id.into());
    }

    let page_count = kids.len() as i64;
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => page_count,
        }),
    );

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);
    doc.compress();

    let mut out = Vec::new();
    doc.save_to(&mut out).map_err(|e| pdf_error("write", e))?;
    Ok(out)
}

#[cfg(test)]
mod tests {
    use image::{Rgb, RgbImage, Rgba, RgbaImage};
    use lexvault_core::ErrorKind;

    use super::*;

    fn encoded(width: u32, height: u32, format: ImageFormat) -> Vec<u8> {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(width, height, Rgb([200, 10, 10])));
        let mut out = Vec::new();
        img.write_to(&mut Cursor::new(&mut out), format).unwrap();
        out
    }

    fn media_boxes(pdf: &[u8]) -> Vec<(i64, i64)> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.get_pages()
            .values()
            .map(|id| {
                let media_box = doc
                    .get_dictionary(*id)
                    .unwrap()
                    .get(b"MediaBox")
                    .unwrap()
                    .as_array()
                    .unwrap();
                (
                    media_box[2].as_i64().unwrap(),
                    media_box[3].as_i64().unwrap(),
                )
            })
            .collect()
    }

    #[tokio::test]
    async fn test_one_page_per_image_sized_to_pixels() {
        let images = vec![
            ScanImage::new("page1.png", encoded(40, 60, ImageFormat::Png)),
            ScanImage::new("page2.jpg", encoded(120, 30, ImageFormat::Jpeg)),
            ScanImage::new("page3.bmp", encoded(17, 17, ImageFormat::Bmp)),
        ];

        let pdf = ScanConverter::new().convert(images).await.unwrap();
        assert!(pdf.starts_with(b"%PDF-1.5"));
        assert_eq!(media_boxes(&pdf), [(40, 60), (120, 30), (17, 17)]);
    }

    #[test]
    fn test_undecodable_image_names_index_and_file() {
        let images = vec![
            ScanImage::new("ok.png", encoded(10, 10, ImageFormat::Png)),
            ScanImage::new("notes.txt", b"definitely not an image".to_vec()),
        ];

        let err = ScanConverter::convert_blocking(&images).unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
        assert!(err.message.contains("Image 1"));
        assert!(err.message.contains("notes.txt"));
    }

    #[test]
    fn test_empty_batch_is_rejected() {
        let err = ScanConverter::convert_blocking(&[]).unwrap_err();
        assert!(err.is(ErrorKind::InvalidInput));
    }

    fn image_streams(pdf: &[u8]) -> Vec<lopdf::Dictionary> {
        let doc = Document::load_mem(pdf).unwrap();
        doc.objects
            .values()
            .filter_map(|object| match object {
                Object::Stream(stream) => Some(stream.dict.clone()),
                _ => None,
            })
            .filter(|dict| {
                dict.get(b"Subtype")
                    .and_then(|subtype| subtype.as_name())
                    .is_ok_and(|name| name == b"Image")
            })
            .collect()
    }

    #[test]
    fn test_transparent_scan_keeps_alpha_as_soft_mask() {
        let img = DynamicImage::ImageRgba8(RgbaImage::from_pixel(4, 4, Rgba([0, 0, 0, 0])));
        let mut png = Vec::new();
        img.write_to(&mut Cursor::new(&mut png), ImageFormat::Png)
            .unwrap();

        let pdf = ScanConverter::convert_blocking(&[ScanImage::new("stamp.png", png)]).unwrap();
        let streams = image_streams(&pdf);
        assert_eq!(streams.len(), 2);

        let color = streams
            .iter()
            .find(|dict| dict.has(b"SMask"))
            .expect("color image references its alpha plane");
        assert_eq!(color.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceRGB");

        let mask = streams
            .iter()
            .find(|dict| !dict.has(b"SMask"))
            .unwrap();
        assert_eq!(mask.get(b"ColorSpace").unwrap().as_name().unwrap(), b"DeviceGray");
        assert_eq!(mask.get(b"Width").unwrap().as_i64().unwrap(), 4);
    }

    #[test]
    fn test_opaque_scan_has_no_soft_mask() {
        let images = [ScanImage::new("page.png", encoded(8, 8, ImageFormat::Png))];
        let streams = image_streams(&ScanConverter::convert_blocking(&images).unwrap());
        assert_eq!(streams.len(), 1);
        assert!(!streams[0].has(b"SMask"));
    }
}
