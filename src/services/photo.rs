//! Photo loading and preparation
//!
//! Turns a photo file into an upload-ready attachment: decode, honor the
//! EXIF orientation, cap the resolution, re-encode as JPEG, and pull the
//! GPS position out of the metadata when the camera recorded one.

use crate::model::compose::PhotoAttachment;
use crate::model::submission::Coordinate;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use std::fs;
use std::io::Cursor;
use std::path::Path;
use std::process::Command;
use uuid::Uuid;

/// Longest edge accepted by the service
pub const MAX_UPLOAD_EDGE: u32 = 2048;

/// Load and prepare a photo file for upload
pub fn load_photo(path: &Path) -> Result<PhotoAttachment, String> {
    let bytes =
        fs::read(path).map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let (orientation, coordinate) = exif_metadata(&bytes);

    let decoded = image::load_from_memory(&bytes)
        .map_err(|e| format!("Failed to decode {}: {}", path.display(), e))?;
    let oriented = apply_orientation(decoded, orientation);

    let (width, height) = scaled_dimensions(oriented.width(), oriented.height(), MAX_UPLOAD_EDGE);
    let resized = if (width, height) == (oriented.width(), oriented.height()) {
        oriented
    } else {
        oriented.resize_exact(width, height, FilterType::Triangle)
    };

    // JPEG has no alpha channel
    let flattened = DynamicImage::ImageRgb8(resized.to_rgb8());
    let mut jpeg = Vec::new();
    flattened
        .write_to(&mut Cursor::new(&mut jpeg), ImageFormat::Jpeg)
        .map_err(|e| format!("Failed to encode photo: {}", e))?;

    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "photo.jpg".to_string());

    Ok(PhotoAttachment {
        file_name,
        jpeg,
        width,
        height,
        coordinate,
    })
}

/// Run the configured capture command and load its output
///
/// The command gets a scratch file path as its last argument and is
/// expected to write the captured photo there.
pub fn capture_photo(command: &str) -> Result<PhotoAttachment, String> {
    let scratch = std::env::temp_dir().join(format!("mural-capture-{}.jpg", Uuid::new_v4()));
    let full_command = format!("{} \"{}\"", command, scratch.display());

    #[cfg(target_os = "windows")]
    let output = Command::new("cmd").args(["/C", &full_command]).output();

    #[cfg(not(target_os = "windows"))]
    let output = Command::new("sh").args(["-c", &full_command]).output();

    let output = output.map_err(|e| format!("Failed to run capture command: {}", e))?;
    if !output.status.success() {
        return Err(format!("Capture command failed with {}", output.status));
    }
    if !scratch.exists() {
        return Err("Capture command produced no file".to_string());
    }

    let photo = load_photo(&scratch);
    let _ = fs::remove_file(&scratch);
    photo
}

/// Dimensions after capping the longest edge, aspect ratio preserved
fn scaled_dimensions(width: u32, height: u32, max_edge: u32) -> (u32, u32) {
    let longest = width.max(height);
    if longest <= max_edge {
        return (width, height);
    }

    let scale = f64::from(max_edge) / f64::from(longest);
    let scaled_w = ((f64::from(width) * scale).round() as u32).max(1);
    let scaled_h = ((f64::from(height) * scale).round() as u32).max(1);
    (scaled_w, scaled_h)
}

/// Bake the EXIF orientation into the pixels
fn apply_orientation(img: DynamicImage, orientation: u32) -> DynamicImage {
    match orientation {
        2 => img.fliph(),
        3 => img.rotate180(),
        4 => img.flipv(),
        5 => img.rotate90().fliph(),
        6 => img.rotate90(),
        7 => img.rotate270().fliph(),
        8 => img.rotate270(),
        _ => img,
    }
}

/// Orientation tag and GPS position, if the file carries EXIF data
fn exif_metadata(bytes: &[u8]) -> (u32, Option<Coordinate>) {
    let exif_reader = exif::Reader::new();
    let Ok(exif) = exif_reader.read_from_container(&mut Cursor::new(bytes)) else {
        return (1, None);
    };

    let orientation = exif
        .get_field(exif::Tag::Orientation, exif::In::PRIMARY)
        .and_then(|field| field.value.get_uint(0))
        .unwrap_or(1);

    (orientation, gps_coordinate(&exif))
}

/// Extract a signed decimal coordinate from the GPS tags
fn gps_coordinate(exif: &exif::Exif) -> Option<Coordinate> {
    let lat_field = exif.get_field(exif::Tag::GPSLatitude, exif::In::PRIMARY)?;
    let lat_ref = exif.get_field(exif::Tag::GPSLatitudeRef, exif::In::PRIMARY)?;
    let lon_field = exif.get_field(exif::Tag::GPSLongitude, exif::In::PRIMARY)?;
    let lon_ref = exif.get_field(exif::Tag::GPSLongitudeRef, exif::In::PRIMARY)?;

    let latitude = apply_hemisphere(
        parse_gps_rational(&lat_field.value)?,
        &lat_ref.display_value().to_string(),
        'S',
    );
    let longitude = apply_hemisphere(
        parse_gps_rational(&lon_field.value)?,
        &lon_ref.display_value().to_string(),
        'W',
    );

    Some(Coordinate::new(latitude, longitude))
}

/// Parse a GPS value from EXIF rationals (degrees, minutes, seconds)
fn parse_gps_rational(value: &exif::Value) -> Option<f64> {
    match value {
        exif::Value::Rational(rationals) if rationals.len() >= 3 => {
            let degrees = rationals[0].to_f64();
            let minutes = rationals[1].to_f64();
            let seconds = rationals[2].to_f64();
            Some(degrees + minutes / 60.0 + seconds / 3600.0)
        }
        _ => None,
    }
}

/// Negate the magnitude when the hemisphere reference says so
fn apply_hemisphere(value: f64, reference: &str, negative: char) -> f64 {
    if reference.contains(negative) {
        -value
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn rational(num: u32, denom: u32) -> exif::Rational {
        exif::Rational { num, denom }
    }

    #[test]
    fn test_scaled_dimensions_caps_longest_edge() {
        assert_eq!(scaled_dimensions(4096, 3072, 2048), (2048, 1536));
        assert_eq!(scaled_dimensions(3072, 4096, 2048), (1536, 2048));
        assert_eq!(scaled_dimensions(1000, 800, 2048), (1000, 800));
        assert_eq!(scaled_dimensions(2048, 2048, 2048), (2048, 2048));
    }

    #[test]
    fn test_scaled_dimensions_never_hits_zero() {
        let (w, h) = scaled_dimensions(100_000, 10, 2048);
        assert_eq!(w, 2048);
        assert!(h >= 1);
    }

    #[test]
    fn test_parse_gps_rational_dms() {
        let value = exif::Value::Rational(vec![
            rational(37, 1),
            rational(46, 1),
            rational(30, 1),
        ]);
        let decimal = parse_gps_rational(&value).unwrap();
        assert!((decimal - 37.775).abs() < 1e-9);
    }

    #[test]
    fn test_parse_gps_rational_rejects_short_values() {
        let value = exif::Value::Rational(vec![rational(37, 1)]);
        assert!(parse_gps_rational(&value).is_none());

        let value = exif::Value::Ascii(vec![b"37".to_vec()]);
        assert!(parse_gps_rational(&value).is_none());
    }

    #[test]
    fn test_apply_hemisphere_signs() {
        assert_eq!(apply_hemisphere(37.775, "N", 'S'), 37.775);
        assert_eq!(apply_hemisphere(37.775, "S", 'S'), -37.775);
        assert_eq!(apply_hemisphere(122.42, "W", 'W'), -122.42);
        assert_eq!(apply_hemisphere(122.42, "E", 'W'), 122.42);
    }

    #[test]
    fn test_apply_orientation_rotates_dimensions() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(4, 2));

        let upright = apply_orientation(img.clone(), 1);
        assert_eq!((upright.width(), upright.height()), (4, 2));

        let upside_down = apply_orientation(img.clone(), 3);
        assert_eq!((upside_down.width(), upside_down.height()), (4, 2));

        let rotated = apply_orientation(img.clone(), 6);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));

        let transposed = apply_orientation(img, 5);
        assert_eq!((transposed.width(), transposed.height()), (2, 4));
    }

    #[test]
    fn test_load_photo_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("piece.png");
        DynamicImage::ImageRgb8(RgbImage::new(8, 4))
            .save(&path)
            .unwrap();

        let photo = load_photo(&path).unwrap();
        assert_eq!(photo.file_name, "piece.png");
        assert_eq!((photo.width, photo.height), (8, 4));
        assert!(!photo.jpeg.is_empty());
        assert_eq!(photo.coordinate, None);

        // The encoded bytes decode back as a JPEG
        let decoded = image::load_from_memory(&photo.jpeg).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (8, 4));
    }

    #[test]
    fn test_load_photo_missing_file() {
        let err = load_photo(Path::new("/nonexistent/wall.jpg")).unwrap_err();
        assert!(err.contains("Failed to read"));
    }
}
