#![cfg(feature = "image")]

use image::{GrayImage, Luma};
use peakfind::detect::{detect_peaks_image, detect_peaks_raw, gray_view, DetectError};
use peakfind::{PeakError, PeakParams, Roi};

fn square_image(size: u32, x0: u32, side: u32) -> GrayImage {
    GrayImage::from_fn(size, size, |x, y| {
        let inside = (x0..x0 + side).contains(&x) && (x0..x0 + side).contains(&y);
        Luma([if inside { 255 } else { 0 }])
    })
}

fn params() -> PeakParams {
    PeakParams {
        width: 11,
        ..PeakParams::default()
    }
}

#[test]
fn image_and_raw_paths_agree() {
    let img = square_image(20, 5, 5);
    let from_image = detect_peaks_image(&img, None, None, params()).unwrap();
    let from_raw = detect_peaks_raw(20, 20, img.as_raw(), None, params()).unwrap();
    assert_eq!(from_image, from_raw);
    assert_eq!(from_image.absolute_peaks(), vec![(7, 7)]);
}

#[test]
fn view_borrows_pixels_row_major() {
    let mut img = GrayImage::new(3, 2);
    img.put_pixel(2, 1, Luma([9]));
    let view = gray_view(&img);
    assert_eq!(view.dims(), (3, 2));
    assert_eq!(view.get(2, 1), Some(9));
}

#[test]
fn zero_mask_blocks_everything() {
    let img = square_image(20, 5, 5);
    let mask = GrayImage::new(20, 20);
    let res = detect_peaks_image(&img, None, Some(&mask), params()).unwrap();
    assert!(res.is_empty());
}

#[test]
fn mask_size_mismatch_is_reported() {
    let img = square_image(20, 5, 5);
    let mask = GrayImage::new(19, 20);
    let err = detect_peaks_image(&img, None, Some(&mask), params()).unwrap_err();
    assert!(matches!(
        err,
        DetectError::Peak(PeakError::DimensionMismatch { .. })
    ));
}

#[test]
fn roi_offset_is_applied_to_absolute_peaks() {
    let img = square_image(30, 12, 5);
    let roi = Roi::new(7, 7, 20, 20);
    let res = detect_peaks_image(&img, Some(roi), None, params()).unwrap();
    assert_eq!(res.peaks.len(), 1);
    assert_eq!(res.absolute_peaks(), vec![(14, 14)]);
}
