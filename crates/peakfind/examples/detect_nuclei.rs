//! Detect synthetic nuclei and print their image coordinates.
//!
//! Usage: `cargo run --example detect_nuclei [config.json]`, where the optional
//! config is a `peakfind_detect::io::PeakDetectConfig`.

use std::env;

use log::LevelFilter;
use peakfind::detect::detect_peaks_image;
use peakfind::peaks::io::PeakDetectConfig;
use peakfind::PeakParams;

fn synthetic_field(width: u32, height: u32) -> image::GrayImage {
    let centres = [(40.0, 35.0), (90.0, 50.0), (60.0, 110.0), (150.0, 90.0), (120.0, 160.0)];
    let sigma2 = 36.0f32;
    image::GrayImage::from_fn(width, height, |x, y| {
        let v = centres.iter().fold(20.0f32, |acc, &(cx, cy)| {
            let d2 = (x as f32 - cx).powi(2) + (y as f32 - cy).powi(2);
            acc + 200.0 * (-d2 / (2.0 * sigma2)).exp()
        });
        image::Luma([v.clamp(0.0, 255.0) as u8])
    })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    peakfind::core::init_with_level(LevelFilter::Debug)?;

    let config = match env::args().nth(1) {
        Some(path) => PeakDetectConfig::load_json(path)?,
        None => PeakDetectConfig {
            params: PeakParams {
                width: 16,
                min_dist: 10.0,
                threshold: 5.0,
                ..PeakParams::default()
            },
            roi: None,
        },
    };

    let img = synthetic_field(200, 200);
    let result = detect_peaks_image(&img, config.roi, None, config.params)?;

    println!("found {} peaks", result.len());
    for (x, y) in result.absolute_peaks() {
        println!("{x}\t{y}");
    }
    Ok(())
}
