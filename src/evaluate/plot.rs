use std::path::Path;

use image::{Rgb, RgbImage};

use crate::audio::dataset::Dataset;
use crate::evaluate::window::PlotWindow;
use crate::loss::esr::esr;
use crate::network::model::AmpModel;
use crate::train::error::TrainError;

const WIDTH: u32 = 1200;
const HEIGHT: u32 = 400;

struct Palette {
    background: Rgb<u8>,
    axis: Rgb<u8>,
    target: Rgb<u8>,
    prediction: Rgb<u8>,
}

const LIGHT: Palette = Palette {
    background: Rgb([255, 255, 255]),
    axis: Rgb([200, 200, 200]),
    target: Rgb([40, 40, 40]),
    prediction: Rgb([220, 80, 40]),
};

const DARK: Palette = Palette {
    background: Rgb([30, 30, 30]),
    axis: Rgb([80, 80, 80]),
    target: Rgb([230, 230, 230]),
    prediction: Rgb([255, 140, 60]),
};

/// Scores `model` on the validation set and returns its ESR.
///
/// With a `filepath` the target and prediction over `window` are rendered
/// to a PNG there. Themes whose name contains "dark" get a dark background.
/// Unless `silent`, the score is logged.
pub fn plot(
    model: &mut AmpModel,
    validation: &Dataset,
    filepath: Option<&Path>,
    silent: bool,
    window: PlotWindow,
    theme: &str,
) -> Result<f64, TrainError> {
    let predicted = model.predict_all(validation);
    let target = validation.targets();
    let score = esr(&predicted, target);

    if let Some(path) = filepath {
        let window = window.clamp_to(target.len());
        let palette = if theme.to_ascii_lowercase().contains("dark") { &DARK } else { &LIGHT };
        let image = render(&target[window.start..window.end], &predicted[window.start..window.end], palette);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| TrainError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        image.save(path).map_err(|source| TrainError::Plot { path: path.to_path_buf(), source })?;
        tracing::debug!("Saved comparison plot to {}", path.display());
    }

    if !silent {
        tracing::info!("Validation ESR = {score:.4}");
    }
    Ok(score)
}

fn render(target: &[f64], predicted: &[f64], palette: &Palette) -> RgbImage {
    let mut image = RgbImage::from_pixel(WIDTH, HEIGHT, palette.background);
    let mid = HEIGHT / 2;
    for x in 0..WIDTH {
        image.put_pixel(x, mid, palette.axis);
    }
    let peak = target.iter().chain(predicted.iter())
        .fold(0.0f64, |m, v| m.max(v.abs()))
        .max(1e-9);
    trace(&mut image, target, peak, palette.target);
    trace(&mut image, predicted, peak, palette.prediction);
    image
}

/// Draws `signal` as a connected polyline scaled to `peak`.
fn trace(image: &mut RgbImage, signal: &[f64], peak: f64, color: Rgb<u8>) {
    if signal.is_empty() {
        return;
    }
    let last_row = (HEIGHT - 1) as f64;
    let to_row = |v: f64| (((1.0 - v / peak) * 0.5 * last_row).round() as i64).clamp(0, last_row as i64) as u32;
    let to_col = |i: usize| ((i as u64 * (WIDTH - 1) as u64) / signal.len().max(2).saturating_sub(1) as u64) as u32;

    let mut prev = (to_col(0), to_row(signal[0]));
    for (i, &v) in signal.iter().enumerate() {
        let point = (to_col(i).min(WIDTH - 1), to_row(v));
        let (lo, hi) = if prev.1 <= point.1 { (prev.1, point.1) } else { (point.1, prev.1) };
        for y in lo..=hi {
            image.put_pixel(point.0, y, color);
        }
        prev = point;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::network::architecture::Architecture;
    use rand::{rngs::StdRng, SeedableRng};

    fn validation() -> Dataset {
        let x: Vec<f64> = (0..200).map(|i| (i as f64 * 0.1).sin()).collect();
        Dataset::from_signals(&x, &x, Architecture::Feather.receptive_field(), 0)
    }

    #[test]
    fn writes_png_when_path_given() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("plots").join("ampA.png");
        let mut model = AmpModel::new(Architecture::Feather, &mut StdRng::seed_from_u64(0));
        let ds = validation();

        let score = plot(&mut model, &ds, Some(&path), true, PlotWindow::for_validation(ds.len()), "dark").unwrap();

        assert!(score.is_finite() && score >= 0.0);
        let img = image::open(&path).unwrap().to_rgb8();
        assert_eq!(img.dimensions(), (WIDTH, HEIGHT));
        let background = img.pixels().filter(|p| **p == DARK.background).count();
        assert!(background > (WIDTH * HEIGHT / 2) as usize);
    }

    #[test]
    fn score_matches_esr_without_plot() {
        let mut model = AmpModel::new(Architecture::Feather, &mut StdRng::seed_from_u64(1));
        let ds = validation();
        let expected = esr(&model.predict_all(&ds), ds.targets());
        let score = plot(&mut model, &ds, None, true, PlotWindow::default(), "").unwrap();
        assert_eq!(score, expected);
    }
}
