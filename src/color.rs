use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

use crate::data::model::Measurement;
use crate::data::sampling::SampledDataset;

// ---------------------------------------------------------------------------
// Diverging colour scale (RdYlBu, reversed: blue = low, red = high)
// ---------------------------------------------------------------------------

/// ColorBrewer RdYlBu stops, ordered from low to high values (i.e. reversed).
const RD_YL_BU_R: [(u8, u8, u8); 11] = [
    (49, 54, 149),
    (69, 117, 180),
    (116, 173, 209),
    (171, 217, 233),
    (224, 243, 248),
    (255, 255, 191),
    (254, 224, 144),
    (253, 174, 97),
    (244, 109, 67),
    (215, 48, 39),
    (165, 0, 38),
];

/// Colour at position `t` in `[0, 1]` along the scale, interpolated in
/// linear RGB. Out-of-range and non-finite `t` are clamped to the scale.
pub fn diverging(t: f64, alpha: f32) -> Color32 {
    let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
    let segments = (RD_YL_BU_R.len() - 1) as f64;
    let pos = t * segments;
    let lo = (pos.floor() as usize).min(RD_YL_BU_R.len() - 2);
    let frac = (pos - lo as f64) as f32;

    let stop = |i: usize| -> LinSrgb {
        let (r, g, b) = RD_YL_BU_R[i];
        Srgb::new(r, g, b).into_format::<f32>().into_linear()
    };
    let mixed = stop(lo).mix(stop(lo + 1), frac);
    let rgb: Srgb<u8> = Srgb::<f32>::from_linear(mixed).into_format();

    Color32::from_rgba_unmultiplied(
        rgb.red,
        rgb.green,
        rgb.blue,
        (alpha.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// ColorScale: measurement value → Color32
// ---------------------------------------------------------------------------

/// Maps values of the selected measurement onto the diverging scale.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorScale {
    pub measurement: Measurement,
    pub min: f64,
    pub max: f64,
    pub opacity: f32,
}

impl ColorScale {
    /// Fit the scale to the finite values of `measurement` in the sample.
    pub fn fit(sample: &SampledDataset, measurement: Measurement, opacity: f32) -> Self {
        let (min, max) = sample
            .iter()
            .map(|r| r.measurement(measurement))
            .filter(|v| v.is_finite())
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
                (lo.min(v), hi.max(v))
            });
        let (min, max) = if min <= max { (min, max) } else { (0.0, 0.0) };
        ColorScale {
            measurement,
            min,
            max,
            opacity,
        }
    }

    /// Position of `value` along the scale in `[0, 1]`. A flat range maps
    /// everything to the midpoint.
    pub fn normalize(&self, value: f64) -> f64 {
        let range = self.max - self.min;
        if !value.is_finite() || range.abs() < f64::EPSILON {
            return 0.5;
        }
        ((value - self.min) / range).clamp(0.0, 1.0)
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        diverging(self.normalize(value), self.opacity)
    }

    /// Evenly spaced legend ticks from min to max (`n >= 2`).
    pub fn legend_entries(&self, n: usize) -> Vec<(String, Color32)> {
        let n = n.max(2);
        (0..n)
            .map(|i| {
                let t = i as f64 / (n - 1) as f64;
                let value = self.min + t * (self.max - self.min);
                (format!("{value:.2}"), diverging(t, 1.0))
            })
            .collect()
    }
}
