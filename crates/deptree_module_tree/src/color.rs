use colored::Color;
use std::collections::HashMap;

const COLD_RGB: (u8, u8, u8) = (0, 128, 0);
const HOT_RGB: (u8, u8, u8) = (128, 0, 0);
const ZERO_RGB: (u8, u8, u8) = (0, 95, 135);

const BLEND_STEPS: u32 = 256 * 256;
// Counts at the maximum stop at 80% of the hot color, never full saturation.
const HOT_SCALE: f64 = 0.8;

/// Memoized cold-to-hot gradient, scoped to a single rendering pass.
#[derive(Debug, Default)]
pub(crate) struct ColorCache {
    memo: HashMap<u32, Color>,
}

impl ColorCache {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Color for `value` measured against `max_value`.
    ///
    /// Zero values get a fixed blue tone. Everything else blends from cold
    /// to hot, capped at the hottest step once the maximum is reached.
    pub(crate) fn heat(&mut self, value: usize, max_value: usize) -> Color {
        if value == 0 {
            return truecolor(ZERO_RGB);
        }

        let crossfade = if max_value == 0 { 0.0 } else { value as f64 / max_value as f64 };
        let step = ((crossfade * f64::from(BLEND_STEPS)) as u32).min(BLEND_STEPS);
        *self.memo.entry(step).or_insert_with(|| {
            blend(COLD_RGB, HOT_RGB, f64::from(step) / f64::from(BLEND_STEPS) * HOT_SCALE)
        })
    }
}

fn truecolor((r, g, b): (u8, u8, u8)) -> Color {
    Color::TrueColor { r, g, b }
}

fn blend(from: (u8, u8, u8), to: (u8, u8, u8), crossfade: f64) -> Color {
    Color::TrueColor {
        r: blend_channel(from.0, to.0, crossfade),
        g: blend_channel(from.1, to.1, crossfade),
        b: blend_channel(from.2, to.2, crossfade),
    }
}

fn blend_channel(from: u8, to: u8, crossfade: f64) -> u8 {
    (f64::from(from) + (f64::from(to) - f64::from(from)) * crossfade) as u8
}
