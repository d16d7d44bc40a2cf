use crate::foundation::error::{CardError, CardResult};
use crate::foundation::math::Rng64;

/// How screenshot times are spread over a video.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimestampMode {
    /// Evenly spaced, excluding both ends.
    #[default]
    Uniform,
    /// Uniformly random in `[0, duration)`, sorted ascending.
    Random,
}

/// Generate `count` capture times (seconds) for a video of `duration_sec`.
///
/// Uniform mode places timestamps at `k * duration / (count + 1)` for `k = 1..=count`. Random mode
/// draws from `rng`, so a seeded generator gives a reproducible list.
pub fn generate_timestamps(
    mode: TimestampMode,
    count: usize,
    duration_sec: f64,
    rng: &mut Rng64,
) -> CardResult<Vec<f64>> {
    if !duration_sec.is_finite() || duration_sec <= 0.0 {
        return Err(CardError::invalid_argument(format!(
            "video duration must be positive and finite, got {duration_sec}"
        )));
    }

    let out = match mode {
        TimestampMode::Uniform => {
            let interval = duration_sec / (count as f64 + 1.0);
            (1..=count).map(|i| interval * i as f64).collect()
        }
        TimestampMode::Random => {
            let mut ts: Vec<f64> = (0..count)
                .map(|_| (rng.next_f64_01() * duration_sec).min(duration_sec.next_down()))
                .collect();
            ts.sort_by(f64::total_cmp);
            ts
        }
    };
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/media/timestamps.rs"]
mod tests;
