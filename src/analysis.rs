use crate::store::TrialRecord;
use crate::trial;
use crate::util::{mean, word_count};
use chrono::NaiveDateTime;

/// Records per aggregation bucket. The miss ratio always divides by this
/// constant, even for a short final window.
pub const WINDOW_SIZE: usize = 10;

const SECS_PER_DAY: f64 = 60.0 * 60.0 * 24.0;

/// Derived metrics for one window of trial history.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowStats {
    /// The window's first timestamp as a day-fraction number.
    pub day: f64,
    pub chars_per_sec: f64,
    pub words_per_min: f64,
    pub miss_ratio: f64,
    pub accuracy: f64,
}

/// Windowed performance trend over a player's full trial history.
#[derive(Debug, Clone, PartialEq)]
pub struct PerfReport {
    pub windows: Vec<WindowStats>,
}

impl PerfReport {
    pub fn chars_per_sec_series(&self) -> Vec<(f64, f64)> {
        self.series(|w| w.chars_per_sec)
    }

    pub fn words_per_min_series(&self) -> Vec<(f64, f64)> {
        self.series(|w| w.words_per_min)
    }

    pub fn miss_ratio_series(&self) -> Vec<(f64, f64)> {
        self.series(|w| w.miss_ratio)
    }

    pub fn accuracy_series(&self) -> Vec<(f64, f64)> {
        self.series(|w| w.accuracy)
    }

    pub fn days(&self) -> Vec<f64> {
        self.windows.iter().map(|w| w.day).collect()
    }

    fn series<F: Fn(&WindowStats) -> f64>(&self, value: F) -> Vec<(f64, f64)> {
        self.windows.iter().map(|w| (w.day, value(w))).collect()
    }
}

fn day_fraction(ts: NaiveDateTime) -> f64 {
    ts.and_utc().timestamp_micros() as f64 / 1e6 / SECS_PER_DAY
}

/// Bucket a player's ordered trial history into windows of [`WINDOW_SIZE`]
/// records and derive throughput and accuracy per window. Returns `None`
/// for an empty history.
///
/// Throughput counts only trials where the typed text exactly equals the
/// target, over the summed elapsed time of those same trials. The words
/// numerator additionally skips trial index 0, the spaceless warm-up drill.
/// Accuracy is the mean similarity ratio over the window's missed trials,
/// or 1.0 when the window is clean.
pub fn aggregate(records: &[TrialRecord]) -> Option<PerfReport> {
    if records.is_empty() {
        return None;
    }

    let windows = records
        .chunks(WINDOW_SIZE)
        .map(|group| {
            let exact: Vec<&TrialRecord> =
                group.iter().filter(|r| r.target == r.typed).collect();

            let total_chars: usize = exact.iter().map(|r| r.target.chars().count()).sum();
            let total_words: usize = exact
                .iter()
                .filter(|r| r.index != 0)
                .map(|r| word_count(&r.target))
                .sum();
            let total_secs: f64 = exact.iter().map(|r| r.elapsed_secs).sum();

            let miss_ratios: Vec<f64> = group
                .iter()
                .filter(|r| r.target != r.typed)
                .map(|r| trial::score(&r.target, &r.typed).ratio)
                .collect();

            let (chars_per_sec, words_per_min) = if total_secs > 0.0 {
                (
                    total_chars as f64 / total_secs,
                    total_words as f64 / total_secs * 60.0,
                )
            } else {
                (0.0, 0.0)
            };

            WindowStats {
                day: day_fraction(group[0].recorded_at),
                chars_per_sec,
                words_per_min,
                miss_ratio: miss_ratios.len() as f64 / WINDOW_SIZE as f64,
                accuracy: mean(&miss_ratios).unwrap_or(1.0),
            }
        })
        .collect();

    Some(PerfReport { windows })
}
