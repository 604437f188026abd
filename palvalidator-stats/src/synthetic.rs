//! `SyntheticSeriesSource` — produces permuted OHLC series for Monte Carlo
//! permutation testing.

use palvalidator_core::series::{Bar, TimeSeries};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rust_decimal::Decimal;
use std::sync::Mutex;

/// Produces a permuted/reshuffled OHLC series of the same length as
/// `original`, reproducible given a seed.
pub trait SyntheticSeriesSource: Send + Sync {
    fn create_synthetic_series(&self, original: &TimeSeries) -> TimeSeries;
}

/// Shuffles the sequence of bar-to-bar close percentage changes (and each
/// day's own intrabar open/high/low ratio to its close) and replays them
/// from the original series' first bar. Because each day's ratios are taken
/// from a single real, sane bar and every replayed close stays positive
/// (each multiplicative step is `1 + pct_change` with `pct_change > -1`,
/// since both closes in the original ratio are positive), the synthetic
/// series is sane bar-by-bar by construction. Grounded
/// on the `robustness::levels::bootstrap` resampling idiom
/// (seeded `ChaCha8Rng`), adapted from block-resampling of equity returns
/// to full-series permutation of single-bar percentage changes.
pub struct BarPermutationSource {
    rng: Mutex<ChaCha8Rng>,
}

impl BarPermutationSource {
    pub fn new(seed: u64) -> Self {
        Self { rng: Mutex::new(ChaCha8Rng::seed_from_u64(seed)) }
    }
}

struct DailyShape {
    close_pct_change: Decimal,
    open_ratio: Decimal,
    high_ratio: Decimal,
    low_ratio: Decimal,
}

impl SyntheticSeriesSource for BarPermutationSource {
    fn create_synthetic_series(&self, original: &TimeSeries) -> TimeSeries {
        let bars = original.bars();
        if bars.len() < 2 {
            return TimeSeries::new(bars.to_vec());
        }

        let shapes: Vec<DailyShape> = bars[1..]
            .iter()
            .zip(bars.iter())
            .map(|(bar, prev)| DailyShape {
                close_pct_change: (bar.close - prev.close) / prev.close,
                open_ratio: bar.open / bar.close,
                high_ratio: bar.high / bar.close,
                low_ratio: bar.low / bar.close,
            })
            .collect();

        let mut order: Vec<usize> = (0..shapes.len()).collect();
        {
            let mut rng = self.rng.lock().expect("synthetic source rng poisoned");
            order.shuffle(&mut *rng);
        }

        let mut out = Vec::with_capacity(bars.len());
        out.push(bars[0]);
        let mut prev_close = bars[0].close;

        for (step, &shape_index) in order.iter().enumerate() {
            let shape = &shapes[shape_index];
            let date = bars[step + 1].date;
            let volume = bars[step + 1].volume;
            let close = prev_close * (Decimal::ONE + shape.close_pct_change);
            let open = close * shape.open_ratio;
            let high = close * shape.high_ratio;
            let low = close * shape.low_ratio;
            out.push(Bar { date, open, high, low, close, volume });
            prev_close = close;
        }

        TimeSeries::new(out)
    }
}
