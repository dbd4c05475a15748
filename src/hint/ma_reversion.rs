use crate::error::{ensure_len, PortfolioError, Result};
use crate::hint::HintProvider;

/// Predicts reversion to the moving average of the last `window` periods,
/// in the spirit of OLMAR (Li and Hoi, 2012).
///
/// For the most recent `k = min(window - 1, history.len())` price relatives
/// the hint is `(1 + sum_i 1 / c_i) / (k + 1)`, where `c_i` is the product of
/// the relatives from row `i` to the newest row. That is the moving-average
/// price over the window expressed relative to the latest price.
#[derive(Debug, Clone)]
pub struct MaReversionHint {
    n_assets: usize,
    window: usize,
}

impl MaReversionHint {
    pub fn new(n_assets: usize, window: usize) -> Result<Self> {
        if window == 0 {
            return Err(PortfolioError::InvalidConfig(
                "moving-average window must be >= 1".to_string(),
            ));
        }
        Ok(Self { n_assets, window })
    }

    pub fn window(&self) -> usize {
        self.window
    }
}

impl HintProvider for MaReversionHint {
    fn n_assets(&self) -> usize {
        self.n_assets
    }

    fn train(&mut self, _observations: &[Vec<f64>], _targets: &[Vec<f64>]) -> Result<()> {
        Ok(())
    }

    fn get_hint(&mut self, _next_x: &[f64], history: &[Vec<f64>]) -> Result<Vec<f64>> {
        let k = (self.window - 1).min(history.len());
        let recent = &history[history.len() - k..];

        let mut cprod = vec![1.0; self.n_assets];
        let mut inv_sum = vec![0.0; self.n_assets];
        // Newest row first so `cprod` holds the product from row i to the end.
        for row in recent.iter().rev() {
            ensure_len(row, self.n_assets)?;
            for ((c, acc), x) in cprod.iter_mut().zip(inv_sum.iter_mut()).zip(row) {
                *c *= x;
                *acc += 1.0 / *c;
            }
        }

        let denom = (k + 1) as f64;
        Ok(inv_sum.into_iter().map(|s| (1.0 + s) / denom).collect())
    }
}
