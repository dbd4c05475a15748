use crate::error::{ensure_len, PortfolioError, Result};

pub fn uniform(m: usize) -> Vec<f64> {
    if m == 0 {
        return Vec::new();
    }
    vec![1.0 / m as f64; m]
}

/// Unit vector with all weight on `index`.
pub fn unit(m: usize, index: usize) -> Vec<f64> {
    let mut b = vec![0.0; m];
    if let Some(slot) = b.get_mut(index) {
        *slot = 1.0;
    }
    b
}

/// Index of the first maximum entry. NaN entries never win.
pub fn argmax(v: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &val) in v.iter().enumerate() {
        if val.is_nan() {
            continue;
        }
        match best {
            Some((_, cur)) if val <= cur => {}
            _ => best = Some((i, val)),
        }
    }
    best.map(|(i, _)| i)
}

pub fn dot(a: &[f64], b: &[f64]) -> Result<f64> {
    ensure_len(b, a.len())?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// Scale `v` so its entries sum to 1. Any finite non-zero sum is accepted.
pub fn normalize(mut v: Vec<f64>) -> Result<Vec<f64>> {
    let total: f64 = v.iter().sum();
    if !total.is_finite() || total == 0.0 {
        return Err(PortfolioError::NumericDomain(format!(
            "cannot normalize weights with sum {total}"
        )));
    }
    for w in &mut v {
        *w /= total;
    }
    Ok(v)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_picks_first_maximum() {
        assert_eq!(argmax(&[0.1, 0.9, 0.9]), Some(1));
        assert_eq!(argmax(&[f64::NAN, 0.2, 0.1]), Some(1));
        assert_eq!(argmax(&[]), None);
    }

    #[test]
    fn normalize_rejects_zero_sum() {
        assert!(normalize(vec![1.0, -1.0]).is_err());
        let b = normalize(vec![2.0, 6.0]).unwrap();
        assert!((b[0] - 0.25).abs() < 1e-12);
        assert!((b[1] - 0.75).abs() < 1e-12);
    }

    #[test]
    fn normalize_accepts_tiny_sums() {
        let b = normalize(vec![3e-20, 1e-20]).unwrap();
        assert!((b[0] - 0.75).abs() < 1e-12);
        assert!((b[1] - 0.25).abs() < 1e-12);
        assert!(normalize(vec![f64::INFINITY, 1.0]).is_err());
    }
}
