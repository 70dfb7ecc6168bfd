use serde::Serialize;

/// Summary statistics over a set of delta E values
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DeltaEStats {
    pub mean: f64,
    pub max: f64,
    /// 95th percentile (nearest rank)
    pub p95: f64,
    pub count: usize,
}

impl DeltaEStats {
    /// Returns `None` when no finite values are given
    pub fn from_differences(differences: &[f64]) -> Option<Self> {
        let mut sorted: Vec<f64> = differences.iter().copied().filter(|d| d.is_finite()).collect();
        if sorted.is_empty() {
            return None;
        }
        sorted.sort_by(f64::total_cmp);

        let count = sorted.len();
        let mean = sorted.iter().sum::<f64>() / count as f64;
        let max = sorted[count - 1];
        let rank = ((count as f64) * 0.95).ceil() as usize;
        let p95 = sorted[rank.clamp(1, count) - 1];

        Some(Self { mean, max, p95, count })
    }

    /// Every difference is below the just-noticeable threshold
    pub fn is_excellent(&self) -> bool {
        self.max < 1.0
    }

    pub fn is_good(&self) -> bool {
        self.max < 2.0
    }

    pub fn is_acceptable(&self) -> bool {
        self.max < 3.5
    }
}
