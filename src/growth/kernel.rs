//! Attachment kernels
//!
//! A kernel maps the current in-degree of a candidate node to an attachment
//! weight. The candidate graph picks targets with probability proportional
//! to that weight.

use super::{GrowthError, GrowthResult};

/// Default bucket weights: in-degree 0, 1-2, 3-4, 5+
pub const DEFAULT_DISTRIBUTION: [f64; 4] = [1.0, 0.8, 0.6, 0.4];

/// Degree-to-weight policy used while growing a candidate level
pub trait AttachmentKernel {
    fn weight(&self, in_degree: usize) -> f64;
}

impl<F> AttachmentKernel for F
where
    F: Fn(usize) -> f64,
{
    fn weight(&self, in_degree: usize) -> f64 {
        self(in_degree)
    }
}

/// Four-bucket kernel favoring low in-degree targets when the weights decrease.
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeBucketKernel {
    weights: [f64; 4],
}

impl DegreeBucketKernel {
    /// Build a kernel from exactly four weights.
    ///
    /// The weights must be finite, non-negative, not all zero and
    /// non-increasing from bucket 0 to bucket 3.
    pub fn new(distribution: &[f64]) -> GrowthResult<Self> {
        validate_distribution(distribution)?;
        let mut weights = [0.0; 4];
        weights.copy_from_slice(distribution);
        Ok(Self { weights })
    }

    /// Build a kernel from weights normalized to sum to 1
    pub fn normalized(distribution: &[f64]) -> GrowthResult<Self> {
        Self::new(&normalize_distribution(distribution)?)
    }

    /// Bucket index for an in-degree: 0; 1-2; 3-4; 5+
    pub fn bucket(in_degree: usize) -> usize {
        match in_degree {
            0 => 0,
            1..=2 => 1,
            3..=4 => 2,
            _ => 3,
        }
    }

    pub fn weights(&self) -> &[f64; 4] {
        &self.weights
    }
}

impl Default for DegreeBucketKernel {
    fn default() -> Self {
        let total: f64 = DEFAULT_DISTRIBUTION.iter().sum();
        Self {
            weights: DEFAULT_DISTRIBUTION.map(|w| w / total),
        }
    }
}

impl AttachmentKernel for DegreeBucketKernel {
    fn weight(&self, in_degree: usize) -> f64 {
        self.weights[Self::bucket(in_degree)]
    }
}

/// Check that a distribution can drive a [`DegreeBucketKernel`]
pub fn validate_distribution(distribution: &[f64]) -> GrowthResult<()> {
    if distribution.len() != 4 {
        return Err(GrowthError::InvalidParameter(format!(
            "probability distribution needs exactly 4 weights, got {}",
            distribution.len()
        )));
    }
    if let Some(bad) = distribution.iter().find(|w| !w.is_finite() || **w < 0.0) {
        return Err(GrowthError::InvalidParameter(format!(
            "probability weights must be finite and non-negative, got {}",
            bad
        )));
    }
    if distribution.iter().all(|w| *w == 0.0) {
        return Err(GrowthError::InvalidParameter(
            "probability distribution must not be all zero".to_string(),
        ));
    }
    if distribution.windows(2).any(|pair| pair[1] > pair[0]) {
        return Err(GrowthError::InvalidParameter(format!(
            "probability distribution must be non-increasing, got {:?}",
            distribution
        )));
    }
    Ok(())
}

/// Scale a distribution so its weights sum to 1
pub fn normalize_distribution(distribution: &[f64]) -> GrowthResult<Vec<f64>> {
    validate_distribution(distribution)?;
    let total: f64 = distribution.iter().sum();
    Ok(distribution.iter().map(|w| w / total).collect())
}
