// 📊 Score Statistics
// Descriptive statistics over a list of satisfaction scores:
// count, min, max, arithmetic mean and sample standard deviation.

use thiserror::Error;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, Error)]
pub enum StatsError {
    #[error("mean requires at least one data point")]
    Empty,

    #[error("stdev requires at least two data points (got {count})")]
    TooFewSamples { count: usize },
}

// ============================================================================
// PRIMITIVES
// ============================================================================

pub fn min(scores: &[f64]) -> Result<f64, StatsError> {
    scores.iter().copied().reduce(f64::min).ok_or(StatsError::Empty)
}

pub fn max(scores: &[f64]) -> Result<f64, StatsError> {
    scores.iter().copied().reduce(f64::max).ok_or(StatsError::Empty)
}

/// Arithmetic mean (sum / count)
pub fn mean(scores: &[f64]) -> Result<f64, StatsError> {
    if scores.is_empty() {
        return Err(StatsError::Empty);
    }
    Ok(scores.iter().sum::<f64>() / scores.len() as f64)
}

/// Sample standard deviation (Bessel-corrected, divides by n - 1)
///
/// Two passes: mean first, then the squared deviations around it.
pub fn sample_std_dev(scores: &[f64]) -> Result<f64, StatsError> {
    if scores.len() < 2 {
        return Err(StatsError::TooFewSamples {
            count: scores.len(),
        });
    }

    let center = mean(scores)?;
    let squared: f64 = scores.iter().map(|x| (x - center).powi(2)).sum();
    Ok((squared / (scores.len() - 1) as f64).sqrt())
}

// ============================================================================
// SCORE SUMMARY
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoreSummary {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub std_dev: f64,
}

impl ScoreSummary {
    pub fn from_scores(scores: &[f64]) -> Result<Self, StatsError> {
        Ok(ScoreSummary {
            count: scores.len(),
            min: min(scores)?,
            max: max(scores)?,
            mean: mean(scores)?,
            std_dev: sample_std_dev(scores)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCORES: [f64; 5] = [4.8, 4.6, 4.9, 5.0, 4.7];

    #[test]
    fn test_reference_summary() {
        let summary = ScoreSummary::from_scores(&SCORES).unwrap();

        assert_eq!(summary.count, 5);
        assert_eq!(summary.min, 4.6);
        assert_eq!(summary.max, 5.0);
        assert!((summary.mean - 4.80).abs() < 0.005);
        assert!((summary.std_dev - 0.1581).abs() < 0.001);
    }

    #[test]
    fn test_std_dev_matches_bessel_formula() {
        // Deviations from 3.5 are all 0.5, so variance = 4 * 0.25 / 3
        let sd = sample_std_dev(&[3.0, 4.0, 3.0, 4.0]).unwrap();
        assert!((sd - (1.0f64 / 3.0).sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_std_dev_of_constant_scores_is_zero() {
        assert_eq!(sample_std_dev(&[4.5, 4.5, 4.5]).unwrap(), 0.0);
    }

    #[test]
    fn test_std_dev_single_value_fails() {
        let err = sample_std_dev(&[4.8]).unwrap_err();
        assert_eq!(err, StatsError::TooFewSamples { count: 1 });
        assert!(err.to_string().starts_with("stdev requires at least two data points"));

        assert!(ScoreSummary::from_scores(&[4.8]).is_err());
    }

    #[test]
    fn test_empty_scores_fail() {
        assert_eq!(min(&[]), Err(StatsError::Empty));
        assert_eq!(max(&[]), Err(StatsError::Empty));
        assert_eq!(mean(&[]), Err(StatsError::Empty));
        assert_eq!(
            sample_std_dev(&[]),
            Err(StatsError::TooFewSamples { count: 0 })
        );
    }

    #[test]
    fn test_min_max_ignore_order() {
        assert_eq!(min(&[5.0, 1.5, 3.0]), Ok(1.5));
        assert_eq!(max(&[5.0, 1.5, 3.0]), Ok(5.0));
    }
}
