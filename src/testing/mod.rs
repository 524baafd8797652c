use std::collections::HashMap;

pub mod correction;
pub mod effect;
pub mod inference;

pub mod utils;

pub use correction::CorrectionMethod;

/// Outcome of one hypothesis test on a set of paired differences.
#[derive(Debug, Clone, PartialEq)]
pub struct TestResult {
    /// The test statistic value (e.g., t-statistic, signed-rank statistic, W)
    pub statistic: f64,
    /// The p-value of the test
    pub p_value: f64,
    /// Confidence interval for the mean difference (if available)
    pub confidence_interval: Option<(f64, f64)>,
    /// Degrees of freedom (for parametric inference)
    pub degrees_of_freedom: Option<f64>,
    /// Standard error of the test statistic's numerator
    pub standard_error: Option<f64>,
    /// Additional test-specific information
    pub metadata: HashMap<String, f64>,
}

impl TestResult {
    /// Create a new test result with minimal information
    pub fn new(statistic: f64, p_value: f64) -> Self {
        TestResult {
            statistic,
            p_value,
            confidence_interval: None,
            degrees_of_freedom: None,
            standard_error: None,
            metadata: HashMap::new(),
        }
    }

    /// Add confidence interval to the result
    pub fn with_confidence_interval(mut self, lower: f64, upper: f64) -> Self {
        self.confidence_interval = Some((lower, upper));
        self
    }

    /// Add degrees of freedom to the result
    pub fn with_degrees_of_freedom(mut self, df: f64) -> Self {
        self.degrees_of_freedom = Some(df);
        self
    }

    /// Add standard error to the result
    pub fn with_standard_error(mut self, se: f64) -> Self {
        self.standard_error = Some(se);
        self
    }

    /// Add additional metadata
    pub fn with_metadata(mut self, key: &str, value: f64) -> Self {
        self.metadata.insert(key.to_string(), value);
        self
    }

    /// Check if the result is statistically significant at the given threshold
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value < alpha
    }
}
