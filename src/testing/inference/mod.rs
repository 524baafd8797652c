use crate::error::StatFailure;
use crate::testing::TestResult;

pub mod normality;

pub mod parametric;

pub mod nonparametric;

/// Tests run on a vector of paired differences `a - b`.
pub trait PairedStatTests {
    fn paired_t_test(&self, confidence_level: f64) -> Result<TestResult, StatFailure>;

    fn wilcoxon_signed_rank(&self) -> Result<TestResult, StatFailure>;

    fn shapiro_wilk(&self) -> Result<TestResult, StatFailure>;
}

impl PairedStatTests for [f64] {
    fn paired_t_test(&self, confidence_level: f64) -> Result<TestResult, StatFailure> {
        parametric::paired_t_test(self, confidence_level)
    }

    fn wilcoxon_signed_rank(&self) -> Result<TestResult, StatFailure> {
        nonparametric::wilcoxon_signed_rank(self)
    }

    fn shapiro_wilk(&self) -> Result<TestResult, StatFailure> {
        normality::shapiro_wilk(self)
    }
}
