use anyhow::{Context, Result};

use super::{ComparisonFamily, PairwiseOptions, compare};
use crate::data::InputTable;
use crate::testing::CorrectionMethod;
use crate::testing::correction::adjust_with_missing;

/// All `(i, j)` with `i < j`, in lexicographic order.
pub fn canonical_pairs(k: usize) -> Vec<(usize, usize)> {
    (0..k)
        .flat_map(|i| ((i + 1)..k).map(move |j| (i, j)))
        .collect()
}

/// Compare every unordered pair of algorithms in the table.
///
/// Row order follows the table's canonical column order, so it does not
/// depend on how the columns were laid out in the source file.
pub fn build_family(table: &InputTable, options: &PairwiseOptions) -> ComparisonFamily {
    let series = table.all_series();
    let records = canonical_pairs(series.len())
        .into_iter()
        .map(|(i, j)| compare(&series[i], &series[j], options))
        .collect();

    ComparisonFamily {
        trace: table.trace.clone(),
        records,
        corrected: false,
    }
}

/// Fill in Bonferroni, Holm and Benjamini-Hochberg adjusted p-values.
///
/// The whole family is adjusted together; missing raw p-values stay missing
/// in every adjustment.
pub fn correct_family(mut family: ComparisonFamily) -> Result<ComparisonFamily> {
    let raw = family.raw_p_values();

    for method in CorrectionMethod::ALL {
        let adjusted = adjust_with_missing(&raw, method).with_context(|| {
            format!(
                "{} adjustment failed for trace {}",
                method.short_name(),
                family.trace
            )
        })?;
        for (record, value) in family.records.iter_mut().zip(adjusted) {
            record.set_adjusted(method, value);
        }
    }

    family.corrected = true;
    Ok(family)
}
