/// Descriptive statistics summarizing a dataset of `f32` values.
///
/// Used for generation summaries: fitness spread, weight dispersion.
#[derive(Debug, Clone)]
pub struct DescriptiveStats {
    pub min: f32,
    pub max: f32,
    pub mean: f32,
    pub median: f32,
    pub std_dev: f32,
}

impl DescriptiveStats {
    /// Computes statistics from unsorted values. Returns `None` for an
    /// empty dataset.
    #[must_use]
    pub fn new<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f32>,
    {
        let mut values = values.into_iter().collect::<Vec<_>>();
        values.sort_by(f32::total_cmp);
        Self::from_sorted(&values)
    }

    /// Computes statistics from values sorted in ascending order.
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn from_sorted(sorted_values: &[f32]) -> Option<Self> {
        debug_assert!(sorted_values.is_sorted_by(|a, b| a <= b));

        let min = *sorted_values.first()?;
        let max = *sorted_values.last()?;
        let n = sorted_values.len() as f32;
        let mean = sorted_values.iter().copied().sum::<f32>() / n;
        let median = sorted_values[sorted_values.len() / 2];
        let variance = sorted_values
            .iter()
            .map(|v| (v - mean).powi(2))
            .sum::<f32>()
            / n;

        Some(Self {
            min,
            max,
            mean,
            median,
            std_dev: variance.sqrt(),
        })
    }
}
