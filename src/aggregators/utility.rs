/// Computes the arithmetic mean of a slice of values. Returns 0.0 for empty input.
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Deaths per 10,000 residents. `None` when the population is zero.
pub fn per_10000(deaths: f64, population: f64) -> Option<f64> {
    if population > 0.0 {
        Some(deaths / population * 10_000.0)
    } else {
        None
    }
}
