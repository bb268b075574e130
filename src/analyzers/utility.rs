/// Computes the arithmetic mean of a slice of values. Returns `None` for empty input.
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Running sum/count pair for one hour slot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Accumulator {
    sum: f64,
    count: usize,
}

impl Accumulator {
    pub fn push(&mut self, value: f64) {
        self.sum += value;
        self.count += 1;
    }

    pub fn count(&self) -> usize {
        self.count
    }

    pub fn mean(&self) -> Option<f64> {
        (self.count > 0).then(|| self.sum / self.count as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[3.0, 5.0, 4.0]), Some(4.0));
    }

    #[test]
    fn test_accumulator() {
        let mut acc = Accumulator::default();
        assert_eq!(acc.mean(), None);

        acc.push(4.0);
        acc.push(6.0);
        assert_eq!(acc.count(), 2);
        assert_eq!(acc.mean(), Some(5.0));
    }
}
