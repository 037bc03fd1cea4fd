//! Unicode sparkline for an hourly series with gaps

/// Block characters for different values (8 levels)
const BLOCKS: [char; 8] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇', '█'];

/// Drawn for a missing value
const GAP: char = ' ';

/// A one-line sparkline over optional values
pub struct Sparkline<'a> {
    /// Values for each hour; `None` is drawn as a gap
    values: &'a [Option<f64>],
    /// Lower bound for normalization
    min: f64,
    /// Upper bound for normalization
    max: f64,
}

impl<'a> Sparkline<'a> {
    /// Sparkline scaled to the range of its own values
    pub fn new(values: &'a [Option<f64>]) -> Self {
        let (min, max) = value_range(values.iter().flatten().copied()).unwrap_or((0.0, 0.0));
        Self { values, min, max }
    }

    /// Use a shared range, so two sparklines can be compared by eye
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.min = min;
        self.max = max;
        self
    }

    fn value_to_block(&self, value: f64) -> char {
        let span = self.max - self.min;
        if span <= f64::EPSILON {
            return BLOCKS[3];
        }
        let normalized = ((value - self.min) / span).clamp(0.0, 1.0);
        let index = ((normalized * 7.0).round() as usize).min(7);
        BLOCKS[index]
    }

    pub fn render(&self) -> String {
        self.values
            .iter()
            .map(|value| match value {
                Some(v) => self.value_to_block(*v),
                None => GAP,
            })
            .collect()
    }
}

/// Smallest and largest of the finite values
pub fn value_range(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |range, v| match range {
            None => Some((v, v)),
            Some((min, max)) => Some((f64::min(min, v), f64::max(max, v))),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_to_block_minimum() {
        let sparkline = Sparkline::new(&[]).with_range(0.0, 4.8);
        assert_eq!(sparkline.value_to_block(0.0), '▁');
    }

    #[test]
    fn test_value_to_block_maximum() {
        let sparkline = Sparkline::new(&[]).with_range(0.0, 4.8);
        assert_eq!(sparkline.value_to_block(4.8), '█');
    }

    #[test]
    fn test_value_to_block_out_of_range_clamps() {
        let sparkline = Sparkline::new(&[]).with_range(10.0, 20.0);
        assert_eq!(sparkline.value_to_block(35.0), '█');
        assert_eq!(sparkline.value_to_block(-1.0), '▁');
    }

    #[test]
    fn test_flat_series_uses_middle_block() {
        let values = [Some(12.0), Some(12.0)];
        assert_eq!(Sparkline::new(&values).render(), "▄▄");
    }

    #[test]
    fn test_render_draws_gaps() {
        let values = [Some(10.0), None, Some(20.0), Some(15.0)];
        let line = Sparkline::new(&values).render();

        assert_eq!(line.chars().count(), 4);
        assert_eq!(line.chars().next(), Some('▁'));
        assert_eq!(line.chars().nth(1), Some(' '));
        assert_eq!(line.chars().nth(2), Some('█'));
    }

    #[test]
    fn test_value_range() {
        assert_eq!(value_range([3.0, -1.0, 7.5]), Some((-1.0, 7.5)));
        assert_eq!(value_range([f64::NAN]), None);
        assert_eq!(value_range(Vec::new()), None);
    }
}
