use serde::{Deserialize, Serialize};

/// Three null-padded value arrays sharing one label axis.
///
/// All four vectors always have the same length. For any index at most one
/// of `historical`, `today` and `predicted` holds a value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AlignedSeries {
    pub labels: Vec<String>,
    pub historical: Vec<Option<f64>>,
    pub today: Vec<Option<f64>>,
    pub predicted: Vec<Option<f64>>,
    pub today_index: Option<usize>,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// True when labels are strictly ascending, i.e. unique and in order.
    pub fn is_chronological(&self) -> bool {
        self.labels.windows(2).all(|w| w[0] < w[1])
    }
}
