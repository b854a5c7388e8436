use crate::backend::{Backend, Tensor2D};
use crate::policy::{Category, FeatureVector};
use serde::{Deserialize, Serialize};

/// A feature vector with its category. Immutable once generated.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledSample {
    pub features: FeatureVector,
    pub category: Category,
}

impl LabeledSample {
    pub fn new(features: FeatureVector, category: Category) -> Self {
        Self { features, category }
    }
}

/// Ordered sequence of labeled samples.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct LabeledDataset {
    samples: Vec<LabeledSample>,
}

impl LabeledDataset {
    pub fn new(samples: Vec<LabeledSample>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[LabeledSample] {
        &self.samples
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LabeledSample> {
        self.samples.iter()
    }

    /// `n × 3` feature matrix in sample order.
    pub fn features_matrix<B: Backend>(&self) -> Tensor2D<B> {
        let data = self
            .samples
            .iter()
            .flat_map(|s| s.features.to_array())
            .collect();
        Tensor2D::new(data, self.samples.len(), FeatureVector::LEN)
    }

    /// Category indices in sample order.
    pub fn labels(&self) -> Vec<usize> {
        self.samples.iter().map(|s| s.category.index()).collect()
    }

    /// Samples at `indices`, in the given order.
    pub fn subset(&self, indices: &[usize]) -> Self {
        Self::new(indices.iter().map(|&i| self.samples[i]).collect())
    }

    /// Number of samples per category, indexed by [`Category::index`].
    pub fn class_counts(&self) -> [usize; Category::COUNT] {
        let mut counts = [0; Category::COUNT];
        for s in &self.samples {
            counts[s.category.index()] += 1;
        }
        counts
    }
}

impl FromIterator<LabeledSample> for LabeledDataset {
    fn from_iter<I: IntoIterator<Item = LabeledSample>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a LabeledDataset {
    type Item = &'a LabeledSample;
    type IntoIter = std::slice::Iter<'a, LabeledSample>;

    fn into_iter(self) -> Self::IntoIter {
        self.samples.iter()
    }
}
