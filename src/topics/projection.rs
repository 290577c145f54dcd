use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::vectorizer::SparseVector;

/// Seeded sparse random projection into a low-dimensional space.
///
/// Entries are `+s`, `-s` or zero with probabilities 1/6, 1/6 and 2/3,
/// where `s = sqrt(3 / n_components)`. The same seed always yields the same
/// matrix.
#[derive(Debug, Clone)]
pub struct RandomProjection {
    n_components: usize,
    /// One row of component weights per input feature
    weights: Vec<Vec<f64>>,
}

impl RandomProjection {
    pub fn new(n_features: usize, n_components: usize, seed: u64) -> Self {
        let n_components = n_components.max(1);
        let scale = (3.0 / n_components as f64).sqrt();
        let mut rng = StdRng::seed_from_u64(seed);

        let weights = (0..n_features)
            .map(|_| {
                (0..n_components)
                    .map(|_| match rng.gen_range(0..6) {
                        0 => scale,
                        1 => -scale,
                        _ => 0.0,
                    })
                    .collect()
            })
            .collect();

        Self {
            n_components,
            weights,
        }
    }

    pub fn n_components(&self) -> usize {
        self.n_components
    }

    pub fn transform(&self, vector: &SparseVector) -> Vec<f64> {
        let mut out = vec![0.0; self.n_components];
        for &(feature, value) in vector {
            for (o, w) in out.iter_mut().zip(&self.weights[feature]) {
                *o += value * w;
            }
        }
        out
    }
}
