// ============================================================
// Layer 4 — Rating Batcher
// ============================================================
// Implements Burn's Batcher trait to turn a Vec<RatingSample>
// into three aligned 1-D tensors of length batch_size:
//
//   users   [batch]  Int    dense user indices
//   items   [batch]  Int    dense item indices
//   ratings [batch]  Float  target ratings
//
// Reference: Burn Book §4 (Batcher)

use burn::{
    data::dataloader::batcher::Batcher,
    prelude::*,
};

use crate::data::dataset::RatingSample;

/// A batch of rating samples ready for the model forward pass.
#[derive(Debug, Clone)]
pub struct RatingBatch<B: Backend> {
    pub users:   Tensor<B, 1, Int>,
    pub items:   Tensor<B, 1, Int>,
    pub ratings: Tensor<B, 1>,
}

#[derive(Clone, Debug)]
pub struct RatingBatcher<B: Backend> {
    pub device: B::Device,
}

impl<B: Backend> RatingBatcher<B> {
    pub fn new(device: B::Device) -> Self {
        Self { device }
    }
}

impl<B: Backend> Batcher<RatingSample, RatingBatch<B>> for RatingBatcher<B> {
    fn batch(&self, items: Vec<RatingSample>) -> RatingBatch<B> {
        let users: Vec<i32>   = items.iter().map(|s| s.user as i32).collect();
        let movies: Vec<i32>  = items.iter().map(|s| s.item as i32).collect();
        let ratings: Vec<f32> = items.iter().map(|s| s.rating).collect();

        RatingBatch {
            users:   Tensor::<B, 1, Int>::from_ints(users.as_slice(), &self.device),
            items:   Tensor::<B, 1, Int>::from_ints(movies.as_slice(), &self.device),
            ratings: Tensor::<B, 1>::from_floats(ratings.as_slice(), &self.device),
        }
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    #[test]
    fn test_batch_shapes_and_values() {
        let device  = Default::default();
        let batcher = RatingBatcher::<NdArray>::new(device);
        let batch   = batcher.batch(vec![
            RatingSample { user: 0, item: 3, rating: 4.5 },
            RatingSample { user: 2, item: 1, rating: 1.0 },
            RatingSample { user: 1, item: 0, rating: 3.0 },
        ]);

        assert_eq!(batch.users.dims(),   [3]);
        assert_eq!(batch.items.dims(),   [3]);
        assert_eq!(batch.ratings.dims(), [3]);

        let ratings = batch.ratings.into_data().to_vec::<f32>().unwrap();
        assert_eq!(ratings, vec![4.5, 1.0, 3.0]);
    }
}
