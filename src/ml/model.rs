// ============================================================
// Layer 5 — Recommender Network
// ============================================================
//   user ─▶ Embedding ─┐
//                      ├─ concat ─▶ [Linear ─▶ ReLU ─▶ Dropout]* ─▶ Linear(1)
//   item ─▶ Embedding ─┘

use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Dropout, DropoutConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

/// Serialized next to the weights so serving can rebuild the same shape.
#[derive(Config, Debug)]
pub struct RecommenderNetConfig {
    pub num_users:     usize,
    pub num_items:     usize,
    pub embedding_dim: usize,
    pub dense_units:   Vec<usize>,
    #[config(default = 0.2)]
    pub dropout:       f64,
}

impl RecommenderNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RecommenderNet<B> {
        let user_embedding = EmbeddingConfig::new(self.num_users, self.embedding_dim).init(device);
        let item_embedding = EmbeddingConfig::new(self.num_items, self.embedding_dim).init(device);

        // Concatenated user+item vector feeds the first hidden layer.
        let mut width  = 2 * self.embedding_dim;
        let mut hidden = Vec::with_capacity(self.dense_units.len());
        for &units in &self.dense_units {
            hidden.push(LinearConfig::new(width, units).init(device));
            width = units;
        }

        let output  = LinearConfig::new(width, 1).init(device);
        let dropout = DropoutConfig::new(self.dropout).init();
        RecommenderNet { user_embedding, item_embedding, hidden, dropout, output }
    }
}

#[derive(Module, Debug)]
pub struct RecommenderNet<B: Backend> {
    pub user_embedding: Embedding<B>,
    pub item_embedding: Embedding<B>,
    pub hidden:         Vec<Linear<B>>,
    pub dropout:        Dropout,
    pub output:         Linear<B>,
}

impl<B: Backend> RecommenderNet<B> {
    /// users, items: [batch] → predicted ratings: [batch]
    pub fn forward(&self, users: Tensor<B, 1, Int>, items: Tensor<B, 1, Int>) -> Tensor<B, 1> {
        let [batch_size] = users.dims();

        // Embedding expects [batch, seq]; each pair is a sequence of one.
        let user_vec = self.user_embedding
            .forward(users.unsqueeze_dim::<2>(1))
            .reshape([batch_size, self.embedding_dim()]);
        let item_vec = self.item_embedding
            .forward(items.unsqueeze_dim::<2>(1))
            .reshape([batch_size, self.embedding_dim()]);

        let mut x = Tensor::cat(vec![user_vec, item_vec], 1);
        for layer in &self.hidden {
            x = self.dropout.forward(relu(layer.forward(x)));
        }

        // Linear head: ratings are an unbounded regression target.
        self.output.forward(x).reshape([batch_size])
    }

    /// Mean squared error over the batch, plus the predictions.
    pub fn forward_loss(
        &self,
        users:   Tensor<B, 1, Int>,
        items:   Tensor<B, 1, Int>,
        ratings: Tensor<B, 1>,
    ) -> (Tensor<B, 1>, Tensor<B, 1>) {
        let predictions = self.forward(users, items);
        let loss = MseLoss::new().forward(predictions.clone(), ratings, Reduction::Mean);
        (loss, predictions)
    }

    pub fn embedding_dim(&self) -> usize {
        let [_, dim] = self.user_embedding.weight.dims();
        dim
    }

    pub fn num_users(&self) -> usize {
        self.user_embedding.weight.dims()[0]
    }

    pub fn num_items(&self) -> usize {
        self.item_embedding.weight.dims()[0]
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn small_model(dense_units: Vec<usize>) -> RecommenderNet<TestBackend> {
        let device = Default::default();
        RecommenderNetConfig::new(6, 4, 8, dense_units).init::<TestBackend>(&device)
    }

    #[test]
    fn test_forward_shape_is_one_per_pair() {
        let device = Default::default();
        let model  = small_model(vec![16, 8]);
        let users  = Tensor::<TestBackend, 1, Int>::from_ints([0, 5, 2], &device);
        let items  = Tensor::<TestBackend, 1, Int>::from_ints([3, 0, 1], &device);

        let out = model.forward(users, items);
        assert_eq!(out.dims(), [3]);

        let values = out.into_data().to_vec::<f32>().unwrap();
        assert!(values.iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_layer_widths_follow_config() {
        let model = small_model(vec![16, 8]);
        assert_eq!(model.hidden.len(), 2);
        assert_eq!(model.hidden[0].weight.dims(), [16, 16]); // [2*dim, 16]
        assert_eq!(model.hidden[1].weight.dims(), [16, 8]);
        assert_eq!(model.output.weight.dims(),    [8, 1]);
        assert_eq!(model.num_users(), 6);
        assert_eq!(model.num_items(), 4);
        assert_eq!(model.embedding_dim(), 8);
    }

    #[test]
    fn test_no_hidden_layers_goes_straight_to_output() {
        let model = small_model(Vec::new());
        assert!(model.hidden.is_empty());
        assert_eq!(model.output.weight.dims(), [16, 1]);
    }

    #[test]
    fn test_loss_is_zero_for_perfect_predictions() {
        let device      = Default::default();
        let model       = small_model(vec![4]);
        let users       = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device);
        let items       = Tensor::<TestBackend, 1, Int>::from_ints([0, 1], &device);
        let predictions = model.forward(users.clone(), items.clone());

        let (loss, _) = model.forward_loss(users, items, predictions);
        let loss: f32 = loss.into_scalar().elem();
        assert!(loss.abs() < 1e-6);
    }
}
