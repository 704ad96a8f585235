use burn::{
    nn::{
        BatchNorm, BatchNormConfig,
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::tanh,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.

// ─── Row encoder ──────────────────────────────────────────────────────────────
/// Per-value encoder: maps a row identifier to a dense vector as wide
/// as the table.
#[derive(Config, Debug)]
pub struct RowEncoderConfig {
    pub rows:    usize,
    pub columns: usize,
    pub hidden:  usize,
}

impl RowEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> RowEncoder<B> {
        RowEncoder {
            embedding:  EmbeddingConfig::new(self.rows, self.columns).init(device),
            linear1:    LinearConfig::new(self.columns, self.hidden).with_bias(false).init(device),
            batchnorm1: BatchNormConfig::new(self.hidden).init(device),
            linear2:    LinearConfig::new(self.hidden, self.hidden).init(device),
            batchnorm2: BatchNormConfig::new(self.hidden).init(device),
            linear3:    LinearConfig::new(self.hidden, self.columns).init(device),
            batchnorm3: BatchNormConfig::new(self.columns).init(device),
        }
    }

    /// Number of learnable scalars the encoder will hold
    pub fn param_count(&self) -> usize {
        self.rows * self.columns
            + self.columns * self.hidden
            + self.hidden * self.hidden + self.hidden
            + self.hidden * self.columns + self.columns
            + 2 * (2 * self.hidden + self.columns)
    }
}

#[derive(Module, Debug)]
pub struct RowEncoder<B: Backend> {
    pub embedding:  Embedding<B>,
    pub linear1:    Linear<B>,
    pub batchnorm1: BatchNorm<B, 0>,
    pub linear2:    Linear<B>,
    pub batchnorm2: BatchNorm<B, 0>,
    pub linear3:    Linear<B>,
    pub batchnorm3: BatchNorm<B, 0>,
}

impl<B: Backend> RowEncoder<B> {
    /// rows: [batch, 1] → [batch, columns]
    pub fn forward(&self, rows: Tensor<B, 2, Int>) -> Tensor<B, 2> {
        let [batch, _] = rows.dims();

        // [batch, 1, columns] → [batch, columns]
        let x = self.embedding.forward(rows);
        let [_, _, columns] = x.dims();
        let x = x.reshape([batch, columns]);

        // input layer
        let x = tanh(self.batchnorm1.forward(self.linear1.forward(x)));

        // hidden layer
        let x = tanh(self.batchnorm2.forward(self.linear2.forward(x)));

        // output layer, no activation
        self.batchnorm3.forward(self.linear3.forward(x))
    }
}

// ─── Numeric encoder ──────────────────────────────────────────────────────────
/// Per-column-type encoder: maps one scalar to every column of a kind.
#[derive(Config, Debug)]
pub struct NumericEncoderConfig {
    pub columns: usize,
    #[config(default = 10)]
    pub hidden:  usize,
}

impl NumericEncoderConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> NumericEncoder<B> {
        NumericEncoder {
            linear1:    LinearConfig::new(1, self.hidden).with_bias(false).init(device),
            batchnorm1: BatchNormConfig::new(self.hidden).init(device),
            linear2:    LinearConfig::new(self.hidden, self.hidden).with_bias(false).init(device),
            batchnorm2: BatchNormConfig::new(self.hidden).init(device),
            linear3:    LinearConfig::new(self.hidden, self.columns).with_bias(false).init(device),
            batchnorm3: BatchNormConfig::new(self.columns).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct NumericEncoder<B: Backend> {
    pub linear1:    Linear<B>,
    pub batchnorm1: BatchNorm<B, 0>,
    pub linear2:    Linear<B>,
    pub batchnorm2: BatchNorm<B, 0>,
    pub linear3:    Linear<B>,
    pub batchnorm3: BatchNorm<B, 0>,
}

impl<B: Backend> NumericEncoder<B> {
    /// x: [batch, 1] → [batch, columns]
    pub fn forward(&self, x: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = tanh(self.batchnorm1.forward(self.linear1.forward(x)));
        let x = tanh(self.batchnorm2.forward(self.linear2.forward(x)));
        self.batchnorm3.forward(self.linear3.forward(x))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn rows(ids: &[i64]) -> Tensor<TestBackend, 2, Int> {
        Tensor::from_data(TensorData::new(ids.to_vec(), [ids.len(), 1]), &Default::default())
    }

    fn to_vec(t: Tensor<TestBackend, 2>) -> Vec<f32> {
        t.into_data().convert::<f32>().to_vec::<f32>().unwrap()
    }

    #[test]
    fn test_row_encoder_output_width() {
        let device = Default::default();
        let model: RowEncoder<TestBackend> = RowEncoderConfig::new(4, 3, 12).init(&device);
        assert_eq!(model.forward(rows(&[0, 1, 3])).dims(), [3, 3]);
    }

    #[test]
    fn test_row_encoder_is_deterministic_in_inference() {
        let device = Default::default();
        let model: RowEncoder<TestBackend> = RowEncoderConfig::new(5, 2, 10).init(&device);

        let first  = to_vec(model.forward(rows(&[3])));
        let second = to_vec(model.forward(rows(&[3])));
        assert_eq!(first, second);

        // Same row inside a different batch gives the same vector
        let batched = to_vec(model.forward(rows(&[0, 3, 4])));
        for (a, b) in batched[2..4].iter().zip(&first) {
            assert!((a - b).abs() < 1e-5);
        }
    }

    #[test]
    fn test_numeric_encoder_width_independent_of_batch() {
        let device = Default::default();
        let model: NumericEncoder<TestBackend> = NumericEncoderConfig::new(4).init(&device);

        for batch in [1usize, 3, 7] {
            let x = Tensor::<TestBackend, 2>::zeros([batch, 1], &device);
            assert_eq!(model.forward(x).dims(), [batch, 4]);
        }
    }

    #[test]
    fn test_numeric_encoder_default_hidden() {
        let cfg = NumericEncoderConfig::new(2);
        assert_eq!(cfg.hidden, 10);
    }

    #[test]
    fn test_row_encoder_param_count() {
        // 2*3 + 3*6 + (36+6) + (18+3) + 2*(12+3)
        assert_eq!(RowEncoderConfig::new(2, 3, 6).param_count(), 6 + 18 + 42 + 21 + 30);
    }
}
