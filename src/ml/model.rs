use burn::{
    nn::{
        loss::{MseLoss, Reduction},
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::relu,
};

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize
// internally; do NOT add them again or you get conflicting impls.
#[derive(Config, Debug)]
pub struct DiamondPricePredictorConfig {
    pub input_dim: usize,
    #[config(default = 64)]
    pub hidden_dim: usize,
    #[config(default = 32)]
    pub hidden_dim2: usize,
}

impl DiamondPricePredictorConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DiamondPricePredictor<B> {
        DiamondPricePredictor {
            fc1:    LinearConfig::new(self.input_dim, self.hidden_dim).init(device),
            fc2:    LinearConfig::new(self.hidden_dim, self.hidden_dim2).init(device),
            output: LinearConfig::new(self.hidden_dim2, 1).init(device),
        }
    }
}

/// input → 64 → ReLU → 32 → ReLU → 1
#[derive(Module, Debug)]
pub struct DiamondPricePredictor<B: Backend> {
    pub fc1:    Linear<B>,
    pub fc2:    Linear<B>,
    pub output: Linear<B>,
}

impl<B: Backend> DiamondPricePredictor<B> {
    /// features: [batch, input_dim] → predicted price: [batch, 1]
    pub fn forward(&self, features: Tensor<B, 2>) -> Tensor<B, 2> {
        let x = relu(self.fc1.forward(features));
        let x = relu(self.fc2.forward(x));
        self.output.forward(x)
    }

    /// Mean squared error between predictions and `targets` ([batch, 1]).
    pub fn forward_loss(
        &self,
        features: Tensor<B, 2>,
        targets:  Tensor<B, 2>,
    ) -> (Tensor<B, 1>, Tensor<B, 2>) {
        let output = self.forward(features);
        let loss   = MseLoss::new().forward(output.clone(), targets, Reduction::Mean);
        (loss, output)
    }
}
