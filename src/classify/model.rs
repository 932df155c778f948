use rten::Model;
use rten_tensor::prelude::*;
use rten_tensor::{NdTensor, Tensor};
use std::path::Path;

use super::preprocessing::ImageTensor;

/// Anything that maps a preprocessed image to an anomaly probability
pub trait Scorer {
    /// Single forward pass. Must return a finite value in [0, 1].
    fn score(&self, input: &ImageTensor) -> anyhow::Result<f32>;
}

/// Reject values a sigmoid head cannot produce
pub fn check_probability(value: f32) -> anyhow::Result<f32> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        anyhow::bail!("Model output {} is not a probability", value)
    }
}

/// Pretrained binary classifier loaded from a serialized rten/ONNX model
pub struct RtenScorer {
    model: Model,
}

impl RtenScorer {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            anyhow::bail!("Model not found at {}", path.display());
        }

        let model = Model::load_file(path)
            .map_err(|e| anyhow::anyhow!("Failed to load model {}: {}", path.display(), e))?;

        tracing::info!(
            inputs = model.input_ids().len(),
            outputs = model.output_ids().len(),
            "Loaded model from {}",
            path.display()
        );

        Ok(Self { model })
    }
}

impl Scorer for RtenScorer {
    fn score(&self, input: &ImageTensor) -> anyhow::Result<f32> {
        let tensor = input_tensor(input);

        let output = self
            .model
            .run_one(tensor.view().into(), None)
            .map_err(|e| anyhow::anyhow!("Inference failed: {}", e))?;

        let output: Tensor<f32> = output
            .try_into()
            .map_err(|e| anyhow::anyhow!("Unexpected model output: {}", e))?;

        first_probability(output.iter().copied())
    }
}

/// NHWC `[1, 224, 224, 3]` model input
pub fn input_tensor(input: &ImageTensor) -> NdTensor<f32, 4> {
    NdTensor::from_data(input.shape(), input.as_slice().to_vec())
}

/// Sigmoid head: first element of the `[1, 1]` output
pub fn first_probability(mut values: impl Iterator<Item = f32>) -> anyhow::Result<f32> {
    let value = values
        .next()
        .ok_or_else(|| anyhow::anyhow!("Model produced an empty output"))?;
    check_probability(value)
}
