use anyhow::Context;
use image::imageops::{self, FilterType};
use image::{ImageReader, RgbImage};
use std::path::Path;

use crate::config::TARGET_SIZE;

/// ImageNet channel means in BGR order, subtracted by ResNet50 "caffe" preprocessing
pub const BGR_MEANS: [f32; 3] = [103.939, 116.779, 123.68];

/// A single preprocessed image, batch of one, NHWC layout, BGR channels
#[derive(Debug, Clone)]
pub struct ImageTensor {
    data: Vec<f32>,
}

impl ImageTensor {
    pub const CHANNELS: usize = 3;

    pub fn shape(&self) -> [usize; 4] {
        let side = TARGET_SIZE as usize;
        [1, side, side, Self::CHANNELS]
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Value at row `y`, column `x`, channel `c` (0 = B, 1 = G, 2 = R)
    pub fn get(&self, y: usize, x: usize, c: usize) -> f32 {
        let side = TARGET_SIZE as usize;
        self.data[(y * side + x) * Self::CHANNELS + c]
    }
}

/// Decode an image file and resize it to the model's input size
pub fn load_resized(path: &Path) -> anyhow::Result<RgbImage> {
    let img = ImageReader::open(path)
        .with_context(|| format!("Failed to open image {}", path.display()))?
        .with_guessed_format()
        .with_context(|| format!("Failed to read image {}", path.display()))?
        .decode()
        .map_err(|e| anyhow::anyhow!("Failed to decode image {}: {}", path.display(), e))?;

    // Nearest-neighbour matches the loader the model was trained with
    Ok(imageops::resize(&img.to_rgb8(), TARGET_SIZE, TARGET_SIZE, FilterType::Nearest))
}

/// Convert a resized RGB image into a normalized tensor
pub fn to_tensor(img: &RgbImage) -> ImageTensor {
    debug_assert_eq!(img.dimensions(), (TARGET_SIZE, TARGET_SIZE));

    let mut data = Vec::with_capacity(img.as_raw().len());
    for pixel in img.pixels() {
        let [r, g, b] = pixel.0;
        data.push(b as f32 - BGR_MEANS[0]);
        data.push(g as f32 - BGR_MEANS[1]);
        data.push(r as f32 - BGR_MEANS[2]);
    }

    ImageTensor { data }
}

/// Load, resize and normalize one image file
pub fn load_and_preprocess(path: &Path) -> anyhow::Result<ImageTensor> {
    let resized = load_resized(path)?;
    Ok(to_tensor(&resized))
}
