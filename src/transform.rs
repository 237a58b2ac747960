// Transform — access-time image and label hooks
//
// Transforms run when a sample is retrieved, not when the dataset is built,
// so one in-memory dataset can serve differently-augmented epochs.

use image::imageops::{self, FilterType};
use image::RgbImage;

/// A transform applied to the image of a sample at access time.
pub trait Transform: Send + Sync {
    /// Apply the transform, returning the modified image.
    fn apply(&self, image: RgbImage) -> RgbImage;
}

/// Plain closures are transforms.
impl<F> Transform for F
where
    F: Fn(RgbImage) -> RgbImage + Send + Sync,
{
    fn apply(&self, image: RgbImage) -> RgbImage {
        self(image)
    }
}

/// A transform applied to the integer label of a sample at access time.
pub trait LabelTransform: Send + Sync {
    fn apply(&self, label: usize) -> usize;
}

impl<F> LabelTransform for F
where
    F: Fn(usize) -> usize + Send + Sync,
{
    fn apply(&self, label: usize) -> usize {
        self(label)
    }
}

// Built-in transforms

/// Chain multiple transforms, applied in order.
pub struct Compose {
    transforms: Vec<Box<dyn Transform>>,
}

impl Compose {
    pub fn new(transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { transforms }
    }
}

impl Transform for Compose {
    fn apply(&self, mut image: RgbImage) -> RgbImage {
        for t in &self.transforms {
            image = t.apply(image);
        }
        image
    }
}

/// Resize every image to a fixed (width, height) with a Lanczos3 filter.
#[derive(Debug, Clone)]
pub struct Resize {
    width: u32,
    height: u32,
}

impl Resize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Transform for Resize {
    fn apply(&self, image: RgbImage) -> RgbImage {
        imageops::resize(&image, self.width, self.height, FilterType::Lanczos3)
    }
}

// Tests
