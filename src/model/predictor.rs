use std::path::{Path, PathBuf};

use burn::{
    prelude::*,
    record::{CompactRecorder, FileRecorder},
};
use tracing::{error, info};

use super::{UNet, UNetConfig};
use crate::{
    error::{EvalError, Result},
    imaging::{NormalizedImage, ProbabilityMap},
};

/// Anything that maps a normalized RGB image to a foreground probability map of
/// the same size.
pub trait SegmentationModel {
    fn predict(&self, image: &NormalizedImage) -> Result<ProbabilityMap>;
}

/// A U-Net record loaded onto a burn device.
#[derive(Debug)]
pub struct UNetSegmenter<B: Backend> {
    model: UNet<B>,
    input_size: [usize; 2],
    device: B::Device,
}

impl<B: Backend> UNetSegmenter<B> {
    pub fn new(model: UNet<B>, input_size: [usize; 2], device: B::Device) -> Self {
        Self {
            model,
            input_size,
            device,
        }
    }

    /// Deserialize the network described by `config` from a `CompactRecorder` file.
    ///
    /// The recorder always reads `<path>.mpk`, whatever extension `path` carries.
    pub fn load<P: AsRef<Path>>(config: &UNetConfig, path: P, device: &B::Device) -> Result<Self> {
        let path = record_path::<B>(path.as_ref());
        let path = path.as_path();

        if !path.is_file() {
            error!(
                "Model file not found at {}. Train and save the model first, or copy the record there.",
                path.display()
            );
            return Err(EvalError::ModelNotFound {
                path: path.to_path_buf(),
            });
        }

        let model = config
            .init::<B>(device)
            .load_file(path.to_path_buf(), &CompactRecorder::new(), device)
            .map_err(|err| EvalError::ModelLoad {
                path: path.to_path_buf(),
                reason: format!("{err:?}"),
            })?;

        info!("Successfully loaded model from {}", path.display());

        Ok(Self::new(model, config.input_size, device.clone()))
    }

    pub fn input_size(&self) -> [usize; 2] {
        self.input_size
    }
}

/// The file a `CompactRecorder` opens for `path`.
fn record_path<B: Backend>(path: &Path) -> PathBuf {
    let extension = <CompactRecorder as FileRecorder<B>>::file_extension();
    path.with_extension(extension)
}

impl<B: Backend> SegmentationModel for UNetSegmenter<B> {
    fn predict(&self, image: &NormalizedImage) -> Result<ProbabilityMap> {
        let [height, width] = self.input_size;
        if (image.height(), image.width()) != (height, width) {
            return Err(EvalError::ShapeMismatch {
                expected: format!("{height}x{width}"),
                actual: format!("{}x{}", image.height(), image.width()),
            });
        }

        let input = Tensor::<B, 4>::from_data(
            TensorData::new(image.to_chw(), Shape::new([1, 3, height, width]))
                .convert::<B::FloatElem>(),
            &self.device,
        );

        let output = self.model.forward(input);

        // with a softmax head, channel 1 is the foreground class
        let channel = if self.model.num_classes() == 1 { 0 } else { 1 };
        let foreground = output.slice([0..1, channel..channel + 1, 0..height, 0..width]);

        let values = foreground
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .map_err(|err| EvalError::TensorData(format!("{err:?}")))?;

        ProbabilityMap::new(width, height, values)
    }
}
