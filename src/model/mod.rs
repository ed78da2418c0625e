mod blocks;
mod predictor;
mod unet;

pub use blocks::{
    ConvBlock, ConvBlockConfig, DecoderBlock, DecoderBlockConfig, EncoderBlock, EncoderBlockConfig,
};
pub use predictor::{SegmentationModel, UNetSegmenter};
pub use unet::{UNet, UNetConfig};
