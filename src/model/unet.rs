use burn::{
    nn::conv::{Conv2d, Conv2dConfig},
    prelude::*,
    tensor::activation::{sigmoid, softmax},
};

use super::blocks::{
    ConvBlock, ConvBlockConfig, DecoderBlock, DecoderBlockConfig, EncoderBlock, EncoderBlockConfig,
};

/// Four-level U-Net producing per-pixel class probabilities.
///
/// With a single class the output is a sigmoid probability map of shape
/// `[batch, 1, height, width]`; with more classes it is a softmax over channels.
#[derive(Module, Debug)]
pub struct UNet<B: Backend> {
    encoder_block_1: EncoderBlock<B>,
    encoder_block_2: EncoderBlock<B>,
    encoder_block_3: EncoderBlock<B>,
    encoder_block_4: EncoderBlock<B>,
    bottleneck: ConvBlock<B>,
    decoder_block_1: DecoderBlock<B>,
    decoder_block_2: DecoderBlock<B>,
    decoder_block_3: DecoderBlock<B>,
    decoder_block_4: DecoderBlock<B>,
    conv_1x1: Conv2d<B>,
    num_classes: usize,
}

#[derive(Config, Debug)]
pub struct UNetConfig {
    /// `[height, width]` the network was trained on; must be divisible by 16.
    pub input_size: [usize; 2],
    #[config(default = "3")]
    pub input_channels: usize,
    #[config(default = "64")]
    pub base_channels: usize,
    #[config(default = "1")]
    pub num_classes: usize,
}

impl UNetConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> UNet<B> {
        let c = self.base_channels;

        UNet {
            encoder_block_1: EncoderBlockConfig::new(self.input_channels, c).init(device),
            encoder_block_2: EncoderBlockConfig::new(c, c * 2).init(device),
            encoder_block_3: EncoderBlockConfig::new(c * 2, c * 4).init(device),
            encoder_block_4: EncoderBlockConfig::new(c * 4, c * 8).init(device),
            bottleneck: ConvBlockConfig::new(c * 8, c * 16).init(device),
            decoder_block_1: DecoderBlockConfig::new(c * 16, c * 8).init(device),
            decoder_block_2: DecoderBlockConfig::new(c * 8, c * 4).init(device),
            decoder_block_3: DecoderBlockConfig::new(c * 4, c * 2).init(device),
            decoder_block_4: DecoderBlockConfig::new(c * 2, c).init(device),
            conv_1x1: Conv2dConfig::new([c, self.num_classes], [1, 1]).init(device),
            num_classes: self.num_classes,
        }
    }
}

impl<B: Backend> UNet<B> {
    pub fn forward(&self, images: Tensor<B, 4>) -> Tensor<B, 4> {
        let x = images;

        let (x, skip_features_1) = self.encoder_block_1.forward(x);
        let (x, skip_features_2) = self.encoder_block_2.forward(x);
        let (x, skip_features_3) = self.encoder_block_3.forward(x);
        let (x, skip_features_4) = self.encoder_block_4.forward(x);

        let x = self.bottleneck.forward(x);

        let x = self.decoder_block_1.forward(x, skip_features_4);
        let x = self.decoder_block_2.forward(x, skip_features_3);
        let x = self.decoder_block_3.forward(x, skip_features_2);
        let x = self.decoder_block_4.forward(x, skip_features_1);

        let x = self.conv_1x1.forward(x);

        if self.num_classes == 1 {
            sigmoid(x)
        } else {
            softmax(x, 1)
        }
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }
}
