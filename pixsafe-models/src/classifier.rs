//! Convolutional safety classifier.

use burn::module::Module;
use burn::nn::conv::{Conv2d, Conv2dConfig};
use burn::nn::pool::{AdaptiveAvgPool2d, AdaptiveAvgPool2dConfig, MaxPool2d, MaxPool2dConfig};
use burn::nn::{
    BatchNorm, BatchNormConfig, Dropout, DropoutConfig, Linear, LinearConfig, PaddingConfig2d,
    Relu,
};
use burn::prelude::Backend;
use burn::tensor::Tensor;
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Configuration for the safety classifier.
///
/// # Example
///
/// ```
/// use pixsafe_models::SafetyClassifierConfig;
///
/// let config = SafetyClassifierConfig::default();
/// assert_eq!(config.num_classes, 3);
/// assert!(config.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetyClassifierConfig {
    /// Number of output classes.
    pub num_classes: usize,

    /// Dropout rate applied to the pooled features.
    pub dropout: f64,

    /// Dropout rate applied inside the classification head.
    pub dropout_head: f64,
}

impl Default for SafetyClassifierConfig {
    fn default() -> Self {
        Self {
            num_classes: 3,
            dropout: 0.5,
            dropout_head: 0.3,
        }
    }
}

impl SafetyClassifierConfig {
    /// Creates a configuration with a custom class count.
    #[must_use]
    pub fn new(num_classes: usize) -> Self {
        Self {
            num_classes,
            ..Self::default()
        }
    }

    /// Sets the feature dropout rate.
    #[must_use]
    pub const fn with_dropout(mut self, dropout: f64) -> Self {
        self.dropout = dropout;
        self
    }

    /// Sets the head dropout rate.
    #[must_use]
    pub const fn with_dropout_head(mut self, dropout_head: f64) -> Self {
        self.dropout_head = dropout_head;
        self
    }

    /// Validates the configuration.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.num_classes > 0
            && (0.0..1.0).contains(&self.dropout)
            && (0.0..1.0).contains(&self.dropout_head)
    }

    /// Validates the configuration, naming the first problem found.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidConfig`] when a field is out of range.
    pub fn validate(&self) -> Result<()> {
        if self.num_classes == 0 {
            return Err(ModelError::invalid_config("num_classes must be > 0"));
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(ModelError::invalid_config(format!(
                "dropout must be in [0, 1), got {}",
                self.dropout
            )));
        }
        if !(0.0..1.0).contains(&self.dropout_head) {
            return Err(ModelError::invalid_config(format!(
                "dropout_head must be in [0, 1), got {}",
                self.dropout_head
            )));
        }
        Ok(())
    }
}

/// Channel widths of the five convolutional blocks.
const CHANNELS: [usize; 6] = [3, 32, 64, 128, 256, 512];

/// Width of the hidden layer in the classification head.
const HIDDEN: usize = 128;

/// Five-block convolutional network for image-safety classification.
///
/// Each block is conv(3x3, pad 1) -> batch norm -> `ReLU`; blocks one
/// through four end in a 2x2 max pool, the fifth feeds an adaptive
/// average pool that collapses the spatial dimensions to 1x1. The head is
/// dropout -> linear 512x128 -> `ReLU` -> dropout -> linear 128xC, and the
/// output is raw logits.
///
/// Adaptive pooling makes the network input-size agnostic; any spatial
/// resolution that survives four halvings works, 256x256 being the
/// trained operating point.
///
/// # Type Parameters
///
/// - `B`: The Burn backend (e.g., `NdArray`, `Wgpu`)
#[derive(Debug, Module)]
pub struct SafetyClassifier<B: Backend> {
    conv1: Conv2d<B>,
    bn1: BatchNorm<B>,
    conv2: Conv2d<B>,
    bn2: BatchNorm<B>,
    conv3: Conv2d<B>,
    bn3: BatchNorm<B>,
    conv4: Conv2d<B>,
    bn4: BatchNorm<B>,
    conv5: Conv2d<B>,
    bn5: BatchNorm<B>,
    pool: MaxPool2d,
    avg_pool: AdaptiveAvgPool2d,
    dropout1: Dropout,
    fc1: Linear<B>,
    dropout2: Dropout,
    fc2: Linear<B>,
    activation: Relu,
}

impl<B: Backend> SafetyClassifier<B> {
    /// Creates a freshly initialized classifier.
    #[must_use]
    pub fn new(config: &SafetyClassifierConfig, device: &B::Device) -> Self {
        let conv = |i: usize| {
            Conv2dConfig::new([CHANNELS[i], CHANNELS[i + 1]], [3, 3])
                .with_padding(PaddingConfig2d::Explicit(1, 1))
                .init(device)
        };
        let bn = |i: usize| BatchNormConfig::new(CHANNELS[i + 1]).init(device);

        Self {
            conv1: conv(0),
            bn1: bn(0),
            conv2: conv(1),
            bn2: bn(1),
            conv3: conv(2),
            bn3: bn(2),
            conv4: conv(3),
            bn4: bn(3),
            conv5: conv(4),
            bn5: bn(4),
            pool: MaxPool2dConfig::new([2, 2]).with_strides([2, 2]).init(),
            avg_pool: AdaptiveAvgPool2dConfig::new([1, 1]).init(),
            dropout1: DropoutConfig::new(config.dropout).init(),
            fc1: LinearConfig::new(CHANNELS[5], HIDDEN).init(device),
            dropout2: DropoutConfig::new(config.dropout_head).init(),
            fc2: LinearConfig::new(HIDDEN, config.num_classes).init(device),
            activation: Relu::new(),
        }
    }

    /// Runs the forward pass.
    ///
    /// # Arguments
    ///
    /// - `input`: Batch of shape `[batch_size, 3, height, width]`
    ///
    /// # Returns
    ///
    /// Logits of shape `[batch_size, num_classes]`.
    pub fn forward(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        let x = self.pool.forward(self.activation.forward(self.bn1.forward(self.conv1.forward(input))));
        let x = self.pool.forward(self.activation.forward(self.bn2.forward(self.conv2.forward(x))));
        let x = self.pool.forward(self.activation.forward(self.bn3.forward(self.conv3.forward(x))));
        let x = self.pool.forward(self.activation.forward(self.bn4.forward(self.conv4.forward(x))));
        let x = self.activation.forward(self.bn5.forward(self.conv5.forward(x)));

        let x = self.avg_pool.forward(x);
        let [batch_size, channels, _, _] = x.dims();
        let x = x.reshape([batch_size, channels]);

        let x = self.dropout1.forward(x);
        let x = self.activation.forward(self.fc1.forward(x));
        let x = self.dropout2.forward(x);
        self.fc2.forward(x)
    }

    /// Runs the forward pass and applies softmax over classes.
    pub fn forward_softmax(&self, input: Tensor<B, 4>) -> Tensor<B, 2> {
        burn::tensor::activation::softmax(self.forward(input), 1)
    }
}
