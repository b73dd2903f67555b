//! Backend type definitions and device aliases.

use serde::{Deserialize, Serialize};

/// CPU backend, always available.
pub type NdArrayBackend = burn::backend::NdArray<f32>;

/// Backend used for inference by default.
pub type InferenceBackend = NdArrayBackend;

/// Autodiff backend used for training on the CPU.
pub type TrainingBackend = burn::backend::Autodiff<NdArrayBackend>;

/// Supported Burn backend types.
///
/// # Example
///
/// ```
/// use pixsafe_models::BackendType;
///
/// let backend = BackendType::NdArray;
/// assert!(backend.is_cpu());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum BackendType {
    /// CPU backend using ndarray.
    ///
    /// Always available, good for development and CPU-only deployment.
    #[default]
    NdArray,

    /// GPU backend using WGPU.
    ///
    /// Requires the `wgpu` feature and compatible GPU hardware.
    Wgpu,
}

impl BackendType {
    /// Returns `true` if this is a CPU backend.
    #[must_use]
    pub const fn is_cpu(&self) -> bool {
        matches!(self, Self::NdArray)
    }

    /// Returns `true` if this is a GPU backend.
    #[must_use]
    pub const fn is_gpu(&self) -> bool {
        matches!(self, Self::Wgpu)
    }

    /// Returns the backend name as a string.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NdArray => "ndarray",
            Self::Wgpu => "wgpu",
        }
    }

    /// Picks the best backend compiled into this build.
    ///
    /// The GPU backend wins when the `wgpu` feature is enabled; otherwise
    /// the CPU backend is the only choice. Selection depends solely on the
    /// build, so it is stable for the life of the process.
    #[must_use]
    pub const fn detect() -> Self {
        #[cfg(feature = "wgpu")]
        {
            Self::Wgpu
        }
        #[cfg(not(feature = "wgpu"))]
        {
            Self::NdArray
        }
    }
}

impl std::fmt::Display for BackendType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
