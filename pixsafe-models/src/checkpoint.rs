//! Checkpoint persistence for model weights.

use std::path::Path;

use burn::module::Module;
use burn::prelude::Backend;
use burn::record::{BinFileRecorder, FullPrecisionSettings, NamedMpkFileRecorder, Recorder};
use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Supported checkpoint file formats.
///
/// New checkpoints are always written as named MessagePack: every tensor
/// is stored under its module path, so a reader can inspect the file and a
/// mismatched architecture fails loudly by name. The positional binary
/// stream only exists to read checkpoints from before the switch and must
/// be opted into explicitly on load.
///
/// # Example
///
/// ```
/// use pixsafe_models::CheckpointFormat;
///
/// let format = CheckpointFormat::from_extension("mpk");
/// assert_eq!(format, Some(CheckpointFormat::NamedMpk));
/// assert!(CheckpointFormat::Bin.is_legacy());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CheckpointFormat {
    /// Named-tensor MessagePack with full precision.
    ///
    /// The default and the only format new checkpoints are written in.
    #[default]
    NamedMpk,

    /// Positional binary record stream.
    ///
    /// Legacy checkpoints only; loading requires an explicit opt-in.
    Bin,
}

impl CheckpointFormat {
    /// Determines format from file extension.
    ///
    /// - `.mpk` -> `NamedMpk`
    /// - `.bin` -> `Bin`
    /// - Other -> None
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "mpk" => Some(Self::NamedMpk),
            "bin" => Some(Self::Bin),
            _ => None,
        }
    }

    /// Determines format from file path.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Returns the file extension for this format.
    #[must_use]
    pub const fn extension(&self) -> &'static str {
        match self {
            Self::NamedMpk => "mpk",
            Self::Bin => "bin",
        }
    }

    /// Returns the format name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::NamedMpk => "named-mpk",
            Self::Bin => "bin",
        }
    }

    /// Returns `true` for formats that need the legacy opt-in to load.
    #[must_use]
    pub const fn is_legacy(&self) -> bool {
        matches!(self, Self::Bin)
    }
}

impl std::fmt::Display for CheckpointFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Saves a model checkpoint to a file.
///
/// Parent directories are created as needed.
///
/// # Arguments
///
/// - `model`: The model to save
/// - `path`: Output file path (without extension)
/// - `format`: Checkpoint format to use
///
/// # Returns
///
/// The full path to the saved checkpoint (with extension added).
///
/// # Errors
///
/// Returns `ModelError::SaveCheckpoint` if the recorder fails, or
/// `ModelError::Io` if the parent directory cannot be created.
pub fn save_checkpoint<B, M>(model: &M, path: &str, format: CheckpointFormat) -> Result<String>
where
    B: Backend,
    M: Module<B>,
{
    let full_path = format!("{}.{}", path, format.extension());

    if let Some(parent) = Path::new(&full_path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let record = model.clone().into_record();

    match format {
        CheckpointFormat::NamedMpk => {
            let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
            recorder
                .record(record, full_path.clone().into())
                .map_err(|e| ModelError::save_checkpoint(&full_path, e.to_string()))?;
        }
        CheckpointFormat::Bin => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            recorder
                .record(record, full_path.clone().into())
                .map_err(|e| ModelError::save_checkpoint(&full_path, e.to_string()))?;
        }
    }

    Ok(full_path)
}

/// Loads a model checkpoint, accepting the safe format only.
///
/// Equivalent to [`load_checkpoint_with`] with legacy loads disabled.
///
/// # Errors
///
/// See [`load_checkpoint_with`]; additionally returns
/// `ModelError::LegacyFormatDisabled` for legacy-format files.
pub fn load_checkpoint<B, M>(model: M, path: &str, device: &B::Device) -> Result<M>
where
    B: Backend,
    M: Module<B>,
{
    load_checkpoint_with(model, path, device, false)
}

/// Loads a model checkpoint from a file.
///
/// The format is determined by the file extension. Legacy-format files
/// load only when `allow_legacy` is `true`.
///
/// # Arguments
///
/// - `model`: The model to load weights into
/// - `path`: Path to the checkpoint file (with extension)
/// - `device`: Device to load the weights onto
/// - `allow_legacy`: Whether legacy-format checkpoints may be read
///
/// # Returns
///
/// The model with loaded weights.
///
/// # Errors
///
/// - `ModelError::CheckpointNotFound` if the file doesn't exist
/// - `ModelError::UnsupportedFormat` if the extension names no format
/// - `ModelError::LegacyFormatDisabled` for a legacy file without opt-in
/// - `ModelError::CheckpointMismatch` if the record doesn't fit the model
pub fn load_checkpoint_with<B, M>(
    model: M,
    path: &str,
    device: &B::Device,
    allow_legacy: bool,
) -> Result<M>
where
    B: Backend,
    M: Module<B>,
{
    let path_obj = Path::new(path);

    if !path_obj.exists() {
        return Err(ModelError::checkpoint_not_found(path));
    }

    let format =
        CheckpointFormat::from_path(path_obj).ok_or_else(|| ModelError::unsupported_format(path))?;

    if format.is_legacy() && !allow_legacy {
        return Err(ModelError::legacy_format_disabled(path));
    }

    let loaded = match format {
        CheckpointFormat::NamedMpk => {
            let recorder = NamedMpkFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path_obj, &recorder, device)
                .map_err(|e| ModelError::checkpoint_mismatch(path, e.to_string()))?
        }
        CheckpointFormat::Bin => {
            let recorder = BinFileRecorder::<FullPrecisionSettings>::new();
            model
                .load_file(path_obj, &recorder, device)
                .map_err(|e| ModelError::checkpoint_mismatch(path, e.to_string()))?
        }
    };

    Ok(loaded)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::NdArrayBackend;
    use crate::classifier::{SafetyClassifier, SafetyClassifierConfig};
    use burn::tensor::Tensor;

    type TestBackend = NdArrayBackend;

    fn logits(model: &SafetyClassifier<TestBackend>) -> Vec<f32> {
        let device = Default::default();
        let input = Tensor::<TestBackend, 4>::ones([1, 3, 16, 16], &device);
        model
            .forward(input)
            .into_data()
            .convert::<f32>()
            .to_vec::<f32>()
            .unwrap_or_default()
    }

    #[test]
    fn format_from_extension() {
        assert_eq!(
            CheckpointFormat::from_extension("mpk"),
            Some(CheckpointFormat::NamedMpk)
        );
        assert_eq!(
            CheckpointFormat::from_extension("bin"),
            Some(CheckpointFormat::Bin)
        );
        assert_eq!(
            CheckpointFormat::from_extension("MPK"),
            Some(CheckpointFormat::NamedMpk)
        );
        assert_eq!(CheckpointFormat::from_extension("safetensors"), None);
    }

    #[test]
    fn format_from_path() {
        assert_eq!(
            CheckpointFormat::from_path(Path::new("model.mpk")),
            Some(CheckpointFormat::NamedMpk)
        );
        assert_eq!(
            CheckpointFormat::from_path(Path::new("/path/to/model.bin")),
            Some(CheckpointFormat::Bin)
        );
        assert_eq!(CheckpointFormat::from_path(Path::new("model.xml")), None);
        assert_eq!(CheckpointFormat::from_path(Path::new("model")), None);
    }

    #[test]
    fn format_default_is_safe() {
        assert_eq!(CheckpointFormat::default(), CheckpointFormat::NamedMpk);
        assert!(!CheckpointFormat::NamedMpk.is_legacy());
        assert!(CheckpointFormat::Bin.is_legacy());
    }

    #[test]
    fn format_display() {
        assert_eq!(format!("{}", CheckpointFormat::NamedMpk), "named-mpk");
        assert_eq!(format!("{}", CheckpointFormat::Bin), "bin");
    }

    #[test]
    fn load_missing_file_is_not_found() {
        let device = Default::default();
        let config = SafetyClassifierConfig::default();
        let model = SafetyClassifier::<TestBackend>::new(&config, &device);

        let result = load_checkpoint(model, "/nonexistent/model.mpk", &device);
        assert!(matches!(result, Err(ModelError::CheckpointNotFound(_))));
    }

    #[test]
    fn round_trip_preserves_outputs() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let device = Default::default();
        let config = SafetyClassifierConfig::default();
        let model = SafetyClassifier::<TestBackend>::new(&config, &device);
        let before = logits(&model);

        let base = dir.path().join("model");
        let saved = save_checkpoint(&model, &base.to_string_lossy(), CheckpointFormat::NamedMpk);
        let Ok(full_path) = saved else {
            panic!("save failed: {saved:?}");
        };
        assert!(full_path.ends_with(".mpk"));

        let fresh = SafetyClassifier::<TestBackend>::new(&config, &device);
        let loaded = load_checkpoint(fresh, &full_path, &device);
        let Ok(loaded) = loaded else {
            panic!("load failed: {loaded:?}");
        };

        assert_eq!(logits(&loaded), before);
    }

    #[test]
    fn save_creates_parent_directories() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let device = Default::default();
        let config = SafetyClassifierConfig::default();
        let model = SafetyClassifier::<TestBackend>::new(&config, &device);

        let base = dir.path().join("nested").join("deep").join("model");
        let saved = save_checkpoint(&model, &base.to_string_lossy(), CheckpointFormat::NamedMpk);
        assert!(saved.is_ok());
        assert!(dir.path().join("nested").join("deep").exists());
    }

    #[test]
    fn legacy_format_requires_opt_in() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let device = Default::default();
        let config = SafetyClassifierConfig::default();
        let model = SafetyClassifier::<TestBackend>::new(&config, &device);
        let before = logits(&model);

        let base = dir.path().join("legacy");
        let saved = save_checkpoint(&model, &base.to_string_lossy(), CheckpointFormat::Bin);
        let Ok(full_path) = saved else {
            panic!("save failed: {saved:?}");
        };

        let fresh = SafetyClassifier::<TestBackend>::new(&config, &device);
        let refused = load_checkpoint(fresh, &full_path, &device);
        assert!(matches!(refused, Err(ModelError::LegacyFormatDisabled(_))));

        let fresh = SafetyClassifier::<TestBackend>::new(&config, &device);
        let loaded = load_checkpoint_with(fresh, &full_path, &device, true);
        let Ok(loaded) = loaded else {
            panic!("legacy load failed: {loaded:?}");
        };
        assert_eq!(logits(&loaded), before);
    }

    #[test]
    fn unknown_extension_is_unsupported() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let path = dir.path().join("model.safetensors");
        let written = std::fs::write(&path, b"junk");
        assert!(written.is_ok());

        let device = Default::default();
        let config = SafetyClassifierConfig::default();
        let model = SafetyClassifier::<TestBackend>::new(&config, &device);

        let result = load_checkpoint(model, &path.to_string_lossy(), &device);
        assert!(matches!(result, Err(ModelError::UnsupportedFormat(_))));
    }

    #[test]
    fn corrupt_checkpoint_is_mismatch() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let path = dir.path().join("model.mpk");
        let written = std::fs::write(&path, b"not a checkpoint");
        assert!(written.is_ok());

        let device = Default::default();
        let config = SafetyClassifierConfig::default();
        let model = SafetyClassifier::<TestBackend>::new(&config, &device);

        let result = load_checkpoint(model, &path.to_string_lossy(), &device);
        assert!(matches!(result, Err(ModelError::CheckpointMismatch { .. })));
    }
}
