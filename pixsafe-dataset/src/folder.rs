//! Class-subdirectory dataset scanning.

use std::path::{Path, PathBuf};

use pixsafe_types::ClassMap;
use tracing::{debug, warn};

use crate::error::{DatasetError, Result};
use crate::splits::{split_samples, SplitRatio};

/// File extensions treated as images.
const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "bmp", "webp"];

/// A single labeled image on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSample {
    /// Path to the image file.
    pub path: PathBuf,
    /// Class index per the dataset's class map.
    pub label: usize,
}

impl ImageSample {
    /// Creates a sample.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, label: usize) -> Self {
        Self {
            path: path.into(),
            label,
        }
    }
}

/// An image dataset laid out as one subdirectory per class.
///
/// Labels come from the supplied [`ClassMap`], never from directory
/// discovery order: a subdirectory whose name is missing from the map
/// fails the scan instead of being assigned the next free index.
///
/// # Example
///
/// ```no_run
/// use pixsafe_dataset::FolderDataset;
/// use pixsafe_types::ClassMap;
///
/// let map = ClassMap::canonical();
/// let dataset = FolderDataset::scan("data/train", &map)?;
/// println!("{} samples", dataset.len());
/// # Ok::<(), pixsafe_dataset::DatasetError>(())
/// ```
#[derive(Debug, Clone)]
pub struct FolderDataset {
    samples: Vec<ImageSample>,
}

impl FolderDataset {
    /// Scans a dataset root, one subdirectory per class.
    ///
    /// Subdirectories are visited in lexicographic order. Files without a
    /// recognized image extension are skipped; loose files at the root are
    /// ignored with a warning.
    ///
    /// # Errors
    ///
    /// - [`DatasetError::MissingRoot`] if the root cannot be read
    /// - [`DatasetError::UnknownClass`] for a subdirectory not in the map
    /// - [`DatasetError::EmptyDataset`] if no samples are found
    pub fn scan(root: impl AsRef<Path>, class_map: &ClassMap) -> Result<Self> {
        let root = root.as_ref();
        let entries = std::fs::read_dir(root)
            .map_err(|e| DatasetError::missing_root(format!("{}: {e}", root.display())))?;

        let mut class_dirs: Vec<PathBuf> = Vec::new();
        for entry in entries {
            let entry = entry?;
            let path = entry.path();
            if path.is_dir() {
                class_dirs.push(path);
            } else {
                warn!(path = %path.display(), "ignoring loose file at dataset root");
            }
        }
        class_dirs.sort();

        let mut samples = Vec::new();
        for dir in class_dirs {
            let name = dir
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_owned();
            let label = class_map
                .index_of(&name)
                .ok_or_else(|| DatasetError::unknown_class(&name))?;

            let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)?
                .filter_map(std::result::Result::ok)
                .map(|e| e.path())
                .filter(|p| p.is_file() && has_image_extension(p))
                .collect();
            files.sort();

            debug!(class = %name, label, count = files.len(), "scanned class directory");
            samples.extend(files.into_iter().map(|path| ImageSample::new(path, label)));
        }

        if samples.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }

        Ok(Self { samples })
    }

    /// Builds a dataset directly from samples.
    ///
    /// # Errors
    ///
    /// Returns [`DatasetError::EmptyDataset`] if `samples` is empty.
    pub fn from_samples(samples: Vec<ImageSample>) -> Result<Self> {
        if samples.is_empty() {
            return Err(DatasetError::EmptyDataset);
        }
        Ok(Self { samples })
    }

    /// All samples, class directories in lexicographic order.
    #[must_use]
    pub fn samples(&self) -> &[ImageSample] {
        &self.samples
    }

    /// Number of samples.
    #[must_use]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Always `false`; construction rejects empty datasets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of samples carrying a given label.
    #[must_use]
    pub fn count_label(&self, label: usize) -> usize {
        self.samples.iter().filter(|s| s.label == label).count()
    }

    /// Splits into shuffled train and validation sample sets.
    #[must_use]
    pub fn split(&self, ratio: SplitRatio, seed: Option<u64>) -> (Vec<ImageSample>, Vec<ImageSample>) {
        split_samples(&self.samples, ratio, seed)
    }
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| IMAGE_EXTENSIONS.contains(&e.to_lowercase().as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    fn write_image(path: &Path) {
        let img = RgbImage::from_pixel(8, 8, Rgb([120, 80, 200]));
        let saved = img.save(path);
        assert!(saved.is_ok(), "failed to write {}", path.display());
    }

    fn make_dataset(root: &Path, classes: &[(&str, usize)]) {
        for (name, count) in classes {
            let dir = root.join(name);
            let created = std::fs::create_dir_all(&dir);
            assert!(created.is_ok());
            for i in 0..*count {
                write_image(&dir.join(format!("img_{i}.png")));
            }
        }
    }

    #[test]
    fn scan_assigns_labels_from_map() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        make_dataset(dir.path(), &[("nude", 2), ("safe", 3), ("suggestive", 1)]);

        let map = ClassMap::canonical();
        let dataset = FolderDataset::scan(dir.path(), &map);
        let Ok(dataset) = dataset else {
            panic!("scan failed: {dataset:?}");
        };

        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.count_label(0), 2);
        assert_eq!(dataset.count_label(1), 1);
        assert_eq!(dataset.count_label(2), 3);
    }

    #[test]
    fn scan_rejects_unknown_directory() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        make_dataset(dir.path(), &[("safe", 1), ("thumbnails", 1)]);

        let map = ClassMap::canonical();
        let result = FolderDataset::scan(dir.path(), &map);
        assert!(matches!(
            result,
            Err(DatasetError::UnknownClass(ref name)) if name == "thumbnails"
        ));
    }

    #[test]
    fn scan_empty_root_is_empty_dataset() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        let map = ClassMap::canonical();
        let result = FolderDataset::scan(dir.path(), &map);
        assert!(matches!(result, Err(DatasetError::EmptyDataset)));
    }

    #[test]
    fn scan_skips_non_image_files() {
        let Ok(dir) = tempfile::tempdir() else {
            panic!("failed to create temp dir");
        };
        make_dataset(dir.path(), &[("safe", 2)]);
        let written = std::fs::write(dir.path().join("safe").join("notes.txt"), b"hello");
        assert!(written.is_ok());

        let map = ClassMap::canonical();
        let dataset = FolderDataset::scan(dir.path(), &map);
        let Ok(dataset) = dataset else {
            panic!("scan failed: {dataset:?}");
        };
        assert_eq!(dataset.len(), 2);
    }

    #[test]
    fn scan_missing_root_errors() {
        let map = ClassMap::canonical();
        let result = FolderDataset::scan("/nonexistent/dataset", &map);
        assert!(matches!(result, Err(DatasetError::MissingRoot(_))));
    }

    #[test]
    fn from_samples_rejects_empty() {
        let result = FolderDataset::from_samples(vec![]);
        assert!(matches!(result, Err(DatasetError::EmptyDataset)));
    }

    #[test]
    fn split_partitions_all_samples() {
        let samples: Vec<ImageSample> = (0..10)
            .map(|i| ImageSample::new(format!("img_{i}.png"), i % 3))
            .collect();
        let dataset = FolderDataset::from_samples(samples);
        let Ok(dataset) = dataset else {
            panic!("from_samples failed");
        };

        let (train, val) = dataset.split(SplitRatio::EIGHTY_TWENTY, Some(42));
        assert_eq!(train.len(), 8);
        assert_eq!(val.len(), 2);
    }
}
