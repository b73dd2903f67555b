//! Explicit class-name to index mapping.

use serde::{Deserialize, Serialize};

use crate::error::{LabelError, Result};
use crate::label::ClassLabel;

/// An ordered class-name to index mapping.
///
/// Both training and inference take a `ClassMap` as configuration: the
/// dataset scanner reconciles class subdirectory names against it, and the
/// predictor renders output indices through it. Because the mapping is
/// always an explicit value, directory discovery order can never change
/// which index a name gets.
///
/// # Example
///
/// ```
/// use pixsafe_types::ClassMap;
///
/// let map = ClassMap::canonical();
/// assert_eq!(map.len(), 3);
/// assert_eq!(map.index_of("nude"), Some(0));
/// assert_eq!(map.label(2), Some("safe"));
/// assert_eq!(map.index_of("explicit"), None);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassMap {
    names: Vec<String>,
}

impl ClassMap {
    /// Creates a mapping from an ordered list of class names.
    ///
    /// Index `i` maps to `names[i]`.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::InvalidMap`] if the list is empty or contains
    /// a duplicate name.
    pub fn new(names: Vec<String>) -> Result<Self> {
        if names.is_empty() {
            return Err(LabelError::invalid_map("class list is empty"));
        }
        for (i, name) in names.iter().enumerate() {
            if names[..i].contains(name) {
                return Err(LabelError::invalid_map(format!("duplicate name: {name}")));
            }
        }
        Ok(Self { names })
    }

    /// The canonical mapping used by the shipped classifier.
    ///
    /// Index 0 is `nude`, 1 is `suggestive`, 2 is `safe`, matching
    /// [`ClassLabel::ALL`].
    #[must_use]
    pub fn canonical() -> Self {
        Self {
            names: ClassLabel::ALL.iter().map(|l| l.as_str().to_owned()).collect(),
        }
    }

    /// Number of classes in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Returns `true` if the mapping has no classes.
    ///
    /// Always `false` for maps built through [`ClassMap::new`].
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Returns the index for a class name, if present.
    #[must_use]
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Returns the class name at an index, if present.
    #[must_use]
    pub fn label(&self, index: usize) -> Option<&str> {
        self.names.get(index).map(String::as_str)
    }

    /// Returns the class name at an index, or an error naming the index.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::UnknownIndex`] if the index is out of range.
    pub fn require_label(&self, index: usize) -> Result<&str> {
        self.label(index)
            .ok_or(LabelError::UnknownIndex(index))
    }

    /// Returns the index for a class name, or an error naming the name.
    ///
    /// # Errors
    ///
    /// Returns [`LabelError::UnknownName`] if the name is not mapped.
    pub fn require_index(&self, name: &str) -> Result<usize> {
        self.index_of(name)
            .ok_or_else(|| LabelError::unknown_name(name))
    }

    /// Class names in index order.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }
}

impl Default for ClassMap {
    fn default() -> Self {
        Self::canonical()
    }
}
