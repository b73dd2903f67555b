//! The fixed safety-class vocabulary.

use serde::{Deserialize, Serialize};

/// The three safety classes, in model output order.
///
/// The discriminants are the model's output indices: logit column 0 is
/// [`ClassLabel::Nude`], column 1 is [`ClassLabel::Suggestive`], column 2
/// is [`ClassLabel::Safe`]. Checkpoints are only meaningful relative to
/// this ordering.
///
/// # Example
///
/// ```
/// use pixsafe_types::ClassLabel;
///
/// assert_eq!(ClassLabel::Nude.as_str(), "nude");
/// assert_eq!(ClassLabel::from_index(2), Some(ClassLabel::Safe));
/// assert_eq!(ClassLabel::COUNT, 3);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassLabel {
    /// Explicit nudity.
    Nude = 0,
    /// Suggestive but not explicit content.
    Suggestive = 1,
    /// Safe content.
    Safe = 2,
}

impl ClassLabel {
    /// Number of classes.
    pub const COUNT: usize = 3;

    /// All labels in model output order.
    pub const ALL: [Self; Self::COUNT] = [Self::Nude, Self::Suggestive, Self::Safe];

    /// Returns the label's human-readable name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nude => "nude",
            Self::Suggestive => "suggestive",
            Self::Safe => "safe",
        }
    }

    /// Returns the model output index for this label.
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Returns the label for a model output index, if valid.
    #[must_use]
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(Self::Nude),
            1 => Some(Self::Suggestive),
            2 => Some(Self::Safe),
            _ => None,
        }
    }

    /// Returns the label for a name, if recognized.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|l| l.as_str() == name)
    }
}

impl std::fmt::Display for ClassLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
