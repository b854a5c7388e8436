use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordinal health-risk category, ordered by severity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[repr(u8)]
pub enum Category {
    NotSick = 0,
    Mild = 1,
    Acute = 2,
    Chronic = 3,
}

impl Category {
    /// Number of variants; also the classifier's output width.
    pub const COUNT: usize = 4;

    /// All variants in severity order.
    pub const ALL: [Category; Self::COUNT] = [
        Category::NotSick,
        Category::Mild,
        Category::Acute,
        Category::Chronic,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Maps a classifier output index to a category.
    ///
    /// Indices past the last class saturate to [`Category::Chronic`], which
    /// keeps prediction total for any arg-max result.
    pub(crate) fn from_class_index(index: usize) -> Self {
        Self::ALL[index.min(Self::COUNT - 1)]
    }

    /// Stable machine-readable name.
    pub fn name(self) -> &'static str {
        match self {
            Category::NotSick => "NOT_SICK",
            Category::Mild => "MILD",
            Category::Acute => "ACUTE",
            Category::Chronic => "CHRONIC",
        }
    }

    /// Human-readable description shown to end users.
    pub fn description(self) -> &'static str {
        match self {
            Category::NotSick => "No illness",
            Category::Mild => "Mild illness",
            Category::Acute => "Acute illness",
            Category::Chronic => "Chronic illness",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
