#![forbid(unsafe_code)]

//! Font identifiers and the named-font lookup.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Font weights available for the system font family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FontWeight {
    Light,
    #[default]
    Regular,
    Medium,
    Semibold,
    Bold,
}

impl FontWeight {
    const fn suffix(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Regular => "Regular",
            Self::Medium => "Medium",
            Self::Semibold => "Semibold",
            Self::Bold => "Bold",
        }
    }
}

/// Names a font family/face.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum FontIdentifier {
    System(FontWeight),
    Monospaced(FontWeight),
    Named(String),
}

impl FontIdentifier {
    /// Resolved face name passed to the toolkit.
    #[must_use]
    pub fn font_name(&self) -> String {
        match self {
            Self::System(weight) => format!("System-{}", weight.suffix()),
            Self::Monospaced(weight) => format!("Monospaced-{}", weight.suffix()),
            Self::Named(name) => name.clone(),
        }
    }
}

impl From<&str> for FontIdentifier {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

/// A resolved font: face name plus point size.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Font {
    pub name: String,
    pub size: f64,
}

impl Font {
    /// Look up a font by identifier.
    ///
    /// Returns `None` for an empty face name or a size that is not a
    /// positive finite number, mirroring a toolkit lookup that found no font.
    #[must_use]
    pub fn named(identifier: &FontIdentifier, size: f64) -> Option<Self> {
        let name = identifier.font_name();
        if name.trim().is_empty() || !size.is_finite() || size <= 0.0 {
            return None;
        }
        Some(Self { name, size })
    }

    #[must_use]
    pub fn system(size: f64) -> Option<Self> {
        Self::named(&FontIdentifier::System(FontWeight::Regular), size)
    }
}
