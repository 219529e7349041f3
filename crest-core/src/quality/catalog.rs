//! Quality catalog construction from the host's rendition list.
//!
//! The catalog is the presentation-facing projection of the renditions: one
//! entry per pixel tier, highest quality first, with a synthetic "Auto"
//! entry on top. It is rebuilt from scratch on every rendition-list change;
//! rendition counts are single-digit to low tens, so a full rebuild is
//! cheaper than keeping dedup state correct across incremental patches.

use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::player::Rendition;

/// A quality selection: adaptive, or pinned to one pixel tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QualityChoice {
    /// Adaptive mode; the streaming engine picks among all renditions.
    Auto,
    /// Fixed mode; only renditions of this pixel tier are eligible.
    Tier(u32),
}

impl QualityChoice {
    /// Returns the user-facing label ("Auto" or e.g. "720p").
    pub fn label(&self) -> String {
        match self {
            QualityChoice::Auto => "Auto".to_string(),
            QualityChoice::Tier(tier) => format!("{tier}p"),
        }
    }
}

impl fmt::Display for QualityChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QualityChoice::Auto => write!(f, "auto"),
            QualityChoice::Tier(tier) => write!(f, "{tier}p"),
        }
    }
}

// Wire form is the literal "auto" or a bare tier number, matching what
// presentation layers exchange for the selection value.
impl Serialize for QualityChoice {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            QualityChoice::Auto => serializer.serialize_str("auto"),
            QualityChoice::Tier(tier) => serializer.serialize_u32(*tier),
        }
    }
}

impl<'de> Deserialize<'de> for QualityChoice {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct ChoiceVisitor;

        impl Visitor<'_> for ChoiceVisitor {
            type Value = QualityChoice;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("the string \"auto\" or a pixel tier number")
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                if value == "auto" {
                    Ok(QualityChoice::Auto)
                } else {
                    Err(E::invalid_value(de::Unexpected::Str(value), &self))
                }
            }

            fn visit_u64<E>(self, value: u64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(QualityChoice::Tier)
                    .map_err(|_| E::invalid_value(de::Unexpected::Unsigned(value), &self))
            }

            fn visit_i64<E>(self, value: i64) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                u32::try_from(value)
                    .map(QualityChoice::Tier)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(value), &self))
            }
        }

        deserializer.deserialize_any(ChoiceVisitor)
    }
}

/// One selectable row in the quality menu.
///
/// Entries are views rebuilt from controller state, never persisted. The
/// selected flag follows the controller's current choice, so at most one
/// entry is selected and none is when the current choice names a tier that
/// has disappeared from the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    /// User-facing label.
    pub label: String,
    /// Selection value handed back on click.
    pub value: QualityChoice,
    /// Whether this entry is the controller's current choice.
    pub selected: bool,
}

/// Builds the quality catalog for the given renditions.
///
/// Renditions collapse into pixel tiers (`min(width, height)`); degenerate
/// renditions with a zero dimension are skipped and duplicate tiers keep
/// their first occurrence. The result is the Auto entry followed by tiers
/// in strictly descending order.
pub fn build_catalog(renditions: &[Rendition], current: QualityChoice) -> Vec<CatalogEntry> {
    let mut tiers: Vec<u32> = Vec::new();
    for rendition in renditions {
        let Some(tier) = rendition.pixel_tier() else {
            continue;
        };
        if !tiers.contains(&tier) {
            tiers.push(tier);
        }
    }

    // Highest quality first. Tiers are unique here, so stability is moot.
    tiers.sort_unstable_by(|a, b| b.cmp(a));

    let mut entries = Vec::with_capacity(tiers.len() + 1);
    entries.push(CatalogEntry {
        label: QualityChoice::Auto.label(),
        value: QualityChoice::Auto,
        selected: current == QualityChoice::Auto,
    });
    for tier in tiers {
        let value = QualityChoice::Tier(tier);
        entries.push(CatalogEntry {
            label: value.label(),
            value,
            selected: current == value,
        });
    }

    entries
}
