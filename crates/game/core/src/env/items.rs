use core::fmt;

use crate::outcome::ItemRarity;

/// Identifier of a catalog item.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "item#{}", self.0)
    }
}

/// One entry of the item catalog used for reward drops.
///
/// Rarity is kept as the free-form label the catalog was authored with;
/// [`CatalogItem::rarity`] interprets it case-insensitively. Items with a
/// missing or unknown label only ever drop through the any-item fallback.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogItem {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: Option<String>,
    #[cfg_attr(feature = "serde", serde(default, rename = "rarity"))]
    pub rarity_label: Option<String>,
}

impl CatalogItem {
    pub fn new(id: u64, name: impl Into<String>, rarity: Option<ItemRarity>) -> Self {
        Self {
            id: ItemId(id),
            name: name.into(),
            description: None,
            rarity_label: rarity.map(|r| r.to_string()),
        }
    }

    /// Parsed rarity, if the label names one.
    pub fn rarity(&self) -> Option<ItemRarity> {
        self.rarity_label
            .as_deref()
            .and_then(|label| label.trim().parse().ok())
    }
}
