//! Closed outcome sets produced by the Probability Roller.
//!
//! The enums only name results. Weights, coin multipliers and drop chances
//! are configuration and live in [`crate::config`].

/// Result of resolving a battle encounter.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum BattleOutcome {
    Victory,
    Retreat,
    Draw,
}

impl BattleOutcome {
    pub const ALL: [BattleOutcome; 3] = [Self::Victory, Self::Retreat, Self::Draw];
}

/// Rarity tier of a reward item, lowest first.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ItemRarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

impl ItemRarity {
    pub const ALL: [ItemRarity; 5] = [
        Self::Common,
        Self::Uncommon,
        Self::Rare,
        Self::Epic,
        Self::Legendary,
    ];

    /// Highest tier; excluded from losing-outcome drop tables.
    pub const TOP: ItemRarity = Self::Legendary;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_case_insensitively() {
        assert_eq!("Victory".parse::<BattleOutcome>(), Ok(BattleOutcome::Victory));
        assert_eq!("LEGENDARY".parse::<ItemRarity>(), Ok(ItemRarity::Legendary));
        assert!("mythical".parse::<ItemRarity>().is_err());
    }

    #[test]
    fn display_uses_snake_case() {
        assert_eq!(BattleOutcome::Retreat.to_string(), "retreat");
        assert_eq!(ItemRarity::Uncommon.as_ref(), "uncommon");
    }
}
