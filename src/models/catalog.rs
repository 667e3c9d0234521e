// ============================================================================
// Catalogue : langues, sets et raretés
// ============================================================================
// Chaque langue a ses propres sets et son propre vocabulaire de raretés
// (les impressions japonaises n'utilisent pas les mêmes noms).
//
// CONCEPTS RUST :
// 1. &'static [&'static str] : tableaux constants compilés dans le binaire
// 2. FromStr : parsing d'une langue depuis la ligne de commande
// ============================================================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Sentinelle "pas de filtre de set"
pub const ALL_SETS: &str = "All Sets";

/// Sentinelle "pas de filtre de rareté"
pub const ALL_RARITY: &str = "All";

const ENGLISH_SETS: &[&str] = &[
    "SV08: Surging Sparks",
    "SV07: Stellar Crown",
    "SV06: Twilight Masquerade",
    "SV05: Temporal Forces",
    "SV04: Paradox Rift",
    "SV03: Obsidian Flames",
    "SV: Shrouded Fable",
    "SV: Scarlet & Violet 151",
    "SV: Paldean Fates",
];

const JAPANESE_SETS: &[&str] = &[
    "SV7A: Paradise Dragona",
    "SV7: Stellar Miracle",
    "SV6A: Night Wanderer",
    "SV6: Transformation Mask",
    "SV5M: Cyber Judge",
    "SV5K: Wild Force",
    "SV5A: Crimson Haze",
    "SV-P Promotional Cards",
    "SV: Ancient Koraidon ex Starter Deck & Build Set",
];

const ENGLISH_RARITIES: &[&str] = &[
    "Illustration Rare",
    "Special Illustration Rare",
    "Hyper Rare",
    "Ultra Rare",
];

const JAPANESE_RARITIES: &[&str] = &["Special Art Rare", "Super Rare", "Ultra Rare", "Art Rare"];

/// Langue d'impression des cartes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    English,
    Japanese,
}

#[derive(Debug, Error)]
#[error("unknown language {0:?} (expected English or Japanese)")]
pub struct UnknownLanguage(pub String);

impl Language {
    /// Valeur envoyée à l'API et affichée
    pub fn label(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Japanese => "Japanese",
        }
    }

    /// Bascule English <-> Japanese
    pub fn next(&self) -> Self {
        match self {
            Language::English => Language::Japanese,
            Language::Japanese => Language::English,
        }
    }

    /// Sets connus pour cette langue (sans la sentinelle)
    pub fn sets(&self) -> &'static [&'static str] {
        match self {
            Language::English => ENGLISH_SETS,
            Language::Japanese => JAPANESE_SETS,
        }
    }

    /// Raretés connues pour cette langue (sans la sentinelle)
    pub fn rarities(&self) -> &'static [&'static str] {
        match self {
            Language::English => ENGLISH_RARITIES,
            Language::Japanese => JAPANESE_RARITIES,
        }
    }

    /// Options du sélecteur de set : "All Sets" puis les sets
    pub fn set_options(&self) -> Vec<&'static str> {
        std::iter::once(ALL_SETS).chain(self.sets().iter().copied()).collect()
    }

    /// Options du sélecteur de rareté : "All" puis les raretés
    pub fn rarity_options(&self) -> Vec<&'static str> {
        std::iter::once(ALL_RARITY)
            .chain(self.rarities().iter().copied())
            .collect()
    }

    /// Retrouve un set depuis son slug (ex: "SV07__Stellar_Crown")
    ///
    /// Un slug inconnu est renvoyé tel quel.
    pub fn resolve_set(&self, slug_or_name: &str) -> String {
        self.sets()
            .iter()
            .find(|set| **set == slug_or_name || set_slug(set) == slug_or_name)
            .map(|set| set.to_string())
            .unwrap_or_else(|| slug_or_name.to_string())
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Language {
    type Err = UnknownLanguage;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "english" | "en" => Ok(Language::English),
            "japanese" | "jp" | "ja" => Ok(Language::Japanese),
            _ => Err(UnknownLanguage(s.to_string())),
        }
    }
}

/// Slug d'un set : tout caractère non alphanumérique devient '_'
pub fn set_slug(set_name: &str) -> String {
    set_name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect()
}

/// Option suivante (ou précédente) dans une liste cyclique
///
/// Une valeur courante absente de la liste repart du début.
pub fn cycle_option<'a>(options: &[&'a str], current: &str, forward: bool) -> &'a str {
    if options.is_empty() {
        return "";
    }

    let len = options.len();
    match options.iter().position(|option| *option == current) {
        Some(index) if forward => options[(index + 1) % len],
        Some(index) => options[(index + len - 1) % len],
        None => options[0],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_parsing() {
        assert_eq!("English".parse::<Language>().unwrap(), Language::English);
        assert_eq!("japanese".parse::<Language>().unwrap(), Language::Japanese);
        assert!("French".parse::<Language>().is_err());
    }

    #[test]
    fn test_options_start_with_sentinels() {
        let sets = Language::English.set_options();
        assert_eq!(sets[0], ALL_SETS);
        assert_eq!(sets.len(), ENGLISH_SETS.len() + 1);

        let rarities = Language::Japanese.rarity_options();
        assert_eq!(rarities[0], ALL_RARITY);
        assert!(rarities.contains(&"Special Art Rare"));
        assert!(!rarities.contains(&"Hyper Rare"));
    }

    #[test]
    fn test_set_slug_round_trip() {
        let slug = set_slug("SV07: Stellar Crown");
        assert_eq!(slug, "SV07__Stellar_Crown");
        assert_eq!(Language::English.resolve_set(&slug), "SV07: Stellar Crown");
        assert_eq!(Language::English.resolve_set("Unknown"), "Unknown");
    }

    #[test]
    fn test_cycle_option() {
        let options = ["a", "b", "c"];
        assert_eq!(cycle_option(&options, "a", true), "b");
        assert_eq!(cycle_option(&options, "c", true), "a");
        assert_eq!(cycle_option(&options, "a", false), "c");
        assert_eq!(cycle_option(&options, "zzz", true), "a");
    }
}
