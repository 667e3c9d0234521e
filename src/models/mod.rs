// ============================================================================
// Module : models
// ============================================================================
// Structures de données de l'application : cartes, prix, catalogue
// ============================================================================

pub mod card;    // Carte renvoyée par l'API
pub mod catalog; // Langues, sets et raretés
pub mod price;   // Parsing tolérant des prix

// Re-export des structures principales pour simplifier les imports
pub use card::Card;
pub use catalog::{Language, ALL_RARITY, ALL_SETS};
pub use price::parse_price;
