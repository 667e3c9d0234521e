// ============================================================================
// Module : api
// ============================================================================
// Client HTTP vers l'API de prix des cartes (scrape TCGPlayer + PSA 10)
// ============================================================================

pub mod grading; // Client de l'API Pokemon Grading Tool

// Re-export des éléments principaux
pub use grading::{parse_response, GradingClient, SearchQuery, DEFAULT_API_URL};
