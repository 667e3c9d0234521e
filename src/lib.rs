// ============================================================================
// Pokegrade - Library
// ============================================================================
// Expose les modules publics pour le binaire et les tests
// ============================================================================

pub mod api;      // Client de l'API de prix
pub mod app;      // État de l'application
pub mod browser;  // Ouverture des fiches marketplace
pub mod config;   // CLI + variables d'environnement
pub mod error;    // Erreurs de recherche
pub mod models;   // Cartes, prix, catalogue
pub mod pipeline; // Filtre -> tri -> pagination
pub mod ui;       // Interface utilisateur
