// ============================================================================
// Erreurs de recherche
// ============================================================================
// Toutes les erreurs possibles d'une recherche, affichées telles quelles
// à l'utilisateur. Aucune ne doit faire planter l'interface.
// ============================================================================

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SearchError {
    /// Ni nom, ni numéro, ni set : aucune requête n'est envoyée
    #[error("Please enter a card name, a card number or choose a set")]
    MissingInput,

    /// Statut HTTP hors 2xx
    #[error("HTTP error! status: {status}")]
    Http { status: u16 },

    /// Erreur de transport (DNS, connexion, timeout...)
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// Champ `error` renvoyé par l'API, affiché tel quel
    #[error("{0}")]
    Api(String),

    /// Ni tableau, ni `cards`, ni `error`
    #[error("Invalid response format from server")]
    InvalidFormat,
}
