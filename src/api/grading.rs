// ============================================================================
// API Client : Pokemon Grading Tool
// ============================================================================
// Interroge l'API de scrape des prix (TCGPlayer + PSA 10) et renvoie la
// liste des cartes trouvées.
//
// CONCEPTS RUST :
// 1. async/await : l'appel HTTP ne bloque pas le runtime tokio
// 2. Erreurs typées (thiserror) : l'appelant distingue réseau / API / format
// 3. serde_json::Value : la réponse a trois formes possibles, on inspecte
//    le JSON avant de le convertir
// ============================================================================

use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info, instrument, warn};

use crate::error::SearchError;
use crate::models::{Card, Language, ALL_RARITY, ALL_SETS};

/// URL de l'API en production
pub const DEFAULT_API_URL: &str = "https://pokemongradingtool-production.up.railway.app";

/// Chemin de l'endpoint de recherche
pub const SEARCH_PATH: &str = "/api/cards/scrape_and_save/";

// ============================================================================
// SearchQuery : paramètres d'une recherche
// ============================================================================

/// Paramètres saisis dans le formulaire
#[derive(Debug, Clone, PartialEq)]
pub struct SearchQuery {
    pub card_name: String,
    pub card_number: String,

    /// Nom du set ou "All Sets"
    pub set_name: String,

    pub language: Language,

    /// Rareté ou "All"
    pub rarity: String,
}

impl SearchQuery {
    /// Recherche par nom seul
    pub fn by_name(card_name: &str, language: Language) -> Self {
        Self {
            card_name: card_name.to_string(),
            card_number: String::new(),
            set_name: ALL_SETS.to_string(),
            language,
            rarity: ALL_RARITY.to_string(),
        }
    }

    /// Set choisi, ou None pour "All Sets"
    pub fn specific_set(&self) -> Option<&str> {
        let set = self.set_name.trim();
        (!set.is_empty() && set != ALL_SETS).then_some(set)
    }

    fn specific_rarity(&self) -> Option<&str> {
        let rarity = self.rarity.trim();
        (!rarity.is_empty() && rarity != ALL_RARITY).then_some(rarity)
    }

    /// Vérifie qu'il y a de quoi chercher
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.card_name.trim().is_empty()
            && self.card_number.trim().is_empty()
            && self.specific_set().is_none()
        {
            return Err(SearchError::MissingInput);
        }
        Ok(())
    }

    /// Paramètres de la query string
    ///
    /// `searchQuery` prend le nom, sinon le numéro, sinon le set.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        let name = self.card_name.trim();
        let number = self.card_number.trim();

        let search_term = if !name.is_empty() {
            name
        } else if !number.is_empty() {
            number
        } else {
            self.specific_set().unwrap_or_default()
        };

        let mut params = vec![
            ("searchQuery", search_term.to_string()),
            ("language", self.language.label().to_string()),
        ];

        if let Some(set) = self.specific_set() {
            params.push(("set_name", set.to_string()));
        }
        if !name.is_empty() && !number.is_empty() {
            params.push(("card_number", number.to_string()));
        }
        if let Some(rarity) = self.specific_rarity() {
            params.push(("rarity", rarity.to_string()));
        }

        params
    }
}

// ============================================================================
// GradingClient
// ============================================================================

/// Client HTTP vers l'API de prix
#[derive(Debug, Clone)]
pub struct GradingClient {
    http: reqwest::Client,
    base_url: String,
}

impl GradingClient {
    /// Crée un client pour `base_url` (sans slash final)
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SearchError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("pokegrade/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Lance une recherche
    ///
    /// La requête est validée avant l'envoi : une requête vide ne part
    /// jamais sur le réseau. Pas de retry.
    #[instrument(skip(self, query), fields(search = %query.card_name, language = %query.language))]
    pub async fn search(&self, query: &SearchQuery) -> Result<Vec<Card>, SearchError> {
        query.validate()?;

        let url = format!("{}{}", self.base_url, SEARCH_PATH);
        let params = query.params();
        debug!(url = %url, ?params, "Sending search request");

        let response = self.http.get(&url).query(&params).send().await.map_err(|e| {
            error!(error = %e, "Search request failed");
            SearchError::Transport(e)
        })?;

        let status = response.status();
        debug!(status = %status, "Received HTTP response");

        if !status.is_success() {
            error!(status = %status, "Pricing API returned error status");
            return Err(SearchError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        let value: Value = serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Response body is not JSON");
            SearchError::InvalidFormat
        })?;

        let cards = parse_response(value)?;
        info!(cards = cards.len(), "Search completed");
        Ok(cards)
    }
}

/// Convertit la réponse JSON en liste de cartes
///
/// Trois formes acceptées :
/// - `[ {...}, ... ]`
/// - `{ "error": "..." }` (erreur métier, ignorée si vide)
/// - `{ "cards": [ ... ] }`
pub fn parse_response(value: Value) -> Result<Vec<Card>, SearchError> {
    match value {
        Value::Array(items) => cards_from_items(items),
        Value::Object(mut object) => {
            match object.get("error") {
                Some(Value::String(message)) if !message.trim().is_empty() => {
                    warn!(error = %message, "Pricing API reported an error");
                    return Err(SearchError::Api(message.clone()));
                }
                _ => {}
            }
            match object.remove("cards") {
                Some(Value::Array(items)) => cards_from_items(items),
                _ => Err(SearchError::InvalidFormat),
            }
        }
        _ => Err(SearchError::InvalidFormat),
    }
}

fn cards_from_items(items: Vec<Value>) -> Result<Vec<Card>, SearchError> {
    items
        .into_iter()
        .map(|item| match item {
            Value::Object(_) => serde_json::from_value::<Card>(item).map_err(|e| {
                warn!(error = %e, "Card record could not be decoded");
                SearchError::InvalidFormat
            }),
            _ => Err(SearchError::InvalidFormat),
        })
        .collect()
}

// ============================================================================
// Tests unitaires
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn card_json(name: &str, delta: &str) -> Value {
        json!({
            "card_name": name,
            "card_number": "001",
            "set_name": "SV08: Surging Sparks",
            "rarity": "Hyper Rare",
            "tcgplayer_price": "10.00",
            "psa_10_price": "110.00",
            "price_delta": delta,
            "profit_potential": "1000",
            "product_id": "12345"
        })
    }

    fn client_for(server: &MockServer) -> GradingClient {
        GradingClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = GradingClient::new("http://localhost:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
    }

    #[test]
    fn test_validate_requires_some_input() {
        let mut query = SearchQuery::by_name("", Language::English);
        assert!(matches!(query.validate(), Err(SearchError::MissingInput)));

        query.card_name = "   ".to_string();
        assert!(query.validate().is_err());

        query.set_name = "SV07: Stellar Crown".to_string();
        assert!(query.validate().is_ok());
    }

    #[test]
    fn test_params_name_only() {
        let query = SearchQuery::by_name(" Pikachu ", Language::Japanese);
        assert_eq!(
            query.params(),
            vec![
                ("searchQuery", "Pikachu".to_string()),
                ("language", "Japanese".to_string()),
            ]
        );
    }

    #[test]
    fn test_params_with_everything() {
        let query = SearchQuery {
            card_name: "Pikachu".to_string(),
            card_number: "238".to_string(),
            set_name: "SV08: Surging Sparks".to_string(),
            language: Language::English,
            rarity: "Hyper Rare".to_string(),
        };

        let params = query.params();
        assert!(params.contains(&("set_name", "SV08: Surging Sparks".to_string())));
        assert!(params.contains(&("card_number", "238".to_string())));
        assert!(params.contains(&("rarity", "Hyper Rare".to_string())));
    }

    #[test]
    fn test_params_fall_back_to_number_then_set() {
        let mut query = SearchQuery::by_name("", Language::English);
        query.card_number = "238/191".to_string();
        assert_eq!(query.params()[0], ("searchQuery", "238/191".to_string()));

        query.card_number.clear();
        query.set_name = "SV07: Stellar Crown".to_string();
        assert_eq!(query.params()[0], ("searchQuery", "SV07: Stellar Crown".to_string()));
    }

    #[test]
    fn test_parse_response_shapes() {
        let cards = parse_response(json!([card_json("A", "1")])).unwrap();
        assert_eq!(cards.len(), 1);

        let cards = parse_response(json!({ "message": "ok", "cards": [card_json("B", "2")] })).unwrap();
        assert_eq!(cards[0].card_name.as_deref(), Some("B"));

        let err = parse_response(json!({ "error": "No cards found for query" })).unwrap_err();
        assert_eq!(err.to_string(), "No cards found for query");

        // Champ error vide : les cartes restent valides
        let cards = parse_response(json!({ "error": "", "cards": [card_json("Pikachu", "5")] })).unwrap();
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].card_name.as_deref(), Some("Pikachu"));
        assert!(matches!(parse_response(json!({ "error": "  " })), Err(SearchError::InvalidFormat)));

        assert!(matches!(parse_response(json!({ "foo": 1 })), Err(SearchError::InvalidFormat)));
        assert!(matches!(parse_response(json!("text")), Err(SearchError::InvalidFormat)));
        assert!(matches!(parse_response(json!([1, 2])), Err(SearchError::InvalidFormat)));
    }

    #[tokio::test]
    async fn test_search_sends_name_and_language() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .and(query_param("searchQuery", "Pikachu"))
            .and(query_param("language", "English"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                card_json("Pikachu ex - 238/191", "100"),
                card_json("Pikachu - 063/191", "5"),
            ])))
            .expect(1)
            .mount(&server)
            .await;

        let cards = client_for(&server)
            .search(&SearchQuery::by_name("Pikachu", Language::English))
            .await
            .unwrap();

        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0].display_name(), "Pikachu ex");

        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 1);
        let pairs: Vec<(String, String)> = requests[0]
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("searchQuery".to_string(), "Pikachu".to_string()),
                ("language".to_string(), "English".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn test_search_rejects_empty_query_without_request() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(0)
            .mount(&server)
            .await;

        let result = client_for(&server)
            .search(&SearchQuery::by_name("", Language::English))
            .await;

        assert!(matches!(result, Err(SearchError::MissingInput)));
        assert!(server.received_requests().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_search_http_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(ResponseTemplate::new(502))
            .mount(&server)
            .await;

        let result = client_for(&server)
            .search(&SearchQuery::by_name("Eevee", Language::English))
            .await;

        match result {
            Err(SearchError::Http { status }) => assert_eq!(status, 502),
            other => panic!("expected HTTP error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_timeout_is_transport_error() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(SEARCH_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([]))
                    .set_delay(Duration::from_secs(2)),
            )
            .mount(&server)
            .await;

        let client = GradingClient::new(&server.uri(), Duration::from_millis(200)).unwrap();
        let result = client.search(&SearchQuery::by_name("Snorlax", Language::English)).await;

        match result {
            Err(SearchError::Transport(e)) => assert!(e.is_timeout()),
            other => panic!("expected transport error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_search_api_error_and_bad_body() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(query_param("searchQuery", "Missingno"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "error": "Scrape failed" })))
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(query_param("searchQuery", "Garbage"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let client = client_for(&server);

        let api_error = client
            .search(&SearchQuery::by_name("Missingno", Language::English))
            .await
            .unwrap_err();
        assert!(matches!(api_error, SearchError::Api(ref message) if message == "Scrape failed"));

        let format_error = client
            .search(&SearchQuery::by_name("Garbage", Language::English))
            .await
            .unwrap_err();
        assert!(matches!(format_error, SearchError::InvalidFormat));
    }
}
