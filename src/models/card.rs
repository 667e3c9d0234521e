// ============================================================================
// Structure : Card
// ============================================================================
// Une carte renvoyée par l'API de prix (scrape TCGPlayer + prix PSA 10)
//
// CONCEPTS RUST :
// 1. Option<String> partout : l'API n'est pas fiable, tout champ peut manquer
// 2. deserialize_with : accepte indifféremment "12.50", 12.5 ou null
// 3. Méthodes d'affichage qui ne paniquent jamais
// ============================================================================

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::models::price::price_or_zero;

/// Base des liens vers la fiche produit TCGPlayer
pub const MARKETPLACE_PRODUCT_URL: &str = "https://www.tcgplayer.com/product";

/// Séparateur entre nom et numéro dans `card_name` ("Pikachu ex - 238/191")
const NAME_NUMBER_SEPARATOR: &str = " - ";

/// Carte telle que renvoyée par l'API
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Card {
    /// Nom affiché, peut contenir "nom - numéro"
    #[serde(default, deserialize_with = "lenient_string")]
    pub card_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub card_number: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub set_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub rarity: Option<String>,

    /// Prix TCGPlayer (chaîne décimale)
    #[serde(default, deserialize_with = "lenient_string")]
    pub tcgplayer_price: Option<String>,

    /// Prix gradé PSA 10
    #[serde(default, deserialize_with = "lenient_string")]
    pub psa_10_price: Option<String>,

    /// Différence PSA 10 - TCGPlayer, calculée par l'API
    #[serde(default, deserialize_with = "lenient_string")]
    pub price_delta: Option<String>,

    /// Potentiel de profit en pourcentage
    #[serde(default, deserialize_with = "lenient_string")]
    pub profit_potential: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub last_updated: Option<String>,

    /// Identifiant produit TCGPlayer (opaque)
    #[serde(default, deserialize_with = "lenient_string")]
    pub product_id: Option<String>,

    #[serde(default, deserialize_with = "lenient_string")]
    pub language: Option<String>,
}

/// Accepte une chaîne, un nombre, un booléen ou null
///
/// CONCEPT RUST : Deserializer custom
/// - On passe par serde_json::Value pour inspecter le type réel
/// - Les nombres gardent leur représentation décimale
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(Value::String(s)) => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        Some(Value::Bool(b)) => Some(b.to_string()),
        _ => None,
    })
}

impl Card {
    /// Nom seul (partie avant " - "), "Unknown Card" si absent
    pub fn display_name(&self) -> &str {
        self.card_name
            .as_deref()
            .and_then(|name| name.split(NAME_NUMBER_SEPARATOR).next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .unwrap_or("Unknown Card")
    }

    /// Numéro résolu : partie après " - " dans le nom, sinon `card_number`
    pub fn resolved_number(&self) -> Option<&str> {
        self.card_name
            .as_deref()
            .and_then(|name| name.split(NAME_NUMBER_SEPARATOR).nth(1))
            .map(str::trim)
            .filter(|number| !number.is_empty())
            .or_else(|| {
                self.card_number
                    .as_deref()
                    .map(str::trim)
                    .filter(|number| !number.is_empty())
            })
    }

    /// Numéro pour l'affichage, "N/A" si inconnu
    pub fn display_number(&self) -> &str {
        self.resolved_number().unwrap_or("N/A")
    }

    /// Price delta numérique (0 si absent ou illisible)
    pub fn delta_value(&self) -> f64 {
        price_or_zero(self.price_delta.as_deref())
    }

    /// Date de dernière mise à jour
    ///
    /// Essaie RFC 3339, puis les formats naïfs renvoyés par le backend.
    pub fn last_updated_at(&self) -> Option<NaiveDateTime> {
        let raw = self.last_updated.as_deref()?.trim();

        if let Ok(datetime) = DateTime::parse_from_rfc3339(raw) {
            return Some(datetime.naive_utc());
        }

        for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
            if let Ok(datetime) = NaiveDateTime::parse_from_str(raw, format) {
                return Some(datetime);
            }
        }

        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .and_then(|date| date.and_hms_opt(0, 0, 0))
    }

    /// Date formatée pour la table
    pub fn display_last_updated(&self) -> String {
        match self.last_updated_at() {
            Some(datetime) => datetime.format("%Y-%m-%d").to_string(),
            None => self
                .last_updated
                .clone()
                .filter(|raw| !raw.trim().is_empty())
                .unwrap_or_else(|| "N/A".to_string()),
        }
    }

    /// Lien vers la fiche produit du marketplace
    pub fn marketplace_url(&self) -> Option<String> {
        self.product_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .map(|id| format!("{}/{}", MARKETPLACE_PRODUCT_URL, id))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_mixed_types() {
        let json = serde_json::json!({
            "card_name": "Pikachu ex - 238/191",
            "card_number": 238,
            "price_delta": 120.5,
            "psa_10_price": null,
            "rarity": "Special Illustration Rare"
        });

        let card: Card = serde_json::from_value(json).unwrap();
        assert_eq!(card.card_number.as_deref(), Some("238"));
        assert_eq!(card.price_delta.as_deref(), Some("120.5"));
        assert_eq!(card.psa_10_price, None);
        assert_eq!(card.set_name, None);
    }

    #[test]
    fn test_display_name_splits_composite() {
        let card = Card {
            card_name: Some("Pikachu ex - 238/191".to_string()),
            card_number: Some("999".to_string()),
            ..Default::default()
        };

        assert_eq!(card.display_name(), "Pikachu ex");
        assert_eq!(card.display_number(), "238/191");
    }

    #[test]
    fn test_number_falls_back_to_field() {
        let card = Card {
            card_name: Some("Latias ex".to_string()),
            card_number: Some("239/191".to_string()),
            ..Default::default()
        };
        assert_eq!(card.display_number(), "239/191");

        let empty = Card::default();
        assert_eq!(empty.display_name(), "Unknown Card");
        assert_eq!(empty.display_number(), "N/A");
    }

    #[test]
    fn test_delta_value_unknown_is_zero() {
        let card = Card {
            price_delta: Some("n/a".to_string()),
            ..Default::default()
        };
        assert_eq!(card.delta_value(), 0.0);
    }

    #[test]
    fn test_last_updated_formats() {
        let mut card = Card {
            last_updated: Some("2024-11-08T14:03:22.123456Z".to_string()),
            ..Default::default()
        };
        assert_eq!(card.display_last_updated(), "2024-11-08");

        card.last_updated = Some("2024-11-08T14:03:22.123456".to_string());
        assert_eq!(card.display_last_updated(), "2024-11-08");

        card.last_updated = Some("2024-11-08".to_string());
        assert!(card.last_updated_at().is_some());

        card.last_updated = Some("yesterday".to_string());
        assert_eq!(card.display_last_updated(), "yesterday");
    }

    #[test]
    fn test_marketplace_url() {
        let card = Card {
            product_id: Some("562345".to_string()),
            ..Default::default()
        };
        assert_eq!(
            card.marketplace_url().as_deref(),
            Some("https://www.tcgplayer.com/product/562345")
        );
        assert_eq!(Card::default().marketplace_url(), None);
    }
}
