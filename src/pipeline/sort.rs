// ============================================================================
// Tri des cartes
// ============================================================================
// CONCEPTS RUST :
// 1. Ordering : résultat d'une comparaison (Less, Equal, Greater)
// 2. sort_by est stable : les égalités gardent l'ordre d'origine
// 3. f64::total_cmp : ordre total sur les flottants (pas de NaN piégeux)
// ============================================================================

use std::cmp::Ordering;

use crate::models::price::price_or_zero;
use crate::models::Card;

/// Colonnes triables de la table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortColumn {
    #[default]
    CardName,
    CardNumber,
    SetName,
    Rarity,
    TcgplayerPrice,
    Psa10Price,
    PriceDelta,
    ProfitPotential,
    LastUpdated,
}

impl SortColumn {
    /// Toutes les colonnes, dans l'ordre d'affichage
    pub const ALL: [SortColumn; 9] = [
        SortColumn::CardName,
        SortColumn::CardNumber,
        SortColumn::SetName,
        SortColumn::Rarity,
        SortColumn::TcgplayerPrice,
        SortColumn::Psa10Price,
        SortColumn::PriceDelta,
        SortColumn::ProfitPotential,
        SortColumn::LastUpdated,
    ];

    /// Colonne à la position `index` (0-based)
    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// En-tête de colonne
    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::CardName => "Card Name",
            SortColumn::CardNumber => "Number",
            SortColumn::SetName => "Set",
            SortColumn::Rarity => "Rarity",
            SortColumn::TcgplayerPrice => "TCGPlayer",
            SortColumn::Psa10Price => "PSA 10",
            SortColumn::PriceDelta => "Delta",
            SortColumn::ProfitPotential => "Profit",
            SortColumn::LastUpdated => "Updated",
        }
    }

    /// Les colonnes de prix sont comparées numériquement
    pub fn is_numeric(&self) -> bool {
        matches!(
            self,
            SortColumn::TcgplayerPrice
                | SortColumn::Psa10Price
                | SortColumn::PriceDelta
                | SortColumn::ProfitPotential
        )
    }

    /// Valeur brute du champ correspondant
    pub fn raw<'a>(&self, card: &'a Card) -> Option<&'a str> {
        let field = match self {
            SortColumn::CardName => &card.card_name,
            SortColumn::CardNumber => &card.card_number,
            SortColumn::SetName => &card.set_name,
            SortColumn::Rarity => &card.rarity,
            SortColumn::TcgplayerPrice => &card.tcgplayer_price,
            SortColumn::Psa10Price => &card.psa_10_price,
            SortColumn::PriceDelta => &card.price_delta,
            SortColumn::ProfitPotential => &card.profit_potential,
            SortColumn::LastUpdated => &card.last_updated,
        };
        field.as_deref()
    }

    /// Compare deux cartes sur cette colonne (ordre ascendant)
    pub fn compare(&self, a: &Card, b: &Card) -> Ordering {
        if self.is_numeric() {
            price_or_zero(self.raw(a)).total_cmp(&price_or_zero(self.raw(b)))
        } else {
            self.raw(a).unwrap_or("").cmp(self.raw(b).unwrap_or(""))
        }
    }
}

/// Sens du tri
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggle(&self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }

    /// Flèche affichée dans l'en-tête
    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Ascending => "↑",
            SortDirection::Descending => "↓",
        }
    }
}

/// Colonne et sens du tri courant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortSpec {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Clic sur un en-tête
    ///
    /// Même colonne : inverse le sens. Nouvelle colonne : ascendant.
    pub fn select(&mut self, column: SortColumn) {
        if self.column == column {
            self.direction = self.direction.toggle();
        } else {
            self.column = column;
            self.direction = SortDirection::Ascending;
        }
    }

    pub fn compare(&self, a: &Card, b: &Card) -> Ordering {
        let ordering = self.column.compare(a, b);
        match self.direction {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }

    /// Trie une liste de références en place (tri stable)
    pub fn sort(&self, cards: &mut [&Card]) {
        cards.sort_by(|a, b| self.compare(a, b));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn delta_card(delta: &str) -> Card {
        Card {
            price_delta: Some(delta.to_string()),
            ..Default::default()
        }
    }

    fn named(name: &str) -> Card {
        Card {
            card_name: Some(name.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_numeric_sort_is_not_lexicographic() {
        let cards = [delta_card("$1,234.50"), delta_card("$12.00"), delta_card("$999")];
        let mut refs: Vec<&Card> = cards.iter().collect();

        SortSpec::new(SortColumn::PriceDelta, SortDirection::Ascending).sort(&mut refs);

        let deltas: Vec<&str> = refs.iter().map(|c| c.price_delta.as_deref().unwrap()).collect();
        assert_eq!(deltas, vec!["$12.00", "$999", "$1,234.50"]);
    }

    #[test]
    fn test_text_sort_is_lexicographic() {
        let cards = [named("Umbreon ex"), named("Eevee"), named("Pikachu")];
        let mut refs: Vec<&Card> = cards.iter().collect();

        SortSpec::default().sort(&mut refs);

        let names: Vec<&str> = refs.iter().map(|c| c.display_name()).collect();
        assert_eq!(names, vec!["Eevee", "Pikachu", "Umbreon ex"]);
    }

    #[test]
    fn test_descending_is_exact_reverse_without_ties() {
        let cards = [delta_card("5"), delta_card("-3"), delta_card("40"), delta_card("12")];

        let mut ascending: Vec<&Card> = cards.iter().collect();
        SortSpec::new(SortColumn::PriceDelta, SortDirection::Ascending).sort(&mut ascending);

        let mut descending: Vec<&Card> = cards.iter().collect();
        SortSpec::new(SortColumn::PriceDelta, SortDirection::Descending).sort(&mut descending);

        descending.reverse();
        assert_eq!(ascending, descending);
    }

    #[test]
    fn test_unknown_numeric_values_sort_as_zero() {
        let cards = [delta_card("10"), Card::default(), delta_card("-10")];
        let mut refs: Vec<&Card> = cards.iter().collect();

        SortSpec::new(SortColumn::PriceDelta, SortDirection::Ascending).sort(&mut refs);

        assert_eq!(refs[0].price_delta.as_deref(), Some("-10"));
        assert_eq!(refs[1].price_delta, None);
        assert_eq!(refs[2].price_delta.as_deref(), Some("10"));
    }

    #[test]
    fn test_select_toggles_and_resets() {
        let mut spec = SortSpec::default();
        assert_eq!(spec.column, SortColumn::CardName);
        assert_eq!(spec.direction, SortDirection::Ascending);

        spec.select(SortColumn::CardName);
        assert_eq!(spec.direction, SortDirection::Descending);

        spec.select(SortColumn::CardName);
        assert_eq!(spec.direction, SortDirection::Ascending);

        spec.select(SortColumn::CardName);
        spec.select(SortColumn::PriceDelta);
        assert_eq!(spec.column, SortColumn::PriceDelta);
        assert_eq!(spec.direction, SortDirection::Ascending);
    }

    #[test]
    fn test_from_index() {
        assert_eq!(SortColumn::from_index(0), Some(SortColumn::CardName));
        assert_eq!(SortColumn::from_index(6), Some(SortColumn::PriceDelta));
        assert_eq!(SortColumn::from_index(9), None);
    }
}
