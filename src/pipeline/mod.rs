// ============================================================================
// Module : pipeline
// ============================================================================
// Filtre -> tri -> pagination des cartes reçues de l'API.
//
// Fonction pure : mêmes entrées, même sortie, aucun effet de bord.
// Les références renvoyées empruntent la liste d'origine (pas de copie).
// ============================================================================

pub mod filter; // Rareté, price delta, texte libre
pub mod page;   // Pagination
pub mod sort;   // Colonnes et sens de tri

pub use filter::{DeltaFilter, DeltaOp, FilterSpec, InvalidDeltaFilter};
pub use page::{PageSpec, DEFAULT_PAGE_SIZE};
pub use sort::{SortColumn, SortDirection, SortSpec};

use crate::models::Card;

/// Page visible de la table
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<'a> {
    /// Cartes de la page courante, dans l'ordre de tri
    pub records: Vec<&'a Card>,

    /// Page effective (1-based, après clamp)
    pub page: usize,

    pub page_count: usize,

    /// Nombre total de cartes après filtrage
    pub total: usize,
}

impl PageView<'_> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}

/// Filtre puis trie les cartes
pub fn filter_and_sort<'a>(cards: &'a [Card], filter: &FilterSpec, sort: &SortSpec) -> Vec<&'a Card> {
    let mut matching: Vec<&Card> = cards.iter().filter(|card| filter.matches(card)).collect();
    sort.sort(&mut matching);
    matching
}

/// Exécute le pipeline complet et renvoie la page demandée
///
/// # Exemple
/// let view = pipeline::run(&cards, &FilterSpec::default(), &SortSpec::default(), PageSpec::default());
/// println!("page {}/{}", view.page, view.page_count);
pub fn run<'a>(cards: &'a [Card], filter: &FilterSpec, sort: &SortSpec, page: PageSpec) -> PageView<'a> {
    let matching = filter_and_sort(cards, filter, sort);
    let total = matching.len();
    let (start, end) = page.bounds(total);

    PageView {
        records: matching[start..end].to_vec(),
        page: page.clamped_page(total),
        page_count: page.page_count(total),
        total,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn numbered_cards(count: usize) -> Vec<Card> {
        (1..=count)
            .map(|i| Card {
                card_name: Some(format!("Card {:02}", i)),
                price_delta: Some(format!("{}", i * 10)),
                rarity: Some(if i % 2 == 0 { "Hyper Rare" } else { "Ultra Rare" }.to_string()),
                ..Default::default()
            })
            .collect()
    }

    #[test]
    fn test_pages_of_25_records() {
        let cards = numbered_cards(25);
        let filter = FilterSpec::default();
        let sort = SortSpec::default();

        let first = run(&cards, &filter, &sort, PageSpec::new(1, 10));
        assert_eq!(first.page_count, 3);
        assert_eq!(first.records.len(), 10);
        assert_eq!(first.records[0].display_name(), "Card 01");
        assert_eq!(first.records[9].display_name(), "Card 10");

        let third = run(&cards, &filter, &sort, PageSpec::new(3, 10));
        assert_eq!(third.records.len(), 5);
        assert_eq!(third.records[0].display_name(), "Card 21");
        assert_eq!(third.records[4].display_name(), "Card 25");

        let fourth = run(&cards, &filter, &sort, PageSpec::new(4, 10));
        assert_eq!(fourth.page, 3);
        assert_eq!(fourth.records, third.records);
    }

    #[test]
    fn test_filters_apply_before_pagination() {
        let cards = numbered_cards(25);
        let filter = FilterSpec {
            rarity: "Hyper Rare".to_string(),
            delta: DeltaFilter::parse(">100").unwrap(),
            ..Default::default()
        };
        let sort = SortSpec::new(SortColumn::PriceDelta, SortDirection::Descending);

        let view = run(&cards, &filter, &sort, PageSpec::new(1, 10));

        // Pairs de 12 à 24 : 7 cartes
        assert_eq!(view.total, 7);
        assert_eq!(view.page_count, 1);
        assert_eq!(view.records[0].display_name(), "Card 24");
        assert_eq!(view.records[6].display_name(), "Card 12");
    }

    #[test]
    fn test_no_match_gives_empty_view() {
        let cards = numbered_cards(3);
        let filter = FilterSpec {
            delta: DeltaFilter::parse(">10000").unwrap(),
            ..Default::default()
        };

        let view = run(&cards, &filter, &SortSpec::default(), PageSpec::new(2, 10));
        assert!(view.is_empty());
        assert_eq!(view.page, 1);
        assert_eq!(view.page_count, 0);
        assert!(view.records.is_empty());
    }
}
