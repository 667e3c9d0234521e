// ============================================================================
// Pagination
// ============================================================================
// Pages numérotées à partir de 1. Une page hors limites est ramenée dans
// [1, page_count] au lieu de produire une erreur.
// ============================================================================

/// Nombre de cartes par page par défaut
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Page demandée
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSpec {
    /// Numéro de page (1-based)
    pub page: usize,

    /// Taille de page (0 est traité comme 1)
    pub page_size: usize,
}

impl PageSpec {
    pub fn new(page: usize, page_size: usize) -> Self {
        Self { page, page_size }
    }

    /// Première page avec la taille donnée
    pub fn first(page_size: usize) -> Self {
        Self::new(1, page_size)
    }

    fn effective_size(&self) -> usize {
        self.page_size.max(1)
    }

    /// Nombre de pages pour `total` éléments
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.effective_size())
    }

    /// Page effective après clamp
    pub fn clamped_page(&self, total: usize) -> usize {
        self.page.clamp(1, self.page_count(total).max(1))
    }

    /// Intervalle d'indices [start, end) de la page effective
    pub fn bounds(&self, total: usize) -> (usize, usize) {
        let size = self.effective_size();
        let start = ((self.clamped_page(total) - 1) * size).min(total);
        let end = (start + size).min(total);
        (start, end)
    }
}

impl Default for PageSpec {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_count() {
        let spec = PageSpec::default();
        assert_eq!(spec.page_count(0), 0);
        assert_eq!(spec.page_count(10), 1);
        assert_eq!(spec.page_count(11), 2);
        assert_eq!(spec.page_count(25), 3);
    }

    #[test]
    fn test_bounds_and_clamp() {
        assert_eq!(PageSpec::new(1, 10).bounds(25), (0, 10));
        assert_eq!(PageSpec::new(3, 10).bounds(25), (20, 25));
        assert_eq!(PageSpec::new(4, 10).clamped_page(25), 3);
        assert_eq!(PageSpec::new(4, 10).bounds(25), (20, 25));
        assert_eq!(PageSpec::new(0, 10).clamped_page(25), 1);
    }

    #[test]
    fn test_empty_and_zero_size() {
        assert_eq!(PageSpec::new(5, 10).clamped_page(0), 1);
        assert_eq!(PageSpec::new(5, 10).bounds(0), (0, 0));
        assert_eq!(PageSpec::new(2, 0).bounds(3), (1, 2));
    }
}
