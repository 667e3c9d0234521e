// ============================================================================
// Filtres : rareté, price delta, texte libre
// ============================================================================
// Tous les filtres actifs sont combinés avec un ET logique.
// ============================================================================

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::models::{Card, ALL_RARITY};

/// Borne du slider de price delta (en dollars)
pub const DELTA_SLIDER_LIMIT: i32 = 1000;

/// Opérateur du filtre de price delta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeltaOp {
    /// `>N` : strictement supérieur
    Greater,
    /// `<N` : strictement inférieur
    Less,
}

/// Filtre de price delta, ex: `>500` ou `<200`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeltaFilter {
    pub op: DeltaOp,
    pub threshold: f64,
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid price delta filter {0:?} (expected >N or <N)")]
pub struct InvalidDeltaFilter(pub String);

impl DeltaFilter {
    /// Parse une expression de filtre
    ///
    /// - "" (ou espaces) : Ok(None), pas de filtre
    /// - ">500", "< 12.5", ">-20" : Ok(Some(filtre))
    /// - tout le reste : Err
    pub fn parse(expr: &str) -> Result<Option<Self>, InvalidDeltaFilter> {
        let expr = expr.trim();
        if expr.is_empty() {
            return Ok(None);
        }

        let (op, rest) = if let Some(rest) = expr.strip_prefix('>') {
            (DeltaOp::Greater, rest)
        } else if let Some(rest) = expr.strip_prefix('<') {
            (DeltaOp::Less, rest)
        } else {
            return Err(InvalidDeltaFilter(expr.to_string()));
        };

        let threshold = rest
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite())
            .ok_or_else(|| InvalidDeltaFilter(expr.to_string()))?;

        Ok(Some(Self { op, threshold }))
    }

    /// Vrai si la carte passe le filtre (delta inconnu = 0)
    pub fn matches(&self, card: &Card) -> bool {
        let delta = card.delta_value();
        match self.op {
            DeltaOp::Greater => delta > self.threshold,
            DeltaOp::Less => delta < self.threshold,
        }
    }

    /// Position équivalente sur le slider [-1000, 1000]
    pub fn slider_value(&self) -> i32 {
        let magnitude = self.threshold.abs().min(DELTA_SLIDER_LIMIT as f64) as i32;
        match self.op {
            DeltaOp::Greater => magnitude,
            DeltaOp::Less => -magnitude,
        }
    }
}

impl FromStr for DeltaFilter {
    type Err = InvalidDeltaFilter;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeltaFilter::parse(s)?.ok_or_else(|| InvalidDeltaFilter(s.to_string()))
    }
}

impl fmt::Display for DeltaFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let op = match self.op {
            DeltaOp::Greater => '>',
            DeltaOp::Less => '<',
        };
        write!(f, "{}{}", op, self.threshold)
    }
}

/// Expression de filtre correspondant à une position du slider
///
/// 0 : pas de filtre, négatif : `<|v|`, positif : `>v`
pub fn delta_expr_from_slider(value: i32) -> String {
    let value = value.clamp(-DELTA_SLIDER_LIMIT, DELTA_SLIDER_LIMIT);
    match value {
        0 => String::new(),
        v if v < 0 => format!("<{}", v.abs()),
        v => format!(">{}", v),
    }
}

/// Position du slider pour une expression (0 si vide ou invalide)
pub fn slider_from_delta_expr(expr: &str) -> i32 {
    match DeltaFilter::parse(expr) {
        Ok(Some(filter)) => filter.slider_value(),
        _ => 0,
    }
}

// ============================================================================
// FilterSpec : combinaison de tous les filtres
// ============================================================================

/// Ensemble des filtres appliqués à la liste de cartes
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSpec {
    /// Sous-chaîne du nom (insensible à la casse), vide = pas de filtre
    pub name: String,

    /// Sous-chaîne du numéro (insensible à la casse), vide = pas de filtre
    pub number: String,

    /// Rareté exacte, "All" ou vide = pas de filtre
    pub rarity: String,

    pub delta: Option<DeltaFilter>,
}

impl FilterSpec {
    /// Vrai si la carte passe tous les filtres actifs
    pub fn matches(&self, card: &Card) -> bool {
        self.matches_rarity(card)
            && self.delta.map_or(true, |delta| delta.matches(card))
            && self.matches_name(card)
            && self.matches_number(card)
    }

    fn matches_rarity(&self, card: &Card) -> bool {
        if self.rarity.is_empty() || self.rarity == ALL_RARITY {
            return true;
        }
        card.rarity.as_deref() == Some(self.rarity.as_str())
    }

    fn matches_name(&self, card: &Card) -> bool {
        let needle = self.name.trim();
        needle.is_empty() || contains_ignore_case(card.card_name.as_deref(), needle)
    }

    fn matches_number(&self, card: &Card) -> bool {
        let needle = self.number.trim();
        needle.is_empty()
            || contains_ignore_case(card.resolved_number(), needle)
            || contains_ignore_case(card.card_number.as_deref(), needle)
    }
}

fn contains_ignore_case(haystack: Option<&str>, needle: &str) -> bool {
    haystack
        .map(|value| value.to_lowercase().contains(&needle.to_lowercase()))
        .unwrap_or(false)
}
