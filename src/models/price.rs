// ============================================================================
// Prix : parsing tolérant des champs numériques
// ============================================================================
// L'API renvoie les prix sous forme de chaînes ("$1,234.50", "12.00", "45%")
// et parfois rien du tout. On ne garde que les chiffres, le point et le
// signe moins avant de parser.
// ============================================================================

/// Parse une chaîne de prix en f64
///
/// Retourne None si la chaîne ne contient aucun nombre exploitable.
///
/// # Exemple
/// assert_eq!(parse_price("$1,234.50"), Some(1234.5));
pub fn parse_price(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    if cleaned.is_empty() {
        return None;
    }

    cleaned.parse::<f64>().ok().filter(|value| value.is_finite())
}

/// Parse un champ optionnel, les valeurs inconnues valent 0
pub fn price_or_zero(raw: Option<&str>) -> f64 {
    raw.and_then(parse_price).unwrap_or(0.0)
}

/// Formate un prix pour l'affichage dans la table
pub fn format_money(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => match parse_price(value) {
            Some(parsed) => format!("${:.2}", parsed),
            None => value.to_string(),
        },
        None => "N/A".to_string(),
    }
}

/// Formate un pourcentage (profit potential)
pub fn format_percent(raw: Option<&str>) -> String {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(value) => match parse_price(value) {
            Some(parsed) => format!("{:.1}%", parsed),
            None => value.to_string(),
        },
        None => "N/A".to_string(),
    }
}
