// ============================================================================
// Configuration
// ============================================================================
// Trois couches, de la plus faible à la plus forte :
// 1. Valeurs par défaut
// 2. Variables d'environnement (un fichier .env est chargé s'il existe)
// 3. Arguments de la ligne de commande
//
// CONCEPT RUST : clap derive
// - #[arg(env = "...")] : clap lit la variable si l'argument est absent
// - L'ordre de priorité CLI > env > défaut est géré par clap
// ============================================================================

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};
use clap::Parser;

use crate::api::{SearchQuery, DEFAULT_API_URL};
use crate::models::{Language, ALL_RARITY, ALL_SETS};
use crate::pipeline::DEFAULT_PAGE_SIZE;

/// Arguments de la ligne de commande
#[derive(Parser, Debug)]
#[command(name = "pokegrade")]
#[command(version, about = "Search Pokémon card prices and PSA 10 price deltas", long_about = None)]
pub struct Cli {
    /// Base URL of the pricing API
    #[arg(long, env = "POKEGRADE_API_URL", default_value = DEFAULT_API_URL)]
    pub api_url: String,

    /// Cards per table page
    #[arg(long, env = "POKEGRADE_PAGE_SIZE", default_value_t = DEFAULT_PAGE_SIZE)]
    pub page_size: usize,

    /// HTTP timeout in seconds
    #[arg(long, env = "POKEGRADE_TIMEOUT_SECS", default_value_t = 30)]
    pub timeout_secs: u64,

    /// Directory for the rolling log files
    #[arg(long, env = "POKEGRADE_LOG_DIR")]
    pub log_dir: Option<PathBuf>,

    /// Card language (English or Japanese)
    #[arg(long, default_value = "English")]
    pub language: String,

    /// Set name or slug (e.g. SV07__Stellar_Crown); searches on startup
    #[arg(long)]
    pub set: Option<String>,

    /// Card name; searches on startup
    #[arg(long)]
    pub name: Option<String>,
}

/// Configuration résolue de l'application
#[derive(Debug, Clone)]
pub struct Config {
    pub api_url: String,
    pub page_size: usize,
    pub timeout: Duration,
    pub log_dir: PathBuf,
    pub language: Language,

    /// Recherche à lancer au démarrage (--set / --name)
    pub startup_search: Option<SearchQuery>,
}

impl Config {
    /// Charge le .env puis parse la ligne de commande
    pub fn load() -> Result<Self> {
        // Absence de .env : normal, on ignore
        let _ = dotenvy::dotenv();
        Self::from_cli(Cli::parse())
    }

    /// Valide et résout les arguments
    pub fn from_cli(cli: Cli) -> Result<Self> {
        if cli.page_size == 0 {
            bail!("La taille de page doit être au moins 1");
        }

        let api_url = cli.api_url.trim().trim_end_matches('/').to_string();
        if !(api_url.starts_with("http://") || api_url.starts_with("https://")) {
            bail!("URL d'API invalide : {}", cli.api_url);
        }

        let language: Language = cli
            .language
            .parse()
            .with_context(|| format!("Langue invalide : {}", cli.language))?;

        let set_name = cli.set.as_deref().map(|set| language.resolve_set(set.trim()));
        let card_name = cli.name.map(|name| name.trim().to_string()).unwrap_or_default();

        let startup_search = if set_name.is_some() || !card_name.is_empty() {
            Some(SearchQuery {
                card_name,
                card_number: String::new(),
                set_name: set_name.unwrap_or_else(|| ALL_SETS.to_string()),
                language,
                rarity: ALL_RARITY.to_string(),
            })
        } else {
            None
        };

        Ok(Self {
            api_url,
            page_size: cli.page_size,
            timeout: Duration::from_secs(cli.timeout_secs.max(1)),
            log_dir: cli.log_dir.unwrap_or_else(default_log_dir),
            language,
            startup_search,
        })
    }
}

/// Répertoire des logs par défaut
///
/// - Linux : ~/.local/share/pokegrade/logs
/// - macOS : ~/Library/Application Support/pokegrade/logs
/// - Sinon : ./logs
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|dir| dir.join("pokegrade").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cli(args: &[&str]) -> Cli {
        let mut argv = vec!["pokegrade"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap()
    }

    #[test]
    fn test_explicit_flags() {
        let config = Config::from_cli(cli(&[
            "--api-url",
            "http://127.0.0.1:8000/",
            "--page-size",
            "25",
            "--log-dir",
            "/tmp/pokegrade-logs",
        ]))
        .unwrap();

        assert_eq!(config.api_url, "http://127.0.0.1:8000");
        assert_eq!(config.page_size, 25);
        assert_eq!(config.log_dir, PathBuf::from("/tmp/pokegrade-logs"));
        assert!(config.startup_search.is_none());
    }

    #[test]
    fn test_set_slug_triggers_startup_search() {
        let config = Config::from_cli(cli(&[
            "--api-url",
            "http://localhost:8000",
            "--language",
            "Japanese",
            "--set",
            "SV7A__Paradise_Dragona",
        ]))
        .unwrap();

        assert_eq!(config.language, Language::Japanese);
        let search = config.startup_search.unwrap();
        assert_eq!(search.set_name, "SV7A: Paradise Dragona");
        assert!(search.validate().is_ok());
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(Config::from_cli(cli(&["--api-url", "http://x", "--page-size", "0"])).is_err());
        assert!(Config::from_cli(cli(&["--api-url", "ftp://x"])).is_err());
        assert!(Config::from_cli(cli(&["--api-url", "http://x", "--language", "Klingon"])).is_err());
    }
}
