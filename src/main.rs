// ============================================================================
// Pokegrade - Recherche de prix de cartes Pokémon
// ============================================================================
// Programme TUI : formulaire de recherche, table triable et paginée,
// filtre par price delta (écart prix PSA 10 / prix TCGPlayer).
//
// CONCEPTS RUST CLÉS :
// 1. Terminal raw mode : contrôle total du terminal
// 2. Event loop : boucle qui gère événements et rendering
// 3. Worker thread + channels : les appels HTTP ne bloquent pas l'UI
// ============================================================================

use std::io;
use std::path::Path;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::{debug, error, info, warn};

use pokegrade::api::{GradingClient, SearchQuery};
use pokegrade::browser;
use pokegrade::app::App;
use pokegrade::config::Config;
use pokegrade::error::SearchError;
use pokegrade::models::Card;
use pokegrade::ui::{events::EventHandler, render};

// ============================================================================
// AppCommand / AppResult : messages avec le worker thread
// ============================================================================

/// Commandes envoyées au worker thread
#[derive(Debug, Clone)]
enum AppCommand {
    /// Lancer une recherche sur l'API
    /// - id : identifiant croissant, permet d'ignorer les réponses obsolètes
    Search { id: u64, query: SearchQuery },
}

/// Résultats renvoyés par le worker thread
#[derive(Debug)]
enum AppResult {
    /// Recherche terminée (succès ou erreur)
    SearchFinished {
        id: u64,
        result: Result<Vec<Card>, SearchError>,
    },
}

// ============================================================================
// Initialisation du logging
// ============================================================================
// Les println! ne fonctionnent pas une fois le TUI lancé : on log vers un
// fichier, avec rotation quotidienne.
// ============================================================================

/// Initialise le système de logging vers fichier
///
/// # Utilisation
/// ```bash
/// tail -f ~/.local/share/pokegrade/logs/pokegrade.log.*
/// RUST_LOG=pokegrade=trace cargo run
/// ```
fn init_logging(log_dir: &Path) -> Result<()> {
    use tracing_appender::rolling::{RollingFileAppender, Rotation};
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    std::fs::create_dir_all(log_dir).context("Échec de la création du répertoire de logs")?;

    let file_appender = RollingFileAppender::new(Rotation::DAILY, log_dir, "pokegrade.log");

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_target(true)
                .with_thread_ids(true)
                .with_line_number(true),
        )
        .with(
            // RUST_LOG prioritaire, sinon debug pour pokegrade et info pour le reste
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "pokegrade=debug,info".into()),
        )
        .try_init()
        .context("Échec de l'initialisation du subscriber tracing")?;

    info!(?log_dir, "Logging initialisé");
    Ok(())
}

// ============================================================================
// Point d'entrée du programme
// ============================================================================

fn main() -> Result<()> {
    let config = Config::load()?;

    // Si le logging échoue, on continue quand même
    init_logging(&config.log_dir).unwrap_or_else(|e| {
        eprintln!("⚠️  Warning: Failed to initialize logging: {:#}", e);
        eprintln!("   Continuing without logging...");
    });

    info!(api_url = %config.api_url, page_size = config.page_size, "Pokegrade starting up");

    let (command_tx, command_rx) = mpsc::channel::<AppCommand>();
    let (result_tx, result_rx) = mpsc::channel::<AppResult>();

    info!("Spawning background worker thread");
    spawn_background_worker(command_rx, result_tx, config.api_url.clone(), config.timeout);

    let mut app = App::new(config.page_size, config.language);

    // Recherche directe depuis la ligne de commande (--set / --name)
    if let Some(query) = &config.startup_search {
        info!(?query, "Running startup search");
        app.load_query(query);
        submit_search(&mut app, &command_tx);
    }

    debug!("Setting up terminal");
    let mut terminal = setup_terminal()?;

    let events = EventHandler::new();

    info!("Starting event loop");
    let result = run(&mut terminal, &mut app, &events, &command_tx, &result_rx);

    // Restaure le terminal (même en cas d'erreur)
    debug!("Restoring terminal");
    restore_terminal(&mut terminal)?;

    match &result {
        Ok(_) => info!("Application exited normally"),
        Err(e) => error!(error = ?e, "Application exited with error"),
    }

    result
}

// ============================================================================
// Background Worker Thread
// ============================================================================
// Thread séparé avec son propre runtime tokio :
// - reçoit des AppCommand via command_rx
// - exécute l'appel HTTP avec block_on (bloque le worker, pas l'UI)
// - renvoie un AppResult via result_tx, même en cas d'erreur
// ============================================================================

fn spawn_background_worker(
    command_rx: mpsc::Receiver<AppCommand>,
    result_tx: mpsc::Sender<AppResult>,
    api_url: String,
    timeout: Duration,
) {
    std::thread::spawn(move || {
        let runtime = match tokio::runtime::Runtime::new() {
            Ok(runtime) => runtime,
            Err(e) => {
                error!(error = ?e, "Failed to create tokio runtime");
                return;
            }
        };

        let client = match GradingClient::new(&api_url, timeout) {
            Ok(client) => client,
            Err(e) => {
                error!(error = ?e, "Failed to create HTTP client");
                return;
            }
        };
        info!(base_url = client.base_url(), "HTTP client ready");

        // Le channel se ferme quand l'UI s'arrête
        while let Ok(command) = command_rx.recv() {
            info!(?command, "Worker received command");

            match command {
                AppCommand::Search { id, query } => {
                    let result = runtime.block_on(client.search(&query));

                    match &result {
                        Ok(cards) => info!(request_id = id, cards = cards.len(), "Search succeeded"),
                        Err(e) => error!(request_id = id, error = %e, "Search failed"),
                    }

                    if result_tx.send(AppResult::SearchFinished { id, result }).is_err() {
                        break;
                    }
                }
            }
        }

        info!("Worker thread exiting (channel closed)");
    });
}

/// Valide le formulaire et envoie la recherche au worker
fn submit_search(app: &mut App, command_tx: &mpsc::Sender<AppCommand>) {
    let Some((id, query)) = app.submit_search() else {
        debug!(error = ?app.error, "Search rejected before sending");
        return;
    };

    info!(request_id = id, ?query, "User submitted search");
    if command_tx.send(AppCommand::Search { id, query }).is_err() {
        error!("Worker thread is not running");
        app.abort_search(id, "Background worker is not running");
    }
}

// ============================================================================
// Event Loop Principal
// ============================================================================
// À chaque itération :
//   0. Résultats du worker
//   1. Render
//   2. Input
//   3. Update
// ============================================================================

fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
    command_tx: &mpsc::Sender<AppCommand>,
    result_rx: &mpsc::Receiver<AppResult>,
) -> Result<()> {
    while app.is_running() {
        // 0. RÉSULTATS : try_recv ne bloque pas
        loop {
            match result_rx.try_recv() {
                Ok(AppResult::SearchFinished { id, result }) => {
                    if !app.finish_search(id, result) {
                        debug!(request_id = id, "Discarding stale search result");
                    }
                }
                Err(mpsc::TryRecvError::Empty) => break,
                Err(mpsc::TryRecvError::Disconnected) => {
                    if app.is_loading_data() {
                        error!("Worker thread disconnected!");
                        app.abort_search(app.last_request_id, "Background worker stopped");
                    }
                    break;
                }
            }
        }

        // 1. RENDER
        terminal.draw(|frame| render(frame, app))?;

        // 2. INPUT
        match events.next() {
            Ok(event) => handle_event(app, event, command_tx),
            Err(e) => warn!(error = ?e, "Failed to read terminal event"),
        }

        // 3. UPDATE
        app.tick();
    }

    Ok(())
}

// ============================================================================
// Gestion des événements
// ============================================================================

/// Traite un événement selon l'écran courant
///
/// CONCEPT RUST : Pattern matching avec guards
/// - Formulaire : les touches alimentent le champ sélectionné
/// - Table : navigation, pagination, tri, ouverture du lien
fn handle_event(app: &mut App, event: pokegrade::ui::events::Event, command_tx: &mpsc::Sender<AppCommand>) {
    use pokegrade::ui::events::{
        get_char_from_event, is_backspace_event, is_down_event, is_edit_event, is_enter_event,
        is_escape_event, is_force_quit_event, is_left_event, is_next_field_event,
        is_next_page_event, is_open_event, is_previous_field_event, is_previous_page_event,
        is_quit_event, is_right_event, is_up_event, sort_column_from_event, Event,
    };

    match event {
        Event::Key(_) if is_force_quit_event(&event) => {
            info!("User forced quit");
            app.quit();
        }

        // ========================================
        // Formulaire de recherche
        // ========================================
        Event::Key(_) if app.is_editing() && is_escape_event(&event) => {
            debug!("User left the search form");
            app.stop_editing();
        }
        Event::Key(_) if app.is_editing() && is_enter_event(&event) => {
            submit_search(app, command_tx);
        }
        Event::Key(_) if app.is_editing() && is_next_field_event(&event) => app.focus_next(),
        Event::Key(_) if app.is_editing() && is_previous_field_event(&event) => app.focus_previous(),
        Event::Key(_) if app.is_editing() && is_left_event(&event) => app.cycle_focused(false),
        Event::Key(_) if app.is_editing() && is_right_event(&event) => app.cycle_focused(true),
        Event::Key(_) if app.is_editing() && is_backspace_event(&event) => app.backspace(),
        Event::Key(_) if app.is_editing() => {
            if let Some(c) = get_char_from_event(&event) {
                app.append_char(c);
            }
        }

        // ========================================
        // Table des résultats
        // ========================================
        Event::Key(_) if is_quit_event(&event) => {
            // Two-step : première pression demande confirmation
            if app.is_awaiting_quit_confirmation() {
                info!("User confirmed quit");
                app.quit();
            } else {
                info!("User requested quit (awaiting confirmation)");
                app.request_quit();
            }
        }
        Event::Key(_) if is_edit_event(&event) => {
            app.cancel_quit();
            app.start_editing();
        }
        Event::Key(_) if is_up_event(&event) => {
            app.cancel_quit();
            app.navigate_up();
        }
        Event::Key(_) if is_down_event(&event) => {
            app.cancel_quit();
            app.navigate_down();
        }
        Event::Key(_) if is_next_page_event(&event) => {
            app.cancel_quit();
            app.next_page();
            debug!(page = app.page, "User moved to next page");
        }
        Event::Key(_) if is_previous_page_event(&event) => {
            app.cancel_quit();
            app.previous_page();
            debug!(page = app.page, "User moved to previous page");
        }
        Event::Key(_) if sort_column_from_event(&event).is_some() => {
            app.cancel_quit();
            if let Some(column) = sort_column_from_event(&event) {
                app.sort_by(column);
                info!(column = column.label(), direction = ?app.sort.direction, "User changed sort");
            }
        }
        Event::Key(_) if is_open_event(&event) => {
            app.cancel_quit();
            open_selected_card(app);
        }
        Event::Key(_) => {
            // Toute autre touche : annule la confirmation de quit
            app.cancel_quit();
        }
        Event::Tick => {}
    }
}

// ============================================================================
// Ouverture de la fiche marketplace
// ============================================================================

fn open_selected_card(app: &mut App) {
    let Some(url) = app.selected_card().and_then(Card::marketplace_url) else {
        app.status = Some("No marketplace link for this card".to_string());
        return;
    };

    match browser::open(&url) {
        Ok(()) => {
            info!(url = %url, "Opened marketplace page");
            app.status = Some(format!("Opened {}", url));
        }
        Err(e) => {
            warn!(url = %url, error = ?e, "Failed to open browser");
            app.status = Some(format!("Open manually: {}", url));
        }
    }
}

// ============================================================================
// Setup et restauration du terminal
// ============================================================================

/// Configure le terminal en mode TUI (raw mode + alternate screen)
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    enable_raw_mode().context("Échec de l'activation du raw mode")?;

    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend).context("Échec de la création du terminal")
}

/// Restaure le terminal à son état normal
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}
