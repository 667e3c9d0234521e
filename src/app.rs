// ============================================================================
// Structure : App
// ============================================================================
// Gère l'état de l'écran de recherche
//
// CONCEPTS RUST :
// 1. State Management : tout l'état de la vue dans une seule structure
// 2. Mutabilité contrôlée : &mut self pour modifier l'état
// 3. Emprunts : view() renvoie des références vers self.cards, sans copie
//
// PATTERN : "Application State"
// - L'UI lit depuis App
// - Les événements modifient App via ses méthodes
// - Le pipeline (filtre/tri/pagination) est recalculé à chaque rendu
// ============================================================================

use crate::api::SearchQuery;
use crate::error::SearchError;
use crate::models::catalog::cycle_option;
use crate::models::{Card, Language, ALL_RARITY, ALL_SETS};
use crate::pipeline::filter::{delta_expr_from_slider, slider_from_delta_expr};
use crate::pipeline::{
    self, DeltaFilter, FilterSpec, InvalidDeltaFilter, PageSpec, PageView, SortColumn, SortSpec,
    DEFAULT_PAGE_SIZE,
};

/// Pas du "slider" de price delta (flèches gauche/droite)
pub const DELTA_STEP: i32 = 10;

// ============================================================================
// Enum : Screen
// ============================================================================

/// Mode de l'écran
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Navigation dans la table de résultats
    Results,

    /// Saisie dans le formulaire de recherche
    /// CONCEPT : Modal input (Vim-like)
    /// - Les touches alimentent le champ sélectionné
    /// - Enter lance la recherche, ESC revient à la table
    Editing,
}

/// Champs du formulaire
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    CardName,
    CardNumber,
    Set,
    Language,
    Rarity,
    Delta,
    FilterName,
    FilterNumber,
}

impl FormField {
    pub const ALL: [FormField; 8] = [
        FormField::CardName,
        FormField::CardNumber,
        FormField::Set,
        FormField::Language,
        FormField::Rarity,
        FormField::Delta,
        FormField::FilterName,
        FormField::FilterNumber,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            FormField::CardName => "Name",
            FormField::CardNumber => "Number",
            FormField::Set => "Set",
            FormField::Language => "Language",
            FormField::Rarity => "Rarity",
            FormField::Delta => "Price Delta",
            FormField::FilterName => "Filter name",
            FormField::FilterNumber => "Filter #",
        }
    }

    /// Champ texte (saisie libre) ou sélecteur
    pub fn is_text(&self) -> bool {
        matches!(
            self,
            FormField::CardName
                | FormField::CardNumber
                | FormField::Delta
                | FormField::FilterName
                | FormField::FilterNumber
        )
    }

    fn position(&self) -> usize {
        Self::ALL.iter().position(|field| field == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::ALL[(self.position() + 1) % Self::ALL.len()]
    }

    pub fn previous(&self) -> Self {
        Self::ALL[(self.position() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

/// État principal de l'application
pub struct App {
    /// Indique si l'application doit continuer à tourner
    pub running: bool,

    pub current_screen: Screen,

    /// Champ du formulaire qui a le focus
    pub focused_field: FormField,

    // --- Formulaire de recherche ---
    pub card_name: String,
    pub card_number: String,

    /// Set choisi ou "All Sets"
    pub set_name: String,

    pub language: Language,

    /// Rareté choisie ou "All"
    pub rarity: String,

    /// Expression du filtre de price delta (">500", "<200" ou vide)
    pub delta_input: String,

    // --- Filtres locaux sur les résultats ---
    pub filter_name: String,
    pub filter_number: String,

    // --- Résultats ---
    /// Cartes du dernier fetch réussi
    pub cards: Vec<Card>,

    pub sort: SortSpec,

    /// Page courante (1-based)
    pub page: usize,

    pub page_size: usize,

    /// Ligne sélectionnée dans la page courante
    pub selected_index: usize,

    // --- Statut ---
    /// CONCEPT : Two-step quit pour éviter les sorties accidentelles
    pub confirm_quit: bool,

    pub is_loading: bool,
    pub loading_message: Option<String>,

    /// Dernière erreur à afficher (réseau, API, validation)
    pub error: Option<String>,

    /// Message d'information (nombre de résultats, lien ouvert...)
    pub status: Option<String>,

    /// Identifiant de la dernière recherche envoyée
    /// Une réponse plus ancienne est ignorée
    pub last_request_id: u64,
}

impl App {
    pub fn new(page_size: usize, language: Language) -> Self {
        Self {
            running: true,
            current_screen: Screen::Editing, // Commence dans le formulaire
            focused_field: FormField::CardName,
            card_name: String::new(),
            card_number: String::new(),
            set_name: ALL_SETS.to_string(),
            language,
            rarity: ALL_RARITY.to_string(),
            delta_input: String::new(),
            filter_name: String::new(),
            filter_number: String::new(),
            cards: Vec::new(),
            sort: SortSpec::default(),
            page: 1,
            page_size: page_size.max(1),
            selected_index: 0,
            confirm_quit: false,
            is_loading: false,
            loading_message: None,
            error: None,
            status: None,
            last_request_id: 0,
        }
    }

    /// Crée une App avec des cartes déjà chargées
    pub fn with_cards(cards: Vec<Card>, page_size: usize) -> Self {
        let mut app = Self::new(page_size, Language::default());
        app.cards = cards;
        app.current_screen = Screen::Results;
        app
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Tick : appelé à chaque itération de la boucle
    pub fn tick(&mut self) {}

    // ========================================================================
    // Confirmation de quit
    // ========================================================================

    pub fn request_quit(&mut self) {
        self.confirm_quit = true;
    }

    pub fn cancel_quit(&mut self) {
        self.confirm_quit = false;
    }

    pub fn is_awaiting_quit_confirmation(&self) -> bool {
        self.confirm_quit
    }

    // ========================================================================
    // Formulaire
    // ========================================================================

    pub fn start_editing(&mut self) {
        self.current_screen = Screen::Editing;
    }

    pub fn stop_editing(&mut self) {
        self.current_screen = Screen::Results;
    }

    pub fn is_editing(&self) -> bool {
        self.current_screen == Screen::Editing
    }

    pub fn focus_next(&mut self) {
        self.focused_field = self.focused_field.next();
    }

    pub fn focus_previous(&mut self) {
        self.focused_field = self.focused_field.previous();
    }

    /// Valeur affichée pour un champ
    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::CardName => &self.card_name,
            FormField::CardNumber => &self.card_number,
            FormField::Set => &self.set_name,
            FormField::Language => self.language.label(),
            FormField::Rarity => &self.rarity,
            FormField::Delta => &self.delta_input,
            FormField::FilterName => &self.filter_name,
            FormField::FilterNumber => &self.filter_number,
        }
    }

    fn focused_buffer(&mut self) -> Option<&mut String> {
        match self.focused_field {
            FormField::CardName => Some(&mut self.card_name),
            FormField::CardNumber => Some(&mut self.card_number),
            FormField::Delta => Some(&mut self.delta_input),
            FormField::FilterName => Some(&mut self.filter_name),
            FormField::FilterNumber => Some(&mut self.filter_number),
            FormField::Set | FormField::Language | FormField::Rarity => None,
        }
    }

    /// Ajoute un caractère au champ texte sélectionné
    pub fn append_char(&mut self, c: char) {
        if let Some(buffer) = self.focused_buffer() {
            buffer.push(c);
            self.after_text_edit();
        }
    }

    /// Supprime le dernier caractère du champ texte sélectionné
    pub fn backspace(&mut self) {
        if let Some(buffer) = self.focused_buffer() {
            if buffer.pop().is_some() {
                self.after_text_edit();
            }
        }
    }

    /// Les résultats affichés ne correspondent plus à un nom/numéro modifié
    fn after_text_edit(&mut self) {
        self.error = None;
        match self.focused_field {
            FormField::CardName | FormField::CardNumber => self.clear_results(),
            _ => self.reset_page(),
        }
    }

    /// Flèches gauche/droite sur le champ sélectionné
    ///
    /// - Set / Rarity : option suivante ou précédente
    /// - Language : bascule et remet set + rareté à "All"
    /// - Price Delta : déplace le slider de DELTA_STEP
    pub fn cycle_focused(&mut self, forward: bool) {
        self.error = None;
        match self.focused_field {
            FormField::Set => {
                let options = self.language.set_options();
                self.set_name = cycle_option(&options, &self.set_name, forward).to_string();
            }
            FormField::Language => self.set_language(self.language.next()),
            FormField::Rarity => {
                let options = self.language.rarity_options();
                self.rarity = cycle_option(&options, &self.rarity, forward).to_string();
                self.reset_page();
            }
            FormField::Delta => {
                self.nudge_delta(if forward { DELTA_STEP } else { -DELTA_STEP });
            }
            _ => {}
        }
    }

    /// Change de langue (les vocabulaires de sets et raretés diffèrent)
    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            self.language = language;
            self.set_name = ALL_SETS.to_string();
            self.rarity = ALL_RARITY.to_string();
            self.reset_page();
        }
    }

    /// Déplace le slider de price delta
    pub fn nudge_delta(&mut self, step: i32) {
        let value = slider_from_delta_expr(&self.delta_input) + step;
        self.delta_input = delta_expr_from_slider(value);
        self.reset_page();
    }

    /// Erreur de syntaxe du filtre de price delta, s'il y en a une
    pub fn delta_error(&self) -> Option<InvalidDeltaFilter> {
        DeltaFilter::parse(&self.delta_input).err()
    }

    /// Filtres actifs (un filtre delta invalide est ignoré)
    pub fn filter_spec(&self) -> FilterSpec {
        FilterSpec {
            name: self.filter_name.clone(),
            number: self.filter_number.clone(),
            rarity: self.rarity.clone(),
            delta: DeltaFilter::parse(&self.delta_input).ok().flatten(),
        }
    }

    // ========================================================================
    // Tri et pagination
    // ========================================================================

    /// Clic sur l'en-tête d'une colonne
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.select(column);
        self.reset_page();
    }

    /// Page visible : filtre -> tri -> pagination
    pub fn view(&self) -> PageView<'_> {
        pipeline::run(
            &self.cards,
            &self.filter_spec(),
            &self.sort,
            PageSpec::new(self.page, self.page_size),
        )
    }

    pub fn next_page(&mut self) {
        let (page, page_count) = {
            let view = self.view();
            (view.page, view.page_count)
        };
        if page < page_count {
            self.page = page + 1;
            self.selected_index = 0;
        }
    }

    pub fn previous_page(&mut self) {
        let page = self.view().page;
        if page > 1 {
            self.page = page - 1;
            self.selected_index = 0;
        }
    }

    /// Retour en page 1 (tout changement de filtre ou de tri)
    pub fn reset_page(&mut self) {
        self.page = 1;
        self.selected_index = 0;
    }

    pub fn clear_results(&mut self) {
        self.cards.clear();
        self.reset_page();
    }

    // ========================================================================
    // Navigation dans la table
    // ========================================================================

    pub fn navigate_up(&mut self) {
        self.selected_index = self.selected_index.saturating_sub(1);
    }

    pub fn navigate_down(&mut self) {
        let max_index = self.view().records.len().saturating_sub(1);
        self.selected_index = (self.selected_index + 1).min(max_index);
    }

    /// Carte sélectionnée dans la page courante
    pub fn selected_card(&self) -> Option<&Card> {
        self.view().records.get(self.selected_index).copied()
    }

    // ========================================================================
    // Recherche
    // ========================================================================

    /// Requête correspondant au formulaire
    pub fn build_query(&self) -> Result<SearchQuery, SearchError> {
        let query = SearchQuery {
            card_name: self.card_name.trim().to_string(),
            card_number: self.card_number.trim().to_string(),
            set_name: self.set_name.clone(),
            language: self.language,
            rarity: self.rarity.clone(),
        };
        query.validate()?;
        Ok(query)
    }

    /// Remplit le formulaire depuis une requête (recherche au démarrage)
    pub fn load_query(&mut self, query: &SearchQuery) {
        self.set_language(query.language);
        self.card_name = query.card_name.clone();
        self.card_number = query.card_number.clone();
        self.set_name = query.set_name.clone();
        self.rarity = query.rarity.clone();
    }

    /// Valide le formulaire et prépare une recherche
    ///
    /// Retourne None (et affiche l'erreur) si le formulaire est incomplet :
    /// aucune requête ne doit partir dans ce cas.
    pub fn submit_search(&mut self) -> Option<(u64, SearchQuery)> {
        match self.build_query() {
            Ok(query) => {
                let id = self.begin_search(&query);
                Some((id, query))
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.status = None;
                None
            }
        }
    }

    /// Passe en chargement et retourne l'identifiant de la requête
    pub fn begin_search(&mut self, query: &SearchQuery) -> u64 {
        self.last_request_id += 1;
        self.error = None;
        self.status = None;
        self.clear_results();

        let term = query
            .params()
            .into_iter()
            .next()
            .map(|(_, value)| value)
            .unwrap_or_default();
        self.start_loading(Some(format!("Searching {} ({})...", term, query.language)));

        self.last_request_id
    }

    /// Applique la réponse d'une recherche
    ///
    /// Retourne false si la réponse est obsolète (une recherche plus
    /// récente a été lancée entre-temps).
    pub fn finish_search(&mut self, id: u64, result: Result<Vec<Card>, SearchError>) -> bool {
        if id != self.last_request_id {
            return false;
        }

        self.stop_loading();
        match result {
            Ok(cards) => {
                self.status = Some(format!("{} cards found", cards.len()));
                self.cards = cards;
                self.reset_page();
                self.current_screen = Screen::Results;
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.clear_results();
            }
        }
        true
    }

    /// Abandonne une recherche qui n'a pas pu être envoyée
    pub fn abort_search(&mut self, id: u64, message: &str) {
        if id == self.last_request_id {
            self.stop_loading();
            self.error = Some(message.to_string());
        }
    }

    pub fn start_loading(&mut self, message: Option<String>) {
        self.is_loading = true;
        self.loading_message = message;
    }

    pub fn stop_loading(&mut self) {
        self.is_loading = false;
        self.loading_message = None;
    }

    pub fn is_loading_data(&self) -> bool {
        self.is_loading
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE, Language::default())
    }
}

// ============================================================================
// Tests unitaires
// ============================================================================
