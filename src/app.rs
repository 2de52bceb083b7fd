//! Application state management for Stockroom.
//!
//! This module contains the core `App` struct that manages all application
//! state: UI state, fetched data, the session guard integration, and
//! background task coordination.

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::api::ApiClient;
use crate::auth::{self, AuthState, AuthStatus, CredentialStore, Session, TokenStore};
use crate::config::Config;
use crate::models::{
    DashboardData, InventoryItem, InventorySortColumn, NewInventoryItem, Shipment,
    ShipmentStatus, User,
};
use crate::utils::cmp_ignore_case;

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background task message channel.
/// 32 covers a full refresh (7 fetches) plus spot tasks with headroom.
const CHANNEL_BUFFER_SIZE: usize = 32;

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for item form text fields.
const MAX_FIELD_LENGTH: usize = 120;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Main navigation tabs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tab {
    Dashboard,
    Inventory,
    Shipments,
    Users,
}

impl Tab {
    /// Get the display title for this tab.
    pub fn title(&self) -> &'static str {
        match self {
            Tab::Dashboard => "Dashboard",
            Tab::Inventory => "Inventory",
            Tab::Shipments => "Shipments",
            Tab::Users => "Users",
        }
    }

    /// Get the next tab (wrapping around)
    pub fn next(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Inventory,
            Tab::Inventory => Tab::Shipments,
            Tab::Shipments => Tab::Users,
            Tab::Users => Tab::Dashboard,
        }
    }

    /// Get the previous tab (wrapping around)
    pub fn prev(&self) -> Self {
        match self {
            Tab::Dashboard => Tab::Users,
            Tab::Inventory => Tab::Dashboard,
            Tab::Shipments => Tab::Inventory,
            Tab::Users => Tab::Shipments,
        }
    }
}

/// Current UI focus area (list panel or detail panel)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    List,
    Detail,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    ShowingHelp,
    LoggingIn,
    EditingItem,
    ChangingStatus,
    ConfirmingDelete,
    ConfirmingQuit,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
}

/// Item form field focus, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemFormFocus {
    Name,
    Sku,
    Description,
    Quantity,
    Location,
    Category,
    MinimumStock,
    Save,
}

impl ItemFormFocus {
    pub fn next(&self) -> Self {
        match self {
            ItemFormFocus::Name => ItemFormFocus::Sku,
            ItemFormFocus::Sku => ItemFormFocus::Description,
            ItemFormFocus::Description => ItemFormFocus::Quantity,
            ItemFormFocus::Quantity => ItemFormFocus::Location,
            ItemFormFocus::Location => ItemFormFocus::Category,
            ItemFormFocus::Category => ItemFormFocus::MinimumStock,
            ItemFormFocus::MinimumStock => ItemFormFocus::Save,
            ItemFormFocus::Save => ItemFormFocus::Name,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            ItemFormFocus::Name => ItemFormFocus::Save,
            ItemFormFocus::Sku => ItemFormFocus::Name,
            ItemFormFocus::Description => ItemFormFocus::Sku,
            ItemFormFocus::Quantity => ItemFormFocus::Description,
            ItemFormFocus::Location => ItemFormFocus::Quantity,
            ItemFormFocus::Category => ItemFormFocus::Location,
            ItemFormFocus::MinimumStock => ItemFormFocus::Category,
            ItemFormFocus::Save => ItemFormFocus::MinimumStock,
        }
    }
}

/// State of the inventory item form overlay (create and edit).
#[derive(Debug, Clone, Default)]
pub struct ItemForm {
    /// Present when editing an existing item, absent when creating.
    pub editing_id: Option<i64>,
    pub name: String,
    pub sku: String,
    pub description: String,
    pub quantity: String,
    pub location: String,
    pub category: String,
    pub minimum_stock: String,
    pub error: Option<String>,
}

impl ItemForm {
    pub fn from_item(item: &InventoryItem) -> Self {
        Self {
            editing_id: Some(item.id),
            name: item.name.clone(),
            sku: item.sku.clone(),
            description: item.description.clone(),
            quantity: item.quantity.to_string(),
            location: item.location.clone(),
            category: item.category.clone(),
            minimum_stock: item.minimum_stock.to_string(),
            error: None,
        }
    }

    /// Current value of a field.
    pub fn field(&self, focus: ItemFormFocus) -> &str {
        match focus {
            ItemFormFocus::Name => &self.name,
            ItemFormFocus::Sku => &self.sku,
            ItemFormFocus::Description => &self.description,
            ItemFormFocus::Quantity => &self.quantity,
            ItemFormFocus::Location => &self.location,
            ItemFormFocus::Category => &self.category,
            ItemFormFocus::MinimumStock => &self.minimum_stock,
            ItemFormFocus::Save => "",
        }
    }

    /// Mutable value of a field, `None` for the save button.
    pub fn field_mut(&mut self, focus: ItemFormFocus) -> Option<&mut String> {
        match focus {
            ItemFormFocus::Name => Some(&mut self.name),
            ItemFormFocus::Sku => Some(&mut self.sku),
            ItemFormFocus::Description => Some(&mut self.description),
            ItemFormFocus::Quantity => Some(&mut self.quantity),
            ItemFormFocus::Location => Some(&mut self.location),
            ItemFormFocus::Category => Some(&mut self.category),
            ItemFormFocus::MinimumStock => Some(&mut self.minimum_stock),
            ItemFormFocus::Save => None,
        }
    }

    /// Validate the form into a write payload.
    pub fn to_new_item(&self) -> std::result::Result<NewInventoryItem, String> {
        let name = self.name.trim();
        if name.is_empty() {
            return Err("Name is required".to_string());
        }
        let sku = self.sku.trim();
        if sku.is_empty() {
            return Err("SKU is required".to_string());
        }
        let location = self.location.trim();
        if location.is_empty() {
            return Err("Location is required".to_string());
        }
        let category = self.category.trim();
        if category.is_empty() {
            return Err("Category is required".to_string());
        }
        let quantity: i64 = self
            .quantity
            .trim()
            .parse()
            .map_err(|_| "Quantity must be a whole number".to_string())?;
        if quantity < 0 {
            return Err("Quantity cannot be negative".to_string());
        }
        let minimum_stock: i64 = self
            .minimum_stock
            .trim()
            .parse()
            .map_err(|_| "Minimum stock must be a whole number".to_string())?;
        if minimum_stock < 0 {
            return Err("Minimum stock cannot be negative".to_string());
        }

        Ok(NewInventoryItem {
            name: name.to_string(),
            sku: sku.to_string(),
            description: self.description.trim().to_string(),
            quantity,
            location: location.to_string(),
            category: category.to_string(),
            minimum_stock,
        })
    }
}

/// A pending delete awaiting confirmation.
#[derive(Debug, Clone)]
pub enum PendingDelete {
    Item(i64, String),
    Shipment(i64, String),
    User(i64, String),
}

impl PendingDelete {
    pub fn describe(&self) -> String {
        match self {
            PendingDelete::Item(_, name) => format!("Delete inventory item \"{}\"?", name),
            PendingDelete::Shipment(_, tracking) => {
                format!("Delete shipment {}?", tracking)
            }
            PendingDelete::User(_, username) => format!("Delete user \"{}\"?", username),
        }
    }
}

/// Shipment history loaded for one inventory item.
#[derive(Debug, Clone)]
pub struct ItemHistory {
    pub item_id: i64,
    pub item_name: String,
    pub shipments: Vec<Shipment>,
}

// ============================================================================
// Background Task Results
// ============================================================================

/// Result types from background tasks, sent through an MPSC channel back to
/// the main application between frames.
enum RefreshResult {
    Dashboard(DashboardData),
    Inventory(Vec<InventoryItem>),
    LowStock(Vec<InventoryItem>),
    Categories(Vec<String>),
    Shipments(Vec<Shipment>),
    Users(Vec<User>),
    CurrentUser(User),
    ItemSaved(InventoryItem),
    ItemDeleted(i64),
    ItemHistory(i64, Vec<Shipment>),
    ShipmentUpdated(Shipment),
    ShipmentDeleted(i64),
    UserDeleted(i64),
    /// A data fetch came back 401: the session died under us.
    SessionExpired,
    RefreshComplete,
    Error(String),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: Session,
    pub api: ApiClient,

    // Session guard result for the current activation
    pub auth_state: AuthState,

    // UI State
    pub state: AppState,
    pub current_tab: Tab,
    pub focus: Focus,
    pub search_query: String,
    pub inventory_sort_column: InventorySortColumn,
    pub inventory_sort_ascending: bool,
    pub shipment_status_filter: Option<ShipmentStatus>,

    // Login form state
    pub login_username: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,

    // Selection indices
    pub inventory_selection: usize,
    pub shipment_selection: usize,
    pub user_selection: usize,

    // Item form overlay
    pub item_form: ItemForm,
    pub item_form_focus: ItemFormFocus,

    // Status change dialog
    pub status_target: Option<i64>,
    pub status_choices: Vec<ShipmentStatus>,
    pub status_selection: usize,
    pub status_confirming: bool,

    // Delete confirmation
    pub pending_delete: Option<PendingDelete>,

    // Fetched data
    pub dashboard: DashboardData,
    pub inventory: Vec<InventoryItem>,
    pub low_stock: Vec<InventoryItem>,
    pub categories: Vec<String>,
    pub shipments: Vec<Shipment>,
    pub users: Vec<User>,
    pub current_user: Option<User>,
    pub item_history: Option<ItemHistory>,

    // Background task channel
    refresh_rx: Option<mpsc::Receiver<RefreshResult>>,
    refresh_tx: mpsc::Sender<RefreshResult>,

    // Status message
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> Result<Self> {
        debug!("App::new() starting");
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };
        debug!(base_url = %config.api_base_url, "Config loaded");

        let data_dir = Config::data_dir().unwrap_or_else(|_| std::path::PathBuf::from("."));
        let mut session = Session::new(data_dir);
        let load_result = session.load();
        debug!(?load_result, "Session loaded");

        let api = ApiClient::new(config.api_base_url.clone())?;

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        // Prefill the login form from env vars, config and the keyring
        let login_username = std::env::var("STOCKROOM_USERNAME")
            .ok()
            .or_else(|| config.last_username.clone())
            .unwrap_or_default();

        let login_password = std::env::var("STOCKROOM_PASSWORD").ok().unwrap_or_else(|| {
            if login_username.is_empty() {
                String::new()
            } else {
                CredentialStore::get_password(&login_username).unwrap_or_default()
            }
        });

        Ok(Self {
            config,
            session,
            api,

            auth_state: AuthState::Unknown,

            state: AppState::Normal,
            current_tab: Tab::Dashboard,
            focus: Focus::List,
            search_query: String::new(),
            inventory_sort_column: InventorySortColumn::Name,
            inventory_sort_ascending: true,
            shipment_status_filter: None,

            login_username,
            login_password,
            login_focus: LoginFocus::Username,
            login_error: None,

            inventory_selection: 0,
            shipment_selection: 0,
            user_selection: 0,

            item_form: ItemForm::default(),
            item_form_focus: ItemFormFocus::Name,

            status_target: None,
            status_choices: Vec::new(),
            status_selection: 0,
            status_confirming: false,

            pending_delete: None,

            dashboard: DashboardData::default(),
            inventory: Vec::new(),
            low_stock: Vec::new(),
            categories: Vec::new(),
            shipments: Vec::new(),
            users: Vec::new(),
            current_user: None,
            item_history: None,

            refresh_rx: Some(rx),
            refresh_tx: tx,

            status_message: None,
        })
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// One guard activation: re-validate the stored tokens, refreshing if
    /// needed. Runs on startup and on every tab switch so an externally
    /// revoked session is caught at the next navigation.
    pub async fn activate_guard(&mut self) {
        self.auth_state = AuthState::Unknown;
        let status = auth::authorize(&mut self.session, &self.api).await;
        self.auth_state = status.into();

        match status {
            AuthStatus::Authenticated => {
                // A refresh may have rotated the access token
                if let Some(access) = self.session.access_token() {
                    self.api.set_token(access);
                }
            }
            AuthStatus::Unauthenticated => {
                self.api.clear_token();
                if !matches!(self.state, AppState::LoggingIn) {
                    self.start_login();
                }
            }
        }
    }

    /// Attempt login with the credentials from the login form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.login_username.clone();
        let password = self.login_password.clone();

        if username.is_empty() || password.is_empty() {
            self.login_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.login_error = None;

        match self.api.login(&username, &password).await {
            Ok(pair) => {
                if let Err(e) = self.session.store(&pair.access, &pair.refresh) {
                    warn!(error = %e, "Failed to persist session tokens");
                }
                self.api.set_token(pair.access);
                self.auth_state = AuthState::Authenticated;

                if let Err(e) = CredentialStore::store(&username, &password) {
                    warn!(error = %e, "Failed to store credentials");
                }

                self.config.last_username = Some(username);
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.state = AppState::Normal;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                let user_message = if e.is_unauthorized() {
                    "Invalid username or password".to_string()
                } else if e.to_string().to_lowercase().contains("network")
                    || e.to_string().to_lowercase().contains("connect")
                {
                    "Unable to connect to server. Check the API URL.".to_string()
                } else if e.to_string().to_lowercase().contains("timeout") {
                    "Connection timed out. Please try again.".to_string()
                } else {
                    format!("Login failed: {}", e)
                };
                self.login_error = Some(user_message);
                Err(e.into())
            }
        }
    }

    /// Show the login overlay.
    pub fn start_login(&mut self) {
        self.state = AppState::LoggingIn;
        self.login_focus = if self.login_username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        self.login_error = None;
    }

    /// Clear the stored tokens and require a fresh login.
    pub fn logout(&mut self) {
        info!("Logging out");
        if let Err(e) = self.session.clear() {
            warn!(error = %e, "Failed to clear session");
        }
        self.api.clear_token();
        self.auth_state = AuthState::Unauthenticated;
        self.login_password.clear();
        self.start_login();
    }

    // =========================================================================
    // Background Data Refresh
    // =========================================================================

    /// Spawn a background task to refresh all data
    pub fn refresh_all_background(&mut self) {
        if !matches!(self.auth_state, AuthState::Authenticated) {
            debug!("Skipping refresh while unauthenticated");
            return;
        }
        info!("Starting background refresh of all data");

        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            Self::execute_background_refresh(tx, api).await;
        });

        self.status_message = Some("Refreshing data...".to_string());
    }

    /// Helper to send refresh results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<RefreshResult>, result: RefreshResult) {
        if let Err(e) = tx.send(result).await {
            error!(error = %e, "Failed to send refresh result - channel closed");
        }
    }

    /// Execute the background refresh task: all list endpoints concurrently,
    /// results sent back through the channel as they are processed.
    async fn execute_background_refresh(tx: mpsc::Sender<RefreshResult>, api: ApiClient) {
        info!("Background refresh task started");

        let (dashboard_res, inventory_res, shipments_res, low_stock_res, categories_res, users_res, me_res) = tokio::join!(
            api.dashboard_data(),
            api.list_inventory(None, None),
            api.list_shipments(None, None, None),
            api.low_stock(),
            api.categories(),
            api.list_users(),
            api.current_user(),
        );

        Self::send_fetch_result(&tx, "Dashboard", dashboard_res, RefreshResult::Dashboard).await;
        Self::send_fetch_result(&tx, "Inventory", inventory_res, RefreshResult::Inventory).await;
        Self::send_fetch_result(&tx, "Shipments", shipments_res, RefreshResult::Shipments).await;
        Self::send_fetch_result(&tx, "LowStock", low_stock_res, RefreshResult::LowStock).await;
        Self::send_fetch_result(&tx, "Categories", categories_res, RefreshResult::Categories)
            .await;

        // Non-admins get a 403 here; that's expected, not an error
        match users_res {
            Ok(users) => Self::send_result(&tx, RefreshResult::Users(users)).await,
            Err(e) if e.is_unauthorized() => {
                Self::send_result(&tx, RefreshResult::SessionExpired).await
            }
            Err(e) => debug!(error = %e, "Users fetch skipped"),
        }

        match me_res {
            Ok(user) => Self::send_result(&tx, RefreshResult::CurrentUser(user)).await,
            Err(e) if e.is_unauthorized() => {
                Self::send_result(&tx, RefreshResult::SessionExpired).await
            }
            Err(e) => debug!(error = %e, "Current user fetch failed"),
        }

        info!("Background refresh complete");
        Self::send_result(&tx, RefreshResult::RefreshComplete).await;
    }

    /// Helper to send a successful fetch result or an error
    async fn send_fetch_result<T, F>(
        tx: &mpsc::Sender<RefreshResult>,
        name: &str,
        result: std::result::Result<T, crate::api::ApiError>,
        wrapper: F,
    ) where
        F: FnOnce(T) -> RefreshResult,
    {
        match result {
            Ok(data) => {
                debug!("{} fetched successfully", name);
                Self::send_result(tx, wrapper(data)).await;
            }
            Err(e) if e.is_unauthorized() => {
                warn!("{} fetch unauthorized", name);
                Self::send_result(tx, RefreshResult::SessionExpired).await;
            }
            Err(e) => {
                error!(error = %e, "{} fetch failed", name);
                Self::send_result(tx, RefreshResult::Error(format!("{}: {}", name, e))).await;
            }
        }
    }

    /// Re-run the inventory or shipments query with the current search text.
    pub fn search_current_tab(&mut self) {
        match self.current_tab {
            Tab::Inventory => {
                let query = self.search_query.trim().to_string();
                let api = self.api.clone();
                let tx = self.refresh_tx.clone();
                tokio::spawn(async move {
                    let search = (!query.is_empty()).then_some(query.as_str());
                    let result = api.list_inventory(search, None).await;
                    Self::send_fetch_result(&tx, "Inventory", result, RefreshResult::Inventory)
                        .await;
                });
            }
            Tab::Shipments => self.refresh_shipments(),
            _ => {}
        }
    }

    /// Cycle the shipments status filter and re-query.
    pub fn cycle_status_filter(&mut self) {
        self.shipment_status_filter = match self.shipment_status_filter {
            None => Some(ShipmentStatus::ALL[0]),
            Some(current) => ShipmentStatus::ALL
                .iter()
                .position(|s| *s == current)
                .and_then(|i| ShipmentStatus::ALL.get(i + 1))
                .copied(),
        };
        self.shipment_selection = 0;
        self.refresh_shipments();
    }

    /// Re-query shipments with the current search text and status filter.
    fn refresh_shipments(&mut self) {
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();
        let status = self.shipment_status_filter;
        let query = self.search_query.trim().to_string();
        tokio::spawn(async move {
            let search = (!query.is_empty()).then_some(query.as_str());
            let result = api.list_shipments(None, status, search).await;
            Self::send_fetch_result(&tx, "Shipments", result, RefreshResult::Shipments).await;
        });
    }

    // =========================================================================
    // Mutating Actions (spot tasks)
    // =========================================================================

    /// Open the status-change dialog for the selected shipment, offering
    /// only the transitions the server will accept.
    pub fn start_status_change(&mut self) {
        let Some((id, status)) = self
            .shipments
            .get(self.shipment_selection)
            .map(|s| (s.id, s.status))
        else {
            return;
        };
        let choices = status.allowed_transitions();
        if choices.is_empty() {
            self.status_message = Some(format!(
                "Cannot change status of a {} shipment",
                status.label()
            ));
            return;
        }
        self.status_target = Some(id);
        self.status_choices = choices.to_vec();
        self.status_selection = 0;
        self.status_confirming = false;
        self.state = AppState::ChangingStatus;
    }

    /// Post the confirmed status change.
    pub fn apply_status_change(&mut self) {
        let Some(id) = self.status_target.take() else {
            return;
        };
        let Some(&status) = self.status_choices.get(self.status_selection) else {
            return;
        };

        let api = self.api.clone();
        let tx = self.refresh_tx.clone();
        tokio::spawn(async move {
            match api.update_shipment_status(id, status).await {
                Ok(shipment) => {
                    Self::send_result(&tx, RefreshResult::ShipmentUpdated(shipment)).await
                }
                Err(e) if e.is_unauthorized() => {
                    Self::send_result(&tx, RefreshResult::SessionExpired).await
                }
                Err(e) => Self::send_result(&tx, RefreshResult::Error(e.to_string())).await,
            }
        });

        self.state = AppState::Normal;
        self.status_message = Some("Updating shipment status...".to_string());
    }

    /// Ask for confirmation before deleting whatever is selected on the
    /// current tab.
    pub fn start_delete(&mut self) {
        let pending = match self.current_tab {
            Tab::Inventory => self
                .sorted_inventory()
                .get(self.inventory_selection)
                .map(|item| PendingDelete::Item(item.id, item.name.clone())),
            Tab::Shipments => self
                .shipments
                .get(self.shipment_selection)
                .map(|s| PendingDelete::Shipment(s.id, s.tracking_number.clone())),
            Tab::Users => self
                .users
                .get(self.user_selection)
                .map(|u| PendingDelete::User(u.id, u.username.clone())),
            Tab::Dashboard => None,
        };

        if let Some(pending) = pending {
            self.pending_delete = Some(pending);
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Run the confirmed delete.
    pub fn apply_delete(&mut self) {
        let Some(pending) = self.pending_delete.take() else {
            return;
        };
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();

        tokio::spawn(async move {
            let result = match &pending {
                PendingDelete::Item(id, _) => {
                    api.delete_item(*id).await.map(|_| RefreshResult::ItemDeleted(*id))
                }
                PendingDelete::Shipment(id, _) => api
                    .delete_shipment(*id)
                    .await
                    .map(|_| RefreshResult::ShipmentDeleted(*id)),
                PendingDelete::User(id, _) => {
                    api.delete_user(*id).await.map(|_| RefreshResult::UserDeleted(*id))
                }
            };
            match result {
                Ok(message) => Self::send_result(&tx, message).await,
                Err(e) if e.is_unauthorized() => {
                    Self::send_result(&tx, RefreshResult::SessionExpired).await
                }
                Err(e) => Self::send_result(&tx, RefreshResult::Error(e.to_string())).await,
            }
        });

        self.state = AppState::Normal;
        self.status_message = Some("Deleting...".to_string());
    }

    /// Open the item form empty (create) or prefilled (edit).
    pub fn open_item_form(&mut self, edit: bool) {
        if edit {
            let Some(item) = self
                .sorted_inventory()
                .get(self.inventory_selection)
                .map(|i| (*i).clone())
            else {
                return;
            };
            self.item_form = ItemForm::from_item(&item);
        } else {
            self.item_form = ItemForm::default();
        }
        self.item_form_focus = ItemFormFocus::Name;
        self.state = AppState::EditingItem;
    }

    /// Validate and submit the item form.
    pub fn submit_item_form(&mut self) {
        let new_item = match self.item_form.to_new_item() {
            Ok(item) => item,
            Err(message) => {
                self.item_form.error = Some(message);
                return;
            }
        };

        let editing_id = self.item_form.editing_id;
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();
        tokio::spawn(async move {
            let result = match editing_id {
                Some(id) => api.update_item(id, &new_item).await,
                None => api.create_item(&new_item).await,
            };
            match result {
                Ok(item) => Self::send_result(&tx, RefreshResult::ItemSaved(item)).await,
                Err(e) if e.is_unauthorized() => {
                    Self::send_result(&tx, RefreshResult::SessionExpired).await
                }
                Err(e) => Self::send_result(&tx, RefreshResult::Error(e.to_string())).await,
            }
        });

        self.state = AppState::Normal;
        self.status_message = Some("Saving item...".to_string());
    }

    /// Load shipment history for the selected inventory item.
    pub fn fetch_item_history(&mut self) {
        let Some(item) = self
            .sorted_inventory()
            .get(self.inventory_selection)
            .map(|i| (*i).clone())
        else {
            return;
        };
        let api = self.api.clone();
        let tx = self.refresh_tx.clone();
        let item_id = item.id;
        tokio::spawn(async move {
            match api.item_history(item_id).await {
                Ok(shipments) => {
                    Self::send_result(&tx, RefreshResult::ItemHistory(item_id, shipments)).await
                }
                Err(e) if e.is_unauthorized() => {
                    Self::send_result(&tx, RefreshResult::SessionExpired).await
                }
                Err(e) => Self::send_result(&tx, RefreshResult::Error(e.to_string())).await,
            }
        });
        self.item_history = Some(ItemHistory {
            item_id,
            item_name: item.name,
            shipments: Vec::new(),
        });
        self.status_message = Some("Loading shipment history...".to_string());
    }

    // =========================================================================
    // Result Processing
    // =========================================================================

    /// Check for completed background tasks and process results
    pub fn check_background_tasks(&mut self) {
        let results: Vec<RefreshResult> = {
            if let Some(ref mut rx) = self.refresh_rx {
                let mut results = Vec::new();
                while let Ok(result) = rx.try_recv() {
                    results.push(result);
                }
                results
            } else {
                Vec::new()
            }
        };

        for result in results {
            self.process_refresh_result(result);
        }
    }

    /// Fold a single background result into app state.
    fn process_refresh_result(&mut self, result: RefreshResult) {
        match result {
            RefreshResult::Dashboard(data) => {
                self.dashboard = data;
            }
            RefreshResult::Inventory(data) => {
                self.inventory = data;
                self.inventory_selection = self
                    .inventory_selection
                    .min(self.inventory.len().saturating_sub(1));
            }
            RefreshResult::LowStock(data) => {
                self.low_stock = data;
            }
            RefreshResult::Categories(data) => {
                self.categories = data;
            }
            RefreshResult::Shipments(data) => {
                self.shipments = data;
                self.shipment_selection = self
                    .shipment_selection
                    .min(self.shipments.len().saturating_sub(1));
            }
            RefreshResult::Users(data) => {
                self.users = data;
                self.user_selection = self.user_selection.min(self.users.len().saturating_sub(1));
            }
            RefreshResult::CurrentUser(user) => {
                self.current_user = Some(user);
            }
            RefreshResult::ItemSaved(item) => {
                match self.inventory.iter_mut().find(|i| i.id == item.id) {
                    Some(existing) => *existing = item,
                    None => self.inventory.push(item),
                }
                // Low stock and categories may have shifted
                self.refresh_all_background();
                self.status_message = Some("Item saved".to_string());
            }
            RefreshResult::ItemDeleted(id) => {
                self.inventory.retain(|i| i.id != id);
                self.low_stock.retain(|i| i.id != id);
                self.inventory_selection = self
                    .inventory_selection
                    .min(self.inventory.len().saturating_sub(1));
                self.status_message = Some("Item deleted".to_string());
            }
            RefreshResult::ItemHistory(item_id, shipments) => {
                if let Some(ref mut history) = self.item_history {
                    if history.item_id == item_id {
                        history.shipments = shipments;
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::ShipmentUpdated(shipment) => {
                match self.shipments.iter_mut().find(|s| s.id == shipment.id) {
                    Some(existing) => *existing = shipment,
                    None => self.shipments.push(shipment),
                }
                // A delivery changes inventory quantities server-side
                self.refresh_all_background();
                self.status_message = Some("Shipment updated".to_string());
            }
            RefreshResult::ShipmentDeleted(id) => {
                self.shipments.retain(|s| s.id != id);
                self.shipment_selection = self
                    .shipment_selection
                    .min(self.shipments.len().saturating_sub(1));
                self.status_message = Some("Shipment deleted".to_string());
            }
            RefreshResult::UserDeleted(id) => {
                self.users.retain(|u| u.id != id);
                self.user_selection = self.user_selection.min(self.users.len().saturating_sub(1));
                self.status_message = Some("User deleted".to_string());
            }
            RefreshResult::SessionExpired => {
                warn!("Session expired mid-flight");
                self.auth_state = AuthState::Unauthenticated;
                self.api.clear_token();
                if !matches!(self.state, AppState::LoggingIn) {
                    self.start_login();
                }
            }
            RefreshResult::RefreshComplete => {
                if let Some(ref msg) = self.status_message {
                    if !msg.starts_with("Error:") {
                        self.status_message = None;
                    }
                }
            }
            RefreshResult::Error(msg) => {
                error!(error = %msg, "Background task error");
                let user_message = if msg.to_lowercase().contains("network")
                    || msg.to_lowercase().contains("connect")
                {
                    "Network error. Check your connection.".to_string()
                } else {
                    format!("Error: {}", msg)
                };
                self.status_message = Some(user_message);
            }
        }
    }

    // =========================================================================
    // Derived Views
    // =========================================================================

    /// Inventory in the current sort order.
    pub fn sorted_inventory(&self) -> Vec<&InventoryItem> {
        let mut items: Vec<&InventoryItem> = self.inventory.iter().collect();
        items.sort_by(|a, b| {
            let ordering = match self.inventory_sort_column {
                InventorySortColumn::Name => cmp_ignore_case(&a.name, &b.name),
                InventorySortColumn::Sku => cmp_ignore_case(&a.sku, &b.sku),
                InventorySortColumn::Quantity => a.quantity.cmp(&b.quantity),
                InventorySortColumn::Category => cmp_ignore_case(&a.category, &b.category)
                    .then_with(|| cmp_ignore_case(&a.name, &b.name)),
            };
            if self.inventory_sort_ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        items
    }

    /// Cycle the inventory sort column, flipping direction on a repeat.
    pub fn cycle_inventory_sort(&mut self) {
        self.inventory_sort_column = match self.inventory_sort_column {
            InventorySortColumn::Name => InventorySortColumn::Sku,
            InventorySortColumn::Sku => InventorySortColumn::Quantity,
            InventorySortColumn::Quantity => InventorySortColumn::Category,
            InventorySortColumn::Category => InventorySortColumn::Name,
        };
        self.inventory_sort_ascending = true;
    }

    /// Shipments not yet delivered, the "outstanding" dashboard stat.
    pub fn outstanding_shipments(&self) -> usize {
        self.shipments
            .iter()
            .filter(|s| s.status != ShipmentStatus::Delivered)
            .count()
    }

    /// Length of the list on the given tab, for selection clamping.
    pub fn list_len(&self, tab: Tab) -> usize {
        match tab {
            Tab::Dashboard => self.low_stock.len(),
            Tab::Inventory => self.inventory.len(),
            Tab::Shipments => self.shipments.len(),
            Tab::Users => self.users.len(),
        }
    }
}

// ============================================================================
// Input Validation
// ============================================================================

/// Reject control characters in text inputs
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a username character should be accepted
pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

/// Check if a password character should be accepted
pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

/// Check if an item form character should be accepted
pub fn can_add_field_char(current_len: usize, c: char) -> bool {
    current_len < MAX_FIELD_LENGTH && is_valid_input_char(c)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    // -------------------------------------------------------------------------
    // Tab Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_tab_next() {
        assert_eq!(Tab::Dashboard.next(), Tab::Inventory);
        assert_eq!(Tab::Inventory.next(), Tab::Shipments);
        assert_eq!(Tab::Shipments.next(), Tab::Users);
        assert_eq!(Tab::Users.next(), Tab::Dashboard); // Wraps around
    }

    #[test]
    fn test_tab_prev() {
        assert_eq!(Tab::Dashboard.prev(), Tab::Users); // Wraps around
        assert_eq!(Tab::Users.prev(), Tab::Shipments);
        assert_eq!(Tab::Shipments.prev(), Tab::Inventory);
        assert_eq!(Tab::Inventory.prev(), Tab::Dashboard);
    }

    // -------------------------------------------------------------------------
    // Item Form Tests
    // -------------------------------------------------------------------------

    fn filled_form() -> ItemForm {
        ItemForm {
            editing_id: None,
            name: "Hex Bolt M8".to_string(),
            sku: "HB-M8-100".to_string(),
            description: "Box of 100".to_string(),
            quantity: "42".to_string(),
            location: "Aisle 3".to_string(),
            category: "Fasteners".to_string(),
            minimum_stock: "20".to_string(),
            error: None,
        }
    }

    #[test]
    fn test_item_form_valid() {
        let item = filled_form().to_new_item().expect("form should validate");
        assert_eq!(item.sku, "HB-M8-100");
        assert_eq!(item.quantity, 42);
        assert_eq!(item.minimum_stock, 20);
    }

    #[test]
    fn test_item_form_requires_name_and_sku() {
        let mut form = filled_form();
        form.name = "  ".to_string();
        assert!(form.to_new_item().is_err());

        let mut form = filled_form();
        form.sku = String::new();
        assert!(form.to_new_item().is_err());
    }

    #[test]
    fn test_item_form_rejects_bad_numbers() {
        let mut form = filled_form();
        form.quantity = "lots".to_string();
        assert!(form.to_new_item().is_err());

        let mut form = filled_form();
        form.quantity = "-1".to_string();
        assert!(form.to_new_item().is_err());

        let mut form = filled_form();
        form.minimum_stock = "1.5".to_string();
        assert!(form.to_new_item().is_err());
    }

    #[test]
    fn test_item_form_focus_cycle_covers_all_fields() {
        let mut focus = ItemFormFocus::Name;
        let mut seen = 0;
        loop {
            seen += 1;
            focus = focus.next();
            if focus == ItemFormFocus::Name {
                break;
            }
        }
        assert_eq!(seen, 8);
        assert_eq!(ItemFormFocus::Name.prev(), ItemFormFocus::Save);
        assert_eq!(ItemFormFocus::Save.next(), ItemFormFocus::Name);
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_can_add_username_char() {
        assert!(can_add_username_char(0, 'a'));
        assert!(can_add_username_char(49, 'z'));
        assert!(!can_add_username_char(50, 'a'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_can_add_password_char() {
        assert!(can_add_password_char(0, 'a'));
        assert!(can_add_password_char(127, '!'));
        assert!(!can_add_password_char(128, 'a'));
        assert!(!can_add_password_char(0, '\r'));
    }
}
