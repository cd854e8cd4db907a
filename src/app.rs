//! Application State
//!
//! Central application state management for azurelite.

use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::lifecycle::{
    Action, ActionBackend, CompletedOperation, OperationKind, OperationScheduler, Status,
};
use crate::notification::{NotificationManager, OperationType};
use crate::profile::{PreferencesForm, ProfileForm};
use crate::resource::catalog::get_catalog;
use crate::resource::{
    search_services, CreateResourceForm, Directory, Resource, ServiceOffering, SettingsForm,
    ValidationErrors,
};
use chrono::Utc;
use crossterm::event::KeyCode;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

/// Top-level pages
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum View {
    Dashboard,
    Resources,
    /// Detail page for the resource with this id
    Detail(String),
    Create,
    Catalog,
    Profile,
}

impl View {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Dashboard => "dashboard",
            Self::Resources => "resources",
            Self::Detail(_) => "detail",
            Self::Create => "create",
            Self::Catalog => "catalog",
            Self::Profile => "profile",
        }
    }

    /// Views that can be restored by name; detail needs an id
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "dashboard" => Some(Self::Dashboard),
            "resources" => Some(Self::Resources),
            "create" => Some(Self::Create),
            "catalog" => Some(Self::Catalog),
            "profile" => Some(Self::Profile),
            _ => None,
        }
    }
}

/// Application modes
#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,        // Interacting with the current view
    Command,       // : command input
    Help,          // ? help popup
    Confirm,       // Confirmation dialog
    Warning,       // Warning/info dialog (OK only)
    Notifications, // Notifications history panel
    Settings,      // Resource settings form
}

/// Panels of the detail page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailTab {
    #[default]
    Overview,
    Monitoring,
}

impl DetailTab {
    pub fn toggle(self) -> Self {
        match self {
            Self::Overview => Self::Monitoring,
            Self::Monitoring => Self::Overview,
        }
    }
}

/// Pending action that requires confirmation
#[derive(Debug, Clone)]
pub struct PendingAction {
    pub action: Action,
    pub resource_id: String,
    pub message: String,
    pub destructive: bool,
    pub selected_yes: bool,
}

// =========================================================================
// Form State
// =========================================================================

/// Focusable rows of the create form
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CreateField {
    Name,
    Region,
    OsImage,
    VmSize,
    Storage,
    PublicIp,
    Submit,
}

impl CreateField {
    pub const ALL: [CreateField; 7] = [
        CreateField::Name,
        CreateField::Region,
        CreateField::OsImage,
        CreateField::VmSize,
        CreateField::Storage,
        CreateField::PublicIp,
        CreateField::Submit,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, Self::Name | Self::Storage)
    }
}

/// Editing state of the create-resource form
#[derive(Debug, Clone)]
pub struct CreateFormState {
    pub focused: CreateField,
    pub name: String,
    /// Indices into the catalog option lists
    pub region: Option<usize>,
    pub os_image: Option<usize>,
    pub vm_size: Option<usize>,
    /// Raw digits typed for storage capacity
    pub storage: String,
    pub public_ip: bool,
    pub errors: ValidationErrors,
}

impl Default for CreateFormState {
    fn default() -> Self {
        let defaults = CreateResourceForm::default();
        Self {
            focused: CreateField::Name,
            name: defaults.resource_name,
            region: None,
            os_image: None,
            vm_size: None,
            storage: defaults.storage_gb.to_string(),
            public_ip: defaults.enable_public_ip,
            errors: ValidationErrors::default(),
        }
    }
}

impl CreateFormState {
    pub fn to_form(&self) -> CreateResourceForm {
        let catalog = get_catalog();
        let pick = |idx: Option<usize>, options: &[String]| {
            idx.and_then(|i| options.get(i)).cloned().unwrap_or_default()
        };
        let storage_gb = if self.storage.is_empty() {
            0
        } else {
            // Overflow still has to fail the upper bound
            self.storage.parse().unwrap_or(u32::MAX)
        };

        CreateResourceForm {
            resource_name: self.name.clone(),
            region: pick(self.region, &catalog.regions),
            os_image: pick(self.os_image, &catalog.os_images),
            vm_size: self
                .vm_size
                .and_then(|i| catalog.vm_sizes.get(i))
                .map(|s| s.id.clone())
                .unwrap_or_default(),
            storage_gb,
            enable_public_ip: self.public_ip,
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.focused {
            CreateField::Name => self.name.push(c),
            CreateField::Storage if c.is_ascii_digit() && self.storage.len() < 6 => {
                self.storage.push(c)
            },
            CreateField::PublicIp if c == ' ' => self.public_ip = !self.public_ip,
            _ => {},
        }
    }

    pub fn backspace(&mut self) {
        match self.focused {
            CreateField::Name => {
                self.name.pop();
            },
            CreateField::Storage => {
                self.storage.pop();
            },
            _ => {},
        }
    }

    /// Step the focused select (or toggle) forward or back
    pub fn cycle(&mut self, forward: bool) {
        let catalog = get_catalog();
        let step = |current: Option<usize>, len: usize| -> Option<usize> {
            if len == 0 {
                return None;
            }
            Some(match (current, forward) {
                (None, true) => 0,
                (None, false) => len - 1,
                (Some(i), true) => (i + 1) % len,
                (Some(i), false) => (i + len - 1) % len,
            })
        };
        match self.focused {
            CreateField::Region => self.region = step(self.region, catalog.regions.len()),
            CreateField::OsImage => self.os_image = step(self.os_image, catalog.os_images.len()),
            CreateField::VmSize => self.vm_size = step(self.vm_size, catalog.vm_sizes.len()),
            CreateField::PublicIp => self.public_ip = !self.public_ip,
            _ => {},
        }
    }
}

/// Fields of the settings overlay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    Name,
    Tags,
    Description,
}

impl SettingsField {
    pub fn next(self) -> Self {
        match self {
            Self::Name => Self::Tags,
            Self::Tags => Self::Description,
            Self::Description => Self::Name,
        }
    }

    pub fn prev(self) -> Self {
        match self {
            Self::Name => Self::Description,
            Self::Tags => Self::Name,
            Self::Description => Self::Tags,
        }
    }
}

/// Editing state of the settings overlay
#[derive(Debug, Clone)]
pub struct SettingsState {
    pub resource_id: String,
    pub form: SettingsForm,
    pub focused: SettingsField,
    pub errors: ValidationErrors,
}

impl SettingsState {
    pub fn focused_text(&mut self) -> &mut String {
        match self.focused {
            SettingsField::Name => &mut self.form.name,
            SettingsField::Tags => &mut self.form.tags,
            SettingsField::Description => &mut self.form.description,
        }
    }
}

/// Focusable rows of the profile page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProfileField {
    FullName,
    Bio,
    Theme,
    EmailMarketing,
    EmailActivity,
    PushUpdates,
}

impl ProfileField {
    pub const ALL: [ProfileField; 6] = [
        ProfileField::FullName,
        ProfileField::Bio,
        ProfileField::Theme,
        ProfileField::EmailMarketing,
        ProfileField::EmailActivity,
        ProfileField::PushUpdates,
    ];

    fn index(self) -> usize {
        Self::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> Self {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }

    pub fn is_text(self) -> bool {
        matches!(self, Self::FullName | Self::Bio)
    }
}

/// Editing state of the profile page
#[derive(Debug, Clone)]
pub struct ProfileFormState {
    pub focused: ProfileField,
    pub details: ProfileForm,
    pub preferences: PreferencesForm,
    pub errors: ValidationErrors,
}

impl ProfileFormState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            focused: ProfileField::FullName,
            details: ProfileForm::from_profile(&config.profile),
            preferences: PreferencesForm::from_profile(&config.profile),
            errors: ValidationErrors::default(),
        }
    }

    pub fn input_char(&mut self, c: char) {
        match self.focused {
            ProfileField::FullName => self.details.full_name.push(c),
            ProfileField::Bio => self.details.bio.push(c),
            _ if c == ' ' => self.cycle(true),
            _ => {},
        }
    }

    pub fn backspace(&mut self) {
        match self.focused {
            ProfileField::FullName => {
                self.details.full_name.pop();
            },
            ProfileField::Bio => {
                self.details.bio.pop();
            },
            _ => {},
        }
    }

    /// Step the theme or flip the focused toggle
    pub fn cycle(&mut self, forward: bool) {
        let prefs = &mut self.preferences;
        match self.focused {
            ProfileField::Theme => prefs.theme = prefs.theme.cycle(forward),
            ProfileField::EmailMarketing => prefs.email_marketing = !prefs.email_marketing,
            ProfileField::EmailActivity => prefs.email_activity = !prefs.email_activity,
            ProfileField::PushUpdates => prefs.push_updates = !prefs.push_updates,
            ProfileField::FullName | ProfileField::Bio => {},
        }
    }
}

/// Main application state
pub struct App {
    // Resource store and lifecycle operations
    pub directory: Directory,
    pub operations: OperationScheduler,
    operation_notifications: HashMap<Uuid, Uuid>,

    // Navigation state
    pub view: View,
    pub mode: Mode,
    pub list_selected: usize,
    pub filter_active: bool,

    // Command input
    pub command_text: String,
    pub command_suggestions: Vec<String>,
    pub command_suggestion_selected: usize,
    pub command_preview: Option<String>,

    // Confirmation
    pub pending_action: Option<PendingAction>,

    // Forms
    pub create_form: CreateFormState,
    pub settings: Option<SettingsState>,
    pub profile_form: ProfileFormState,
    pub detail_tab: DetailTab,

    // Catalog
    pub catalog_search: String,
    pub catalog_search_active: bool,
    pub catalog_selected: usize,

    // UI state
    pub error_message: Option<String>,
    pub warning_message: Option<String>,

    // Persistent configuration
    pub config: Config,

    // Key press tracking
    pub last_key_press: Option<(KeyCode, Instant)>,

    // Read-only mode
    pub readonly: bool,

    // Notifications
    pub notification_manager: NotificationManager,
    pub notifications_selected: usize,
}

impl App {
    pub fn new(
        config: Config,
        directory: Directory,
        backend: Arc<dyn ActionBackend>,
        readonly: bool,
    ) -> Self {
        let notification_manager = NotificationManager::from_config(&config.notifications);
        let profile_form = ProfileFormState::from_config(&config);
        let view = config
            .last_view
            .as_deref()
            .and_then(View::from_name)
            .unwrap_or(View::Dashboard);

        Self {
            directory,
            operations: OperationScheduler::new(backend),
            operation_notifications: HashMap::new(),
            view,
            mode: Mode::Normal,
            list_selected: 0,
            filter_active: false,
            command_text: String::new(),
            command_suggestions: Vec::new(),
            command_suggestion_selected: 0,
            command_preview: None,
            pending_action: None,
            create_form: CreateFormState::default(),
            settings: None,
            profile_form,
            detail_tab: DetailTab::default(),
            catalog_search: String::new(),
            catalog_search_active: false,
            catalog_selected: 0,
            error_message: None,
            warning_message: None,
            config,
            last_key_press: None,
            readonly,
            notification_manager,
            notifications_selected: 0,
        }
    }

    // =========================================================================
    // View Navigation
    // =========================================================================

    pub fn navigate(&mut self, view: View) {
        if let View::Detail(id) = view {
            self.open_detail(Some(&id));
            return;
        }

        tracing::debug!("Navigating to {}", view.name());
        if view == View::Create && self.view != View::Create {
            self.create_form = CreateFormState::default();
        }
        if view == View::Profile && self.view != View::Profile {
            self.profile_form = ProfileFormState::from_config(&self.config);
        }
        self.view = view;
        self.mode = Mode::Normal;
        self.filter_active = false;
        self.catalog_search_active = false;
        self.config.last_view = Some(self.view.name().to_string());
    }

    /// Open the detail page. An absent or unknown id lands on the resource
    /// list with a notice instead.
    pub fn open_detail(&mut self, id: Option<&str>) {
        self.mode = Mode::Normal;
        self.filter_active = false;
        match self.directory.lookup(id) {
            Ok(resource) => {
                let view = View::Detail(resource.id.clone());
                if self.view != view {
                    self.detail_tab = DetailTab::Overview;
                }
                self.view = view;
                self.error_message = None;
            },
            Err(e) => {
                tracing::warn!("Redirecting to resource list: {}", e);
                self.view = View::Resources;
                self.error_message = Some(e.to_string());
            },
        }
    }

    pub fn open_selected(&mut self) {
        let id = self.selected_resource().map(|r| r.id.clone());
        self.open_detail(id.as_deref());
    }

    /// The resource shown on the detail page
    pub fn detail_resource(&self) -> Option<&Resource> {
        match &self.view {
            View::Detail(id) => self.directory.get(id),
            _ => None,
        }
    }

    /// Target of action shortcuts: the highlighted row or the detail resource
    pub fn selected_resource(&self) -> Option<&Resource> {
        match &self.view {
            View::Resources => self
                .directory
                .current_page_items()
                .get(self.list_selected)
                .copied(),
            View::Detail(_) => self.detail_resource(),
            _ => None,
        }
    }

    pub fn get_breadcrumb(&self) -> Vec<String> {
        match &self.view {
            View::Detail(id) => {
                let name = self
                    .directory
                    .get(id)
                    .map(|r| r.name.clone())
                    .unwrap_or_else(|| id.clone());
                vec!["resources".to_string(), name]
            },
            view => vec![view.name().to_string()],
        }
    }

    // =========================================================================
    // Resource List
    // =========================================================================

    fn page_len(&self) -> usize {
        self.directory.current_page_items().len()
    }

    fn clamp_list_selection(&mut self) {
        let len = self.page_len();
        if self.list_selected >= len {
            self.list_selected = len.saturating_sub(1);
        }
    }

    pub fn next(&mut self) {
        match self.view {
            View::Catalog => {
                let len = self.catalog_results().len();
                if len > 0 {
                    self.catalog_selected = (self.catalog_selected + 1).min(len - 1);
                }
            },
            _ => {
                let len = self.page_len();
                if len > 0 {
                    self.list_selected = (self.list_selected + 1).min(len - 1);
                }
            },
        }
    }

    pub fn previous(&mut self) {
        match self.view {
            View::Catalog => self.catalog_selected = self.catalog_selected.saturating_sub(1),
            _ => self.list_selected = self.list_selected.saturating_sub(1),
        }
    }

    pub fn go_to_top(&mut self) {
        match self.view {
            View::Catalog => self.catalog_selected = 0,
            _ => self.list_selected = 0,
        }
    }

    pub fn go_to_bottom(&mut self) {
        match self.view {
            View::Catalog => self.catalog_selected = self.catalog_results().len().saturating_sub(1),
            _ => self.list_selected = self.page_len().saturating_sub(1),
        }
    }

    pub fn next_page(&mut self) {
        if self.directory.next_page() {
            self.list_selected = 0;
        }
    }

    pub fn prev_page(&mut self) {
        if self.directory.prev_page() {
            self.list_selected = 0;
        }
    }

    pub fn go_to_page(&mut self, page: usize) {
        if self.directory.go_to_page(page) {
            self.list_selected = 0;
        } else {
            self.error_message = Some(format!(
                "Page {} is out of range (1-{})",
                page,
                self.directory.total_pages()
            ));
        }
    }

    // =========================================================================
    // Filtering
    // =========================================================================

    pub fn push_filter_char(&mut self, c: char) {
        self.directory.push_search_char(c);
        self.list_selected = 0;
    }

    pub fn pop_filter_char(&mut self) {
        self.directory.pop_search_char();
        self.list_selected = 0;
    }

    pub fn clear_filter(&mut self) {
        self.directory.clear_search();
        self.filter_active = false;
        self.list_selected = 0;
    }

    // =========================================================================
    // Catalog
    // =========================================================================

    pub fn catalog_results(&self) -> Vec<&'static ServiceOffering> {
        search_services(&self.catalog_search)
    }

    pub fn push_catalog_char(&mut self, c: char) {
        self.catalog_search.push(c);
        self.catalog_selected = 0;
    }

    pub fn pop_catalog_char(&mut self) {
        self.catalog_search.pop();
        self.catalog_selected = 0;
    }

    pub fn clear_catalog_search(&mut self) {
        self.catalog_search.clear();
        self.catalog_search_active = false;
        self.catalog_selected = 0;
    }

    /// Start the create flow from the highlighted offering
    pub fn select_service(&mut self) {
        let Some(service) = self.catalog_results().get(self.catalog_selected).copied() else {
            return;
        };
        tracing::info!("Creating from catalog offering {}", service.id);
        self.navigate(View::Create);
    }

    // =========================================================================
    // Mode Transitions
    // =========================================================================

    pub fn get_available_commands(&self) -> Vec<String> {
        let mut commands: Vec<String> = [
            "dashboard",
            "resources",
            "catalog",
            "create",
            "profile",
            "help",
            "notifications",
            "notifications clear",
            "quit",
        ]
        .iter()
        .map(|s| s.to_string())
        .collect();

        commands.extend(
            self.directory
                .resources()
                .iter()
                .map(|r| format!("detail {}", r.id)),
        );
        commands.sort();
        commands
    }

    pub fn enter_command_mode(&mut self) {
        self.mode = Mode::Command;
        self.command_text.clear();
        self.command_suggestions = self.get_available_commands();
        self.command_suggestion_selected = 0;
        self.command_preview = None;
    }

    pub fn update_command_suggestions(&mut self) {
        let input = self.command_text.to_lowercase();
        let all_commands = self.get_available_commands();

        if input.is_empty() {
            self.command_suggestions = all_commands;
        } else {
            self.command_suggestions = all_commands
                .into_iter()
                .filter(|cmd| cmd.to_lowercase().contains(&input))
                .collect();
        }

        if self.command_suggestion_selected >= self.command_suggestions.len() {
            self.command_suggestion_selected = 0;
        }

        self.update_preview();
    }

    fn update_preview(&mut self) {
        self.command_preview = self
            .command_suggestions
            .get(self.command_suggestion_selected)
            .cloned();
    }

    pub fn next_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            self.command_suggestion_selected =
                (self.command_suggestion_selected + 1) % self.command_suggestions.len();
            self.update_preview();
        }
    }

    pub fn prev_suggestion(&mut self) {
        if !self.command_suggestions.is_empty() {
            if self.command_suggestion_selected == 0 {
                self.command_suggestion_selected = self.command_suggestions.len() - 1;
            } else {
                self.command_suggestion_selected -= 1;
            }
            self.update_preview();
        }
    }

    pub fn apply_suggestion(&mut self) {
        if let Some(preview) = &self.command_preview {
            self.command_text = preview.clone();
            self.update_command_suggestions();
        }
    }

    pub fn enter_help_mode(&mut self) {
        self.mode = Mode::Help;
    }

    pub fn enter_confirm_mode(&mut self, pending: PendingAction) {
        self.pending_action = Some(pending);
        self.mode = Mode::Confirm;
    }

    pub fn show_warning(&mut self, message: &str) {
        self.warning_message = Some(message.to_string());
        self.mode = Mode::Warning;
    }

    pub fn enter_notifications_mode(&mut self) {
        self.notifications_selected = 0;
        self.mode = Mode::Notifications;
    }

    pub fn exit_mode(&mut self) {
        self.mode = Mode::Normal;
        self.pending_action = None;
        self.settings = None;
        self.warning_message = None;
    }

    // =========================================================================
    // Lifecycle Actions
    // =========================================================================

    /// Trigger an action on the selected resource, reporting rejections in
    /// the status line
    pub fn request_action(&mut self, action: Action) {
        if let Err(e) = self.try_action(action) {
            tracing::info!("Rejected {}: {}", action, e);
            self.error_message = Some(e.to_string());
        }
    }

    /// Trigger an action on the selected resource. Delete only opens the
    /// confirmation dialog.
    pub fn try_action(&mut self, action: Action) -> Result<()> {
        if self.readonly {
            self.show_warning("Read-only mode: actions are disabled");
            return Ok(());
        }

        let Some(resource) = self.selected_resource() else {
            return Ok(());
        };
        let id = resource.id.clone();

        if action.requires_confirm() {
            let pending = PendingAction {
                action,
                message: format!(
                    "Are you sure you want to delete \"{}\" (ID: {})? \
                     This action cannot be undone.",
                    resource.name, resource.id
                ),
                resource_id: id,
                destructive: true,
                selected_yes: false,
            };
            self.enter_confirm_mode(pending);
            return Ok(());
        }

        if self.operations.is_in_flight(&id) {
            return Err(DashboardError::OperationInFlight(id));
        }
        if !action.is_enabled(&resource.status) {
            return Err(DashboardError::ActionNotPermitted {
                action,
                status: resource.status.label(),
            });
        }

        match action.operation() {
            Some(kind) => self.begin_operation(&id, kind).map(|_| ()),
            None => Ok(()),
        }
    }

    /// Apply the intermediate status now and schedule the terminal one
    pub fn begin_operation(&mut self, resource_id: &str, kind: OperationKind) -> Result<Uuid> {
        let resource = self
            .directory
            .get(resource_id)
            .ok_or_else(|| DashboardError::NotFound(resource_id.to_string()))?;
        let (resource_type, name) = (resource.resource_type.clone(), resource.name.clone());

        let op_id = self.operations.schedule(resource_id, kind)?;
        let previous = self.directory.set_status(resource_id, kind.intermediate())?;
        tracing::info!(
            "{} {}: {} -> {}",
            kind.as_str(),
            resource_id,
            previous,
            kind.intermediate()
        );

        let notification_id = self.notification_manager.create_notification(
            OperationType::from(kind),
            &resource_type,
            &name,
        );
        self.operation_notifications.insert(op_id, notification_id);
        Ok(op_id)
    }

    /// Resolve the confirmation dialog
    pub fn confirm_pending(&mut self, yes: bool) {
        let Some(pending) = self.pending_action.take() else {
            self.exit_mode();
            return;
        };
        self.exit_mode();

        if !yes {
            tracing::debug!("{} declined for {}", pending.action, pending.resource_id);
            return;
        }

        if pending.action == Action::Delete {
            if let Err(e) = self.delete_resource(&pending.resource_id) {
                self.error_message = Some(e.to_string());
            }
        }
    }

    /// Remove a resource, superseding any operation still running for it
    pub fn delete_resource(&mut self, resource_id: &str) -> Result<Resource> {
        if let Some(op_id) = self.operations.cancel(resource_id) {
            if let Some(notification_id) = self.operation_notifications.remove(&op_id) {
                self.notification_manager.mark_cancelled(notification_id);
            }
        }

        let removed = self
            .directory
            .remove(resource_id)
            .ok_or_else(|| DashboardError::NotFound(resource_id.to_string()))?;
        tracing::info!("Deleted {}", resource_id);

        self.notification_manager.record_success(
            OperationType::Delete,
            &removed.resource_type,
            &removed.name,
        );
        if self.view == View::Detail(resource_id.to_string()) {
            self.view = View::Resources;
        }
        self.clamp_list_selection();
        Ok(removed)
    }

    /// Apply every completion the scheduler has received
    pub fn process_completed_operations(&mut self) {
        for done in self.operations.try_completed() {
            self.apply_completion(done);
        }
    }

    pub fn apply_completion(&mut self, done: CompletedOperation) {
        let notification_id = self.operation_notifications.remove(&done.id);

        match done.outcome {
            Ok(()) => {
                let terminal = done.kind.terminal();
                match self.directory.set_status(&done.resource_id, terminal.clone()) {
                    Ok(_) => tracing::info!(
                        "{} {} finished: {}",
                        done.kind.as_str(),
                        done.resource_id,
                        terminal
                    ),
                    Err(e) => tracing::warn!("Completion for missing resource: {}", e),
                }
                if let Some(id) = notification_id {
                    self.notification_manager.mark_success(id);
                }
            },
            Err(error) => {
                tracing::error!(
                    "{} {} failed: {}",
                    done.kind.as_str(),
                    done.resource_id,
                    error
                );
                if let Err(e) = self.directory.set_status(&done.resource_id, Status::Error) {
                    tracing::warn!("Failure for missing resource: {}", e);
                }
                if let Some(id) = notification_id {
                    self.notification_manager.mark_error(id, error.clone());
                }
                self.error_message = Some(format!(
                    "Failed to {} {}: {}",
                    done.kind.as_str(),
                    done.resource_id,
                    error
                ));
            },
        }
    }

    // =========================================================================
    // Create / Settings
    // =========================================================================

    fn new_resource_id(&self) -> String {
        loop {
            let simple = Uuid::new_v4().simple().to_string();
            let id = format!("vm-{}", &simple[..8]);
            if self.directory.get(&id).is_none() {
                return id;
            }
        }
    }

    /// Submit the create form. Returns the new id, or None when validation
    /// failed and the errors are shown inline.
    pub fn submit_create_form(&mut self) -> Option<String> {
        if self.readonly {
            self.show_warning("Read-only mode: actions are disabled");
            return None;
        }

        let id = self.new_resource_id();
        let resource = match self.create_form.to_form().into_resource(&id, Utc::now()) {
            Ok(resource) => resource,
            Err(errors) => {
                tracing::debug!("Create form rejected: {}", errors);
                self.create_form.errors = errors;
                return None;
            },
        };

        if let Err(e) = self.directory.insert(resource) {
            self.error_message = Some(e.to_string());
            return None;
        }
        if let Err(e) = self.begin_operation(&id, OperationKind::Provision) {
            self.error_message = Some(e.to_string());
        }

        self.create_form = CreateFormState::default();
        self.navigate(View::Resources);
        Some(id)
    }

    pub fn open_settings(&mut self) {
        if self.readonly {
            self.show_warning("Read-only mode: actions are disabled");
            return;
        }
        let Some(resource) = self.detail_resource() else {
            return;
        };
        self.settings = Some(SettingsState {
            resource_id: resource.id.clone(),
            form: SettingsForm::from_resource(resource),
            focused: SettingsField::Name,
            errors: ValidationErrors::default(),
        });
        self.mode = Mode::Settings;
    }

    /// Save the settings overlay. Invalid input keeps the overlay open.
    pub fn apply_settings(&mut self) -> bool {
        let Some(state) = self.settings.as_mut() else {
            return false;
        };
        let Some(current) = self.directory.get(&state.resource_id) else {
            self.settings = None;
            self.mode = Mode::Normal;
            return false;
        };

        let mut updated = current.clone();
        if let Err(errors) = state.form.apply(&mut updated) {
            state.errors = errors;
            return false;
        }

        let id = state.resource_id.clone();
        let (resource_type, name) = (updated.resource_type.clone(), updated.name.clone());
        match self.directory.update(&id, |r| *r = updated) {
            Ok(()) => {
                tracing::info!("Updated settings for {}", id);
                self.notification_manager
                    .record_success(OperationType::Update, &resource_type, &name);
                self.exit_mode();
                true
            },
            Err(e) => {
                self.error_message = Some(e.to_string());
                false
            },
        }
    }

    // =========================================================================
    // Profile
    // =========================================================================

    /// Save name and bio. Invalid input stays on the page with inline errors.
    pub fn save_profile(&mut self) -> bool {
        let form = &mut self.profile_form;
        if let Err(errors) = form.details.apply(&mut self.config.profile) {
            tracing::debug!("Profile form rejected: {}", errors);
            form.errors = errors;
            return false;
        }
        form.errors = ValidationErrors::default();
        tracing::info!("Updated profile for {}", self.config.profile.full_name);
        self.notification_manager.record_success(
            OperationType::Update,
            "Profile",
            &self.config.profile.full_name,
        );
        true
    }

    pub fn save_preferences(&mut self) {
        self.profile_form.preferences.apply(&mut self.config.profile);
        tracing::info!(
            "Updated preferences (theme: {})",
            self.config.profile.theme.as_str()
        );
        self.notification_manager
            .record_success(OperationType::Update, "Preferences", "preferences");
    }

    /// Enter on the profile page saves the section the focus is in
    pub fn submit_profile_page(&mut self) {
        if self.profile_form.focused.is_text() {
            self.save_profile();
        } else {
            self.save_preferences();
        }
    }

    // =========================================================================
    // Notifications
    // =========================================================================

    pub fn clear_notifications(&mut self) {
        self.notification_manager.clear();
        self.notifications_selected = 0;
    }

    // =========================================================================
    // Command Execution
    // =========================================================================

    /// Run the command box input. Returns true when the app should quit.
    pub fn execute_command(&mut self) -> bool {
        let command_text = if self.command_text.is_empty() {
            self.command_preview.clone().unwrap_or_default()
        } else if let Some(preview) = &self.command_preview {
            if preview.contains(&self.command_text) {
                preview.clone()
            } else {
                self.command_text.clone()
            }
        } else {
            self.command_text.clone()
        };

        self.run_command(&command_text)
    }

    pub fn run_command(&mut self, command_text: &str) -> bool {
        let parts: Vec<&str> = command_text.split_whitespace().collect();
        let Some(&cmd) = parts.first() else {
            return false;
        };
        self.mode = Mode::Normal;

        match cmd {
            "q" | "quit" => return true,
            "help" => self.enter_help_mode(),
            "detail" => self.open_detail(parts.get(1).copied()),
            "notifications" => {
                if parts.get(1) == Some(&"clear") {
                    self.clear_notifications();
                } else {
                    self.enter_notifications_mode();
                }
            },
            "page" => match parts.get(1).and_then(|p| p.parse().ok()) {
                Some(page) => self.go_to_page(page),
                None => self.error_message = Some("Usage: page <number>".to_string()),
            },
            other => match View::from_name(other) {
                Some(view) => self.navigate(view),
                None => self.error_message = Some(format!("Unknown command: {}", other)),
            },
        }

        false
    }
}
