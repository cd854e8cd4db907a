//! Notification System
//!
//! Toast messages and history for lifecycle operations. A notification is
//! opened when an operation starts and closed when its completion is drained.

use crate::config::NotificationConfig;
use crate::lifecycle::{Action, OperationKind};
use std::collections::VecDeque;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Level of detail for notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DetailLevel {
    /// Minimal: action + resource + status icon
    Minimal,
    /// Detailed: action + resource + duration
    #[default]
    Detailed,
    /// Verbose: all info including error details
    Verbose,
}

impl DetailLevel {
    pub fn from_str(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "minimal" => Self::Minimal,
            "verbose" => Self::Verbose,
            _ => Self::Detailed,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Minimal => "minimal",
            Self::Detailed => "detailed",
            Self::Verbose => "verbose",
        }
    }
}

/// Type of operation being reported
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    Create,
    Start,
    Stop,
    Restart,
    Delete,
    /// Saved settings, profile, or preferences
    Update,
}

impl From<OperationKind> for OperationType {
    fn from(kind: OperationKind) -> Self {
        match kind {
            OperationKind::Provision => Self::Create,
            OperationKind::Start => Self::Start,
            OperationKind::Stop => Self::Stop,
            OperationKind::Restart => Self::Restart,
        }
    }
}

impl From<Action> for OperationType {
    fn from(action: Action) -> Self {
        match action {
            Action::Start => Self::Start,
            Action::Stop => Self::Stop,
            Action::Restart => Self::Restart,
            Action::Delete => Self::Delete,
        }
    }
}

impl OperationType {
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Create => "Create",
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Restart => "Restart",
            Self::Delete => "Delete",
            Self::Update => "Update",
        }
    }

    pub fn past_tense(&self) -> &'static str {
        match self {
            Self::Create => "Created",
            Self::Start => "Started",
            Self::Stop => "Stopped",
            Self::Restart => "Restarted",
            Self::Delete => "Deleted",
            Self::Update => "Updated",
        }
    }

    pub fn present_participle(&self) -> &'static str {
        match self {
            Self::Create => "Creating",
            Self::Start => "Starting",
            Self::Stop => "Stopping",
            Self::Restart => "Restarting",
            Self::Delete => "Deleting",
            Self::Update => "Updating",
        }
    }
}

/// Status of a notification/operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// Operation is running
    InProgress,
    /// Operation completed successfully
    Success,
    /// Operation failed with error message
    Error(String),
    /// Superseded before completion (resource deleted)
    Cancelled,
}

impl NotificationStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::InProgress)
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Self::InProgress => "↻",
            Self::Success => "✓",
            Self::Error(_) => "✗",
            Self::Cancelled => "⊘",
        }
    }
}

/// A single notification
#[derive(Debug, Clone)]
pub struct Notification {
    pub id: Uuid,
    pub operation_type: OperationType,
    pub resource_type: String,
    /// Display name of the resource
    pub resource_name: String,
    pub status: NotificationStatus,
    pub created_at: Instant,
    pub completed_at: Option<Instant>,
}

impl Notification {
    pub fn new(operation_type: OperationType, resource_type: &str, resource_name: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            operation_type,
            resource_type: resource_type.to_string(),
            resource_name: resource_name.to_string(),
            status: NotificationStatus::InProgress,
            created_at: Instant::now(),
            completed_at: None,
        }
    }

    fn finish(&mut self, status: NotificationStatus) {
        self.status = status;
        self.completed_at = Some(Instant::now());
    }

    /// Get duration of operation (or elapsed time if still running)
    pub fn duration(&self) -> Duration {
        self.completed_at
            .unwrap_or_else(Instant::now)
            .duration_since(self.created_at)
    }

    /// Format duration for display
    pub fn duration_display(&self) -> String {
        let d = self.duration();
        if d.as_secs() < 1 {
            format!("{}ms", d.as_millis())
        } else if d.as_secs() < 60 {
            format!("{}s", d.as_secs())
        } else {
            format!("{}m{}s", d.as_secs() / 60, d.as_secs() % 60)
        }
    }

    /// Format notification for toast display (short form)
    pub fn toast_message(&self, detail_level: DetailLevel) -> String {
        let icon = self.status.icon();
        let verb = match &self.status {
            NotificationStatus::InProgress => self.operation_type.present_participle(),
            NotificationStatus::Success => self.operation_type.past_tense(),
            NotificationStatus::Error(_) => "Failed",
            NotificationStatus::Cancelled => "Cancelled",
        };

        match detail_level {
            DetailLevel::Minimal => format!("{} {} {}", icon, verb, self.resource_name),
            DetailLevel::Detailed => {
                if self.status.is_terminal() {
                    format!(
                        "{} {} {} ({})",
                        icon,
                        verb,
                        self.resource_name,
                        self.duration_display()
                    )
                } else {
                    format!("{} {} {}...", icon, verb, self.resource_name)
                }
            },
            DetailLevel::Verbose => {
                let base = format!(
                    "{} {} {} [{}]",
                    icon, verb, self.resource_name, self.resource_type
                );
                if let NotificationStatus::Error(ref err) = self.status {
                    format!("{} - {}", base, err)
                } else if self.status.is_terminal() {
                    format!("{} ({})", base, self.duration_display())
                } else {
                    format!("{}...", base)
                }
            },
        }
    }
}

/// Notification manager
pub struct NotificationManager {
    /// All notifications (recent first)
    pub notifications: VecDeque<Notification>,
    /// Maximum notifications to keep in history
    pub max_history: usize,
    /// Toast display duration
    pub toast_duration: Duration,
    /// Detail level for display
    pub detail_level: DetailLevel,
    /// Toasts are suppressed when disabled; history is still kept
    pub enabled: bool,
    last_toast_time: Option<Instant>,
}

impl Default for NotificationManager {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationManager {
    pub fn new() -> Self {
        Self {
            notifications: VecDeque::new(),
            max_history: 50,
            toast_duration: Duration::from_secs(5),
            detail_level: DetailLevel::Detailed,
            enabled: true,
            last_toast_time: None,
        }
    }

    pub fn from_config(config: &NotificationConfig) -> Self {
        Self {
            max_history: config.max_history.max(1),
            toast_duration: Duration::from_secs(config.toast_duration_secs),
            detail_level: config.detail_level(),
            enabled: config.enabled,
            ..Self::new()
        }
    }

    /// Open a notification for an operation that has just started
    pub fn create_notification(
        &mut self,
        operation_type: OperationType,
        resource_type: &str,
        resource_name: &str,
    ) -> Uuid {
        let notification = Notification::new(operation_type, resource_type, resource_name);
        let id = notification.id;
        self.notifications.push_front(notification);
        self.last_toast_time = Some(Instant::now());
        self.trim_history();
        id
    }

    /// Record an operation that completes immediately (delete, saved forms)
    pub fn record_success(
        &mut self,
        operation_type: OperationType,
        resource_type: &str,
        resource_name: &str,
    ) -> Uuid {
        let id = self.create_notification(operation_type, resource_type, resource_name);
        self.mark_success(id);
        id
    }

    fn finish(&mut self, id: Uuid, status: NotificationStatus) {
        if let Some(notif) = self.notifications.iter_mut().find(|n| n.id == id) {
            notif.finish(status);
            self.last_toast_time = Some(Instant::now());
        }
    }

    pub fn mark_success(&mut self, id: Uuid) {
        self.finish(id, NotificationStatus::Success);
    }

    pub fn mark_error(&mut self, id: Uuid, error: String) {
        self.finish(id, NotificationStatus::Error(error));
    }

    pub fn mark_cancelled(&mut self, id: Uuid) {
        self.finish(id, NotificationStatus::Cancelled);
    }

    /// Get notification by ID
    pub fn get(&self, id: Uuid) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    /// Get the most recent notification while its toast is still visible
    pub fn current_toast(&self) -> Option<&Notification> {
        if !self.enabled {
            return None;
        }
        match self.last_toast_time {
            Some(last_time) if last_time.elapsed() <= self.toast_duration => {
                self.notifications.front()
            },
            _ => None,
        }
    }

    /// Get count of in-progress operations
    pub fn in_progress_count(&self) -> usize {
        self.notifications
            .iter()
            .filter(|n| n.status == NotificationStatus::InProgress)
            .count()
    }

    /// Clear all notifications
    pub fn clear(&mut self) {
        self.notifications.clear();
        self.last_toast_time = None;
    }

    /// Trim history to max size
    fn trim_history(&mut self) {
        while self.notifications.len() > self.max_history {
            // Remove oldest completed notification
            if let Some(pos) = self
                .notifications
                .iter()
                .rposition(|n| n.status.is_terminal())
            {
                self.notifications.remove(pos);
            } else {
                self.notifications.pop_back();
            }
        }
    }

    pub fn has_notifications(&self) -> bool {
        !self.notifications.is_empty()
    }
}
