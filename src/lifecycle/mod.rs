//! Resource Lifecycle Model
//!
//! Canonical status classification, action enablement, and the two-phase
//! transitions each lifecycle action triggers.
//!
//! # Architecture
//!
//! - [`Status`] - canonical status values, parsed case-insensitively
//! - [`classify`] - the single status to category/label mapping used by every view
//! - [`Action`] - user-triggered lifecycle actions and their enablement rules
//! - [`operation`] - deferred completion of transitions through a swappable backend

pub mod operation;

pub use operation::{
    ActionBackend, CompletedOperation, OperationScheduler, SimulatedBackend, SimulatedDelays,
};

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Coarse status grouping used to pick a display color
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    Healthy,
    Stopped,
    InProgress,
    Attention,
    Unknown,
}

impl Category {
    pub const ALL: [Category; 5] = [
        Category::Healthy,
        Category::Stopped,
        Category::InProgress,
        Category::Attention,
        Category::Unknown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Healthy => "Healthy",
            Self::Stopped => "Stopped",
            Self::InProgress => "In progress",
            Self::Attention => "Attention",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Resource status, canonicalized from case-insensitive input.
///
/// Unrecognized input is kept verbatim in [`Status::Unknown`] so it can still
/// be displayed.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Status {
    Running,
    Stopped,
    Provisioning,
    Pending,
    Updating,
    Deleting,
    Error,
    Warning,
    Maintenance,
    Unknown(String),
}

impl Status {
    /// Parse a raw status string. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "running" | "active" | "online" => Self::Running,
            "stopped" | "offline" => Self::Stopped,
            "provisioning" | "creating" => Self::Provisioning,
            "pending" => Self::Pending,
            "updating" => Self::Updating,
            "deleting" => Self::Deleting,
            "error" | "failed" => Self::Error,
            "warning" => Self::Warning,
            "maintenance" => Self::Maintenance,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn category(&self) -> Category {
        match self {
            Self::Running => Category::Healthy,
            Self::Stopped => Category::Stopped,
            Self::Provisioning
            | Self::Pending
            | Self::Updating
            | Self::Deleting
            | Self::Maintenance => Category::InProgress,
            Self::Error | Self::Warning => Category::Attention,
            Self::Unknown(_) => Category::Unknown,
        }
    }

    /// Canonical capitalized label
    pub fn label(&self) -> String {
        match self {
            Self::Running => "Running".to_string(),
            Self::Stopped => "Stopped".to_string(),
            Self::Provisioning => "Provisioning".to_string(),
            Self::Pending => "Pending".to_string(),
            Self::Updating => "Updating".to_string(),
            Self::Deleting => "Deleting".to_string(),
            Self::Error => "Error".to_string(),
            Self::Warning => "Warning".to_string(),
            Self::Maintenance => "Maintenance".to_string(),
            Self::Unknown(raw) => capitalize(raw.trim()),
        }
    }

    pub fn display(&self) -> StatusDisplay {
        StatusDisplay {
            category: self.category(),
            label: self.label(),
        }
    }

    /// Transitional states get a spinner-style marker in tables
    pub fn is_transitional(&self) -> bool {
        self.category() == Category::InProgress
    }
}

impl Default for Status {
    fn default() -> Self {
        Self::Unknown(String::new())
    }
}

impl FromStr for Status {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for Status {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl From<&str> for Status {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<Status> for String {
    fn from(status: Status) -> Self {
        match status {
            Status::Unknown(raw) => raw,
            other => other.label(),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Category and label for one status value
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusDisplay {
    pub category: Category,
    pub label: String,
}

/// Classify a raw status string into its display category and label
pub fn classify(raw: &str) -> StatusDisplay {
    Status::parse(raw).display()
}

/// First character upper-cased, the rest lower-cased
fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => "Unknown".to_string(),
    }
}

/// User-triggered lifecycle actions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    Start,
    Stop,
    Restart,
    Delete,
}

impl Action {
    pub const ALL: [Action; 4] = [Action::Start, Action::Stop, Action::Restart, Action::Delete];

    pub fn display_name(self) -> &'static str {
        match self {
            Self::Start => "Start",
            Self::Stop => "Stop",
            Self::Restart => "Restart",
            Self::Delete => "Delete",
        }
    }

    pub fn shortcut(self) -> char {
        match self {
            Self::Start => 's',
            Self::Stop => 'S',
            Self::Restart => 'r',
            Self::Delete => 'x',
        }
    }

    /// Whether the action may be issued for a resource in `status`
    pub fn is_enabled(self, status: &Status) -> bool {
        match self {
            Self::Start => !matches!(status, Status::Running | Status::Provisioning),
            Self::Stop => !matches!(status, Status::Stopped | Status::Deleting),
            Self::Restart => matches!(status, Status::Running),
            Self::Delete => true,
        }
    }

    /// Delete needs an explicit confirmation before anything changes
    pub fn requires_confirm(self) -> bool {
        matches!(self, Self::Delete)
    }

    /// The deferred operation this action runs, if any.
    ///
    /// Delete removes the resource directly once confirmed.
    pub fn operation(self) -> Option<OperationKind> {
        match self {
            Self::Start => Some(OperationKind::Start),
            Self::Stop => Some(OperationKind::Stop),
            Self::Restart => Some(OperationKind::Restart),
            Self::Delete => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Enablement of every action for one status, in [`Action::ALL`] order
pub fn enabled_actions(status: &Status) -> Vec<(Action, bool)> {
    Action::ALL
        .iter()
        .map(|action| (*action, action.is_enabled(status)))
        .collect()
}

/// Two-phase operations: an immediate intermediate status, then a terminal one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OperationKind {
    Provision,
    Start,
    Stop,
    Restart,
}

impl OperationKind {
    pub fn intermediate(self) -> Status {
        match self {
            Self::Provision | Self::Start => Status::Provisioning,
            Self::Stop => Status::Deleting,
            Self::Restart => Status::Updating,
        }
    }

    pub fn terminal(self) -> Status {
        match self {
            Self::Provision | Self::Start | Self::Restart => Status::Running,
            Self::Stop => Status::Stopped,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Provision => "provision",
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Restart => "restart",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_is_case_insensitive() {
        for raw in ["RUNNING", "Running", "running"] {
            let display = classify(raw);
            assert_eq!(display.category, Category::Healthy);
            assert_eq!(display.label, "Running");
        }
    }

    #[test]
    fn test_classify_aliases() {
        assert_eq!(classify("active").label, "Running");
        assert_eq!(classify("Online").category, Category::Healthy);
        assert_eq!(classify("offline").label, "Stopped");
        assert_eq!(classify("creating").label, "Provisioning");
        assert_eq!(classify("FAILED").label, "Error");
        assert_eq!(classify("FAILED").category, Category::Attention);
    }

    #[test]
    fn test_classify_full_table() {
        let table = [
            ("stopped", Category::Stopped, "Stopped"),
            ("provisioning", Category::InProgress, "Provisioning"),
            ("pending", Category::InProgress, "Pending"),
            ("updating", Category::InProgress, "Updating"),
            ("deleting", Category::InProgress, "Deleting"),
            ("error", Category::Attention, "Error"),
            ("warning", Category::Attention, "Warning"),
            ("maintenance", Category::InProgress, "Maintenance"),
        ];
        for (raw, category, label) in table {
            let display = classify(raw);
            assert_eq!(display.category, category, "category for {}", raw);
            assert_eq!(display.label, label, "label for {}", raw);
        }
    }

    #[test]
    fn test_classify_unknown_keeps_text() {
        let display = classify("banana");
        assert_eq!(display.category, Category::Unknown);
        assert_eq!(display.label, "Banana");

        assert_eq!(classify("rEQUIRES ACTION").label, "Requires action");
        assert_eq!(classify("unknown").label, "Unknown");
        assert_eq!(classify("").label, "Unknown");
    }

    #[test]
    fn test_status_serde_uses_labels() {
        let status: Status = serde_json::from_str("\"Active\"").unwrap();
        assert_eq!(status, Status::Running);
        assert_eq!(serde_json::to_string(&status).unwrap(), "\"Running\"");

        let custom: Status = serde_json::from_str("\"Starting\"").unwrap();
        assert_eq!(custom, Status::Unknown("Starting".to_string()));
        assert_eq!(serde_json::to_string(&custom).unwrap(), "\"Starting\"");
    }

    #[test]
    fn test_running_enablement() {
        let status = Status::Running;
        assert!(!Action::Start.is_enabled(&status));
        assert!(Action::Stop.is_enabled(&status));
        assert!(Action::Restart.is_enabled(&status));
        assert!(Action::Delete.is_enabled(&status));
    }

    #[test]
    fn test_stopped_enablement() {
        let status = Status::Stopped;
        assert!(Action::Start.is_enabled(&status));
        assert!(!Action::Stop.is_enabled(&status));
        assert!(!Action::Restart.is_enabled(&status));
        assert!(Action::Delete.is_enabled(&status));
    }

    #[test]
    fn test_in_progress_enablement() {
        assert!(!Action::Start.is_enabled(&Status::Provisioning));
        assert!(Action::Stop.is_enabled(&Status::Provisioning));
        assert!(!Action::Stop.is_enabled(&Status::Deleting));
        assert!(Action::Start.is_enabled(&Status::Deleting));
        assert!(!Action::Restart.is_enabled(&Status::Updating));
    }

    #[test]
    fn test_delete_always_enabled() {
        for raw in ["running", "stopped", "deleting", "error", "banana"] {
            assert!(Action::Delete.is_enabled(&Status::parse(raw)));
        }
    }

    #[test]
    fn test_enabled_actions_order() {
        let actions = enabled_actions(&Status::Running);
        assert_eq!(
            actions,
            vec![
                (Action::Start, false),
                (Action::Stop, true),
                (Action::Restart, true),
                (Action::Delete, true),
            ]
        );
    }

    #[test]
    fn test_operation_transitions() {
        assert_eq!(OperationKind::Start.intermediate(), Status::Provisioning);
        assert_eq!(OperationKind::Start.terminal(), Status::Running);
        assert_eq!(OperationKind::Stop.intermediate(), Status::Deleting);
        assert_eq!(OperationKind::Stop.terminal(), Status::Stopped);
        assert_eq!(OperationKind::Restart.intermediate(), Status::Updating);
        assert_eq!(OperationKind::Restart.terminal(), Status::Running);
        assert_eq!(OperationKind::Provision.terminal(), Status::Running);
        assert_eq!(Action::Delete.operation(), None);
        assert!(Action::Delete.requires_confirm());
    }
}
