//! User Profile
//!
//! The local user's display details and preferences. Both live in the config
//! file; there is no account behind them.

use crate::resource::ValidationErrors;
use serde::{Deserialize, Serialize};

pub const FULL_NAME_MIN: usize = 2;
pub const FULL_NAME_MAX: usize = 50;
pub const BIO_MAX: usize = 200;

pub mod profile_field {
    pub const FULL_NAME: &str = "full_name";
    pub const BIO: &str = "bio";
}

/// Color theme preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
    #[default]
    System,
}

impl Theme {
    pub const ALL: [Theme; 3] = [Theme::Light, Theme::Dark, Theme::System];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::System => "system",
        }
    }

    pub fn cycle(self, forward: bool) -> Self {
        let len = Self::ALL.len();
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        let next = if forward {
            (idx + 1) % len
        } else {
            (idx + len - 1) % len
        };
        Self::ALL[next]
    }
}

/// Persisted profile and preferences
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    pub full_name: String,
    /// Shown but never edited here
    pub email: String,
    pub bio: String,
    pub theme: Theme,
    pub email_marketing: bool,
    pub email_activity: bool,
    pub push_updates: bool,
}

impl Default for UserProfile {
    fn default() -> Self {
        Self {
            full_name: "Demo User".to_string(),
            email: "demo.user@example.com".to_string(),
            bio: "Cloud enthusiast and developer.".to_string(),
            theme: Theme::System,
            email_marketing: false,
            email_activity: true,
            push_updates: true,
        }
    }
}

impl UserProfile {
    /// Up to two initials for the avatar badge
    pub fn initials(&self) -> String {
        let initials: String = self
            .full_name
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() {
            "?".to_string()
        } else {
            initials
        }
    }
}

/// Editable profile details
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    pub full_name: String,
    pub bio: String,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            full_name: profile.full_name.clone(),
            bio: profile.bio.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let len = self.full_name.chars().count();
        if len < FULL_NAME_MIN {
            errors.add(
                profile_field::FULL_NAME,
                "Full name must be at least 2 characters.",
            );
        } else if len > FULL_NAME_MAX {
            errors.add(
                profile_field::FULL_NAME,
                "Full name must be 50 characters or less.",
            );
        }
        if self.bio.chars().count() > BIO_MAX {
            errors.add(profile_field::BIO, "Bio must be 200 characters or less.");
        }
        errors.into_result()
    }

    /// Validate and write name and bio into `profile`
    pub fn apply(&self, profile: &mut UserProfile) -> Result<(), ValidationErrors> {
        self.validate()?;
        profile.full_name = self.full_name.clone();
        profile.bio = self.bio.clone();
        Ok(())
    }
}

/// Theme and notification toggles
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PreferencesForm {
    pub theme: Theme,
    pub email_marketing: bool,
    pub email_activity: bool,
    pub push_updates: bool,
}

impl PreferencesForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            theme: profile.theme,
            email_marketing: profile.email_marketing,
            email_activity: profile.email_activity,
            push_updates: profile.push_updates,
        }
    }

    pub fn apply(&self, profile: &mut UserProfile) {
        profile.theme = self.theme;
        profile.email_marketing = self.email_marketing;
        profile.email_activity = self.email_activity;
        profile.push_updates = self.push_updates;
    }
}
