//! Create-resource and settings forms with field-scoped validation.

use super::catalog::get_catalog;
use super::model::{format_tags, parse_tags, Resource};
use crate::lifecycle::Status;
use chrono::{DateTime, Utc};
use std::fmt;

pub const NAME_MIN: usize = 3;
pub const NAME_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 200;
pub const STORAGE_MIN_GB: u32 = 10;
pub const STORAGE_MAX_GB: u32 = 1000;
pub const STORAGE_DEFAULT_GB: u32 = 50;

/// Validation failure for one form field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// All field errors of one submission
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn add(&mut self, field: &'static str, message: &str) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// First message for a field, for inline display
    pub fn for_field(&self, field: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.message.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.0.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join(" "))
    }
}

fn check_name(errors: &mut ValidationErrors, field: &'static str, name: &str) {
    let len = name.chars().count();
    if len < NAME_MIN {
        errors.add(field, "Resource name must be at least 3 characters.");
    } else if len > NAME_MAX {
        errors.add(field, "Resource name must be 50 characters or less.");
    }
}

// =========================================================================
// Create resource
// =========================================================================

pub mod create_field {
    pub const NAME: &str = "resource_name";
    pub const REGION: &str = "region";
    pub const OS_IMAGE: &str = "os_image";
    pub const VM_SIZE: &str = "vm_size";
    pub const STORAGE: &str = "storage_gb";
    pub const PUBLIC_IP: &str = "enable_public_ip";
}

/// Input of the create-resource flow
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateResourceForm {
    pub resource_name: String,
    pub region: String,
    pub os_image: String,
    /// Catalog VM size id
    pub vm_size: String,
    pub storage_gb: u32,
    pub enable_public_ip: bool,
}

impl Default for CreateResourceForm {
    fn default() -> Self {
        Self {
            resource_name: String::new(),
            region: String::new(),
            os_image: String::new(),
            vm_size: String::new(),
            storage_gb: STORAGE_DEFAULT_GB,
            enable_public_ip: true,
        }
    }
}

impl CreateResourceForm {
    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();

        check_name(&mut errors, create_field::NAME, &self.resource_name);
        if self.region.is_empty() {
            errors.add(create_field::REGION, "Region is required.");
        }
        if self.os_image.is_empty() {
            errors.add(create_field::OS_IMAGE, "OS Image is required.");
        }
        if self.vm_size.is_empty() {
            errors.add(create_field::VM_SIZE, "VM Size is required.");
        }
        if self.storage_gb < STORAGE_MIN_GB {
            errors.add(create_field::STORAGE, "Storage must be at least 10GB.");
        } else if self.storage_gb > STORAGE_MAX_GB {
            errors.add(create_field::STORAGE, "Storage cannot exceed 1000GB.");
        }

        errors.into_result()
    }

    /// Build the new record in Provisioning status
    pub fn into_resource(self, id: &str, now: DateTime<Utc>) -> Result<Resource, ValidationErrors> {
        self.validate()?;

        let size = get_catalog()
            .vm_size(&self.vm_size)
            .map(|s| s.name.clone())
            .unwrap_or_else(|| self.vm_size.clone());

        let mut resource = Resource::new(
            id,
            &self.resource_name,
            "Virtual Machine",
            &self.region,
            Status::Provisioning,
            now,
        );
        resource.size = Some(size);
        resource.os = Some(self.os_image);
        resource.disk = Some(format!("{}GB SSD", self.storage_gb));
        resource.ip_address = Some(if self.enable_public_ip {
            placeholder_public_ip(id)
        } else {
            "None (private only)".to_string()
        });
        Ok(resource)
    }
}

/// Stable made-up address for a new VM, derived from its id
fn placeholder_public_ip(id: &str) -> String {
    // FNV-1a
    let hash = id.bytes().fold(0x811c_9dc5_u32, |h, b| {
        (h ^ u32::from(b)).wrapping_mul(0x0100_0193)
    });
    let [a, b, c, _] = hash.to_be_bytes();
    format!("20.{}.{}.{}", a, b, c % 254 + 1)
}

// =========================================================================
// Resource settings
// =========================================================================

pub mod settings_field {
    pub const NAME: &str = "name";
    pub const TAGS: &str = "tags";
    pub const DESCRIPTION: &str = "description";
}

/// Editable settings on the detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsForm {
    pub name: String,
    /// `key=value, ...`
    pub tags: String,
    pub description: String,
}

impl SettingsForm {
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            name: resource.name.clone(),
            tags: format_tags(&resource.tags),
            description: resource.effective_description(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::default();
        check_name(&mut errors, settings_field::NAME, &self.name);
        if self.description.chars().count() > DESCRIPTION_MAX {
            errors.add(
                settings_field::DESCRIPTION,
                "Description cannot exceed 200 characters.",
            );
        }
        errors.into_result()
    }

    /// Validate and write name, tags, and description into `resource`.
    /// A generated description is not stored, so it follows later renames.
    pub fn apply(&self, resource: &mut Resource) -> Result<(), ValidationErrors> {
        self.validate()?;
        let prefilled = resource.default_description();
        resource.name = self.name.clone();
        resource.tags = parse_tags(&self.tags);

        let description = self.description.trim();
        resource.description = if description.is_empty()
            || description == prefilled
            || description == resource.default_description()
        {
            None
        } else {
            Some(self.description.clone())
        };
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resource::model::Tag;

    fn valid_form() -> CreateResourceForm {
        CreateResourceForm {
            resource_name: "api-gateway".to_string(),
            region: "East US".to_string(),
            os_image: "Debian 11".to_string(),
            vm_size: "standard_2c_4gb".to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults() {
        let form = CreateResourceForm::default();
        assert_eq!(form.storage_gb, 50);
        assert!(form.enable_public_ip);
    }

    #[test]
    fn test_empty_form_reports_every_required_field() {
        let errors = CreateResourceForm::default().validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.for_field(create_field::NAME),
            Some("Resource name must be at least 3 characters.")
        );
        assert_eq!(errors.for_field(create_field::REGION), Some("Region is required."));
        assert_eq!(errors.for_field(create_field::OS_IMAGE), Some("OS Image is required."));
        assert_eq!(errors.for_field(create_field::VM_SIZE), Some("VM Size is required."));
        assert_eq!(errors.for_field(create_field::STORAGE), None);
    }

    #[test]
    fn test_name_and_storage_bounds() {
        let mut form = valid_form();
        form.resource_name = "x".repeat(51);
        form.storage_gb = 9;
        let errors = form.validate().unwrap_err();
        assert_eq!(
            errors.for_field(create_field::NAME),
            Some("Resource name must be 50 characters or less.")
        );
        assert_eq!(
            errors.for_field(create_field::STORAGE),
            Some("Storage must be at least 10GB.")
        );

        form.resource_name = "x".repeat(50);
        form.storage_gb = 1001;
        let errors = form.validate().unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.for_field(create_field::STORAGE),
            Some("Storage cannot exceed 1000GB.")
        );

        form.storage_gb = 1000;
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_into_resource_starts_provisioning() {
        let now = Utc::now();
        let resource = valid_form().into_resource("vm-1234abcd", now).unwrap();
        assert_eq!(resource.id, "vm-1234abcd");
        assert_eq!(resource.status, Status::Provisioning);
        assert_eq!(resource.resource_type, "Virtual Machine");
        assert_eq!(resource.created_at(), now);
        assert_eq!(resource.size.as_deref(), Some("Standard (2 vCPUs, 4GB RAM)"));
        assert_eq!(resource.disk.as_deref(), Some("50GB SSD"));

        let ip = resource.ip_address.clone().unwrap();
        assert!(ip.starts_with("20."));
        assert_eq!(ip.split('.').count(), 4);
        let again = valid_form().into_resource("vm-1234abcd", now).unwrap();
        assert_eq!(again.ip_address, Some(ip));
    }

    #[test]
    fn test_into_resource_private_only() {
        let mut form = valid_form();
        form.enable_public_ip = false;
        let resource = form.into_resource("vm-1", Utc::now()).unwrap();
        assert_eq!(resource.ip_address.as_deref(), Some("None (private only)"));
    }

    #[test]
    fn test_into_resource_rejects_invalid() {
        let mut form = valid_form();
        form.region.clear();
        assert!(form.into_resource("vm-1", Utc::now()).is_err());
    }

    #[test]
    fn test_settings_roundtrip_from_resource() {
        let mut resource = valid_form().into_resource("vm-1", Utc::now()).unwrap();
        resource.tags = vec![Tag::new("env", "dev")];

        let mut form = SettingsForm::from_resource(&resource);
        assert_eq!(form.name, "api-gateway");
        assert_eq!(form.tags, "env=dev");
        assert_eq!(
            form.description,
            "This is api-gateway, a Virtual Machine in East US."
        );

        form.name = "edge-gateway".to_string();
        form.tags = "env=prod, team=edge".to_string();
        form.apply(&mut resource).unwrap();
        assert_eq!(resource.name, "edge-gateway");
        assert_eq!(resource.tags, vec![Tag::new("env", "prod"), Tag::new("team", "edge")]);

        // The untouched generated description tracks the new name
        assert_eq!(resource.description, None);
        assert_eq!(
            resource.effective_description(),
            "This is edge-gateway, a Virtual Machine in East US."
        );
    }

    #[test]
    fn test_settings_keeps_custom_description() {
        let mut resource = valid_form().into_resource("vm-1", Utc::now()).unwrap();
        let mut form = SettingsForm::from_resource(&resource);
        form.description = "Public API entry point".to_string();
        form.apply(&mut resource).unwrap();
        assert_eq!(resource.description.as_deref(), Some("Public API entry point"));

        let mut form = SettingsForm::from_resource(&resource);
        form.name = "api-edge".to_string();
        form.apply(&mut resource).unwrap();
        assert_eq!(resource.description.as_deref(), Some("Public API entry point"));
    }

    #[test]
    fn test_settings_validation_leaves_resource_untouched() {
        let mut resource = valid_form().into_resource("vm-1", Utc::now()).unwrap();
        let before = resource.clone();

        let form = SettingsForm {
            name: "ab".to_string(),
            tags: "a=b".to_string(),
            description: "d".repeat(201),
        };
        let errors = form.apply(&mut resource).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.for_field(settings_field::DESCRIPTION),
            Some("Description cannot exceed 200 characters.")
        );
        assert_eq!(resource, before);
    }
}
