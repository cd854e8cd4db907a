//! Service Catalog - embedded service offerings, form options, and sample data
//!
//! The catalog and the sample fleet are compiled into the binary as JSON and
//! parsed on first access.

use super::model::Resource;
use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use std::sync::OnceLock;

const CATALOG_JSON: &str = include_str!("../resources/catalog.json");
const SAMPLES_JSON: &str = include_str!("../resources/samples.json");

/// A provisionable service shown in the catalog view
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceOffering {
    pub id: String,
    pub service_name: String,
    pub description: String,
    pub action_text: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl ServiceOffering {
    fn matches(&self, query_lower: &str) -> bool {
        self.service_name.to_lowercase().contains(query_lower)
            || self.description.to_lowercase().contains(query_lower)
            || self
                .tags
                .iter()
                .any(|tag| tag.to_lowercase().contains(query_lower))
    }
}

/// Selectable VM size
#[derive(Debug, Clone, Deserialize)]
pub struct VmSize {
    pub id: String,
    pub name: String,
}

/// Root structure of resources/catalog.json
#[derive(Debug, Clone, Deserialize)]
pub struct Catalog {
    pub services: Vec<ServiceOffering>,
    pub regions: Vec<String>,
    pub os_images: Vec<String>,
    pub vm_sizes: Vec<VmSize>,
}

impl Catalog {
    pub fn vm_size(&self, id: &str) -> Option<&VmSize> {
        self.vm_sizes.iter().find(|s| s.id == id)
    }
}

static CATALOG: OnceLock<Catalog> = OnceLock::new();

/// Get the catalog (parsed from embedded JSON on first access)
pub fn get_catalog() -> &'static Catalog {
    CATALOG.get_or_init(|| {
        serde_json::from_str(CATALOG_JSON)
            .unwrap_or_else(|e| panic!("Failed to parse embedded catalog JSON: {}", e))
    })
}

/// Services whose name, description, or tags contain `query` (case-insensitive).
/// A blank query returns the whole catalog.
pub fn search_services(query: &str) -> Vec<&'static ServiceOffering> {
    let services = &get_catalog().services;
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return services.iter().collect();
    }
    services.iter().filter(|s| s.matches(&query)).collect()
}

/// Built-in sample fleet
pub fn sample_resources() -> Result<Vec<Resource>> {
    serde_json::from_str(SAMPLES_JSON).context("Failed to parse embedded sample resources")
}

/// Load a JSON array of resources from disk
pub fn load_resources(path: &Path) -> Result<Vec<Resource>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content)
        .with_context(|| format!("Invalid resource file {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lifecycle::Status;

    #[test]
    fn test_catalog_loads_successfully() {
        let catalog = get_catalog();
        assert_eq!(catalog.services.len(), 4);
        assert_eq!(catalog.regions.len(), 4);
        assert_eq!(catalog.os_images.len(), 5);
        assert_eq!(
            catalog.vm_size("pro_4c_8gb").map(|s| s.name.as_str()),
            Some("Pro (4 vCPUs, 8GB RAM)")
        );
        assert!(catalog.vm_size("huge").is_none());
    }

    #[test]
    fn test_search_services() {
        assert_eq!(search_services("").len(), 4);
        assert_eq!(search_services("   ").len(), 4);

        let ids: Vec<&str> = search_services("DATA").iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids, vec!["storage", "database"]);

        let ids: Vec<&str> = search_services("kubernetes")
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        assert_eq!(ids, vec!["containers"]);

        assert!(search_services("mainframe").is_empty());
    }

    #[test]
    fn test_samples_parse_with_canonical_status() {
        let samples = sample_resources().unwrap();
        assert_eq!(samples.len(), 10);
        let db = samples.iter().find(|r| r.id == "db-main-01").unwrap();
        assert_eq!(db.status, Status::Running);
        let vm = samples.iter().find(|r| r.id == "vm-001").unwrap();
        assert_eq!(vm.tags.len(), 2);
    }

    #[test]
    fn test_load_resources_missing_file() {
        let err = load_resources(Path::new("/definitely/not/here.json")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
