//! Resource Directory
//!
//! In-memory store of resource records with case-insensitive search and
//! fixed-size pagination over the search result.

use super::model::Resource;
use crate::error::{DashboardError, Result};
use crate::lifecycle::{Category, Status};
use std::collections::{HashMap, HashSet};
use std::ops::Range;

/// Rows per page in the resource list
pub const DEFAULT_PAGE_SIZE: usize = 5;

/// True when name, type, or region contains `query_lower`.
/// `query_lower` must already be lower-cased.
fn matches(resource: &Resource, query_lower: &str) -> bool {
    resource.name.to_lowercase().contains(query_lower)
        || resource.resource_type.to_lowercase().contains(query_lower)
        || resource.region.to_lowercase().contains(query_lower)
}

/// Filter resources by a case-insensitive substring of name, type, or region.
/// An empty query keeps everything in the original order.
pub fn filter_resources<'a>(resources: &'a [Resource], query: &str) -> Vec<&'a Resource> {
    if query.is_empty() {
        return resources.iter().collect();
    }

    let query = query.to_lowercase();
    resources.iter().filter(|r| matches(r, &query)).collect()
}

/// `ceil(count / page_size)`, never less than 1
pub fn total_pages(count: usize, page_size: usize) -> usize {
    count.div_ceil(page_size.max(1)).max(1)
}

/// Index range of a 1-based page, clamped to `count`
pub fn page_range(count: usize, page: usize, page_size: usize) -> Range<usize> {
    let page_size = page_size.max(1);
    let start = page.saturating_sub(1).saturating_mul(page_size).min(count);
    let end = start.saturating_add(page_size).min(count);
    start..end
}

/// Slice of one 1-based page
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    &items[page_range(items.len(), page, page_size)]
}

/// Ordered resource collection plus the list view's search and page state
#[derive(Debug, Clone)]
pub struct Directory {
    resources: Vec<Resource>,
    search: String,
    current_page: usize,
    page_size: usize,
}

impl Directory {
    /// Build a directory; ids must be unique
    pub fn new(resources: Vec<Resource>, page_size: usize) -> Result<Self> {
        let mut seen = HashSet::new();
        for resource in &resources {
            if !seen.insert(resource.id.as_str()) {
                return Err(DashboardError::DuplicateId(resource.id.clone()));
            }
        }

        Ok(Self {
            resources,
            search: String::new(),
            current_page: 1,
            page_size: page_size.max(1),
        })
    }

    pub fn resources(&self) -> &[Resource] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Resource> {
        self.resources.iter().find(|r| r.id == id)
    }

    /// Resolve an identifier handed over by the list view
    pub fn lookup(&self, id: Option<&str>) -> Result<&Resource> {
        let id = id.ok_or(DashboardError::MissingId)?;
        self.get(id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))
    }

    /// Append a resource; the id must not already exist
    pub fn insert(&mut self, resource: Resource) -> Result<()> {
        if self.get(&resource.id).is_some() {
            return Err(DashboardError::DuplicateId(resource.id));
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Remove a resource, pulling the current page back if it no longer exists
    pub fn remove(&mut self, id: &str) -> Option<Resource> {
        let index = self.resources.iter().position(|r| r.id == id)?;
        let removed = self.resources.remove(index);
        self.current_page = self.current_page.min(self.total_pages());
        Some(removed)
    }

    /// Replace a resource's status, returning the previous one
    pub fn set_status(&mut self, id: &str, status: Status) -> Result<Status> {
        let resource = self
            .resources
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))?;
        Ok(std::mem::replace(&mut resource.status, status))
    }

    /// Apply an in-place edit to one resource
    pub fn update<F>(&mut self, id: &str, edit: F) -> Result<()>
    where
        F: FnOnce(&mut Resource),
    {
        let resource = self
            .resources
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or_else(|| DashboardError::NotFound(id.to_string()))?;
        edit(resource);
        Ok(())
    }

    // =========================================================================
    // Search
    // =========================================================================

    pub fn search(&self) -> &str {
        &self.search
    }

    /// Replace the search text; always returns to page 1
    pub fn set_search(&mut self, search: impl Into<String>) {
        self.search = search.into();
        self.current_page = 1;
    }

    pub fn push_search_char(&mut self, c: char) {
        let mut search = std::mem::take(&mut self.search);
        search.push(c);
        self.set_search(search);
    }

    pub fn pop_search_char(&mut self) {
        let mut search = std::mem::take(&mut self.search);
        search.pop();
        self.set_search(search);
    }

    pub fn clear_search(&mut self) {
        self.set_search(String::new());
    }

    pub fn filtered(&self) -> Vec<&Resource> {
        filter_resources(&self.resources, &self.search)
    }

    pub fn filtered_count(&self) -> usize {
        self.filtered().len()
    }

    // =========================================================================
    // Pagination
    // =========================================================================

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn total_pages(&self) -> usize {
        total_pages(self.filtered_count(), self.page_size)
    }

    /// Jump to a 1-based page. Out-of-range requests leave the page unchanged
    /// and return false.
    pub fn go_to_page(&mut self, page: usize) -> bool {
        if page < 1 || page > self.total_pages() {
            return false;
        }
        self.current_page = page;
        true
    }

    pub fn next_page(&mut self) -> bool {
        self.go_to_page(self.current_page + 1)
    }

    pub fn prev_page(&mut self) -> bool {
        self.go_to_page(self.current_page.saturating_sub(1))
    }

    pub fn current_page_items(&self) -> Vec<&Resource> {
        let filtered = self.filtered();
        paginate(&filtered, self.current_page, self.page_size).to_vec()
    }

    // =========================================================================
    // Dashboard
    // =========================================================================

    /// Resource count per status category, over the whole collection
    pub fn summary(&self) -> HashMap<Category, usize> {
        let mut counts: HashMap<Category, usize> =
            Category::ALL.iter().map(|c| (*c, 0)).collect();
        for resource in &self.resources {
            *counts.entry(resource.status.category()).or_insert(0) += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn resource(id: &str, name: &str, kind: &str, region: &str, status: &str) -> Resource {
        Resource::new(
            id,
            name,
            kind,
            region,
            Status::parse(status),
            Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap(),
        )
    }

    const FLEET: [(&str, &str, &str, &str, &str); 10] = [
        ("vm-001", "Frontend Web Server", "Virtual Machine", "East US", "Running"),
        ("db-01", "Primary SQL Database", "Database Server", "West Europe", "Active"),
        ("st-01", "Backup Storage Blob", "Storage Account", "Central US", "Online"),
        ("vm-dev", "Development Environment VM", "Virtual Machine", "East US", "Stopped"),
        ("vm-new", "New API Gateway VM", "Virtual Machine", "West Europe", "Provisioning"),
        ("net-01", "Main Virtual Network", "Virtual Network", "East US", "Active"),
        ("vm-k8s", "Kubernetes Worker Node 1", "Virtual Machine", "West Europe", "Running"),
        ("fn-01", "Order Processing Function App", "Function App", "Central US", "Warning"),
        ("vm-old", "Legacy App Server", "Virtual Machine", "East US", "Error"),
        ("cdn-01", "Global CDN Profile", "CDN", "Global", "Active"),
    ];

    fn fleet() -> Vec<Resource> {
        FLEET
            .iter()
            .map(|(id, name, kind, region, status)| resource(id, name, kind, region, status))
            .collect()
    }

    fn ids(items: &[&Resource]) -> Vec<String> {
        items.iter().map(|r| r.id.clone()).collect()
    }

    #[test]
    fn test_empty_search_keeps_order() {
        let resources = fleet();
        let filtered = filter_resources(&resources, "");
        assert_eq!(filtered.len(), resources.len());
        assert_eq!(
            ids(&filtered),
            resources.iter().map(|r| r.id.clone()).collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_search_matches_name_type_region() {
        let resources = fleet();
        assert_eq!(ids(&filter_resources(&resources, "legacy")), vec!["vm-old"]);
        assert_eq!(ids(&filter_resources(&resources, "CDN")), vec!["cdn-01"]);
        assert_eq!(
            ids(&filter_resources(&resources, "central us")),
            vec!["st-01", "fn-01"]
        );
        assert!(filter_resources(&resources, "nothing-like-this").is_empty());
    }

    #[test]
    fn test_search_ignores_status_and_id() {
        let resources = fleet();
        assert!(filter_resources(&resources, "provisioning").is_empty());
        assert!(filter_resources(&resources, "vm-001").is_empty());
    }

    #[test]
    fn test_total_pages() {
        assert_eq!(total_pages(0, 5), 1);
        assert_eq!(total_pages(5, 5), 1);
        assert_eq!(total_pages(6, 5), 2);
        assert_eq!(total_pages(10, 5), 2);
        assert_eq!(total_pages(11, 5), 3);
    }

    #[test]
    fn test_page_range_clamps() {
        assert_eq!(page_range(10, 1, 5), 0..5);
        assert_eq!(page_range(10, 2, 5), 5..10);
        assert_eq!(page_range(7, 2, 5), 5..7);
        assert_eq!(page_range(7, 9, 5), 7..7);
        assert_eq!(page_range(0, 1, 5), 0..0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut resources = fleet();
        resources.push(resource("vm-001", "Clone", "Virtual Machine", "East US", "Running"));
        let err = Directory::new(resources, 5).unwrap_err();
        assert_eq!(err, DashboardError::DuplicateId("vm-001".to_string()));

        let mut dir = Directory::new(fleet(), 5).unwrap();
        let dup = resource("cdn-01", "Other", "CDN", "Global", "Active");
        assert!(dir.insert(dup).is_err());
        assert_eq!(dir.len(), 10);
    }

    #[test]
    fn test_go_to_page_out_of_range_is_noop() {
        let mut dir = Directory::new(fleet(), 5).unwrap();
        assert_eq!(dir.total_pages(), 2);
        assert!(dir.go_to_page(2));
        assert_eq!(dir.current_page(), 2);

        assert!(!dir.go_to_page(3));
        assert!(!dir.go_to_page(0));
        assert!(!dir.next_page());
        assert_eq!(dir.current_page(), 2);

        assert!(dir.prev_page());
        assert!(!dir.prev_page());
        assert_eq!(dir.current_page(), 1);
    }

    #[test]
    fn test_search_change_resets_page() {
        let mut dir = Directory::new(fleet(), 3).unwrap();
        assert!(dir.go_to_page(3));

        dir.push_search_char('v');
        assert_eq!(dir.current_page(), 1);

        assert!(dir.go_to_page(2));
        dir.pop_search_char();
        assert_eq!(dir.current_page(), 1);

        assert!(dir.go_to_page(2));
        dir.clear_search();
        assert_eq!(dir.current_page(), 1);
    }

    #[test]
    fn test_current_page_items() {
        let mut dir = Directory::new(fleet(), 4).unwrap();
        dir.set_search("virtual machine");
        // five VMs over two pages of four
        assert_eq!(dir.filtered_count(), 5);
        assert_eq!(dir.total_pages(), 2);
        assert_eq!(
            ids(&dir.current_page_items()),
            vec!["vm-001", "vm-dev", "vm-new", "vm-k8s"]
        );
        assert!(dir.next_page());
        assert_eq!(ids(&dir.current_page_items()), vec!["vm-old"]);
    }

    #[test]
    fn test_remove_clamps_page() {
        let mut dir = Directory::new(fleet(), 5).unwrap();
        assert!(dir.go_to_page(2));
        for id in ["cdn-01", "fn-01", "vm-old", "vm-k8s", "net-01"] {
            assert!(dir.remove(id).is_some());
        }
        assert_eq!(dir.total_pages(), 1);
        assert_eq!(dir.current_page(), 1);
        assert!(dir.remove("cdn-01").is_none());
    }

    #[test]
    fn test_lookup_errors() {
        let dir = Directory::new(fleet(), 5).unwrap();
        assert_eq!(dir.lookup(None).unwrap_err(), DashboardError::MissingId);
        assert_eq!(
            dir.lookup(Some("nope")).unwrap_err(),
            DashboardError::NotFound("nope".to_string())
        );
        assert_eq!(dir.lookup(Some("vm-dev")).unwrap().name, "Development Environment VM");
    }

    #[test]
    fn test_set_status_and_update() {
        let mut dir = Directory::new(fleet(), 5).unwrap();
        let previous = dir.set_status("vm-dev", Status::Provisioning).unwrap();
        assert_eq!(previous, Status::Stopped);
        assert_eq!(dir.get("vm-dev").unwrap().status, Status::Provisioning);
        assert!(dir.set_status("missing", Status::Running).is_err());

        dir.update("vm-dev", |r| r.name = "Renamed".to_string()).unwrap();
        assert_eq!(dir.get("vm-dev").unwrap().name, "Renamed");
    }

    #[test]
    fn test_summary_counts_categories() {
        let dir = Directory::new(fleet(), 5).unwrap();
        let summary = dir.summary();
        assert_eq!(summary[&Category::Healthy], 6);
        assert_eq!(summary[&Category::Stopped], 1);
        assert_eq!(summary[&Category::InProgress], 1);
        assert_eq!(summary[&Category::Attention], 2);
        assert_eq!(summary[&Category::Unknown], 0);
    }

    #[test]
    fn test_zero_page_size_is_clamped() {
        let dir = Directory::new(fleet(), 0).unwrap();
        assert_eq!(dir.page_size(), 1);
        assert_eq!(dir.total_pages(), 10);
    }
}
