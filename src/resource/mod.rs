//! Resource data layer
//!
//! Everything the views read and edit about resources, kept free of any
//! terminal concerns.
//!
//! # Architecture
//!
//! - [`model`] - resource records and tag text parsing
//! - [`directory`] - the in-memory store with search and pagination
//! - [`catalog`] - embedded service catalog, form options, and sample fleet
//! - [`form`] - create-resource and settings validation
//! - [`metrics`] - sample monitoring series for the detail page
//!
//! # Data files
//!
//! Catalog and sample data are JSON files under `src/resources/`, embedded at
//! compile time:
//! - `catalog.json` - service offerings, regions, OS images, VM sizes
//! - `samples.json` - the default resource fleet
//!
//! # Example
//!
//! ```ignore
//! use azurelite::resource::{sample_resources, Directory, DEFAULT_PAGE_SIZE};
//!
//! let mut directory = Directory::new(sample_resources()?, DEFAULT_PAGE_SIZE)?;
//! directory.set_search("east");
//! for resource in directory.current_page_items() {
//!     println!("{} {}", resource.id, resource.status);
//! }
//! ```

pub mod catalog;
pub mod directory;
pub mod form;
pub mod metrics;
pub mod model;

pub use catalog::{
    get_catalog, load_resources, sample_resources, search_services, ServiceOffering,
};
pub use directory::{filter_resources, paginate, total_pages, Directory, DEFAULT_PAGE_SIZE};
pub use form::{CreateResourceForm, SettingsForm, ValidationErrors};
pub use metrics::Metrics;
pub use model::{format_tags, parse_tags, Resource, Tag};
