//! Resource records and their tags.

use crate::lifecycle::Status;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Key/value label attached to a resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

impl Tag {
    pub fn new(key: &str, value: &str) -> Self {
        Self {
            key: key.to_string(),
            value: value.to_string(),
        }
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={}", self.key, self.value)
    }
}

/// Parse `key=value, key2=value2` text. Entries missing a key or a value are dropped.
pub fn parse_tags(text: &str) -> Vec<Tag> {
    text.split(',')
        .filter_map(|entry| {
            let (key, value) = entry.split_once('=')?;
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                None
            } else {
                Some(Tag::new(key, value))
            }
        })
        .collect()
}

pub fn format_tags(tags: &[Tag]) -> String {
    tags.iter()
        .map(|t| t.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

/// One cloud resource
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub resource_type: String,
    pub region: String,
    pub status: Status,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ip_address: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub os: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub disk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<Tag>,
}

impl Resource {
    pub fn new(
        id: &str,
        name: &str,
        resource_type: &str,
        region: &str,
        status: Status,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            resource_type: resource_type.to_string(),
            region: region.to_string(),
            status,
            created_at,
            ip_address: None,
            size: None,
            os: None,
            disk: None,
            description: None,
            tags: Vec::new(),
        }
    }

    /// Creation instant; fixed once the record exists
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Description shown when none has been set
    pub fn default_description(&self) -> String {
        format!(
            "This is {}, a {} in {}.",
            self.name, self.resource_type, self.region
        )
    }

    pub fn effective_description(&self) -> String {
        self.description
            .clone()
            .unwrap_or_else(|| self.default_description())
    }

    /// Label/value pairs for the detail overview
    pub fn overview(&self) -> Vec<(&'static str, String)> {
        let or_na = |v: &Option<String>| v.clone().unwrap_or_else(|| "N/A".to_string());
        vec![
            ("ID", self.id.clone()),
            ("Type", self.resource_type.clone()),
            ("Region", self.region.clone()),
            ("Public IP", or_na(&self.ip_address)),
            ("Size/Spec", or_na(&self.size)),
            ("Operating System", or_na(&self.os)),
            ("Disk", or_na(&self.disk)),
            (
                "Created At",
                self.created_at.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
            ),
            (
                "Tags",
                if self.tags.is_empty() {
                    "None".to_string()
                } else {
                    format_tags(&self.tags)
                },
            ),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_tags() {
        let tags = parse_tags("env=production, app = webserver ,broken, =novalue, nokey=");
        assert_eq!(
            tags,
            vec![Tag::new("env", "production"), Tag::new("app", "webserver")]
        );
        assert!(parse_tags("").is_empty());
    }

    #[test]
    fn test_parse_tags_keeps_extra_equals_in_value() {
        let tags = parse_tags("query=a=b");
        assert_eq!(tags, vec![Tag::new("query", "a=b")]);
    }

    #[test]
    fn test_format_tags() {
        let tags = vec![Tag::new("env", "production"), Tag::new("app", "webserver")];
        assert_eq!(format_tags(&tags), "env=production, app=webserver");
        assert_eq!(parse_tags(&format_tags(&tags)), tags);
    }

    #[test]
    fn test_resource_json_shape() {
        let json = r#"{
            "id": "vm-001",
            "name": "Frontend Web Server",
            "type": "Virtual Machine",
            "status": "active",
            "region": "East US",
            "createdAt": "2024-07-15T10:30:00Z"
        }"#;
        let resource: Resource = serde_json::from_str(json).unwrap();
        assert_eq!(resource.resource_type, "Virtual Machine");
        assert_eq!(resource.status, Status::Running);
        assert_eq!(
            resource.created_at(),
            Utc.with_ymd_and_hms(2024, 7, 15, 10, 30, 0).unwrap()
        );
        assert!(resource.tags.is_empty());
    }

    #[test]
    fn test_overview_defaults() {
        let resource = Resource::new(
            "vm-1",
            "Box",
            "Virtual Machine",
            "East US",
            Status::Stopped,
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
        );
        let overview = resource.overview();
        assert!(overview.contains(&("Public IP", "N/A".to_string())));
        assert!(overview.contains(&("Tags", "None".to_string())));
        assert!(overview.contains(&("Created At", "2024-01-02 03:04:05 UTC".to_string())));
        assert_eq!(
            resource.effective_description(),
            "This is Box, a Virtual Machine in East US."
        );
    }
}
