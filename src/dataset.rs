//! Parent resource of attributes. Only its address matters to this crate.

use crate::resource_url::ResourceUrl;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    pub url: ResourceUrl,
    pub name: String,
    pub description: Option<String>,
}

impl Dataset {
    pub fn new(url: ResourceUrl, name: &str) -> Self {
        Self {
            url,
            name: name.to_string(),
            description: None,
        }
    }

    /// A dataset known only by address, e.g. `Dataset::at(instance.resource("datasets/7")?)`.
    pub fn at(url: ResourceUrl) -> Self {
        Self {
            url,
            name: String::new(),
            description: None,
        }
    }
}
