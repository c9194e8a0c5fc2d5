//! Catalog Client - Attribute resources of a remote data catalog
//!
//! Attributes are the named, typed columns of a Dataset. This crate models
//! them as immutable values and exposes create/read/update/delete over the
//! catalog's resource-oriented HTTP API.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │  attribute: from_resource_id / from_dataset_all / create /      │
//! │             update / delete  (status -> domain error mapping)    │
//! └─────────────────────────────────────────────────────────────────┘
//!                               │
//!            ┌──────────────────┼──────────────────┐
//!            ▼                  ▼                  ▼
//!   ResourceUrl (addressing)  to_json/from_json   Session (HTTP verbs)
//!                             + AttributeType      HttpSession (reqwest)
//! ```
//!
//! # Usage
//!
//! ```ignore
//! use catalog_client::{attribute, AttributeType, Dataset, HttpSession, NewAttribute, SessionConfig};
//!
//! let config = SessionConfig::from_env()?;
//! let session = HttpSession::new(&config)?;
//! let dataset = Dataset::at(config.instance.resource("datasets/7")?);
//!
//! let attr = attribute::create(
//!     &session,
//!     &dataset,
//!     &NewAttribute::new("customer_name", true).with_type(AttributeType::String),
//! )?;
//! let attr = attribute::update(&session, &attr, Some("Full legal name"))?;
//! attribute::delete(&session, &attr)?;
//! ```

pub mod attribute;
pub mod attribute_type;
pub mod config;
pub mod dataset;
pub mod error;
pub mod resource_url;
pub mod session;

// Re-export main types
pub use attribute::{Attribute, NewAttribute, RESERVED_NAMES};
pub use attribute_type::{AttributeType, SubAttribute};
pub use config::{Instance, SessionConfig};
pub use dataset::Dataset;
pub use error::{Error, Result};
pub use resource_url::ResourceUrl;
pub use session::{HttpSession, Response, Session};
