//! Attributes of a dataset
//!
//! An [`Attribute`] is an immutable snapshot of a column as the server last
//! reported it. Every change is a request that returns a fresh value; the
//! value you held before is not touched.
//!
//! Addressing:
//!
//! ```text
//! {dataset}/attributes          collection (GET lists, POST creates)
//! {dataset}/attributes/{name}   item (GET, PUT, DELETE)
//! ```
//!
//! Status mapping: 404 on item operations is [`Error::AttributeNotFound`],
//! 409 on create is [`Error::AttributeExists`], any other non-2xx status is
//! [`Error::Http`].

use serde::Deserialize;
use serde_json::{json, Value};

use crate::attribute_type::AttributeType;
use crate::dataset::Dataset;
use crate::error::{Error, Result};
use crate::resource_url::ResourceUrl;
use crate::session::Session;

/// Names the catalog's own pipeline columns use. Creating attributes with
/// these names is refused before any request is sent.
pub const RESERVED_NAMES: &[&str] = &[
    // Search index identity columns
    "origin_source_name",
    "tamr_id",
    "origin_entity_id",
    // Clustering pipeline columns
    "clusterId",
    "originSourceId",
    "originEntityId",
    "sourceId",
    "entityId",
    "suggestedClusterId",
    "verificationType",
    "verifiedClusterId",
];

const NOT_FOUND: u16 = 404;
const CONFLICT: u16 = 409;

/// A column of a dataset as reported by the server.
///
/// Equality ignores the raw payload.
#[derive(Debug, Clone)]
pub struct Attribute {
    url: ResourceUrl,
    name: String,
    attr_type: AttributeType,
    is_nullable: bool,
    description: Option<String>,
    raw: Value,
}

impl Attribute {
    pub fn url(&self) -> &ResourceUrl {
        &self.url
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn attr_type(&self) -> &AttributeType {
        &self.attr_type
    }

    pub fn is_nullable(&self) -> bool {
        self.is_nullable
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// The JSON document this value was decoded from.
    pub fn raw(&self) -> &Value {
        &self.raw
    }
}

impl PartialEq for Attribute {
    fn eq(&self, other: &Self) -> bool {
        self.url == other.url
            && self.name == other.name
            && self.attr_type == other.attr_type
            && self.is_nullable == other.is_nullable
            && self.description == other.description
    }
}

impl Eq for Attribute {}

/// Parameters for [`create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAttribute {
    pub name: String,
    pub attr_type: AttributeType,
    pub is_nullable: bool,
    pub description: Option<String>,
}

impl NewAttribute {
    /// New attribute of the default type (`ARRAY<STRING>`).
    pub fn new(name: &str, is_nullable: bool) -> Self {
        Self {
            name: name.to_string(),
            attr_type: AttributeType::default(),
            is_nullable,
            description: None,
        }
    }

    pub fn with_type(mut self, attr_type: AttributeType) -> Self {
        self.attr_type = attr_type;
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }
}

// ============================================================================
// Addressing
// ============================================================================

/// `{dataset}/attributes`
pub fn collection_url(dataset: &Dataset) -> ResourceUrl {
    dataset.url.join("attributes")
}

/// `{collection}/{name}`
pub fn item_url(collection: &ResourceUrl, name: &str) -> ResourceUrl {
    collection.join(name)
}

/// `{dataset}/attributes/{id}`
pub fn attribute_url(dataset: &Dataset, id: &str) -> ResourceUrl {
    item_url(&collection_url(dataset), id)
}

// ============================================================================
// Serialization
// ============================================================================

#[derive(Deserialize)]
struct AttributeBody {
    name: String,
    #[serde(rename = "type")]
    attr_type: AttributeType,
    #[serde(rename = "isNullable")]
    is_nullable: bool,
    #[serde(default)]
    description: Option<String>,
}

/// Wire form of an attribute. `description` is omitted, not `null`, when absent.
fn body_json(
    name: &str,
    attr_type: &AttributeType,
    is_nullable: bool,
    description: Option<&str>,
) -> Value {
    let mut body = json!({
        "name": name,
        "type": attr_type.to_json(),
        "isNullable": is_nullable,
    });
    if let Some(description) = description {
        body["description"] = json!(description);
    }
    body
}

fn parse_body(url: &ResourceUrl, data: &Value) -> Result<AttributeBody> {
    AttributeBody::deserialize(data).map_err(|source| Error::MalformedResponse {
        url: url.to_string(),
        source,
    })
}

fn from_body(url: ResourceUrl, body: AttributeBody, raw: Value) -> Attribute {
    Attribute {
        url,
        name: body.name,
        attr_type: body.attr_type,
        is_nullable: body.is_nullable,
        description: body.description,
        raw,
    }
}

/// Decode an attribute document. `data` is kept as the raw payload.
///
/// Fails with [`Error::MalformedResponse`] when a required field
/// (`name`, `type`, `isNullable`) is missing or mistyped.
pub fn from_json(url: ResourceUrl, data: Value) -> Result<Attribute> {
    let body = parse_body(&url, &data)?;
    Ok(from_body(url, body, data))
}

/// Encode an attribute. `description` is omitted when absent.
pub fn to_json(attr: &Attribute) -> Value {
    body_json(
        &attr.name,
        &attr.attr_type,
        attr.is_nullable,
        attr.description.as_deref(),
    )
}

// ============================================================================
// Reading
// ============================================================================

/// Fetch the attribute `id` of `dataset`.
///
/// # Errors
///
/// [`Error::AttributeNotFound`] on 404, [`Error::Http`] on any other
/// non-2xx status.
pub fn from_resource_id(session: &dyn Session, dataset: &Dataset, id: &str) -> Result<Attribute> {
    from_url(session, attribute_url(dataset, id))
}

fn from_url(session: &dyn Session, url: ResourceUrl) -> Result<Attribute> {
    tracing::debug!(%url, "Fetching attribute");
    let response = session.get(&url)?;
    if response.status() == NOT_FOUND {
        tracing::warn!(%url, "Attribute not found");
        return Err(Error::AttributeNotFound(url));
    }
    let data = response.successful()?.json()?;
    from_json(url, data)
}

/// Fetch every attribute of `dataset`, in the order the server lists them.
///
/// Each item's URL is the collection URL plus the item's `name`.
pub fn from_dataset_all(session: &dyn Session, dataset: &Dataset) -> Result<Vec<Attribute>> {
    let attrs_url = collection_url(dataset);
    tracing::debug!(url = %attrs_url, "Fetching all attributes");

    let data = session.get(&attrs_url)?.successful()?.json()?;
    let items = Vec::<Value>::deserialize(data).map_err(|source| Error::MalformedResponse {
        url: attrs_url.to_string(),
        source,
    })?;

    items
        .into_iter()
        .map(|item| {
            let body = parse_body(&attrs_url, &item)?;
            let url = item_url(&attrs_url, &body.name);
            Ok(from_body(url, body, item))
        })
        .collect()
}

// ============================================================================
// Writing
// ============================================================================

/// Refuse names in [`RESERVED_NAMES`].
pub fn check_name(name: &str) -> Result<()> {
    if RESERVED_NAMES.contains(&name) {
        return Err(Error::ReservedAttributeName(name.to_string()));
    }
    Ok(())
}

/// Create an attribute on `dataset`.
///
/// Reserved names are rejected locally, before any request.
///
/// # Errors
///
/// [`Error::ReservedAttributeName`] for a reserved name,
/// [`Error::AttributeExists`] on 409, [`Error::Http`] on any other non-2xx
/// status.
pub fn create(session: &dyn Session, dataset: &Dataset, new: &NewAttribute) -> Result<Attribute> {
    check_name(&new.name)?;
    create_unchecked(session, dataset, new)
}

/// [`create`] without the reserved-name check, for callers that have already
/// vetted the name.
pub fn create_unchecked(
    session: &dyn Session,
    dataset: &Dataset,
    new: &NewAttribute,
) -> Result<Attribute> {
    let attrs_url = collection_url(dataset);
    // The server does not say which resource conflicted; the name is the id.
    let url = item_url(&attrs_url, &new.name);

    let body = body_json(
        &new.name,
        &new.attr_type,
        new.is_nullable,
        new.description.as_deref(),
    );

    tracing::debug!(%url, "Creating attribute");
    let response = session.post(&attrs_url, &body)?;
    if response.status() == CONFLICT {
        tracing::warn!(%url, "Attribute already exists");
        return Err(Error::AttributeExists(url));
    }
    let data = response.successful()?.json()?;
    from_json(url, data)
}

/// Replace the description of `attribute`. `None` clears it.
///
/// Returns the attribute as the server reports it after the update; the
/// URL is carried over from `attribute`.
pub fn update(
    session: &dyn Session,
    attribute: &Attribute,
    description: Option<&str>,
) -> Result<Attribute> {
    let url = &attribute.url;
    let body = json!({ "description": description });

    tracing::debug!(%url, "Updating attribute");
    let response = session.put(url, &body)?;
    if response.status() == NOT_FOUND {
        tracing::warn!(%url, "Attribute not found");
        return Err(Error::AttributeNotFound(url.clone()));
    }
    let data = response.successful()?.json()?;
    from_json(url.clone(), data)
}

/// Delete `attribute` from the server.
///
/// `attribute` itself is left as it was and describes a resource that no
/// longer exists; deleting it again fails with [`Error::AttributeNotFound`].
pub fn delete(session: &dyn Session, attribute: &Attribute) -> Result<()> {
    let url = &attribute.url;

    tracing::debug!(%url, "Deleting attribute");
    let response = session.delete(url)?;
    if response.status() == NOT_FOUND {
        tracing::warn!(%url, "Attribute not found");
        return Err(Error::AttributeNotFound(url.clone()));
    }
    response.successful()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const BASE: &str = "http://localhost:9100/api/versioned/v1/";

    fn dataset() -> Dataset {
        Dataset::at(ResourceUrl::parse(BASE, "datasets/7").unwrap())
    }

    fn url(path: &str) -> ResourceUrl {
        ResourceUrl::parse(BASE, path).unwrap()
    }

    #[test]
    fn addressing() {
        let dataset = dataset();
        let attrs = collection_url(&dataset);
        assert_eq!(attrs.path(), "datasets/7/attributes");
        assert_eq!(item_url(&attrs, "b").path(), "datasets/7/attributes/b");
        assert_eq!(
            attribute_url(&dataset, "foo").path(),
            "datasets/7/attributes/foo"
        );
    }

    #[test]
    fn names_are_single_encoded_segments() {
        let dataset = dataset();
        assert_eq!(
            attribute_url(&dataset, "a#b").to_url().unwrap().as_str(),
            format!("{}datasets/7/attributes/a%23b", BASE)
        );
        assert_eq!(
            attribute_url(&dataset, "a/b").to_url().unwrap().as_str(),
            format!("{}datasets/7/attributes/a%2Fb", BASE)
        );
        assert!(matches!(
            attribute_url(&dataset, "..").to_url(),
            Err(Error::InvalidPathSegment(_))
        ));
    }

    #[test]
    fn from_json_reads_all_fields() {
        let data = json!({
            "name": "customer",
            "description": "Customer name",
            "isNullable": false,
            "type": {"baseType": "STRING", "attributes": []}
        });
        let attr = from_json(url("datasets/7/attributes/customer"), data.clone()).unwrap();

        assert_eq!(attr.name(), "customer");
        assert_eq!(attr.description(), Some("Customer name"));
        assert!(!attr.is_nullable());
        assert_eq!(attr.attr_type(), &AttributeType::String);
        assert_eq!(attr.raw(), &data);
    }

    #[test]
    fn missing_is_nullable_is_malformed() {
        let data = json!({"name": "x", "type": {"baseType": "STRING"}});
        let err = from_json(url("datasets/7/attributes/x"), data).unwrap_err();
        assert!(matches!(err, Error::MalformedResponse { .. }));
    }

    #[test]
    fn absent_description_stays_absent() {
        let data = json!({"name": "x", "isNullable": true, "type": {"baseType": "INT"}});
        let attr = from_json(url("datasets/7/attributes/x"), data).unwrap();
        assert_eq!(attr.description(), None);

        let out = to_json(&attr);
        assert!(out.get("description").is_none());
        assert_eq!(
            out,
            json!({"name": "x", "isNullable": true, "type": {"baseType": "INT"}})
        );
    }

    #[test]
    fn empty_description_is_kept() {
        let data = json!({"name": "x", "isNullable": true, "description": "", "type": {"baseType": "INT"}});
        let attr = from_json(url("datasets/7/attributes/x"), data).unwrap();
        assert_eq!(to_json(&attr)["description"], json!(""));
    }

    #[test]
    fn equality_ignores_raw() {
        let a = from_json(
            url("datasets/7/attributes/x"),
            json!({"name": "x", "isNullable": true, "type": {"baseType": "INT"}, "extra": 1}),
        )
        .unwrap();
        let b = from_json(
            url("datasets/7/attributes/x"),
            json!({"name": "x", "isNullable": true, "type": {"baseType": "INT"}}),
        )
        .unwrap();
        assert_ne!(a.raw(), b.raw());
        assert_eq!(a, b);
    }

    #[test]
    fn reserved_names_are_refused() {
        for name in RESERVED_NAMES {
            assert!(matches!(
                check_name(name),
                Err(Error::ReservedAttributeName(n)) if n == *name
            ));
        }
        assert!(check_name("customer_id").is_ok());
        // Matching is exact.
        assert!(check_name("ClusterId").is_ok());
    }

    #[test]
    fn new_attribute_defaults_to_array_of_string() {
        let new = NewAttribute::new("tags", true);
        assert_eq!(new.attr_type, AttributeType::array(AttributeType::String));
        assert_eq!(new.description, None);
    }

    fn arb_type() -> impl Strategy<Value = AttributeType> {
        let leaf = prop_oneof![
            Just(AttributeType::Boolean),
            Just(AttributeType::Double),
            Just(AttributeType::Int),
            Just(AttributeType::Long),
            Just(AttributeType::String),
        ];
        leaf.prop_recursive(3, 16, 3, |inner| {
            prop_oneof![
                inner.clone().prop_map(AttributeType::array),
                inner.clone().prop_map(AttributeType::map),
                prop::collection::vec(("[a-z]{1,8}", inner, any::<bool>()), 0..3).prop_map(
                    |fields| AttributeType::Record {
                        attributes: fields
                            .into_iter()
                            .map(|(name, ty, nullable)| {
                                crate::attribute_type::SubAttribute::new(&name, ty, nullable)
                            })
                            .collect(),
                    }
                ),
            ]
        })
    }

    fn arb_attribute() -> impl Strategy<Value = Attribute> {
        (
            "[a-zA-Z_][a-zA-Z0-9_]{0,15}",
            arb_type(),
            any::<bool>(),
            proptest::option::of(".{0,20}"),
        )
            .prop_map(|(name, attr_type, is_nullable, description)| Attribute {
                url: url(&format!("datasets/7/attributes/{}", name)),
                name,
                attr_type,
                is_nullable,
                description,
                raw: Value::Null,
            })
    }

    proptest! {
        #[test]
        fn to_json_then_from_json_preserves_fields(attr in arb_attribute()) {
            let back = from_json(attr.url().clone(), to_json(&attr)).unwrap();
            prop_assert_eq!(back, attr);
        }
    }
}
