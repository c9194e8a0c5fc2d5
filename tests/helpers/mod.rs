//! Test doubles for the catalog session
//!
//! - `ScriptedSession` replays canned responses in order and records every
//!   request, for status-mapping and request-count assertions.
//! - `InMemoryCatalog` keeps attributes per dataset and answers like the
//!   server does (404 / 409), for end-to-end CRUD flows.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::Mutex;

use catalog_client::{Dataset, ResourceUrl, Response, Result, Session};
use serde_json::{json, Value};

pub const BASE: &str = "http://localhost:9100/api/versioned/v1/";

pub fn dataset(id: u32) -> Dataset {
    let url = ResourceUrl::parse(BASE, &format!("datasets/{}", id)).unwrap();
    Dataset::new(url, &format!("dataset_{}", id))
}

/// Attribute document as the server returns it.
pub fn attribute_json(name: &str, is_nullable: bool, description: Option<&str>) -> Value {
    let mut data = json!({
        "name": name,
        "isNullable": is_nullable,
        "type": {
            "baseType": "ARRAY",
            "innerType": {"baseType": "STRING", "attributes": []},
            "attributes": []
        }
    });
    if let Some(description) = description {
        data["description"] = json!(description);
    }
    data
}

#[derive(Debug, Clone, PartialEq)]
pub struct Call {
    pub method: &'static str,
    pub path: String,
    pub body: Option<Value>,
}

pub struct ScriptedSession {
    responses: Mutex<VecDeque<(u16, Value)>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedSession {
    pub fn new() -> Self {
        Self {
            responses: Mutex::new(VecDeque::new()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn respond(self, status: u16, body: Value) -> Self {
        self.responses.lock().unwrap().push_back((status, body));
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn answer(&self, method: &'static str, url: &ResourceUrl, body: Option<&Value>) -> Result<Response> {
        self.calls.lock().unwrap().push(Call {
            method,
            path: url.path().to_string(),
            body: body.cloned(),
        });
        let (status, body) = self
            .responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request: {} {}", method, url));
        Ok(Response::with_json(status, url.to_string(), &body))
    }
}

impl Session for ScriptedSession {
    fn get(&self, url: &ResourceUrl) -> Result<Response> {
        self.answer("GET", url, None)
    }

    fn post(&self, url: &ResourceUrl, body: &Value) -> Result<Response> {
        self.answer("POST", url, Some(body))
    }

    fn put(&self, url: &ResourceUrl, body: &Value) -> Result<Response> {
        self.answer("PUT", url, Some(body))
    }

    fn delete(&self, url: &ResourceUrl) -> Result<Response> {
        self.answer("DELETE", url, None)
    }
}

/// Attributes stored as `(item path, document)` in creation order.
pub struct InMemoryCatalog {
    items: Mutex<Vec<(String, Value)>>,
    requests: Mutex<usize>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(Vec::new()),
            requests: Mutex::new(0),
        }
    }

    pub fn request_count(&self) -> usize {
        *self.requests.lock().unwrap()
    }

    fn count(&self) {
        *self.requests.lock().unwrap() += 1;
    }

    fn reply(url: &ResourceUrl, status: u16, body: Value) -> Result<Response> {
        Ok(Response::with_json(status, url.to_string(), &body))
    }
}

impl Session for InMemoryCatalog {
    fn get(&self, url: &ResourceUrl) -> Result<Response> {
        self.count();
        let items = self.items.lock().unwrap();
        if url.path().ends_with("/attributes") {
            let prefix = format!("{}/", url.path());
            let listed: Vec<Value> = items
                .iter()
                .filter(|(path, _)| path.starts_with(&prefix))
                .map(|(_, doc)| doc.clone())
                .collect();
            return Self::reply(url, 200, Value::Array(listed));
        }
        let target = url.path();
        match items.iter().find(|(path, _)| *path == target) {
            Some((_, doc)) => Self::reply(url, 200, doc.clone()),
            None => Self::reply(url, 404, json!({"message": "not found"})),
        }
    }

    fn post(&self, url: &ResourceUrl, body: &Value) -> Result<Response> {
        self.count();
        let name = body["name"].as_str().unwrap_or_default();
        let path = format!("{}/{}", url.path(), name);
        let mut items = self.items.lock().unwrap();
        if items.iter().any(|(p, _)| *p == path) {
            return Self::reply(url, 409, json!({"message": "already exists"}));
        }
        items.push((path, body.clone()));
        Self::reply(url, 201, body.clone())
    }

    fn put(&self, url: &ResourceUrl, body: &Value) -> Result<Response> {
        self.count();
        let mut items = self.items.lock().unwrap();
        let target = url.path();
        match items.iter_mut().find(|(path, _)| *path == target) {
            Some((_, doc)) => {
                match &body["description"] {
                    Value::Null => {
                        if let Some(map) = doc.as_object_mut() {
                            map.remove("description");
                        }
                    }
                    description => doc["description"] = description.clone(),
                }
                Self::reply(url, 200, doc.clone())
            }
            None => Self::reply(url, 404, json!({"message": "not found"})),
        }
    }

    fn delete(&self, url: &ResourceUrl) -> Result<Response> {
        self.count();
        let mut items = self.items.lock().unwrap();
        let target = url.path();
        match items.iter().position(|(path, _)| *path == target) {
            Some(index) => {
                items.remove(index);
                Self::reply(url, 204, Value::Null)
            }
            None => Self::reply(url, 404, json!({"message": "not found"})),
        }
    }
}
