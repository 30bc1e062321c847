//! Resource registry
//!
//! A fixed table of the API's top-level collections and a thin handle that
//! maps the usual CRUD operations onto the client's verbs.

use crate::client::Client;
use crate::error::{Error, Result};
use crate::options::Options;
use crate::pagination::Collection;
use serde_json::Value;

/// A named top-level collection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resource {
    /// Registry name
    pub name: &'static str,
    /// Collection path relative to `base_url`
    pub path: &'static str,
}

impl Resource {
    const fn new(name: &'static str, path: &'static str) -> Self {
        Self { name, path }
    }

    /// Path of a single member of the collection
    pub fn member_path(&self, gid: &str) -> String {
        format!("{}/{}", self.path, gid)
    }
}

/// Known resources, sorted by name
pub const RESOURCES: &[Resource] = &[
    Resource::new("attachments", "/attachments"),
    Resource::new("custom_fields", "/custom_fields"),
    Resource::new("goals", "/goals"),
    Resource::new("portfolios", "/portfolios"),
    Resource::new("projects", "/projects"),
    Resource::new("sections", "/sections"),
    Resource::new("stories", "/stories"),
    Resource::new("tags", "/tags"),
    Resource::new("tasks", "/tasks"),
    Resource::new("teams", "/teams"),
    Resource::new("users", "/users"),
    Resource::new("webhooks", "/webhooks"),
    Resource::new("workspaces", "/workspaces"),
];

/// Look up a resource by name
pub fn find_resource(name: &str) -> Option<&'static Resource> {
    RESOURCES.iter().find(|r| r.name == name)
}

/// Names of all known resources
pub fn resource_names() -> impl Iterator<Item = &'static str> {
    RESOURCES.iter().map(|r| r.name)
}

/// Operations on one resource through a client
#[derive(Debug, Clone, Copy)]
pub struct ResourceHandle<'a> {
    client: &'a Client,
    resource: &'static Resource,
}

impl ResourceHandle<'_> {
    /// Registry entry behind this handle
    pub fn resource(&self) -> &'static Resource {
        self.resource
    }

    /// List the collection, shaped by `iterator_type`
    pub async fn find_all(&self, query: &Options, options: &Options) -> Result<Collection> {
        self.client
            .get_collection(self.resource.path, query, options)
            .await
    }

    /// Fetch one record
    pub async fn find_by_id(&self, gid: &str, options: &Options) -> Result<Value> {
        self.client
            .get(&self.resource.member_path(gid), &Options::new(), options)
            .await
    }

    /// Create a record
    pub async fn create(&self, data: Value, options: &Options) -> Result<Value> {
        self.client.post(self.resource.path, data, options).await
    }

    /// Update a record
    pub async fn update(&self, gid: &str, data: Value, options: &Options) -> Result<Value> {
        self.client
            .put(&self.resource.member_path(gid), data, options)
            .await
    }

    /// Delete a record
    pub async fn delete(&self, gid: &str, options: &Options) -> Result<Value> {
        self.client
            .delete(&self.resource.member_path(gid), options)
            .await
    }
}

impl Client {
    /// Get a handle on a registered resource
    pub fn resource(&self, name: &str) -> Result<ResourceHandle<'_>> {
        let resource = find_resource(name).ok_or_else(|| {
            Error::config(format!(
                "Unknown resource '{name}', expected one of: {}",
                resource_names().collect::<Vec<_>>().join(", ")
            ))
        })?;
        Ok(ResourceHandle {
            client: self,
            resource,
        })
    }
}
