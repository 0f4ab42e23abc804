//! Kinetic Store - flux-style payload store
//!
//! A [`FluxStore`] owns a JSON root object. Payloads fetched from a
//! [`Source`] are merged into (or replace) that root, and the
//! [`FluxDispatcher`] republishes the result to every listener of the store.
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::store::{FluxDispatcher, FluxStore, StoreOptions};
//! use serde_json::json;
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! let mut dispatcher = FluxDispatcher::new();
//! let mut store = FluxStore::new(StoreOptions::default());
//! let id = store.register(&mut dispatcher);
//!
//! let seen = Rc::new(RefCell::new(None));
//! let sink = Rc::clone(&seen);
//! dispatcher.listen(id, move |data| *sink.borrow_mut() = Some(data.clone())).unwrap();
//!
//! let mut source = |_: &kinetic_core::FetchRequest| -> Result<_, kinetic_core::StoreError> {
//!     Ok(json!({ "user": { "name": "ada" } }))
//! };
//! store.fetch(&mut source, &mut dispatcher).unwrap();
//!
//! assert_eq!(seen.borrow().as_ref().unwrap()["user"]["name"], "ada");
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use slotmap::{new_key_type, SlotMap};

use crate::error::StoreError;

new_key_type! {
    /// Identifies a store to the flux dispatcher
    pub struct StoreId;
}

/// Store listener callback
pub type StoreListener = Box<dyn FnMut(&Value)>;

/// Routes store change notifications to listeners by store id
#[derive(Default)]
pub struct FluxDispatcher {
    stores: SlotMap<StoreId, Vec<StoreListener>>,
}

impl std::fmt::Debug for FluxDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FluxDispatcher")
            .field("stores", &self.stores.len())
            .finish()
    }
}

impl FluxDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate an id for a new store
    pub fn subscribe(&mut self) -> StoreId {
        self.stores.insert(Vec::new())
    }

    /// Drop a store id and all of its listeners
    pub fn unsubscribe(&mut self, id: StoreId) -> bool {
        self.stores.remove(id).is_some()
    }

    /// Listen for payload updates of a store
    pub fn listen<F>(&mut self, id: StoreId, listener: F) -> Result<(), StoreError>
    where
        F: FnMut(&Value) + 'static,
    {
        let listeners = self
            .stores
            .get_mut(id)
            .ok_or(StoreError::NotRegistered(id))?;
        listeners.push(Box::new(listener));
        Ok(())
    }

    /// Tell every listener of `id` that its payload changed
    ///
    /// Returns the number of listeners notified.
    pub fn notify(&mut self, id: StoreId, data: &Value) -> Result<usize, StoreError> {
        let listeners = self
            .stores
            .get_mut(id)
            .ok_or(StoreError::NotRegistered(id))?;
        for listener in listeners.iter_mut() {
            listener(data);
        }
        Ok(listeners.len())
    }

    pub fn is_registered(&self, id: StoreId) -> bool {
        self.stores.contains_key(id)
    }
}

/// A fetch request handed to a [`Source`]
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FetchRequest {
    /// Name of the source the store reads from
    pub source: String,
    /// Source-specific parameters
    pub params: Value,
}

/// Where a store fetches payloads from
pub trait Source {
    fn fetch(&mut self, request: &FetchRequest) -> Result<Value, StoreError>;
}

impl<F> Source for F
where
    F: FnMut(&FetchRequest) -> Result<Value, StoreError>,
{
    fn fetch(&mut self, request: &FetchRequest) -> Result<Value, StoreError> {
        self(request)
    }
}

fn default_merge_root() -> bool {
    true
}

/// Construction options for a [`FluxStore`]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreOptions {
    /// Merge incoming payloads into the root instead of replacing it
    #[serde(default = "default_merge_root")]
    pub merge_root: bool,
    /// Name of the source to fetch from
    #[serde(default)]
    pub source: String,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            merge_root: default_merge_root(),
            source: String::new(),
        }
    }
}

/// A store holding a JSON root object
#[derive(Clone, Debug)]
pub struct FluxStore {
    id: Option<StoreId>,
    data: Value,
    merge_root: bool,
    source: String,
}

impl FluxStore {
    /// Base setup only; call [`FluxStore::register`] to get an id
    pub fn new(options: StoreOptions) -> Self {
        Self {
            id: None,
            data: Value::Object(Map::new()),
            merge_root: options.merge_root,
            source: options.source,
        }
    }

    /// Base setup followed by registration with `dispatcher`
    pub fn with_dispatcher(options: StoreOptions, dispatcher: &mut FluxDispatcher) -> Self {
        let mut store = Self::new(options);
        store.register(dispatcher);
        store
    }

    /// Register with the dispatcher. Registering twice keeps the first id.
    pub fn register(&mut self, dispatcher: &mut FluxDispatcher) -> StoreId {
        match self.id {
            Some(id) if dispatcher.is_registered(id) => id,
            _ => {
                let id = dispatcher.subscribe();
                tracing::debug!("FluxStore: registered as {:?}", id);
                self.id = Some(id);
                id
            }
        }
    }

    pub fn id(&self) -> Option<StoreId> {
        self.id
    }

    pub fn data(&self) -> &Value {
        &self.data
    }

    pub fn merge_root(&self) -> bool {
        self.merge_root
    }

    pub fn set_merge_root(&mut self, merge_root: bool) {
        self.merge_root = merge_root;
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Add a payload: merged into the root, or replacing it
    pub fn add(&mut self, payload: Value) {
        if self.merge_root {
            if !payload.is_object() {
                tracing::warn!("FluxStore: ignoring non-object payload in merge mode");
                return;
            }
            merge(&mut self.data, &payload);
        } else {
            self.data = payload;
        }
    }

    /// Clear the root back to an empty object
    pub fn reset(&mut self) {
        self.data = Value::Object(Map::new());
    }

    /// Fetch from `source` with no parameters
    pub fn fetch(
        &mut self,
        source: &mut dyn Source,
        dispatcher: &mut FluxDispatcher,
    ) -> Result<(), StoreError> {
        self.fetch_with(source, dispatcher, Value::Null)
    }

    /// Fetch from `source`; on success add the payload and notify listeners
    ///
    /// On failure the data is left untouched and the error is logged and
    /// returned for the caller to report.
    pub fn fetch_with(
        &mut self,
        source: &mut dyn Source,
        dispatcher: &mut FluxDispatcher,
        params: Value,
    ) -> Result<(), StoreError> {
        let request = FetchRequest {
            source: self.source.clone(),
            params,
        };
        match source.fetch(&request) {
            Ok(payload) => self.success(payload, dispatcher),
            Err(err) => {
                tracing::warn!("FluxStore: fetch from '{}' failed: {}", self.source, err);
                Err(err)
            }
        }
    }

    fn success(&mut self, payload: Value, dispatcher: &mut FluxDispatcher) -> Result<(), StoreError> {
        self.add(payload);
        match self.id {
            Some(id) => {
                let notified = dispatcher.notify(id, &self.data)?;
                tracing::trace!("FluxStore: notified {} listeners", notified);
                Ok(())
            }
            None => {
                tracing::debug!("FluxStore: fetched while unregistered, nobody notified");
                Ok(())
            }
        }
    }
}

/// Recursively merge `src` into `node`
///
/// Null values in `src` never clear existing data. A value is assigned when
/// the existing one is missing or falsy, or when the new value is not an
/// object; otherwise both objects are merged key by key. Arrays are replaced
/// wholesale.
pub fn merge(node: &mut Value, src: &Value) {
    let (Value::Object(node), Value::Object(src)) = (node, src) else {
        return;
    };

    for (key, value) in src {
        if value.is_null() {
            continue;
        }
        match node.get_mut(key) {
            Some(existing) if !is_falsy(existing) && value.is_object() => merge(existing, value),
            _ => {
                node.insert(key.clone(), value.clone());
            }
        }
    }
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().map_or(false, |f| f == 0.0 || f.is_nan()),
        Value::String(s) => s.is_empty(),
        Value::Array(_) | Value::Object(_) => false,
    }
}
