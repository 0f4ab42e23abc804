//! Kinetic Core
//!
//! Foundational primitives shared by the Kinetic gesture and animation layers:
//!
//! - **Geometry**: points and element bounding boxes
//! - **Document**: a node tree with geometry queries and point resolution
//! - **Dispatch**: a fire-and-forget listener bus
//! - **Jobs**: named, cancelable, delayed jobs driven by an explicit clock
//! - **Store**: a flux-style store that merges payloads and republishes them
//!
//! # Example
//!
//! ```rust
//! use kinetic_core::dom::{Document, NodeTree};
//! use kinetic_core::geometry::{Point, Rect};
//!
//! let mut doc = Document::new();
//! let body = doc.create_root("body", Rect::new(0.0, 0.0, 400.0, 300.0));
//! let button = doc.append_child(body, "button", Rect::new(10.0, 10.0, 100.0, 40.0)).unwrap();
//!
//! assert_eq!(doc.element_from_point(Point::new(20.0, 20.0), None), Some(button));
//! assert_eq!(doc.element_from_point(Point::new(20.0, 20.0), Some(button)), Some(body));
//! ```

pub mod dispatch;
pub mod dom;
pub mod error;
pub mod geometry;
pub mod job;
pub mod store;

pub use dispatch::{Dispatcher, ListenerId};
pub use dom::{Document, Geometry, NodeId, NodeTree};
pub use error::{CoreError, Result, StoreError};
pub use geometry::{Point, Rect};
pub use job::JobQueue;
pub use store::{merge, FetchRequest, FluxDispatcher, FluxStore, Source, StoreId, StoreOptions};
