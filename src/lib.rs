//! Framedict: Frame Graphs with Domain Lookup
//!
//! A graph of coordinate frames connected by invertible mappings, wrapped in a
//! dictionary that finds frames by case-blind domain name as well as by
//! position.

pub mod config;
pub mod dict;
pub mod error;
pub mod frame;
pub mod graph;
pub mod logging;
pub mod mapping;
pub mod object;
pub mod types;

pub use dict::FrameDict;
pub use error::{DictError, Result};
pub use frame::{DomainSource, Frame, FrameKind};
pub use graph::FrameGraph;
pub use mapping::Mapping;
pub use object::{Capability, Object, RawObject};
pub use types::{FrameRef, Position};
