//! Object Factory
//!
//! Turns an opaque [`RawObject`] (class tag plus undecoded body) into the
//! concrete frame, mapping or frame graph it describes. Constructors live in a
//! process-wide class table that is filled once on first use and only read
//! afterwards.

use crate::error::{DictError, Result};
use crate::frame::{Frame, FrameKind};
use crate::graph::{FrameGraph, FRAME_SET_CLASS};
use crate::mapping::Mapping;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

/// Opaque handle: a class tag and a body the factory knows how to decode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObject {
    class: String,
    body: serde_json::Value,
}

impl RawObject {
    pub fn new(class: impl Into<String>, body: serde_json::Value) -> Self {
        Self {
            class: class.into(),
            body,
        }
    }

    /// Class tag reported by the handle
    pub fn class_name(&self) -> &str {
        &self.class
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }
}

/// Capability a caller needs from a decoded object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Any object
    Object,
    Frame,
    Mapping,
    FrameSet,
}

impl Capability {
    pub fn name(self) -> &'static str {
        match self {
            Capability::Object => "Object",
            Capability::Frame => "Frame",
            Capability::Mapping => "Mapping",
            Capability::FrameSet => FRAME_SET_CLASS,
        }
    }
}

/// Decoded object
#[derive(Debug, Clone, PartialEq)]
pub enum Object {
    Frame(Frame),
    Mapping(Mapping),
    FrameSet(FrameGraph),
}

impl Object {
    pub fn class_name(&self) -> &'static str {
        match self {
            Object::Frame(frame) => frame.class_name(),
            Object::Mapping(mapping) => mapping.class_name(),
            Object::FrameSet(graph) => graph.class_name(),
        }
    }

    pub fn satisfies(&self, capability: Capability) -> bool {
        matches!(
            (capability, self),
            (Capability::Object, _)
                | (Capability::Frame, Object::Frame(_))
                | (Capability::Mapping, Object::Mapping(_))
                | (Capability::FrameSet, Object::FrameSet(_))
        )
    }

    /// Encode the object as an opaque handle
    pub fn to_raw(&self) -> Result<RawObject> {
        let body = match self {
            Object::Frame(frame) => encode(frame.class_name(), frame)?,
            Object::Mapping(mapping) => encode(mapping.class_name(), mapping)?,
            Object::FrameSet(graph) => encode(graph.class_name(), graph)?,
        };
        Ok(RawObject::new(self.class_name(), body))
    }

    fn mismatch(&self, expected: Capability) -> DictError {
        DictError::TypeMismatch {
            expected: expected.name().to_string(),
            actual: self.class_name().to_string(),
        }
    }
}

impl From<Frame> for Object {
    fn from(frame: Frame) -> Self {
        Object::Frame(frame)
    }
}

impl From<Mapping> for Object {
    fn from(mapping: Mapping) -> Self {
        Object::Mapping(mapping)
    }
}

impl From<FrameGraph> for Object {
    fn from(graph: FrameGraph) -> Self {
        Object::FrameSet(graph)
    }
}

/// Types a decoded [`Object`] can be cast into
pub trait FromObject: Sized {
    const CAPABILITY: Capability;

    fn from_object(object: Object) -> Result<Self>;
}

impl FromObject for Object {
    const CAPABILITY: Capability = Capability::Object;

    fn from_object(object: Object) -> Result<Self> {
        Ok(object)
    }
}

impl FromObject for Frame {
    const CAPABILITY: Capability = Capability::Frame;

    fn from_object(object: Object) -> Result<Self> {
        match object {
            Object::Frame(frame) => Ok(frame),
            other => Err(other.mismatch(Self::CAPABILITY)),
        }
    }
}

impl FromObject for Mapping {
    const CAPABILITY: Capability = Capability::Mapping;

    fn from_object(object: Object) -> Result<Self> {
        match object {
            Object::Mapping(mapping) => Ok(mapping),
            other => Err(other.mismatch(Self::CAPABILITY)),
        }
    }
}

impl FromObject for FrameGraph {
    const CAPABILITY: Capability = Capability::FrameSet;

    fn from_object(object: Object) -> Result<Self> {
        match object {
            Object::FrameSet(graph) => Ok(graph),
            other => Err(other.mismatch(Self::CAPABILITY)),
        }
    }
}

type Constructor = fn(&str, &serde_json::Value) -> Result<Object>;

fn class_table() -> &'static HashMap<&'static str, Constructor> {
    static CLASS_TABLE: OnceLock<HashMap<&'static str, Constructor>> = OnceLock::new();
    CLASS_TABLE.get_or_init(|| {
        let mut table: HashMap<&'static str, Constructor> = HashMap::new();
        for kind in [
            FrameKind::Frame,
            FrameKind::SkyFrame,
            FrameKind::SpecFrame,
            FrameKind::TimeFrame,
        ] {
            table.insert(kind.class_name(), make_frame);
        }
        for class in ["UnitMap", "ZoomMap", "ShiftMap", "SeriesMap"] {
            table.insert(class, make_mapping);
        }
        table.insert(FRAME_SET_CLASS, make_frame_set);
        debug!(classes = table.len(), "Initialized object class table");
        table
    })
}

/// Class tags the factory can decode
pub fn known_classes() -> Vec<&'static str> {
    let mut classes: Vec<&'static str> = class_table().keys().copied().collect();
    classes.sort_unstable();
    classes
}

/// Decode `raw` and check that the result provides `capability`
pub fn cast_from_raw(raw: &RawObject, capability: Capability) -> Result<Object> {
    let constructor = class_table()
        .get(raw.class_name())
        .ok_or_else(|| DictError::UnsupportedType {
            class: raw.class_name().to_string(),
        })?;
    let object = constructor(raw.class_name(), raw.body())?;
    if !object.satisfies(capability) {
        return Err(object.mismatch(capability));
    }
    Ok(object)
}

/// Decode `raw` into a concrete type
pub fn from_raw<T: FromObject>(raw: &RawObject) -> Result<T> {
    T::from_object(cast_from_raw(raw, T::CAPABILITY)?)
}

fn decode<T: DeserializeOwned>(class: &str, body: &serde_json::Value) -> Result<T> {
    T::deserialize(body).map_err(|e| DictError::MalformedObject {
        class: class.to_string(),
        reason: e.to_string(),
    })
}

fn encode<T: Serialize>(class: &str, value: &T) -> Result<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| DictError::MalformedObject {
        class: class.to_string(),
        reason: e.to_string(),
    })
}

fn make_frame(class: &str, body: &serde_json::Value) -> Result<Object> {
    let kind = FrameKind::from_class_name(class).ok_or_else(|| DictError::UnsupportedType {
        class: class.to_string(),
    })?;
    let mut frame: Frame = decode(class, body)?;
    frame.retag(kind);
    Ok(Object::Frame(frame))
}

fn make_mapping(class: &str, body: &serde_json::Value) -> Result<Object> {
    let mapping: Mapping = decode(class, body)?;
    if mapping.class_name() != class {
        return Err(DictError::MalformedObject {
            class: class.to_string(),
            reason: format!("body describes a {}", mapping.class_name()),
        });
    }
    mapping.validate()?;
    Ok(Object::Mapping(mapping))
}

fn make_frame_set(class: &str, body: &serde_json::Value) -> Result<Object> {
    let graph: FrameGraph = decode(class, body)?;
    graph.validate()?;
    Ok(Object::FrameSet(graph))
}
