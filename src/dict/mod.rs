//! Frame Dictionary
//!
//! A frame graph plus a lookup table of domain -> position for the contained
//! frames that have explicit, non-empty domains. Every graph operation that
//! takes a position also accepts a case-blind domain name.
//!
//! This allows a frame to be located without changing the graph, and in a
//! way that is unaffected by removing frames: positions shift, domains don't.
//!
//! All frames with explicit, non-empty domains must have unique domains,
//! ignoring case. Kind defaults (a sky frame reporting "SKY" without anyone
//! setting it) are ignored so they cannot collide.

pub mod index;

pub use index::{CollisionPolicy, DomainIndex};

use crate::error::{DictError, Result};
use crate::frame::Frame;
use crate::graph::FrameGraph;
use crate::mapping::Mapping;
use crate::object::{self, Object, RawObject};
use crate::types::{normalize_domain, FrameRef, Position};
use std::borrow::Cow;
use std::collections::BTreeSet;
use tracing::{debug, warn};

/// Frame graph with case-blind domain lookup
#[derive(Debug, Clone, PartialEq)]
pub struct FrameDict {
    graph: FrameGraph,
    index: DomainIndex,
}

impl FrameDict {
    /// Create a dictionary holding one frame, which becomes both the base and
    /// the current frame.
    pub fn new(frame: Frame) -> Self {
        let index = DomainIndex::single(&frame);
        Self {
            graph: FrameGraph::new(frame),
            index,
        }
    }

    /// Create a dictionary from two frames and the mapping that converts base
    /// coordinates into current coordinates.
    ///
    /// Fails with [`DictError::DuplicateDomain`] if both frames have the same
    /// explicit, non-empty domain.
    pub fn with_mapping(base: Frame, mapping: Mapping, current: Frame) -> Result<Self> {
        Self::from_graph(FrameGraph::with_mapping(base, mapping, current)?)
    }

    /// Create a dictionary from a copy of `frame_set`.
    pub fn from_frame_set(frame_set: &FrameGraph) -> Result<Self> {
        Self::from_graph(frame_set.clone())
    }

    /// Create a dictionary from an opaque handle that must describe a frame
    /// set.
    ///
    /// Fails with [`DictError::UnsupportedType`] for unknown class tags and
    /// with [`DictError::TypeMismatch`] if the handle is not a frame set.
    pub fn from_raw(raw: &RawObject) -> Result<Self> {
        let graph: FrameGraph = object::from_raw(raw).inspect_err(|err| {
            warn!(class = raw.class_name(), error = %err, "Rejected raw object");
        })?;
        Self::from_graph(graph)
    }

    fn from_graph(graph: FrameGraph) -> Result<Self> {
        graph.validate()?;
        let index = DomainIndex::from_graph(&graph, CollisionPolicy::Checked)?;
        debug!(
            frames = graph.frame_count(),
            domains = index.len(),
            "Constructed frame dictionary"
        );
        Ok(Self { graph, index })
    }

    /// Resolve a frame reference to a position.
    ///
    /// Positions are passed through unchecked; the graph validates them.
    pub fn resolve<'a>(&self, at: impl Into<FrameRef<'a>>) -> Result<Position> {
        match at.into() {
            FrameRef::Base => Ok(self.graph.base()),
            FrameRef::Current => Ok(self.graph.current()),
            FrameRef::Index(position) => Ok(position),
            FrameRef::Domain(domain) => self.index.lookup(domain),
        }
    }

    /// Class tag; a dictionary is a frame set with an index, not a class of
    /// its own.
    pub fn class_name(&self) -> &'static str {
        self.graph.class_name()
    }

    pub fn frame_count(&self) -> usize {
        self.graph.frame_count()
    }

    pub fn base(&self) -> Position {
        self.graph.base()
    }

    pub fn current(&self) -> Position {
        self.graph.current()
    }

    /// Domain of the current frame as the frame reports it, defaults included
    pub fn domain(&self) -> &str {
        self.graph.domain()
    }

    /// Borrow the underlying frame graph
    pub fn frame_set(&self) -> &FrameGraph {
        &self.graph
    }

    pub fn into_frame_set(self) -> FrameGraph {
        self.graph
    }

    pub fn domain_index(&self) -> &DomainIndex {
        &self.index
    }

    /// Add `frame`, connected to the frame at `from` by `mapping`. The new
    /// frame becomes current and its position is returned.
    ///
    /// Fails with [`DictError::DuplicateDomain`] if `frame` has a non-empty
    /// explicit domain that is already in use; nothing is changed in that
    /// case.
    pub fn add_frame<'a>(
        &mut self,
        from: impl Into<FrameRef<'a>>,
        mapping: Mapping,
        frame: Frame,
    ) -> Result<Position> {
        let from = self.resolve(from)?;
        if let Some(domain) = frame.indexable_domain() {
            if self.index.contains(domain) {
                warn!(domain, "Rejected frame with duplicate domain");
                return Err(DictError::DuplicateDomain {
                    domain: domain.to_string(),
                });
            }
        }
        self.graph.add_frame(from, mapping, frame)?;
        let position = self.graph.current();
        self.index
            .register_one(self.graph.current_frame(), position, CollisionPolicy::Strict)?;
        Ok(position)
    }

    /// Get the frame at `at`: an independent copy when `copy` is set,
    /// otherwise a read-only view into the dictionary.
    pub fn get_frame<'a>(&self, at: impl Into<FrameRef<'a>>, copy: bool) -> Result<Cow<'_, Frame>> {
        let frame = self.graph.frame(self.resolve(at)?)?;
        Ok(if copy {
            Cow::Owned(frame.clone())
        } else {
            Cow::Borrowed(frame)
        })
    }

    /// Get a copy of the frame at `at`
    pub fn frame<'a>(&self, at: impl Into<FrameRef<'a>>) -> Result<Frame> {
        Ok(self.get_frame(at, true)?.into_owned())
    }

    /// Mapping from the frame at `from` to the frame at `to`
    pub fn mapping<'a, 'b>(
        &self,
        from: impl Into<FrameRef<'a>>,
        to: impl Into<FrameRef<'b>>,
    ) -> Result<Mapping> {
        let from = self.resolve(from)?;
        let to = self.resolve(to)?;
        self.graph.mapping(from, to)
    }

    /// Position of the frame with `domain`
    pub fn index(&self, domain: &str) -> Result<Position> {
        self.index.lookup(domain)
    }

    pub fn has_domain(&self, domain: &str) -> bool {
        self.index.contains(domain)
    }

    /// All explicit, non-empty domains, uppercased
    pub fn all_domains(&self) -> BTreeSet<String> {
        self.index.all_names()
    }

    /// Remove the frame at `at`. Later positions shift down and the index is
    /// rebuilt.
    pub fn remove_frame<'a>(&mut self, at: impl Into<FrameRef<'a>>) -> Result<()> {
        let position = self.resolve(at)?;
        self.graph.remove_frame(position)?;
        self.index.rebuild(&self.graph, CollisionPolicy::Strict)?;
        debug!(position, "Removed frame");
        Ok(())
    }

    pub fn set_base<'a>(&mut self, at: impl Into<FrameRef<'a>>) -> Result<()> {
        let position = self.resolve(at)?;
        self.graph.set_base(position)
    }

    pub fn set_current<'a>(&mut self, at: impl Into<FrameRef<'a>>) -> Result<()> {
        let position = self.resolve(at)?;
        self.graph.set_current(position)
    }

    /// Make the current frame mirror the variant mappings of the frame at `at`
    pub fn mirror_variants<'a>(&mut self, at: impl Into<FrameRef<'a>>) -> Result<()> {
        let position = self.resolve(at)?;
        self.graph.mirror_variants(position)
    }

    pub fn clear_mirror_variants(&mut self) {
        self.graph.clear_mirror_variants();
    }

    /// Modify the frame at `at` by applying `mapping` to its coordinates
    pub fn remap_frame<'a>(&mut self, at: impl Into<FrameRef<'a>>, mapping: &Mapping) -> Result<()> {
        let position = self.resolve(at)?;
        self.graph.remap_frame(position, mapping)
    }

    /// Set the domain of the current frame.
    ///
    /// Renaming a frame to the domain it already has is a no-op. Fails with
    /// [`DictError::DuplicateDomain`] if another frame has `domain`; the
    /// graph is unchanged in that case.
    pub fn set_domain(&mut self, domain: &str) -> Result<()> {
        let current = self.graph.current();
        let normalized = normalize_domain(domain);
        if self.graph.current_frame().indexable_domain() == Some(normalized.as_str()) {
            return Ok(());
        }
        if let Ok(owner) = self.index.lookup(domain) {
            if owner != current {
                warn!(domain = %normalized, owner, current, "Rejected rename to duplicate domain");
                return Err(DictError::DuplicateDomain { domain: normalized });
            }
        }
        self.graph.set_domain(domain);
        self.index.rebuild(&self.graph, CollisionPolicy::Strict)?;
        debug!(domain = %normalized, position = current, "Renamed current frame");
        Ok(())
    }

    /// Export the underlying frame set as an opaque handle
    pub fn to_raw(&self) -> Result<RawObject> {
        Object::FrameSet(self.graph.clone()).to_raw()
    }
}

impl From<Frame> for FrameDict {
    fn from(frame: Frame) -> Self {
        Self::new(frame)
    }
}

impl TryFrom<FrameGraph> for FrameDict {
    type Error = DictError;

    fn try_from(graph: FrameGraph) -> Result<Self> {
        Self::from_graph(graph)
    }
}

impl From<FrameDict> for FrameGraph {
    fn from(dict: FrameDict) -> Self {
        dict.into_frame_set()
    }
}
