//! Domain Index
//!
//! Provides O(1) access to the position of the frame carrying a given domain.

use crate::error::{DictError, Result};
use crate::frame::Frame;
use crate::graph::FrameGraph;
use crate::types::{normalize_domain, Position};
use std::collections::{BTreeSet, HashMap};
use tracing::{debug, error};

/// What a domain collision means at the point it is detected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionPolicy {
    /// Uniqueness was already validated by the caller; a collision is a bug
    /// in the registry and aborts.
    Strict,
    /// Input has not been validated; a collision is reported as
    /// [`DictError::DuplicateDomain`].
    Checked,
}

/// Domain index: uppercase domain -> position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DomainIndex {
    pub(crate) domains: HashMap<String, Position>,
}

impl DomainIndex {
    pub fn new() -> Self {
        DomainIndex {
            domains: HashMap::new(),
        }
    }

    /// Build an index for every frame of `graph`
    pub fn from_graph(graph: &FrameGraph, policy: CollisionPolicy) -> Result<Self> {
        let mut index = Self::new();
        index.rebuild(graph, policy)?;
        Ok(index)
    }

    /// Index for a graph whose only frame, at position 1, is `frame`. One
    /// frame cannot collide with anything.
    pub fn single(frame: &Frame) -> Self {
        let mut index = Self::new();
        if let Some(domain) = frame.indexable_domain() {
            index.domains.insert(normalize_domain(domain), 1);
        }
        index
    }

    /// Position of the frame with `domain`, compared case blind
    pub fn lookup(&self, domain: &str) -> Result<Position> {
        self.domains
            .get(&normalize_domain(domain))
            .copied()
            .ok_or_else(|| DictError::NotFound {
                domain: domain.to_string(),
            })
    }

    pub fn contains(&self, domain: &str) -> bool {
        self.domains.contains_key(&normalize_domain(domain))
    }

    /// All indexed domains, uppercased
    pub fn all_names(&self) -> BTreeSet<String> {
        self.domains.keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.domains.len()
    }

    pub fn is_empty(&self) -> bool {
        self.domains.is_empty()
    }

    /// Iterate over `(domain, position)` pairs in no particular order
    pub fn iter(&self) -> impl Iterator<Item = (&str, Position)> + '_ {
        self.domains.iter().map(|(domain, position)| (domain.as_str(), *position))
    }

    /// Clear the index and re-register every frame of `graph` in position
    /// order.
    ///
    /// With [`CollisionPolicy::Checked`] the index is left empty if a
    /// collision is found.
    pub fn rebuild(&mut self, graph: &FrameGraph, policy: CollisionPolicy) -> Result<()> {
        self.domains.clear();
        for (position, frame) in graph.frames() {
            if let Err(err) = self.register_one(frame, position, policy) {
                self.domains.clear();
                return Err(err);
            }
        }
        debug!(
            frames = graph.frame_count(),
            domains = self.domains.len(),
            "Rebuilt domain index"
        );
        Ok(())
    }

    /// Register the domain of `frame` at `position`.
    ///
    /// Frames with no explicit domain, an empty one, or only a kind default
    /// are skipped.
    pub fn register_one(
        &mut self,
        frame: &Frame,
        position: Position,
        policy: CollisionPolicy,
    ) -> Result<()> {
        let Some(domain) = frame.indexable_domain() else {
            return Ok(());
        };
        let domain = normalize_domain(domain);
        if let Some(existing) = self.domains.get(&domain) {
            match policy {
                CollisionPolicy::Strict => {
                    error!(
                        domain = %domain,
                        existing = *existing,
                        position,
                        "Domain index invariant violated"
                    );
                    panic!(
                        "domain index invariant violated: {} claimed by frames {} and {}",
                        domain, existing, position
                    );
                }
                CollisionPolicy::Checked => {
                    return Err(DictError::DuplicateDomain { domain });
                }
            }
        }
        debug!(domain = %domain, position, "Registered frame domain");
        self.domains.insert(domain, position);
        Ok(())
    }
}
