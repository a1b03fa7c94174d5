//! Frame Graph
//!
//! Ordered collection of frames connected by mappings. Every frame except the
//! root is linked to a parent frame by the mapping that converts parent
//! coordinates into its own, so any two frames are joined by exactly one path.
//! Frames are addressed by 1-based position; removing a frame renumbers every
//! later frame down by one.

use crate::error::{DictError, Result};
use crate::frame::Frame;
use crate::mapping::Mapping;
use crate::types::Position;
use serde::{Deserialize, Serialize};

/// Class tag of a frame graph
pub const FRAME_SET_CLASS: &str = "FrameSet";

/// Edge from a parent frame to a child frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Link {
    parent: Position,
    mapping: Mapping,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct GraphNode {
    frame: Frame,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link: Option<Link>,
}

/// Graph of frames with a base and a current frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameGraph {
    nodes: Vec<GraphNode>,
    base: Position,
    current: Position,
    /// Frame whose variant mappings the current frame mirrors
    #[serde(default, skip_serializing_if = "Option::is_none")]
    mirror: Option<Position>,
}

impl FrameGraph {
    /// Create a graph holding one frame, which is both base and current
    pub fn new(frame: Frame) -> Self {
        Self {
            nodes: vec![GraphNode { frame, link: None }],
            base: 1,
            current: 1,
            mirror: None,
        }
    }

    /// Create a graph of two frames; `mapping` converts base coordinates into
    /// current coordinates.
    pub fn with_mapping(base: Frame, mapping: Mapping, current: Frame) -> Result<Self> {
        let mut graph = Self::new(base);
        graph.add_frame(1, mapping, current)?;
        Ok(graph)
    }

    pub fn class_name(&self) -> &'static str {
        FRAME_SET_CLASS
    }

    pub fn frame_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn base(&self) -> Position {
        self.base
    }

    pub fn current(&self) -> Position {
        self.current
    }

    /// Borrow the frame at `position`
    pub fn frame(&self, position: Position) -> Result<&Frame> {
        let slot = self.slot(position)?;
        Ok(&self.nodes[slot].frame)
    }

    /// Iterate over `(position, frame)` in position order
    pub fn frames(&self) -> impl Iterator<Item = (Position, &Frame)> + '_ {
        self.nodes
            .iter()
            .enumerate()
            .map(|(slot, node)| (slot + 1, &node.frame))
    }

    pub fn current_frame(&self) -> &Frame {
        &self.nodes[self.current - 1].frame
    }

    /// Domain of the current frame, as the frame reports it
    pub fn domain(&self) -> &str {
        self.current_frame().domain()
    }

    /// Set the domain of the current frame
    pub fn set_domain(&mut self, domain: &str) {
        let slot = self.current - 1;
        self.nodes[slot].frame.set_domain(domain);
    }

    fn slot(&self, position: Position) -> Result<usize> {
        if position == 0 || position > self.nodes.len() {
            return Err(DictError::InvalidPosition {
                position,
                count: self.nodes.len(),
            });
        }
        Ok(position - 1)
    }

    fn link(&self, slot: usize) -> Result<&Link> {
        self.nodes[slot].link.as_ref().ok_or_else(|| disconnected(slot + 1))
    }

    /// Slots from `slot` up to the root, inclusive
    fn ancestors(&self, slot: usize) -> Result<Vec<usize>> {
        let mut chain = vec![slot];
        let mut at = slot;
        while let Some(link) = &self.nodes[at].link {
            at = self.slot(link.parent)?;
            chain.push(at);
            if chain.len() > self.nodes.len() {
                return Err(disconnected(slot + 1));
            }
        }
        Ok(chain)
    }

    /// Add `frame`, connected to the frame at `position` by `mapping`.
    ///
    /// The new frame is appended and becomes the current frame; its position
    /// is returned.
    pub fn add_frame(&mut self, position: Position, mapping: Mapping, frame: Frame) -> Result<Position> {
        let slot = self.slot(position)?;
        mapping.validate()?;
        let from = &self.nodes[slot].frame;
        if mapping.n_in() != from.naxes() {
            return Err(DictError::AxisMismatch {
                expected: from.naxes(),
                actual: mapping.n_in(),
            });
        }
        if mapping.n_out() != frame.naxes() {
            return Err(DictError::AxisMismatch {
                expected: frame.naxes(),
                actual: mapping.n_out(),
            });
        }
        self.nodes.push(GraphNode {
            frame,
            link: Some(Link {
                parent: position,
                mapping,
            }),
        });
        self.current = self.nodes.len();
        Ok(self.current)
    }

    /// Remove the frame at `position`.
    ///
    /// Frames that were linked through the removed frame are reattached so the
    /// graph stays connected. Later positions shift down by one; a removed base
    /// or current frame is replaced by frame 1.
    pub fn remove_frame(&mut self, position: Position) -> Result<()> {
        let slot = self.slot(position)?;
        if self.nodes.len() == 1 {
            return Err(DictError::LastFrame);
        }
        let children: Vec<usize> = self
            .nodes
            .iter()
            .enumerate()
            .filter(|(_, node)| node.link.as_ref().map(|l| l.parent) == Some(position))
            .map(|(child, _)| child)
            .collect();

        // New links are computed up front so a failure leaves the graph untouched.
        let mut relinks: Vec<(usize, Option<Link>)> = Vec::with_capacity(children.len());
        match &self.nodes[slot].link {
            Some(up) => {
                for &child in &children {
                    let mapping = up.mapping.then(&self.link(child)?.mapping)?;
                    relinks.push((
                        child,
                        Some(Link {
                            parent: up.parent,
                            mapping,
                        }),
                    ));
                }
            }
            None => {
                let (&root, rest) = children.split_first().ok_or_else(|| disconnected(position))?;
                let back = self.link(root)?.mapping.inverted();
                relinks.push((root, None));
                for &child in rest {
                    let mapping = back.then(&self.link(child)?.mapping)?;
                    relinks.push((
                        child,
                        Some(Link {
                            parent: root + 1,
                            mapping,
                        }),
                    ));
                }
            }
        }

        for (child, link) in relinks {
            self.nodes[child].link = link;
        }
        self.nodes.remove(slot);
        for node in &mut self.nodes {
            if let Some(link) = &mut node.link {
                if link.parent > position {
                    link.parent -= 1;
                }
            }
        }
        let renumber = |p: Position| match p {
            p if p == position => 1,
            p if p > position => p - 1,
            p => p,
        };
        self.base = renumber(self.base);
        self.current = renumber(self.current);
        self.mirror = match self.mirror {
            Some(p) if p == position => None,
            other => other.map(renumber),
        };
        Ok(())
    }

    /// Mapping from the frame at `from` to the frame at `to`, composed along
    /// the path joining them.
    pub fn mapping(&self, from: Position, to: Position) -> Result<Mapping> {
        let from_slot = self.slot(from)?;
        let to_slot = self.slot(to)?;
        let up = self.ancestors(from_slot)?;
        let down = self.ancestors(to_slot)?;
        let (up_len, down_len) = up
            .iter()
            .enumerate()
            .find_map(|(i, slot)| down.iter().position(|s| s == slot).map(|j| (i, j)))
            .ok_or_else(|| disconnected(from))?;

        let mut result = Mapping::unit(self.nodes[from_slot].frame.naxes());
        for &slot in &up[..up_len] {
            result = result.then(&self.link(slot)?.mapping.inverted())?;
        }
        for &slot in down[..down_len].iter().rev() {
            result = result.then(&self.link(slot)?.mapping)?;
        }
        Ok(result)
    }

    pub fn set_base(&mut self, position: Position) -> Result<()> {
        self.slot(position)?;
        self.base = position;
        Ok(())
    }

    /// Make the frame at `position` current. Any variant mirroring set up for
    /// the previous current frame is cancelled.
    pub fn set_current(&mut self, position: Position) -> Result<()> {
        self.slot(position)?;
        if position != self.current {
            self.mirror = None;
        }
        self.current = position;
        Ok(())
    }

    /// Modify the frame at `position` by applying `mapping` to its
    /// coordinates. All links touching the frame are updated so the other
    /// frames are unaffected.
    pub fn remap_frame(&mut self, position: Position, mapping: &Mapping) -> Result<()> {
        let slot = self.slot(position)?;
        mapping.validate()?;
        let naxes = self.nodes[slot].frame.naxes();
        if mapping.naxes() != naxes {
            return Err(DictError::AxisMismatch {
                expected: naxes,
                actual: mapping.naxes(),
            });
        }

        let mut relinks: Vec<(usize, Mapping)> = Vec::new();
        if let Some(link) = &self.nodes[slot].link {
            relinks.push((slot, link.mapping.then(mapping)?));
        }
        let inverse = mapping.inverted();
        for (child, node) in self.nodes.iter().enumerate() {
            if let Some(link) = &node.link {
                if link.parent == position {
                    relinks.push((child, inverse.then(&link.mapping)?));
                }
            }
        }
        for (target, remapped) in relinks {
            if let Some(link) = &mut self.nodes[target].link {
                link.mapping = remapped;
            }
        }
        Ok(())
    }

    /// Make the current frame mirror the variant mappings of the frame at
    /// `position`.
    pub fn mirror_variants(&mut self, position: Position) -> Result<()> {
        self.slot(position)?;
        self.mirror = Some(position);
        Ok(())
    }

    pub fn clear_mirror_variants(&mut self) {
        self.mirror = None;
    }

    pub fn mirrored_variants(&self) -> Option<Position> {
        self.mirror
    }

    /// Check the structure of a graph that did not come from this module's
    /// own constructors.
    pub fn validate(&self) -> Result<()> {
        if self.nodes.is_empty() {
            return Err(malformed("no frames"));
        }
        self.slot(self.base)?;
        self.slot(self.current)?;
        if let Some(mirror) = self.mirror {
            self.slot(mirror)?;
        }
        let roots = self.nodes.iter().filter(|node| node.link.is_none()).count();
        if roots != 1 {
            return Err(malformed(&format!("expected one root frame, found {}", roots)));
        }
        for (slot, node) in self.nodes.iter().enumerate() {
            let Some(link) = &node.link else { continue };
            let parent = self.slot(link.parent)?;
            if parent == slot {
                return Err(malformed("frame linked to itself"));
            }
            link.mapping.validate()?;
            let parent_axes = self.nodes[parent].frame.naxes();
            if link.mapping.naxes() != parent_axes || link.mapping.naxes() != node.frame.naxes() {
                return Err(DictError::AxisMismatch {
                    expected: node.frame.naxes(),
                    actual: link.mapping.naxes(),
                });
            }
            self.ancestors(slot)?;
        }
        Ok(())
    }
}

fn malformed(reason: &str) -> DictError {
    DictError::MalformedObject {
        class: FRAME_SET_CLASS.to_string(),
        reason: reason.to_string(),
    }
}

fn disconnected(position: Position) -> DictError {
    malformed(&format!("frame {} is not connected to the root", position))
}
