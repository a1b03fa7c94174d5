//! Core types shared by the frame graph and the domain registry.

/// Position: 1-based slot of a frame in a frame graph.
///
/// Positions are not stable: removing a frame renumbers every later frame
/// down by one.
pub type Position = usize;

/// Reference to a frame, either by position, by domain name, or by one of the
/// two distinguished frames of the graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameRef<'a> {
    /// The base frame
    Base,
    /// The current frame
    Current,
    /// A frame addressed by its 1-based position
    Index(Position),
    /// A frame addressed by its case-blind domain name
    Domain(&'a str),
}

impl From<Position> for FrameRef<'_> {
    fn from(position: Position) -> Self {
        FrameRef::Index(position)
    }
}

impl<'a> From<&'a str> for FrameRef<'a> {
    fn from(domain: &'a str) -> Self {
        FrameRef::Domain(domain)
    }
}

impl<'a> From<&'a String> for FrameRef<'a> {
    fn from(domain: &'a String) -> Self {
        FrameRef::Domain(domain.as_str())
    }
}

impl std::fmt::Display for FrameRef<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FrameRef::Base => write!(f, "base"),
            FrameRef::Current => write!(f, "current"),
            FrameRef::Index(position) => write!(f, "#{}", position),
            FrameRef::Domain(domain) => write!(f, "domain {}", domain),
        }
    }
}

/// Normalize a domain name for storage and lookup.
///
/// Domains are case blind, so every comparison goes through the uppercase form.
pub fn normalize_domain(domain: &str) -> String {
    domain.to_uppercase()
}
