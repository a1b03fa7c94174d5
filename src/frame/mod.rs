//! Coordinate Frames
//!
//! A frame describes one coordinate space inside a frame graph. Besides its
//! axis count, the only attribute the registry cares about is the domain:
//! a label that may be explicitly set, left at a kind-specific default, or
//! unset entirely.

use crate::types::normalize_domain;
use serde::{Deserialize, Deserializer, Serialize};

/// Frame kind; determines the class tag and the default domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FrameKind {
    /// Generic Cartesian frame, no default domain
    Frame,
    /// Celestial frame, defaults to "SKY"
    SkyFrame,
    /// Spectral frame, defaults to "SPECTRUM"
    SpecFrame,
    /// Time frame, defaults to "TIME"
    TimeFrame,
}

impl FrameKind {
    /// Class tag reported for frames of this kind
    pub fn class_name(self) -> &'static str {
        match self {
            FrameKind::Frame => "Frame",
            FrameKind::SkyFrame => "SkyFrame",
            FrameKind::SpecFrame => "SpecFrame",
            FrameKind::TimeFrame => "TimeFrame",
        }
    }

    /// Domain reported when none has been set explicitly
    pub fn default_domain(self) -> Option<&'static str> {
        match self {
            FrameKind::Frame => None,
            FrameKind::SkyFrame => Some("SKY"),
            FrameKind::SpecFrame => Some("SPECTRUM"),
            FrameKind::TimeFrame => Some("TIME"),
        }
    }

    /// Look up a kind by class tag
    pub fn from_class_name(class: &str) -> Option<Self> {
        match class {
            "Frame" => Some(FrameKind::Frame),
            "SkyFrame" => Some(FrameKind::SkyFrame),
            "SpecFrame" => Some(FrameKind::SpecFrame),
            "TimeFrame" => Some(FrameKind::TimeFrame),
            _ => None,
        }
    }
}

/// Where the domain reported by a frame comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DomainSource {
    /// Nothing set and the kind has no default; reports ""
    Unset,
    /// Set by a caller
    Explicit,
    /// Supplied by the frame kind, never set by a caller
    Defaulted,
}

/// Coordinate frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Frame {
    kind: FrameKind,
    naxes: usize,
    /// Explicit domain, stored uppercased; `None` means unset
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "deserialize_domain"
    )]
    domain: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ident: Option<String>,
}

fn deserialize_domain<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let domain = Option::<String>::deserialize(deserializer)?;
    Ok(domain.map(|domain| normalize_domain(&domain)))
}

impl Frame {
    /// Create a generic frame with `naxes` axes and no domain
    pub fn new(naxes: usize) -> Self {
        Self::with_kind(FrameKind::Frame, naxes)
    }

    /// Create a frame of the given kind
    pub fn with_kind(kind: FrameKind, naxes: usize) -> Self {
        Self {
            kind,
            naxes,
            domain: None,
            title: None,
            ident: None,
        }
    }

    /// Create a two-axis celestial frame
    pub fn sky() -> Self {
        Self::with_kind(FrameKind::SkyFrame, 2)
    }

    /// Create a one-axis spectral frame
    pub fn spectrum() -> Self {
        Self::with_kind(FrameKind::SpecFrame, 1)
    }

    /// Create a one-axis time frame
    pub fn time() -> Self {
        Self::with_kind(FrameKind::TimeFrame, 1)
    }

    /// Builder form of [`Frame::set_domain`]
    pub fn named(mut self, domain: &str) -> Self {
        self.set_domain(domain);
        self
    }

    /// Builder form of [`Frame::set_ident`]
    pub fn with_ident(mut self, ident: &str) -> Self {
        self.set_ident(ident);
        self
    }

    pub fn kind(&self) -> FrameKind {
        self.kind
    }

    pub fn class_name(&self) -> &'static str {
        self.kind.class_name()
    }

    pub fn naxes(&self) -> usize {
        self.naxes
    }

    /// Domain as reported to callers: the explicit value, else the kind
    /// default, else the empty string.
    pub fn domain(&self) -> &str {
        match &self.domain {
            Some(domain) => domain,
            None => self.kind.default_domain().unwrap_or(""),
        }
    }

    /// True if a caller has set the domain, even to the empty string
    pub fn has_explicit_domain(&self) -> bool {
        self.domain.is_some()
    }

    pub fn domain_source(&self) -> DomainSource {
        match (&self.domain, self.kind.default_domain()) {
            (Some(_), _) => DomainSource::Explicit,
            (None, Some(_)) => DomainSource::Defaulted,
            (None, None) => DomainSource::Unset,
        }
    }

    /// Explicit, non-empty domain; the only kind of domain that can be indexed
    pub fn indexable_domain(&self) -> Option<&str> {
        self.domain.as_deref().filter(|domain| !domain.is_empty())
    }

    /// Set the domain explicitly. The value is stored uppercased.
    pub fn set_domain(&mut self, domain: &str) {
        self.domain = Some(normalize_domain(domain));
    }

    /// Drop the explicit domain, reverting to the kind default
    pub fn clear_domain(&mut self) {
        self.domain = None;
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn set_title(&mut self, title: &str) {
        self.title = Some(title.to_string());
    }

    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    pub fn set_ident(&mut self, ident: &str) {
        self.ident = Some(ident.to_string());
    }

    /// Force the kind after decoding; the class tag of a raw object wins over
    /// whatever the body claims.
    pub(crate) fn retag(&mut self, kind: FrameKind) {
        self.kind = kind;
    }
}
