//! Mappings
//!
//! Invertible transforms connecting two frames. Only the handful of mapping
//! classes needed to build and query frame graphs are provided; every mapping
//! here has the same number of input and output axes.

use crate::error::{DictError, Result};
use serde::{Deserialize, Serialize};

/// Mapping class and its parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MappingKind {
    /// Identity on `naxes` axes
    Unit { naxes: usize },
    /// Multiply every axis by `factor`
    Zoom { naxes: usize, factor: f64 },
    /// Add a per-axis offset
    Shift { offsets: Vec<f64> },
    /// Apply each step in order
    Series { steps: Vec<Mapping> },
}

/// Invertible mapping between two frames
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mapping {
    kind: MappingKind,
    #[serde(default)]
    inverted: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    ident: Option<String>,
}

impl Mapping {
    fn from_kind(kind: MappingKind) -> Self {
        Self {
            kind,
            inverted: false,
            ident: None,
        }
    }

    pub fn unit(naxes: usize) -> Self {
        Self::from_kind(MappingKind::Unit { naxes })
    }

    /// Zoom by `factor`; a zero factor has no inverse and is rejected by
    /// [`Mapping::validate`].
    pub fn zoom(naxes: usize, factor: f64) -> Self {
        Self::from_kind(MappingKind::Zoom { naxes, factor })
    }

    pub fn shift(offsets: Vec<f64>) -> Self {
        Self::from_kind(MappingKind::Shift { offsets })
    }

    /// Compose `steps` into one mapping applied left to right
    pub fn series(steps: Vec<Mapping>) -> Result<Self> {
        let mapping = Self::from_kind(MappingKind::Series { steps });
        mapping.validate()?;
        Ok(mapping)
    }

    pub fn with_ident(mut self, ident: &str) -> Self {
        self.ident = Some(ident.to_string());
        self
    }

    pub fn kind(&self) -> &MappingKind {
        &self.kind
    }

    pub fn class_name(&self) -> &'static str {
        match self.kind {
            MappingKind::Unit { .. } => "UnitMap",
            MappingKind::Zoom { .. } => "ZoomMap",
            MappingKind::Shift { .. } => "ShiftMap",
            MappingKind::Series { .. } => "SeriesMap",
        }
    }

    pub fn ident(&self) -> Option<&str> {
        self.ident.as_deref()
    }

    pub fn set_ident(&mut self, ident: &str) {
        self.ident = Some(ident.to_string());
    }

    pub fn is_inverted(&self) -> bool {
        self.inverted
    }

    /// Number of axes on either side of the mapping
    pub fn naxes(&self) -> usize {
        match &self.kind {
            MappingKind::Unit { naxes } | MappingKind::Zoom { naxes, .. } => *naxes,
            MappingKind::Shift { offsets } => offsets.len(),
            MappingKind::Series { steps } => steps.first().map(Mapping::naxes).unwrap_or(0),
        }
    }

    pub fn n_in(&self) -> usize {
        self.naxes()
    }

    pub fn n_out(&self) -> usize {
        self.naxes()
    }

    pub fn is_unit(&self) -> bool {
        match &self.kind {
            MappingKind::Unit { .. } => true,
            MappingKind::Series { steps } => steps.iter().all(Mapping::is_unit),
            _ => false,
        }
    }

    /// The inverse mapping; the ident is kept
    pub fn inverted(&self) -> Mapping {
        let mut inverse = self.clone();
        inverse.inverted = !inverse.inverted;
        inverse
    }

    /// Mapping that applies `self` and then `next`
    pub fn then(&self, next: &Mapping) -> Result<Mapping> {
        if self.naxes() != next.naxes() {
            return Err(DictError::AxisMismatch {
                expected: self.naxes(),
                actual: next.naxes(),
            });
        }
        if self.is_unit() {
            return Ok(next.clone());
        }
        if next.is_unit() {
            return Ok(self.clone());
        }
        let mut steps = Vec::new();
        self.flatten_into(&mut steps);
        next.flatten_into(&mut steps);
        Ok(Self::from_kind(MappingKind::Series { steps }))
    }

    fn flatten_into(&self, steps: &mut Vec<Mapping>) {
        match (&self.kind, self.inverted, &self.ident) {
            (MappingKind::Series { steps: inner }, false, None) => {
                steps.extend(inner.iter().cloned())
            }
            _ => steps.push(self.clone()),
        }
    }

    /// Transform one point in the forward direction
    pub fn apply_forward(&self, point: &[f64]) -> Result<Vec<f64>> {
        self.check_point(point)?;
        Ok(self.transform(point, true))
    }

    /// Transform one point in the inverse direction
    pub fn apply_inverse(&self, point: &[f64]) -> Result<Vec<f64>> {
        self.check_point(point)?;
        Ok(self.transform(point, false))
    }

    fn check_point(&self, point: &[f64]) -> Result<()> {
        if point.len() != self.naxes() {
            return Err(DictError::AxisMismatch {
                expected: self.naxes(),
                actual: point.len(),
            });
        }
        Ok(())
    }

    fn transform(&self, point: &[f64], forward: bool) -> Vec<f64> {
        let forward = forward != self.inverted;
        match &self.kind {
            MappingKind::Unit { .. } => point.to_vec(),
            MappingKind::Zoom { factor, .. } => point
                .iter()
                .map(|x| if forward { x * factor } else { x / factor })
                .collect(),
            MappingKind::Shift { offsets } => point
                .iter()
                .zip(offsets)
                .map(|(x, o)| if forward { x + o } else { x - o })
                .collect(),
            MappingKind::Series { steps } => {
                let mut current = point.to_vec();
                if forward {
                    for step in steps {
                        current = step.transform(&current, true);
                    }
                } else {
                    for step in steps.iter().rev() {
                        current = step.transform(&current, false);
                    }
                }
                current
            }
        }
    }

    /// Check that the parameters describe an invertible mapping
    pub fn validate(&self) -> Result<()> {
        let malformed = |reason: &str| DictError::MalformedObject {
            class: self.class_name().to_string(),
            reason: reason.to_string(),
        };
        match &self.kind {
            MappingKind::Unit { naxes } if *naxes == 0 => Err(malformed("no axes")),
            MappingKind::Zoom { naxes, .. } if *naxes == 0 => Err(malformed("no axes")),
            MappingKind::Zoom { factor, .. } if *factor == 0.0 || !factor.is_finite() => {
                Err(malformed("zoom factor must be finite and non-zero"))
            }
            MappingKind::Shift { offsets } if offsets.is_empty() => Err(malformed("no axes")),
            MappingKind::Shift { offsets } if offsets.iter().any(|o| !o.is_finite()) => {
                Err(malformed("shift offsets must be finite"))
            }
            MappingKind::Series { steps } => {
                let first = steps.first().ok_or_else(|| malformed("empty series"))?;
                for step in steps {
                    step.validate()?;
                    if step.naxes() != first.naxes() {
                        return Err(DictError::AxisMismatch {
                            expected: first.naxes(),
                            actual: step.naxes(),
                        });
                    }
                }
                Ok(())
            }
            _ => Ok(()),
        }
    }
}
