//! Border style types

/// Which edge(s) of a range a border applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum BorderEdge {
    /// Top edge
    Top,
    /// Bottom edge
    Bottom,
    /// Left edge
    Left,
    /// Right edge
    Right,
    /// Every edge, including the inner grid lines
    #[default]
    All,
}

/// Border line weight, as the Excel `XlBorderWeight` magnitude
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BorderWeight(pub i32);

impl BorderWeight {
    pub const HAIRLINE: BorderWeight = BorderWeight(1);
    pub const THIN: BorderWeight = BorderWeight(2);
    pub const MEDIUM: BorderWeight = BorderWeight(-4138);
    pub const THICK: BorderWeight = BorderWeight(4);
}

impl Default for BorderWeight {
    fn default() -> Self {
        Self::THIN
    }
}

/// A border applied to one edge selector of a range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BorderSpec {
    /// Edge selector
    pub edge: BorderEdge,
    /// Line weight
    pub weight: BorderWeight,
}

impl BorderSpec {
    /// Create a border for an edge
    pub fn new(edge: BorderEdge, weight: BorderWeight) -> Self {
        Self { edge, weight }
    }

    /// A border on every edge
    pub fn all(weight: BorderWeight) -> Self {
        Self::new(BorderEdge::All, weight)
    }
}
