//! Print page setup

/// Page orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Orientation {
    Portrait,
    Landscape,
}

/// Where a header or footer text is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum HeaderFooterPosition {
    Left,
    Center,
    Right,
}

/// Header or footer text at one position
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeaderFooter {
    pub position: HeaderFooterPosition,
    pub text: String,
}

impl HeaderFooter {
    pub fn new<S: Into<String>>(position: HeaderFooterPosition, text: S) -> Self {
        Self {
            position,
            text: text.into(),
        }
    }
}

/// Page margins in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Margins {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            left: 50.0,
            right: 50.0,
            top: 55.0,
            bottom: 55.0,
        }
    }
}

/// Print settings for the active worksheet
///
/// Margins are always applied. Orientation, header and footer are left
/// untouched when `None`.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PageSetup {
    pub orientation: Option<Orientation>,
    pub margins: Margins,
    pub header: Option<HeaderFooter>,
    pub footer: Option<HeaderFooter>,
}

impl PageSetup {
    /// Create a page setup with default margins
    pub fn new() -> Self {
        Self::default()
    }

    /// Set orientation
    pub fn orientation(mut self, orientation: Orientation) -> Self {
        self.orientation = Some(orientation);
        self
    }

    /// Set margins
    pub fn margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Set header text, empty text leaves the header untouched
    pub fn header<S: Into<String>>(mut self, position: HeaderFooterPosition, text: S) -> Self {
        self.header = Some(HeaderFooter::new(position, text)).filter(|h| !h.text.is_empty());
        self
    }

    /// Set footer text, empty text leaves the footer untouched
    pub fn footer<S: Into<String>>(mut self, position: HeaderFooterPosition, text: S) -> Self {
        self.footer = Some(HeaderFooter::new(position, text)).filter(|f| !f.text.is_empty());
        self
    }
}
