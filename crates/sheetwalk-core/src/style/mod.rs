//! Cell styling types
//!
//! This module contains the style attributes an engine can apply to a range:
//! - [`FormatSpec`] - alignment, font and fill settings
//! - [`BorderSpec`] - a border on one edge selector
//! - [`PageSetup`] - print orientation, margins, header and footer
//!
//! Each attribute is independent. Applying a [`FormatSpec`] only touches the
//! attributes that are set on it.

mod alignment;
mod border;
mod page;

pub use alignment::HorizontalAlignment;
pub use border::{BorderEdge, BorderSpec, BorderWeight};
pub use page::{HeaderFooter, HeaderFooterPosition, Margins, Orientation, PageSetup};

/// Formatting applied to a range
///
/// `None` leaves the attribute as it is. Bold, italic and wrap-text are
/// tri-state: unset, on, off.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FormatSpec {
    /// Horizontal alignment
    pub horizontal: Option<HorizontalAlignment>,
    /// Bold font
    pub bold: Option<bool>,
    /// Italic font
    pub italic: Option<bool>,
    /// Font size in points
    pub font_size: Option<f64>,
    /// Font family name
    pub font_name: Option<String>,
    /// Interior colour, as a palette index
    pub background_color_index: Option<i32>,
    /// Auto-fit the width of every column the range touches
    #[cfg_attr(feature = "serde", serde(default))]
    pub autofit_columns: bool,
    /// Wrap text
    pub wrap_text: Option<bool>,
}

impl FormatSpec {
    /// Create an empty format (changes nothing)
    pub fn new() -> Self {
        Self::default()
    }

    /// Set horizontal alignment
    pub fn horizontal_alignment(mut self, align: HorizontalAlignment) -> Self {
        self.horizontal = Some(align);
        self
    }

    /// Set font to bold
    pub fn bold(mut self, bold: bool) -> Self {
        self.bold = Some(bold);
        self
    }

    /// Set font to italic
    pub fn italic(mut self, italic: bool) -> Self {
        self.italic = Some(italic);
        self
    }

    /// Set font size in points
    pub fn font_size(mut self, size: f64) -> Self {
        self.font_size = Some(size);
        self
    }

    /// Set font name
    pub fn font_name<S: Into<String>>(mut self, name: S) -> Self {
        self.font_name = Some(name.into());
        self
    }

    /// Set background colour index
    pub fn background_color_index(mut self, index: i32) -> Self {
        self.background_color_index = Some(index);
        self
    }

    /// Auto-fit the touched columns
    pub fn autofit_columns(mut self) -> Self {
        self.autofit_columns = true;
        self
    }

    /// Enable or disable text wrapping
    pub fn wrap_text(mut self, wrap: bool) -> Self {
        self.wrap_text = Some(wrap);
        self
    }

    /// Check if applying this format would change nothing
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Overlay the attributes set on `other` onto this format
    pub fn merge(&mut self, other: &FormatSpec) {
        if other.horizontal.is_some() {
            self.horizontal = other.horizontal;
        }
        if other.bold.is_some() {
            self.bold = other.bold;
        }
        if other.italic.is_some() {
            self.italic = other.italic;
        }
        if other.font_size.is_some() {
            self.font_size = other.font_size;
        }
        if other.font_name.is_some() {
            self.font_name = other.font_name.clone();
        }
        if other.background_color_index.is_some() {
            self.background_color_index = other.background_color_index;
        }
        if other.wrap_text.is_some() {
            self.wrap_text = other.wrap_text;
        }
        // autofit is an action on the column, not a stored attribute
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_builder() {
        let format = FormatSpec::new()
            .bold(true)
            .font_size(14.0)
            .horizontal_alignment(HorizontalAlignment::Center);
        assert_eq!(format.bold, Some(true));
        assert_eq!(format.italic, None);
        assert_eq!(format.font_size, Some(14.0));
        assert!(!format.is_empty());
        assert!(FormatSpec::new().is_empty());
    }

    #[test]
    fn test_format_merge_only_touches_set_attributes() {
        let mut base = FormatSpec::new().bold(true).font_name("Arial");
        base.merge(&FormatSpec::new().italic(true).bold(false));
        assert_eq!(base.bold, Some(false));
        assert_eq!(base.italic, Some(true));
        assert_eq!(base.font_name.as_deref(), Some("Arial"));
    }

    #[test]
    fn test_page_setup_ignores_empty_header() {
        let setup = PageSetup::new()
            .orientation(Orientation::Landscape)
            .header(HeaderFooterPosition::Center, "")
            .footer(HeaderFooterPosition::Right, "Page &P");
        assert_eq!(setup.header, None);
        assert_eq!(
            setup.footer,
            Some(HeaderFooter::new(HeaderFooterPosition::Right, "Page &P"))
        );
        assert_eq!(setup.margins, Margins::default());
    }
}
