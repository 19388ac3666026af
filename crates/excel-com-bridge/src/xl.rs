//! Excel enumeration values and the mappings onto them

use sheetwalk_core::{
    BorderEdge, HeaderFooter, HeaderFooterPosition, HorizontalAlignment, Orientation, SaveFormat,
};

/// `xlContinuous`
pub const CONTINUOUS: i32 = 1;
/// `xlShiftUp`
pub const SHIFT_UP: i32 = -4162;
/// `xlShiftDown`
pub const SHIFT_DOWN: i32 = -4121;

pub fn h_align(align: HorizontalAlignment) -> i32 {
    match align {
        HorizontalAlignment::Left => -4131,
        HorizontalAlignment::Center => -4108,
        HorizontalAlignment::Right => -4152,
    }
}

/// `XlBordersIndex` of one edge, `None` for the whole `Borders` collection
pub fn border_index(edge: BorderEdge) -> Option<i32> {
    match edge {
        BorderEdge::Left => Some(7),
        BorderEdge::Top => Some(8),
        BorderEdge::Bottom => Some(9),
        BorderEdge::Right => Some(10),
        BorderEdge::All => None,
    }
}

pub fn orientation(orientation: Orientation) -> i32 {
    match orientation {
        Orientation::Portrait => 1,
        Orientation::Landscape => 2,
    }
}

/// `XlFileFormat` for `SaveAs`; `None` lets Excel keep the current format
pub fn file_format(path: &str, format: SaveFormat) -> Option<i32> {
    const XL_CSV: i32 = 6;
    const XL_OPEN_XML_WORKBOOK: i32 = 51;
    const XL_OPEN_XML_MACRO_WORKBOOK: i32 = 52;
    const XL_EXCEL8: i32 = 56;

    match format {
        SaveFormat::Excel97 => Some(XL_EXCEL8),
        SaveFormat::Native => match extension(path)?.as_str() {
            "xlsx" => Some(XL_OPEN_XML_WORKBOOK),
            "xlsm" => Some(XL_OPEN_XML_MACRO_WORKBOOK),
            "xls" => Some(XL_EXCEL8),
            "csv" => Some(XL_CSV),
            _ => None,
        },
    }
}

fn extension(path: &str) -> Option<String> {
    let name = path.rsplit(['\\', '/']).next()?;
    let (_, ext) = name.rsplit_once('.')?;
    Some(ext.to_ascii_lowercase())
}

/// `LeftHeader`, `CenterHeader` or `RightHeader`
pub fn header_property(header: &HeaderFooter) -> String {
    format!("{}Header", position(header.position))
}

/// `LeftFooter`, `CenterFooter` or `RightFooter`
pub fn footer_property(footer: &HeaderFooter) -> String {
    format!("{}Footer", position(footer.position))
}

fn position(position: HeaderFooterPosition) -> &'static str {
    match position {
        HeaderFooterPosition::Left => "Left",
        HeaderFooterPosition::Center => "Center",
        HeaderFooterPosition::Right => "Right",
    }
}

/// Excel's `CVErr` numbers, carried in the low word of the SCODE
pub fn error_code(scode: i32) -> &'static str {
    match scode & 0xFFFF {
        2000 => "#NULL!",
        2007 => "#DIV/0!",
        2015 => "#VALUE!",
        2023 => "#REF!",
        2029 => "#NAME?",
        2036 => "#NUM!",
        2042 => "#N/A",
        _ => "#ERR!",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_format_from_extension() {
        assert_eq!(file_format(r"Z:\data\out.XLSX", SaveFormat::Native), Some(51));
        assert_eq!(file_format(r"Z:\data\out.xls", SaveFormat::Native), Some(56));
        assert_eq!(file_format(r"Z:\data.d\out", SaveFormat::Native), None);
        assert_eq!(file_format(r"Z:\data\out.xlsx", SaveFormat::Excel97), Some(56));
    }

    #[test]
    fn test_header_footer_properties() {
        let text = HeaderFooter::new(HeaderFooterPosition::Center, "Page &P");
        assert_eq!(header_property(&text), "CenterHeader");
        assert_eq!(footer_property(&text), "CenterFooter");
    }

    #[test]
    fn test_error_codes() {
        // CVErr(xlErrDiv0) arrives as 0x800A07D7
        assert_eq!(error_code(0x800A_07D7_u32 as i32), "#DIV/0!");
        assert_eq!(error_code(0x800A_07FA_u32 as i32), "#N/A");
        assert_eq!(error_code(0), "#ERR!");
    }

    #[test]
    fn test_enumerations() {
        assert_eq!(h_align(HorizontalAlignment::Right), -4152);
        assert_eq!(border_index(BorderEdge::Top), Some(8));
        assert_eq!(border_index(BorderEdge::All), None);
        assert_eq!(orientation(Orientation::Landscape), 2);
    }
}
