//! Recognized content-stream operators.

use std::fmt;

/// Every operator the interpreter knows, plus a catch-all for the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    // graphics state
    Save,
    Restore,
    ConcatMatrix,
    LineWidth,
    LineCap,
    LineJoin,
    MiterLimit,
    Dash,
    RenderingIntent,
    Flatness,
    ExtGState,
    // path construction
    MoveTo,
    LineTo,
    CurveTo,
    CurveToV,
    CurveToY,
    ClosePath,
    Rectangle,
    // path painting and clipping
    Stroke,
    CloseStroke,
    Fill,
    FillObsolete,
    FillEvenOdd,
    FillStroke,
    FillStrokeEvenOdd,
    CloseFillStroke,
    CloseFillStrokeEvenOdd,
    EndPath,
    Clip,
    ClipEvenOdd,
    // text objects and state
    BeginText,
    EndText,
    CharSpacing,
    WordSpacing,
    HorizontalScaling,
    Leading,
    Font,
    RenderMode,
    Rise,
    // text positioning
    MoveText,
    MoveTextSetLeading,
    TextMatrix,
    NextLine,
    // text showing
    ShowText,
    ShowTextArray,
    NextLineShowText,
    NextLineSpacingShowText,
    // type 3 glyphs
    GlyphWidth,
    GlyphWidthBBox,
    // color
    StrokeColorSpace,
    FillColorSpace,
    StrokeColor,
    StrokeColorN,
    FillColor,
    FillColorN,
    StrokeGray,
    FillGray,
    StrokeRgb,
    FillRgb,
    StrokeCmyk,
    FillCmyk,
    // shading, images, external objects
    Shade,
    BeginInlineImage,
    InlineImageData,
    EndInlineImage,
    XObject,
    // marked content
    MarkPoint,
    MarkPointProps,
    BeginMarked,
    BeginMarkedProps,
    EndMarked,
    // compatibility sections
    BeginCompat,
    EndCompat,
    /// Anything else; parsed and ignored.
    Unknown(Vec<u8>),
}

impl Op {
    pub fn from_bytes(name: &[u8]) -> Op {
        match name {
            b"q" => Op::Save,
            b"Q" => Op::Restore,
            b"cm" => Op::ConcatMatrix,
            b"w" => Op::LineWidth,
            b"J" => Op::LineCap,
            b"j" => Op::LineJoin,
            b"M" => Op::MiterLimit,
            b"d" => Op::Dash,
            b"ri" => Op::RenderingIntent,
            b"i" => Op::Flatness,
            b"gs" => Op::ExtGState,
            b"m" => Op::MoveTo,
            b"l" => Op::LineTo,
            b"c" => Op::CurveTo,
            b"v" => Op::CurveToV,
            b"y" => Op::CurveToY,
            b"h" => Op::ClosePath,
            b"re" => Op::Rectangle,
            b"S" => Op::Stroke,
            b"s" => Op::CloseStroke,
            b"f" => Op::Fill,
            b"F" => Op::FillObsolete,
            b"f*" => Op::FillEvenOdd,
            b"B" => Op::FillStroke,
            b"B*" => Op::FillStrokeEvenOdd,
            b"b" => Op::CloseFillStroke,
            b"b*" => Op::CloseFillStrokeEvenOdd,
            b"n" => Op::EndPath,
            b"W" => Op::Clip,
            b"W*" => Op::ClipEvenOdd,
            b"BT" => Op::BeginText,
            b"ET" => Op::EndText,
            b"Tc" => Op::CharSpacing,
            b"Tw" => Op::WordSpacing,
            b"Tz" => Op::HorizontalScaling,
            b"TL" => Op::Leading,
            b"Tf" => Op::Font,
            b"Tr" => Op::RenderMode,
            b"Ts" => Op::Rise,
            b"Td" => Op::MoveText,
            b"TD" => Op::MoveTextSetLeading,
            b"Tm" => Op::TextMatrix,
            b"T*" => Op::NextLine,
            b"Tj" => Op::ShowText,
            b"TJ" => Op::ShowTextArray,
            b"'" => Op::NextLineShowText,
            b"\"" => Op::NextLineSpacingShowText,
            b"d0" => Op::GlyphWidth,
            b"d1" => Op::GlyphWidthBBox,
            b"CS" => Op::StrokeColorSpace,
            b"cs" => Op::FillColorSpace,
            b"SC" => Op::StrokeColor,
            b"SCN" => Op::StrokeColorN,
            b"sc" => Op::FillColor,
            b"scn" => Op::FillColorN,
            b"G" => Op::StrokeGray,
            b"g" => Op::FillGray,
            b"RG" => Op::StrokeRgb,
            b"rg" => Op::FillRgb,
            b"K" => Op::StrokeCmyk,
            b"k" => Op::FillCmyk,
            b"sh" => Op::Shade,
            b"BI" => Op::BeginInlineImage,
            b"ID" => Op::InlineImageData,
            b"EI" => Op::EndInlineImage,
            b"Do" => Op::XObject,
            b"MP" => Op::MarkPoint,
            b"DP" => Op::MarkPointProps,
            b"BMC" => Op::BeginMarked,
            b"BDC" => Op::BeginMarkedProps,
            b"EMC" => Op::EndMarked,
            b"BX" => Op::BeginCompat,
            b"EX" => Op::EndCompat,
            other => Op::Unknown(other.to_vec()),
        }
    }

    /// The operator's mnemonic as written in a content stream.
    pub fn mnemonic(&self) -> &str {
        match self {
            Op::Save => "q",
            Op::Restore => "Q",
            Op::ConcatMatrix => "cm",
            Op::LineWidth => "w",
            Op::LineCap => "J",
            Op::LineJoin => "j",
            Op::MiterLimit => "M",
            Op::Dash => "d",
            Op::RenderingIntent => "ri",
            Op::Flatness => "i",
            Op::ExtGState => "gs",
            Op::MoveTo => "m",
            Op::LineTo => "l",
            Op::CurveTo => "c",
            Op::CurveToV => "v",
            Op::CurveToY => "y",
            Op::ClosePath => "h",
            Op::Rectangle => "re",
            Op::Stroke => "S",
            Op::CloseStroke => "s",
            Op::Fill => "f",
            Op::FillObsolete => "F",
            Op::FillEvenOdd => "f*",
            Op::FillStroke => "B",
            Op::FillStrokeEvenOdd => "B*",
            Op::CloseFillStroke => "b",
            Op::CloseFillStrokeEvenOdd => "b*",
            Op::EndPath => "n",
            Op::Clip => "W",
            Op::ClipEvenOdd => "W*",
            Op::BeginText => "BT",
            Op::EndText => "ET",
            Op::CharSpacing => "Tc",
            Op::WordSpacing => "Tw",
            Op::HorizontalScaling => "Tz",
            Op::Leading => "TL",
            Op::Font => "Tf",
            Op::RenderMode => "Tr",
            Op::Rise => "Ts",
            Op::MoveText => "Td",
            Op::MoveTextSetLeading => "TD",
            Op::TextMatrix => "Tm",
            Op::NextLine => "T*",
            Op::ShowText => "Tj",
            Op::ShowTextArray => "TJ",
            Op::NextLineShowText => "'",
            Op::NextLineSpacingShowText => "\"",
            Op::GlyphWidth => "d0",
            Op::GlyphWidthBBox => "d1",
            Op::StrokeColorSpace => "CS",
            Op::FillColorSpace => "cs",
            Op::StrokeColor => "SC",
            Op::StrokeColorN => "SCN",
            Op::FillColor => "sc",
            Op::FillColorN => "scn",
            Op::StrokeGray => "G",
            Op::FillGray => "g",
            Op::StrokeRgb => "RG",
            Op::FillRgb => "rg",
            Op::StrokeCmyk => "K",
            Op::FillCmyk => "k",
            Op::Shade => "sh",
            Op::BeginInlineImage => "BI",
            Op::InlineImageData => "ID",
            Op::EndInlineImage => "EI",
            Op::XObject => "Do",
            Op::MarkPoint => "MP",
            Op::MarkPointProps => "DP",
            Op::BeginMarked => "BMC",
            Op::BeginMarkedProps => "BDC",
            Op::EndMarked => "EMC",
            Op::BeginCompat => "BX",
            Op::EndCompat => "EX",
            Op::Unknown(_) => "?",
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Unknown(name) => f.write_str(&String::from_utf8_lossy(name)),
            known => f.write_str(known.mnemonic()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_operators_round_trip() {
        for name in [
            "q", "Q", "cm", "w", "J", "j", "M", "d", "ri", "i", "gs", "m", "l", "c", "v", "y",
            "h", "re", "S", "s", "f", "F", "f*", "B", "B*", "b", "b*", "n", "W", "W*", "BT", "ET",
            "Tc", "Tw", "Tz", "TL", "Tf", "Tr", "Ts", "Td", "TD", "Tm", "T*", "Tj", "TJ", "'",
            "\"", "d0", "d1", "CS", "cs", "SC", "SCN", "sc", "scn", "G", "g", "RG", "rg", "K",
            "k", "sh", "BI", "ID", "EI", "Do", "MP", "DP", "BMC", "BDC", "EMC", "BX", "EX",
        ] {
            let op = Op::from_bytes(name.as_bytes());
            assert!(!matches!(op, Op::Unknown(_)), "{name} not recognized");
            assert_eq!(op.to_string(), name);
        }
    }

    #[test]
    fn unknown_operator_keeps_name() {
        let op = Op::from_bytes(b"Tx");
        assert_eq!(op, Op::Unknown(b"Tx".to_vec()));
        assert_eq!(op.to_string(), "Tx");
    }
}
