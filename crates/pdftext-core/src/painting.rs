//! Stroke and fill parameters carried by the graphics state.
//!
//! Colors are kept as raw component values in whatever space the content
//! stream selected; no conversion between color spaces is attempted.

/// A color value as set by the G/g, RG/rg, K/k and SC/SCN/sc/scn operators.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Color {
    /// DeviceGray level in [0.0, 1.0].
    Gray(f64),
    /// DeviceRGB components.
    Rgb(f64, f64, f64),
    /// DeviceCMYK components.
    Cmyk(f64, f64, f64, f64),
    /// Components in any other color space (Indexed, ICCBased, Separation...).
    Other(Vec<f64>),
}

impl Color {
    /// Black in DeviceGray, the initial color for both stroke and fill.
    pub fn black() -> Self {
        Color::Gray(0.0)
    }

    /// Build a color from a component list, picking the device variant by
    /// component count.
    pub fn from_components(components: &[f64]) -> Self {
        match *components {
            [g] => Color::Gray(g),
            [r, g, b] => Color::Rgb(r, g, b),
            [c, m, y, k] => Color::Cmyk(c, m, y, k),
            _ => Color::Other(components.to_vec()),
        }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::black()
    }
}

/// Dash pattern set by the `d` operator or an ExtGState `D` entry.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DashPattern {
    /// Alternating dash and gap lengths. Empty means a solid line.
    pub dash_array: Vec<f64>,
    pub dash_phase: f64,
}

impl DashPattern {
    pub fn new(dash_array: Vec<f64>, dash_phase: f64) -> Self {
        Self {
            dash_array,
            dash_phase,
        }
    }

    pub fn solid() -> Self {
        Self::default()
    }
}

/// Line cap style (`J` operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineCap {
    #[default]
    Butt,
    Round,
    ProjectingSquare,
}

impl LineCap {
    /// Returns `None` for values outside 0..=2.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Butt),
            1 => Some(Self::Round),
            2 => Some(Self::ProjectingSquare),
            _ => None,
        }
    }
}

/// Line join style (`j` operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LineJoin {
    #[default]
    Miter,
    Round,
    Bevel,
}

impl LineJoin {
    /// Returns `None` for values outside 0..=2.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Miter),
            1 => Some(Self::Round),
            2 => Some(Self::Bevel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_color_is_black_gray() {
        assert_eq!(Color::default(), Color::Gray(0.0));
    }

    #[test]
    fn color_from_components_picks_variant() {
        assert_eq!(Color::from_components(&[0.5]), Color::Gray(0.5));
        assert_eq!(
            Color::from_components(&[1.0, 0.0, 0.0]),
            Color::Rgb(1.0, 0.0, 0.0)
        );
        assert_eq!(
            Color::from_components(&[0.0, 0.0, 0.0, 1.0]),
            Color::Cmyk(0.0, 0.0, 0.0, 1.0)
        );
        assert_eq!(
            Color::from_components(&[0.1, 0.2]),
            Color::Other(vec![0.1, 0.2])
        );
        assert_eq!(Color::from_components(&[]), Color::Other(vec![]));
    }

    #[test]
    fn dash_pattern_solid() {
        assert!(DashPattern::solid().dash_array.is_empty());
        assert_eq!(DashPattern::solid(), DashPattern::default());
    }

    #[test]
    fn line_cap_and_join_ranges() {
        assert_eq!(LineCap::from_i64(1), Some(LineCap::Round));
        assert_eq!(LineCap::from_i64(3), None);
        assert_eq!(LineJoin::from_i64(2), Some(LineJoin::Bevel));
        assert_eq!(LineJoin::from_i64(-1), None);
    }
}
