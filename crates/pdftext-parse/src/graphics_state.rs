//! Graphics state and its save/restore stack.
//!
//! [`GraphicsState`] is a plain value: `q` pushes a full copy and `Q` swaps a
//! copy back in, so a saved snapshot can never observe later mutation of the
//! live state. Text matrices live in the same value.

use std::rc::Rc;

use pdftext_core::{Color, DashPattern, Dict, LineCap, LineJoin, Matrix, Name, Object};

use crate::decoder::FontResource;

/// Text rendering mode values (Tr operator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextRenderMode {
    #[default]
    Fill = 0,
    Stroke = 1,
    FillStroke = 2,
    Invisible = 3,
    FillClip = 4,
    StrokeClip = 5,
    FillStrokeClip = 6,
    Clip = 7,
}

impl TextRenderMode {
    /// Returns `None` for values outside 0..=7.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::Fill),
            1 => Some(Self::Stroke),
            2 => Some(Self::FillStroke),
            3 => Some(Self::Invisible),
            4 => Some(Self::FillClip),
            5 => Some(Self::StrokeClip),
            6 => Some(Self::FillStrokeClip),
            7 => Some(Self::Clip),
            _ => None,
        }
    }
}

/// Drawing parameters in force at a point in the content stream.
#[derive(Debug, Clone, PartialEq)]
pub struct GraphicsState {
    pub ctm: Matrix,
    pub line_width: f64,
    pub line_cap: LineCap,
    pub line_join: LineJoin,
    pub miter_limit: f64,
    pub dash: DashPattern,
    pub stroke_color_space: Name,
    pub fill_color_space: Name,
    pub stroke_color: Color,
    pub fill_color: Color,
    pub stroke_alpha: f64,
    pub fill_alpha: f64,
    pub text_matrix: Matrix,
    pub text_line_matrix: Matrix,
    pub char_spacing: f64,
    pub word_spacing: f64,
    /// Percentage, 100 = normal.
    pub horizontal_scaling: f64,
    pub leading: f64,
    pub rise: f64,
    pub render_mode: TextRenderMode,
    pub font: Option<Rc<FontResource>>,
    pub font_size: f64,
}

impl Default for GraphicsState {
    fn default() -> Self {
        Self {
            ctm: Matrix::identity(),
            line_width: 1.0,
            line_cap: LineCap::default(),
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            dash: DashPattern::solid(),
            stroke_color_space: Name::from("DeviceGray"),
            fill_color_space: Name::from("DeviceGray"),
            stroke_color: Color::black(),
            fill_color: Color::black(),
            stroke_alpha: 1.0,
            fill_alpha: 1.0,
            text_matrix: Matrix::identity(),
            text_line_matrix: Matrix::identity(),
            char_spacing: 0.0,
            word_spacing: 0.0,
            horizontal_scaling: 100.0,
            leading: 0.0,
            rise: 0.0,
            render_mode: TextRenderMode::default(),
            font: None,
            font_size: 0.0,
        }
    }
}

/// Initial color of a device color space, `None` for other spaces.
fn initial_color(space: &Name) -> Option<Color> {
    match space.as_bytes() {
        b"DeviceGray" | b"G" => Some(Color::Gray(0.0)),
        b"DeviceRGB" | b"RGB" => Some(Color::Rgb(0.0, 0.0, 0.0)),
        b"DeviceCMYK" | b"CMYK" => Some(Color::Cmyk(0.0, 0.0, 0.0, 1.0)),
        _ => None,
    }
}

impl GraphicsState {
    // --- cm ---

    /// `cm`: pre-multiply the CTM, `CTM' = M × CTM`.
    pub fn concat_matrix(&mut self, m: Matrix) {
        self.ctm = m.concat(&self.ctm);
    }

    // --- text objects and positioning ---

    /// `BT`: reset both text matrices to identity.
    pub fn begin_text(&mut self) {
        self.text_matrix = Matrix::identity();
        self.text_line_matrix = Matrix::identity();
    }

    /// `Tm`: replace both text matrices.
    pub fn set_text_matrix(&mut self, m: Matrix) {
        self.text_matrix = m;
        self.text_line_matrix = m;
    }

    /// `Td`: translate the line matrix and start the line there.
    pub fn move_text_position(&mut self, tx: f64, ty: f64) {
        self.text_line_matrix = Matrix::translation(tx, ty).concat(&self.text_line_matrix);
        self.text_matrix = self.text_line_matrix;
    }

    /// `TD`: `-ty TL` followed by `tx ty Td`.
    pub fn move_text_position_and_set_leading(&mut self, tx: f64, ty: f64) {
        self.leading = -ty;
        self.move_text_position(tx, ty);
    }

    /// `T*`: `0 -TL Td`.
    pub fn move_to_next_line(&mut self) {
        let leading = self.leading;
        self.move_text_position(0.0, -leading);
    }

    // --- text state ---

    /// `Tf`.
    pub fn set_font(&mut self, font: Option<Rc<FontResource>>, size: f64) {
        self.font = font;
        self.font_size = size;
    }

    // --- color ---

    /// `CS`: select the stroking color space.
    pub fn set_stroke_color_space(&mut self, space: Name) {
        if let Some(color) = initial_color(&space) {
            self.stroke_color = color;
        }
        self.stroke_color_space = space;
    }

    /// `cs`: select the non-stroking color space.
    pub fn set_fill_color_space(&mut self, space: Name) {
        if let Some(color) = initial_color(&space) {
            self.fill_color = color;
        }
        self.fill_color_space = space;
    }

    /// `G`.
    pub fn set_stroke_gray(&mut self, g: f64) {
        self.stroke_color_space = Name::from("DeviceGray");
        self.stroke_color = Color::Gray(g);
    }

    /// `g`.
    pub fn set_fill_gray(&mut self, g: f64) {
        self.fill_color_space = Name::from("DeviceGray");
        self.fill_color = Color::Gray(g);
    }

    /// `RG`.
    pub fn set_stroke_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.stroke_color_space = Name::from("DeviceRGB");
        self.stroke_color = Color::Rgb(r, g, b);
    }

    /// `rg`.
    pub fn set_fill_rgb(&mut self, r: f64, g: f64, b: f64) {
        self.fill_color_space = Name::from("DeviceRGB");
        self.fill_color = Color::Rgb(r, g, b);
    }

    /// `K`.
    pub fn set_stroke_cmyk(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.stroke_color_space = Name::from("DeviceCMYK");
        self.stroke_color = Color::Cmyk(c, m, y, k);
    }

    /// `k`.
    pub fn set_fill_cmyk(&mut self, c: f64, m: f64, y: f64, k: f64) {
        self.fill_color_space = Name::from("DeviceCMYK");
        self.fill_color = Color::Cmyk(c, m, y, k);
    }

    // --- gs ---

    /// Merge the parameters an ExtGState dictionary carries.
    ///
    /// Only `LW`, `LC`, `LJ`, `ML`, `D`, `CA` and `ca` are read here; the
    /// `Font` entry needs resource resolution and is applied by the
    /// interpreter. Entries with the wrong type are skipped.
    pub fn apply_ext_gstate(&mut self, ext: &Dict) {
        if let Some(v) = ext.get("LW").and_then(Object::as_f64) {
            self.line_width = v;
        }
        if let Some(cap) = ext.get("LC").and_then(Object::as_i64).and_then(LineCap::from_i64) {
            self.line_cap = cap;
        }
        if let Some(join) = ext
            .get("LJ")
            .and_then(Object::as_i64)
            .and_then(LineJoin::from_i64)
        {
            self.line_join = join;
        }
        if let Some(v) = ext.get("ML").and_then(Object::as_f64) {
            self.miter_limit = v;
        }
        if let Some(dash) = ext.get("D").and_then(parse_dash_entry) {
            self.dash = dash;
        }
        if let Some(v) = ext.get("CA").and_then(Object::as_f64) {
            self.stroke_alpha = v;
        }
        if let Some(v) = ext.get("ca").and_then(Object::as_f64) {
            self.fill_alpha = v;
        }
    }
}

/// Dash pattern from `[dash_array phase]` as used by ExtGState `D`.
fn parse_dash_entry(obj: &Object) -> Option<DashPattern> {
    match obj.as_array()? {
        [array, phase] => parse_dash(array, phase),
        _ => None,
    }
}

/// Dash pattern from the two operands of `d`.
pub fn parse_dash(array: &Object, phase: &Object) -> Option<DashPattern> {
    let lengths = array
        .as_array()?
        .iter()
        .map(Object::as_f64)
        .collect::<Option<Vec<f64>>>()?;
    Some(DashPattern::new(lengths, phase.as_f64()?))
}

/// Current state plus the snapshots saved by `q`.
#[derive(Debug, Clone, Default)]
pub struct GraphicsStateStack {
    current: GraphicsState,
    saved: Vec<GraphicsState>,
}

impl GraphicsStateStack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> &GraphicsState {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut GraphicsState {
        &mut self.current
    }

    /// Number of saved states.
    pub fn depth(&self) -> usize {
        self.saved.len()
    }

    /// `q`: save a copy of the current state.
    pub fn save(&mut self) {
        self.saved.push(self.current.clone());
    }

    /// `Q`: restore the most recently saved state.
    ///
    /// Returns `false` and leaves the state alone if nothing was saved.
    pub fn restore(&mut self) -> bool {
        match self.saved.pop() {
            Some(state) => {
                self.current = state;
                true
            }
            None => false,
        }
    }
}
