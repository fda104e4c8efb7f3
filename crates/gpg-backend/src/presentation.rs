//! The process-wide "current presentation" record (`spec.md` §3
//! "Presentation stack"): colours, line style, fill, font, and text
//! layout state that directives mutate and back ends consult when
//! emitting a graphic.

#[derive(Debug, Clone, PartialEq)]
pub struct Presentation {
    pub outline_colour: String,
    pub fill_colour: String,
    pub interior_fill_colour: String,
    pub line_width: f64,
    pub line_style: String,
    pub font: String,
    pub italics: bool,
    pub weight: String,
    pub char_space: f64,
    pub word_space: f64,
    pub line_space: f64,
    pub justify: Justify,
    pub text_size: f64,
    pub outline_first: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Justify {
    #[default]
    Left,
    Centre,
    Right,
}

impl Default for Presentation {
    fn default() -> Self {
        Self {
            outline_colour: "black".into(),
            fill_colour: "none".into(),
            interior_fill_colour: "none".into(),
            line_width: 1.0,
            line_style: "solid".into(),
            font: "helvetica".into(),
            italics: false,
            weight: "normal".into(),
            char_space: 0.0,
            word_space: 0.0,
            line_space: 0.0,
            justify: Justify::Left,
            text_size: 10.0,
            outline_first: true,
        }
    }
}

impl Presentation {
    /// Applies one `key=value` presentation override (as parsed from a
    /// directive's local kv list), ignoring keys it doesn't recognise —
    /// those are either backend-specific or ordinary directive
    /// parameters handled elsewhere.
    pub fn apply_override(&mut self, key: &str, value: &str) {
        match key {
            "outline" => self.outline_colour = value.to_string(),
            "fill" => self.fill_colour = value.to_string(),
            "interior_fill" => self.interior_fill_colour = value.to_string(),
            "line_width" => {
                if let Ok(w) = value.parse() {
                    self.line_width = w;
                }
            }
            "line_style" => self.line_style = value.to_string(),
            "font" => self.font = value.to_string(),
            "italics" => self.italics = value == "true" || value == "1",
            "weight" => self.weight = value.to_string(),
            "char_space" => {
                if let Ok(v) = value.parse() {
                    self.char_space = v;
                }
            }
            "justify" => {
                self.justify = match value {
                    "centre" | "center" => Justify::Centre,
                    "right" => Justify::Right,
                    _ => Justify::Left,
                }
            }
            "text_size" => {
                if let Ok(v) = value.parse() {
                    self.text_size = v;
                }
            }
            "outline_first" => self.outline_first = value == "true" || value == "1",
            _ => {}
        }
    }
}
