//! The BlockFormat type - the immutable shape of a block.
//!
//! A format describes which lines a block has, what each line holds and
//! which value types the block produces and accepts. Instances in the tree
//! hold an `Arc<BlockFormat>`, so a format outlives any catalog refresh that
//! replaces it.

use std::fmt;

/// The type of value a block produces or accepts.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ValueType {
    #[default]
    None,
    Bool,
    Num,
    Text,
}

impl ValueType {
    /// Parse a wire name (`"NUM"`, `"text"`, ...).
    ///
    /// Unknown names degrade to `ValueType::None` rather than failing.
    pub fn parse_lenient(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "BOOL" => ValueType::Bool,
            "NUM" => ValueType::Num,
            "TEXT" => ValueType::Text,
            _ => ValueType::None,
        }
    }

    /// The wire name, or `None` for `ValueType::None`.
    pub fn wire_name(&self) -> Option<&'static str> {
        match self {
            ValueType::None => None,
            ValueType::Bool => Some("BOOL"),
            ValueType::Num => Some("NUM"),
            ValueType::Text => Some("TEXT"),
        }
    }
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.wire_name().unwrap_or("NONE"))
    }
}

/// Directional type tag on a child slot.
///
/// `*In` slots read a value from the nested block, `*Out` slots write into
/// it. `None` accepts any block.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum IoKind {
    NumIn,
    NumOut,
    TextIn,
    TextOut,
    BoolIn,
    BoolOut,
    #[default]
    None,
}

impl IoKind {
    /// Parse a wire name (`"NUM_IN"`, `"text_out"`, ...), degrading to `None`.
    pub fn parse_lenient(name: &str) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "NUM_IN" => IoKind::NumIn,
            "NUM_OUT" => IoKind::NumOut,
            "TEXT_IN" => IoKind::TextIn,
            "TEXT_OUT" => IoKind::TextOut,
            "BOOL_IN" => IoKind::BoolIn,
            "BOOL_OUT" => IoKind::BoolOut,
            _ => IoKind::None,
        }
    }

    pub fn wire_name(&self) -> &'static str {
        match self {
            IoKind::NumIn => "NUM_IN",
            IoKind::NumOut => "NUM_OUT",
            IoKind::TextIn => "TEXT_IN",
            IoKind::TextOut => "TEXT_OUT",
            IoKind::BoolIn => "BOOL_IN",
            IoKind::BoolOut => "BOOL_OUT",
            IoKind::None => "NONE",
        }
    }

    /// The literal value type a user may type into this slot.
    ///
    /// Only input slots take literals; everything else reports `None`.
    pub fn accepted_type(&self) -> ValueType {
        match self {
            IoKind::NumIn => ValueType::Num,
            IoKind::TextIn => ValueType::Text,
            IoKind::BoolIn => ValueType::Bool,
            _ => ValueType::None,
        }
    }

    pub fn is_input(&self) -> bool {
        matches!(self, IoKind::NumIn | IoKind::TextIn | IoKind::BoolIn)
    }

    pub fn is_output(&self) -> bool {
        matches!(self, IoKind::NumOut | IoKind::TextOut | IoKind::BoolOut)
    }

    /// Whether a block of format `candidate` may be placed in this slot.
    ///
    /// Input slots look at what the candidate produces, with `TextIn`
    /// widening to numbers and booleans. Output slots look at what the
    /// candidate accepts, with `NumOut`/`BoolOut` also taking text sinks.
    pub fn accepts(&self, candidate: &BlockFormat) -> bool {
        match self {
            IoKind::BoolIn => candidate.produces == ValueType::Bool,
            IoKind::NumIn => candidate.produces == ValueType::Num,
            IoKind::TextIn => matches!(
                candidate.produces,
                ValueType::Text | ValueType::Num | ValueType::Bool
            ),
            IoKind::BoolOut => matches!(candidate.accepts, ValueType::Bool | ValueType::Text),
            IoKind::NumOut => matches!(candidate.accepts, ValueType::Num | ValueType::Text),
            IoKind::TextOut => candidate.accepts == ValueType::Text,
            IoKind::None => true,
        }
    }
}

impl fmt::Display for IoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.wire_name())
    }
}

/// One fixed position in a line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Slot {
    /// Decorative text, possibly a `@key` translation marker.
    Text(String),
    /// A field holding a literal or a nested block.
    Child(IoKind),
}

impl Slot {
    pub fn is_child(&self) -> bool {
        matches!(self, Slot::Child(_))
    }

    /// The io kind of a child slot, `None` for text.
    pub fn io_kind(&self) -> Option<IoKind> {
        match self {
            Slot::Child(kind) => Some(*kind),
            Slot::Text(_) => None,
        }
    }
}

/// A line of a format.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Line {
    /// A non-empty row of slots.
    Columns(Vec<Slot>),
    /// A stack of child blocks.
    Stack,
}

impl Line {
    /// A line is a stack iff it declares zero columns.
    pub fn from_slots(slots: Vec<Slot>) -> Self {
        if slots.is_empty() {
            Line::Stack
        } else {
            Line::Columns(slots)
        }
    }

    pub fn is_stack(&self) -> bool {
        matches!(self, Line::Stack)
    }

    pub fn slots(&self) -> &[Slot] {
        match self {
            Line::Columns(slots) => slots,
            Line::Stack => &[],
        }
    }
}

/// Documentation for one parameter of a format.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParameterDoc {
    pub kind: String,
    pub description: String,
}

/// The immutable definition of a block.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlockFormat {
    pub id: String,
    /// Display name, possibly a `@key` marker. Defaults to the id.
    pub name: String,
    pub category: usize,
    pub produces: ValueType,
    pub accepts: ValueType,
    pub lines: Vec<Line>,
    pub description: String,
    pub return_description: String,
    pub notes: String,
    pub parameter_docs: Option<Vec<ParameterDoc>>,
    /// Excluded from insertable listings but still resolvable by id.
    pub deprecated: bool,
}

impl BlockFormat {
    /// Create a format with the given lines and no documentation.
    pub fn new(id: impl Into<String>, category: usize, lines: Vec<Line>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            category,
            produces: ValueType::None,
            accepts: ValueType::None,
            lines,
            description: String::new(),
            return_description: String::new(),
            notes: String::new(),
            parameter_docs: None,
            deprecated: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn producing(mut self, produces: ValueType) -> Self {
        self.produces = produces;
        self
    }

    pub fn accepting(mut self, accepts: ValueType) -> Self {
        self.accepts = accepts;
        self
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Number of columns in a line; 0 for stack lines and out-of-range lines.
    pub fn column_count(&self, line: usize) -> usize {
        self.lines.get(line).map_or(0, |l| l.slots().len())
    }

    pub fn slot(&self, line: usize, column: usize) -> Option<&Slot> {
        self.lines.get(line)?.slots().get(column)
    }

    /// Whether the last line is a stack, which closes the block visually.
    pub fn ends_with_stack(&self) -> bool {
        self.lines.last().is_some_and(Line::is_stack)
    }

    pub fn stack_count(&self) -> usize {
        self.lines.iter().filter(|l| l.is_stack()).count()
    }

    /// Number of child columns over all lines, i.e. the serialized param count.
    pub fn param_count(&self) -> usize {
        self.lines
            .iter()
            .map(|l| l.slots().iter().filter(|s| s.is_child()).count())
            .sum()
    }

    pub fn has_info(&self) -> bool {
        self.parameter_docs.as_ref().is_some_and(|d| !d.is_empty())
            || !self.description.is_empty()
            || !self.return_description.is_empty()
            || !self.notes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn producing(produces: ValueType) -> BlockFormat {
        BlockFormat::new("p", 0, vec![]).producing(produces)
    }

    fn accepting(accepts: ValueType) -> BlockFormat {
        BlockFormat::new("a", 0, vec![]).accepting(accepts)
    }

    const ALL_TYPES: [ValueType; 4] = [
        ValueType::None,
        ValueType::Bool,
        ValueType::Num,
        ValueType::Text,
    ];

    #[test]
    fn num_in_accepts_only_num_producers() {
        for t in ALL_TYPES {
            assert_eq!(IoKind::NumIn.accepts(&producing(t)), t == ValueType::Num);
        }
    }

    #[test]
    fn bool_in_accepts_only_bool_producers() {
        for t in ALL_TYPES {
            assert_eq!(IoKind::BoolIn.accepts(&producing(t)), t == ValueType::Bool);
        }
    }

    #[test]
    fn text_in_widens_to_any_value() {
        for t in ALL_TYPES {
            assert_eq!(IoKind::TextIn.accepts(&producing(t)), t != ValueType::None);
        }
    }

    #[test]
    fn text_out_requires_text_sink() {
        for t in ALL_TYPES {
            assert_eq!(IoKind::TextOut.accepts(&accepting(t)), t == ValueType::Text);
        }
    }

    #[test]
    fn num_and_bool_out_take_text_sinks_too() {
        assert!(IoKind::NumOut.accepts(&accepting(ValueType::Num)));
        assert!(IoKind::NumOut.accepts(&accepting(ValueType::Text)));
        assert!(!IoKind::NumOut.accepts(&accepting(ValueType::Bool)));
        assert!(IoKind::BoolOut.accepts(&accepting(ValueType::Bool)));
        assert!(IoKind::BoolOut.accepts(&accepting(ValueType::Text)));
        assert!(!IoKind::BoolOut.accepts(&accepting(ValueType::Num)));
    }

    #[test]
    fn output_slots_ignore_produced_type() {
        let f = producing(ValueType::Num);
        assert!(!IoKind::NumOut.accepts(&f));
    }

    #[test]
    fn none_accepts_anything() {
        assert!(IoKind::None.accepts(&producing(ValueType::None)));
        assert!(IoKind::None.accepts(&accepting(ValueType::Num)));
    }

    #[test]
    fn lenient_parsing_degrades_to_none() {
        assert_eq!(ValueType::parse_lenient("num"), ValueType::Num);
        assert_eq!(ValueType::parse_lenient("STRING"), ValueType::None);
        assert_eq!(IoKind::parse_lenient("text_in"), IoKind::TextIn);
        assert_eq!(IoKind::parse_lenient("sideways"), IoKind::None);
    }

    #[test]
    fn accepted_type_only_for_inputs() {
        assert_eq!(IoKind::NumIn.accepted_type(), ValueType::Num);
        assert_eq!(IoKind::NumOut.accepted_type(), ValueType::None);
        assert!(IoKind::BoolIn.is_input());
        assert!(IoKind::BoolOut.is_output());
        assert!(!IoKind::None.is_input() && !IoKind::None.is_output());
    }

    #[test]
    fn shape_queries() {
        let format = BlockFormat::new(
            "if",
            1,
            vec![
                Line::from_slots(vec![
                    Slot::Text("if".to_string()),
                    Slot::Child(IoKind::BoolIn),
                ]),
                Line::from_slots(vec![]),
            ],
        );

        assert_eq!(format.line_count(), 2);
        assert_eq!(format.column_count(0), 2);
        assert_eq!(format.column_count(1), 0);
        assert_eq!(format.column_count(7), 0);
        assert!(format.ends_with_stack());
        assert_eq!(format.stack_count(), 1);
        assert_eq!(format.param_count(), 1);
        assert_eq!(format.slot(0, 1), Some(&Slot::Child(IoKind::BoolIn)));
        assert_eq!(format.name, "if");
        assert!(!format.has_info());
    }
}
