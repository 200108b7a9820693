//! Decoder class descriptor: immutable metadata loaded once per decoder
//! class, shared by every instance of that class.

use indexmap::IndexMap;

/// A scalar option/channel value kind, used to validate option values
/// against their declared default without accepting a stray type.
#[derive(Debug, Clone, PartialEq)]
pub enum ScalarValue {
    Str(String),
    Int(i64),
    Float(f64),
}

impl ScalarValue {
    fn same_kind(&self, other: &ScalarValue) -> bool {
        std::mem::discriminant(self) == std::mem::discriminant(other)
    }
}

/// A required or optional channel a decoder class declares.
#[derive(Debug, Clone)]
pub struct ChannelDecl {
    pub id: String,
    pub name: String,
    /// Position within the class's required-then-optional channel list;
    /// this is also the index into `channelmap`/`old_pins`.
    pub order: usize,
}

/// A user-settable option a decoder class declares.
#[derive(Debug, Clone)]
pub struct OptionDecl {
    pub id: String,
    pub default: ScalarValue,
    pub allowed_values: Vec<ScalarValue>,
}

/// One entry in the annotation class table.
#[derive(Debug, Clone)]
pub struct AnnotationClass {
    pub id: String,
    pub name: String,
}

/// One entry in the annotation row table: a named grouping of annotation
/// class indices, used to resolve which UI row an annotation belongs on.
#[derive(Debug, Clone)]
pub struct AnnotationRow {
    pub id: String,
    pub name: String,
    pub classes: Vec<usize>,
}

#[derive(Debug, Clone)]
pub struct BinaryClass {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct LogicChannel {
    pub id: String,
    pub name: String,
}

/// Immutable metadata for one decoder class, loaded once and shared by
/// every instance constructed from it. On-disk discovery of these
/// descriptors from a module search path is a host responsibility and
/// out of scope here.
#[derive(Debug, Clone)]
pub struct DecoderClass {
    pub id: String,
    pub name: String,
    pub long_name: String,
    pub required_channels: Vec<ChannelDecl>,
    pub optional_channels: Vec<ChannelDecl>,
    pub options: IndexMap<String, OptionDecl>,
    pub annotation_classes: Vec<AnnotationClass>,
    pub annotation_rows: Vec<AnnotationRow>,
    pub binary_classes: Vec<BinaryClass>,
    pub logic_channels: Vec<LogicChannel>,
    pub input_streams: Vec<String>,
    pub output_streams: Vec<String>,
    /// Metadata carried straight through from the class descriptor,
    /// never interpreted by the engine; hosts commonly display these.
    pub api_version: u32,
    pub license: String,
}

impl DecoderClass {
    pub fn dec_num_channels(&self) -> usize {
        self.required_channels.len() + self.optional_channels.len()
    }

    /// Declared channel order: required channels first, then optional.
    pub fn channel_decl(&self, index: usize) -> Option<&ChannelDecl> {
        self.required_channels
            .get(index)
            .or_else(|| self.optional_channels.get(index - self.required_channels.len()))
    }

    pub fn channel_index_by_id(&self, id: &str) -> Option<usize> {
        self.required_channels
            .iter()
            .chain(self.optional_channels.iter())
            .position(|c| c.id == id)
    }
}

/// Checks a supplied value against an option's declared default kind.
pub fn value_matches_default_kind(default: &ScalarValue, value: &ScalarValue) -> bool {
    default.same_kind(value)
}
