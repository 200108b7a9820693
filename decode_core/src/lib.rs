//! # `decode_core`
//!
//! `decode_core` holds the pure, single-threaded compute and state of a
//! stacked sample-driven protocol-decoder engine: packed bit buffers,
//! condition matching, the match scanner's skip-min fast-forward, decoder
//! class descriptors, instance state (channel map, old pins, condition
//! list), and output dispatch value types. None of it touches a thread,
//! a socket, or a callback — that ambient machinery, along with the
//! native `Decoder` trait hosted decoders implement, lives in
//! `decode_host`, which drives this crate's types across a stack worker.
//!
//! # Navigating the crate
//!
//! ### [`instance`] and [`scanner`]: where most callers start
//!
//! A [`instance::DecoderInstanceState`] is the mutable embodiment of a
//! [`descriptor::DecoderClass`] — its channel map, options, and the
//! condition list a hosted decoder is currently waiting on. Pushing a
//! chunk of samples through it is [`scanner::scan`]'s job: it advances
//! the instance's cursor one sample at a time (or fast-forwards whole
//! runs when every pending condition is skip-only or constant-valued)
//! until a condition matches or the chunk runs out.
//!
//! ### [`condition`]: term-level predicates
//!
//! A condition is a conjunction of [`condition::Term`]s — level, edge,
//! skip, or the never-matching coercion target for an invalid term. The
//! scanner owns the cross-condition bookkeeping (skip-min, disjunction);
//! this module only knows how to evaluate one term against one sample.
//!
//! ### [`sample`]: bit-level storage
//!
//! [`sample::SampleChunk`] packs each channel's samples into either a
//! little-endian bit buffer or a broadcast constant, and
//! [`sample::sample_bit`] is the one place that does the bit arithmetic.
//!
//! ### [`descriptor`] and [`output`]: static metadata and typed results
//!
//! [`descriptor::DecoderClass`] is the immutable per-class metadata
//! (channels, options, annotation/binary/logic declarations) every
//! instance is built from. [`output`] defines the typed events a hosted
//! decoder emits through `put()` and the pure resolution logic
//! (annotation row lookup, registration dedup, repeat-count checks)
//! behind dispatching them.
//!
//! ### [`error`]: the stable taxonomy
//!
//! [`error::EngineError`] is the small, closed error enum every fallible
//! operation in this crate returns; [`error::DecodeOutcome`] separates
//! ordinary end-of-stream/termination control flow from it.

pub mod condition;
pub mod descriptor;
pub mod error;
pub mod instance;
pub mod output;
pub mod sample;
pub mod scanner;

pub use condition::{term_matches, term_matches_skip, Condition, Term, TermKind};
pub use descriptor::{
    AnnotationClass, AnnotationRow, BinaryClass, ChannelDecl, DecoderClass, LogicChannel,
    OptionDecl, ScalarValue,
};
pub use error::{DecodeOutcome, EngineError, EngineResult};
pub use instance::{DecoderInstanceState, InitialPin, OldPin, UNMAPPED};
pub use output::{
    logic_repeat_count, register_output, resolve_annotation_row, validate_binary_payload,
    validate_metadata_payload, MetaDecl, MetaType, MetaValue, OutputEvent, OutputKind,
    OutputRegistration, Payload,
};
pub use sample::{is_constant, sample_bit, ChannelData, SampleChunk};
