//! Output Dispatch: the typed routing of decoder outputs. This module
//! owns the value types and the pure resolution logic (row lookup,
//! dedup-on-register, repeat-count/empty-payload checks); actually
//! crossing a thread boundary to invoke a registered callback or a
//! stacked child's `decode()` is `decode_host`'s job.

use crate::descriptor::DecoderClass;
use crate::error::{EngineError, EngineResult};
use std::sync::Arc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OutputKind {
    Annotation,
    Passthrough,
    Binary,
    Logic,
    Metadata,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaType {
    Int,
    Double,
}

/// Metadata-only registration detail, compared for registration dedup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaDecl {
    pub meta_type: MetaType,
    pub name: String,
    pub descr: String,
}

/// One entry in an instance's output registration list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputRegistration {
    pub id: usize,
    pub kind: OutputKind,
    pub proto_id: String,
    pub meta: Option<MetaDecl>,
}

/// Registers an output, or returns the id of an already-identical
/// registration. "Identical" means same `(kind, proto_id)` and, for
/// metadata outputs, the same `MetaDecl` — restored from
/// `Decoder_register()`'s dedup scan, since nothing is ever removed from
/// this list.
pub fn register_output(
    outputs: &mut Vec<OutputRegistration>,
    kind: OutputKind,
    proto_id: String,
    meta: Option<MetaDecl>,
) -> usize {
    if let Some(existing) = outputs
        .iter()
        .find(|o| o.kind == kind && o.proto_id == proto_id && o.meta == meta)
    {
        return existing.id;
    }
    let id = outputs.len();
    outputs.push(OutputRegistration { id, kind, proto_id, meta });
    id
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MetaValue {
    Int(i64),
    Double(f64),
}

/// The payload a hosted decoder passes to `put()`, already shaped by
/// output kind.
#[derive(Clone)]
pub enum Payload {
    Annotation { class_index: usize, texts: Vec<String> },
    /// Opaque data forwarded verbatim to stacked children's `decode()`.
    Passthrough(Arc<dyn std::any::Any + Send + Sync>),
    Binary { class_index: usize, bytes: Arc<[u8]> },
    Logic { group_index: usize, bytes: Arc<[u8]> },
    Metadata(MetaValue),
}

/// A single dispatched event, uniform across output kinds: start, end,
/// the output id that produced it, the kind-specific payload, and the
/// resolved annotation row (`-1` for every non-`Annotation` payload, or
/// for an annotation class that belongs to no row).
#[derive(Clone)]
pub struct OutputEvent {
    pub start: u64,
    pub end: u64,
    pub output_id: usize,
    pub payload: Payload,
    pub row: i64,
}

/// Resolves the annotation row for `class_index` by linear search through
/// the decoder class's annotation row table, returning the first row
/// containing it, or `-1` if none does.
pub fn resolve_annotation_row(class: &DecoderClass, class_index: usize) -> i64 {
    class
        .annotation_rows
        .iter()
        .position(|row| row.classes.contains(&class_index))
        .map(|i| i as i64)
        .unwrap_or(-1)
}

/// Computes the repeat count for a synthesized-logic event. A
/// non-positive span (`end <= start`) is a dropped event, not an error:
/// the caller should log and discard rather than raise.
pub fn logic_repeat_count(inst_id: &str, start: u64, end: u64) -> Option<u64> {
    if end <= start {
        log::error!(
            "instance '{inst_id}': logic output end_sample ({end}) <= start_sample ({start}), dropping event"
        );
        return None;
    }
    Some(end - start - 1)
}

pub fn validate_binary_payload(bytes: &[u8]) -> EngineResult<()> {
    if bytes.is_empty() {
        return Err(EngineError::BadArgument(
            "binary output payload must not be empty".into(),
        ));
    }
    Ok(())
}

pub fn validate_metadata_payload(declared: MetaType, value: &MetaValue) -> EngineResult<()> {
    match (declared, value) {
        (MetaType::Int, MetaValue::Int(_)) | (MetaType::Double, MetaValue::Double(_)) => Ok(()),
        _ => Err(EngineError::BadArgument(
            "metadata output payload type disagrees with declared meta type".into(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{AnnotationRow, ChannelDecl};
    use indexmap::IndexMap;

    fn class_with_rows() -> DecoderClass {
        DecoderClass {
            id: "x".into(),
            name: "x".into(),
            long_name: "X".into(),
            required_channels: vec![ChannelDecl { id: "a".into(), name: "A".into(), order: 0 }],
            optional_channels: vec![],
            options: IndexMap::new(),
            annotation_classes: vec![],
            annotation_rows: vec![
                AnnotationRow { id: "row0".into(), name: "Row0".into(), classes: vec![0, 1] },
                AnnotationRow { id: "row1".into(), name: "Row1".into(), classes: vec![2] },
            ],
            binary_classes: vec![],
            logic_channels: vec![],
            input_streams: vec![],
            output_streams: vec![],
            api_version: 1,
            license: "MIT".into(),
        }
    }

    #[test]
    fn annotation_row_resolves_first_matching_row() {
        let class = class_with_rows();
        assert_eq!(resolve_annotation_row(&class, 1), 0);
        assert_eq!(resolve_annotation_row(&class, 2), 1);
        assert_eq!(resolve_annotation_row(&class, 99), -1);
    }

    #[test]
    fn register_dedups_identical_entries() {
        let mut outputs = Vec::new();
        let id0 = register_output(&mut outputs, OutputKind::Annotation, "proto".into(), None);
        let id1 = register_output(&mut outputs, OutputKind::Annotation, "proto".into(), None);
        assert_eq!(id0, id1);
        assert_eq!(outputs.len(), 1);

        let id2 = register_output(&mut outputs, OutputKind::Binary, "proto".into(), None);
        assert_ne!(id0, id2);
    }

    #[test]
    fn logic_repeat_count_drops_non_positive_span() {
        assert_eq!(logic_repeat_count("i0", 5, 5), None);
        assert_eq!(logic_repeat_count("i0", 5, 6), Some(0));
        assert_eq!(logic_repeat_count("i0", 5, 9), Some(3));
    }

    #[test]
    fn binary_payload_rejects_empty() {
        assert!(validate_binary_payload(&[]).is_err());
        assert!(validate_binary_payload(&[1]).is_ok());
    }
}
