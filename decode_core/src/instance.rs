//! Decoder Instance: the mutable runtime embodiment of a [`DecoderClass`]
//! inside a session — channel map, old-pin snapshot, condition list,
//! match array, output registrations, and stack links. Construction and
//! the option/channel binder live here; the stack-worker rendezvous that
//! drives samples through an instance lives in `decode_host`.

use indexmap::IndexMap;

use crate::condition::Condition;
use crate::descriptor::{value_matches_default_kind, DecoderClass, ScalarValue};
use crate::error::{EngineError, EngineResult};
use crate::output::OutputRegistration;

/// Sentinel stored in `channelmap` for an unused optional channel.
pub const UNMAPPED: i64 = -1;

/// The value of a declared channel at the sample immediately preceding
/// `abs_cur`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OldPin {
    /// Not seeded yet; resolved to the value at sample 0 the first time
    /// the scanner runs its initial seed.
    SameAsSample0,
    Value(bool),
}

/// Input value accepted by [`DecoderInstanceState::set_initial_pins`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitialPin {
    Low,
    High,
    SameAsSample0,
}

pub struct DecoderInstanceState {
    pub inst_id: String,
    pub dec_num_channels: usize,
    pub channelmap: Vec<i64>,
    pub old_pins: Vec<OldPin>,
    pub options: IndexMap<String, ScalarValue>,
    pub condition_list: Vec<Option<Condition>>,
    pub match_array: Vec<bool>,
    pub abs_start: u64,
    pub abs_cur: u64,
    pub abs_end: u64,
    pub outputs: Vec<OutputRegistration>,
    /// Instance ids of decoders stacked directly on top of this one.
    pub next: Vec<String>,
}

impl DecoderInstanceState {
    /// Constructs a new instance of `class`, applying `options` on top of
    /// the class's declared defaults. `channelmap` starts at the identity
    /// mapping (declared channel `i` maps to host channel `i`), as the
    /// distilled spec requires.
    pub fn new(
        class: &DecoderClass,
        inst_id: String,
        options: IndexMap<String, ScalarValue>,
    ) -> EngineResult<Self> {
        let dec_num_channels = class.dec_num_channels();
        let mut instance = DecoderInstanceState {
            inst_id,
            dec_num_channels,
            channelmap: (0..dec_num_channels as i64).collect(),
            old_pins: vec![OldPin::SameAsSample0; dec_num_channels],
            options: default_options(class),
            condition_list: Vec::new(),
            match_array: Vec::new(),
            abs_start: 0,
            abs_cur: 0,
            abs_end: 0,
            outputs: Vec::new(),
            next: Vec::new(),
        };
        instance.set_options(class, options)?;
        Ok(instance)
    }

    /// Replaces the instance's option dict. Options absent from `supplied`
    /// retain their class defaults. Unknown keys are warnings, not
    /// errors. Present values must match the declared default's scalar
    /// kind.
    pub fn set_options(
        &mut self,
        class: &DecoderClass,
        supplied: IndexMap<String, ScalarValue>,
    ) -> EngineResult<()> {
        let mut resolved = default_options(class);
        for (key, value) in supplied {
            match class.options.get(&key) {
                Some(decl) => {
                    if !value_matches_default_kind(&decl.default, &value) {
                        return Err(EngineError::BadArgument(format!(
                            "option '{key}' on instance '{}': value kind disagrees with declared default",
                            self.inst_id
                        )));
                    }
                    resolved.insert(key, value);
                }
                None => {
                    log::warn!(
                        "instance '{}': ignoring unknown option '{key}'",
                        self.inst_id
                    );
                }
            }
        }
        self.options = resolved;
        Ok(())
    }

    /// Replaces the channel map. Every required channel id must appear in
    /// `map`; missing optionals remain [`UNMAPPED`]. A channel id not
    /// declared by the class is an error.
    pub fn set_channels(
        &mut self,
        class: &DecoderClass,
        map: &IndexMap<String, i64>,
    ) -> EngineResult<()> {
        let mut channelmap = vec![UNMAPPED; self.dec_num_channels];

        for (id, host_index) in map {
            let Some(decl_index) = class.channel_index_by_id(id) else {
                return Err(EngineError::BadArgument(format!(
                    "instance '{}': channel id '{id}' is not declared by its class",
                    self.inst_id
                )));
            };
            channelmap[decl_index] = *host_index;
        }

        for decl in &class.required_channels {
            if channelmap[decl.order] == UNMAPPED {
                return Err(EngineError::BadArgument(format!(
                    "instance '{}': required channel '{}' was not mapped",
                    self.inst_id, decl.id
                )));
            }
        }

        self.channelmap = channelmap;
        Ok(())
    }

    /// Sets `old_pins` to a caller-provided vector of initial pin values.
    /// `pins.len()` must equal the declared channel count.
    pub fn set_initial_pins(&mut self, pins: &[InitialPin]) -> EngineResult<()> {
        if pins.len() != self.dec_num_channels {
            return Err(EngineError::BadArgument(format!(
                "instance '{}': expected {} initial pin values, got {}",
                self.inst_id,
                self.dec_num_channels,
                pins.len()
            )));
        }
        self.old_pins = pins
            .iter()
            .map(|p| match p {
                InitialPin::Low => OldPin::Value(false),
                InitialPin::High => OldPin::Value(true),
                InitialPin::SameAsSample0 => OldPin::SameAsSample0,
            })
            .collect();
        Ok(())
    }

    /// Appends `top_inst_id` to this instance's `next` list, i.e. stacks
    /// it on top of `self`. Returns `true` if the two classes share at
    /// least one matching stream id; a `false` return is a warning
    /// condition for the caller to log, not an error — stacking proceeds
    /// regardless.
    pub fn stack(&mut self, top_inst_id: String, bottom_class: &DecoderClass, top_class: &DecoderClass) -> bool {
        self.next.push(top_inst_id);
        bottom_class
            .output_streams
            .iter()
            .any(|s| top_class.input_streams.contains(s))
    }

    pub fn channel_is_mapped(&self, declared_index: usize) -> bool {
        self.channelmap
            .get(declared_index)
            .is_some_and(|&c| c != UNMAPPED)
    }
}

fn default_options(class: &DecoderClass) -> IndexMap<String, ScalarValue> {
    class
        .options
        .iter()
        .map(|(id, decl)| (id.clone(), decl.default.clone()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::{ChannelDecl, OptionDecl};
    use indexmap::indexmap;

    fn tiny_class() -> DecoderClass {
        DecoderClass {
            id: "tiny".into(),
            name: "tiny".into(),
            long_name: "Tiny".into(),
            required_channels: vec![ChannelDecl { id: "a".into(), name: "A".into(), order: 0 }],
            optional_channels: vec![ChannelDecl { id: "b".into(), name: "B".into(), order: 1 }],
            options: indexmap! {
                "speed".to_string() => OptionDecl {
                    id: "speed".into(),
                    default: ScalarValue::Int(9600),
                    allowed_values: vec![],
                },
            },
            annotation_classes: vec![],
            annotation_rows: vec![],
            binary_classes: vec![],
            logic_channels: vec![],
            input_streams: vec![],
            output_streams: vec![],
            api_version: 1,
            license: "MIT".into(),
        }
    }

    #[test]
    fn new_instance_has_identity_channelmap_and_defaults() {
        let class = tiny_class();
        let inst = DecoderInstanceState::new(&class, "inst0".into(), IndexMap::new()).unwrap();
        assert_eq!(inst.channelmap, vec![0, 1]);
        assert_eq!(inst.options["speed"], ScalarValue::Int(9600));
    }

    #[test]
    fn set_options_rejects_kind_mismatch() {
        let class = tiny_class();
        let mut inst = DecoderInstanceState::new(&class, "inst0".into(), IndexMap::new()).unwrap();
        let bad = indexmap! { "speed".to_string() => ScalarValue::Str("fast".into()) };
        assert!(inst.set_options(&class, bad).is_err());
    }

    #[test]
    fn set_channels_requires_all_required_channels() {
        let class = tiny_class();
        let mut inst = DecoderInstanceState::new(&class, "inst0".into(), IndexMap::new()).unwrap();
        let map = indexmap! { "b".to_string() => 3i64 };
        assert!(inst.set_channels(&class, &map).is_err());

        let map = indexmap! { "a".to_string() => 2i64 };
        inst.set_channels(&class, &map).unwrap();
        assert_eq!(inst.channelmap, vec![2, UNMAPPED]);
    }

    #[test]
    fn set_channels_rejects_unknown_id() {
        let class = tiny_class();
        let mut inst = DecoderInstanceState::new(&class, "inst0".into(), IndexMap::new()).unwrap();
        let map = indexmap! { "z".to_string() => 0i64 };
        assert!(inst.set_channels(&class, &map).is_err());
    }
}
