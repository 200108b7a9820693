//! Match Scanner: advances an instance's cursor across a pending chunk,
//! evaluating the condition list one sample at a time and applying the
//! skip-min fast-forward, until either a match or chunk exhaustion.

use crate::condition::{term_matches, term_matches_skip, TermKind};
use crate::instance::{DecoderInstanceState, OldPin, UNMAPPED};
use crate::sample::{is_constant, sample_bit, SampleChunk};

/// Runs the scanner against `chunk`, starting from `instance.abs_cur` and
/// stopping at the first match or at `chunk.abs_end`. `instance.abs_cur`
/// and `instance.old_pins` are updated in place; on a match,
/// `instance.match_array` reflects the per-condition result at the
/// matching sample and `instance.abs_cur` equals it.
pub fn scan(instance: &mut DecoderInstanceState, chunk: &SampleChunk) -> bool {
    if instance.condition_list.is_empty() || instance.condition_list.iter().all(|c| c.is_none()) {
        return true;
    }

    let num_conditions = instance.condition_list.len();
    instance.match_array = vec![false; num_conditions];

    if instance.abs_cur == 0 {
        seed_initial_pins(instance, chunk);
    }

    while instance.abs_cur < chunk.abs_end {
        let s = instance.abs_cur;

        let mut all_skip_cond = true;
        let mut all_skip_const = true;
        let mut all_input_const = true;
        let mut have_skip = false;
        let mut skip_min: Option<u64> = None;

        for j in 0..num_conditions {
            let Some(cond) = instance.condition_list[j].as_mut() else {
                continue;
            };

            let mut is_skip_cond = true;
            let mut is_input_const = true;
            let mut cond_result = true;

            for term in cond.iter_mut() {
                match term.kind {
                    TermKind::Skip => {
                        have_skip = true;
                        let remain = chunk.abs_end.saturating_sub(s).saturating_sub(1);
                        let candidate = term
                            .num_samples_to_skip
                            .saturating_sub(term.num_samples_already_skipped)
                            .min(remain);
                        skip_min = Some(skip_min.map_or(candidate, |m| m.min(candidate)));
                        cond_result &= term_matches_skip(term);
                    }
                    TermKind::AlwaysFalse => {
                        is_skip_cond = false;
                        cond_result = false;
                    }
                    _ => {
                        is_skip_cond = false;
                        let mapped = instance.channelmap[term.channel];
                        let (old_bit, cur_bit, const_src) = if mapped == UNMAPPED {
                            // An unmapped optional channel behaves like a
                            // constant `false` source: it never edges, so
                            // edge conditions on it never fire.
                            (false, false, true)
                        } else {
                            let ch = mapped as usize;
                            let cur = sample_bit(chunk, ch, s);
                            let old = match instance.old_pins[term.channel] {
                                OldPin::Value(v) => v,
                                OldPin::SameAsSample0 => cur,
                            };
                            (old, cur, is_constant(chunk, ch))
                        };
                        if !const_src {
                            is_input_const = false;
                        }
                        cond_result &= term_matches(term, old_bit, cur_bit);
                    }
                }
            }

            instance.match_array[j] = cond_result;
            all_skip_cond &= is_skip_cond;
            if is_skip_cond {
                all_skip_const = false;
            } else if !cond_result {
                all_skip_const &= is_input_const;
                all_input_const &= is_input_const;
            }
        }

        update_old_pins(instance, chunk, s);

        if instance.match_array.iter().any(|&m| m) {
            return true;
        }

        if all_skip_cond {
            let advance = skip_min.unwrap_or(1).max(1);
            instance.abs_cur = s + advance;
            if apply_skip_advance(instance, advance) {
                return true;
            }
            continue;
        }

        if all_skip_const {
            instance.abs_cur = chunk.abs_end;
            break;
        }

        if have_skip && all_input_const {
            if let Some(advance) = skip_min {
                instance.abs_cur = s + advance;
                if apply_skip_advance(instance, advance) {
                    return true;
                }
                continue;
            }
        }

        instance.abs_cur = s + 1;
    }

    false
}

/// Advances every `Skip` term across the whole condition list by
/// `advance` samples in lockstep (one sample's worth of that advance was
/// already accounted for by the per-sample evaluation that produced
/// `advance`), then re-checks whether any condition now matches purely on
/// its skip terms reaching their target. This is the strict,
/// never-infer-further resolution of skip/constant-channel interaction.
fn apply_skip_advance(instance: &mut DecoderInstanceState, advance: u64) -> bool {
    if advance <= 1 {
        return instance.match_array.iter().any(|&m| m);
    }
    let bonus = advance - 1;
    for (j, cond_opt) in instance.condition_list.iter_mut().enumerate() {
        let Some(cond) = cond_opt else { continue };
        let mut any_skip_term = false;
        let mut all_skip_terms_hit = true;
        for term in cond.iter_mut() {
            if term.kind == TermKind::Skip {
                any_skip_term = true;
                term.num_samples_already_skipped =
                    (term.num_samples_already_skipped + bonus).min(term.num_samples_to_skip);
                if term.num_samples_already_skipped != term.num_samples_to_skip {
                    all_skip_terms_hit = false;
                }
            }
        }
        if any_skip_term && all_skip_terms_hit {
            instance.match_array[j] = true;
        }
    }
    instance.match_array.iter().any(|&m| m)
}

fn seed_initial_pins(instance: &mut DecoderInstanceState, chunk: &SampleChunk) {
    for i in 0..instance.dec_num_channels {
        if instance.old_pins[i] != OldPin::SameAsSample0 {
            continue;
        }
        let mapped = instance.channelmap[i];
        if mapped == UNMAPPED {
            continue;
        }
        let value = sample_bit(chunk, mapped as usize, chunk.abs_start);
        instance.old_pins[i] = OldPin::Value(value);
    }
}

fn update_old_pins(instance: &mut DecoderInstanceState, chunk: &SampleChunk, s: u64) {
    for i in 0..instance.dec_num_channels {
        let mapped = instance.channelmap[i];
        if mapped == UNMAPPED {
            continue;
        }
        let value = sample_bit(chunk, mapped as usize, s);
        instance.old_pins[i] = OldPin::Value(value);
    }
}
