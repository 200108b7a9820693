//! Condition Evaluator: term-level match predicates and the conjunction of
//! terms that makes up a single condition. The disjunction across
//! conditions, and the skip-min fast-forward bookkeeping, live in
//! [`crate::scanner`], since that level needs cross-condition state the
//! evaluator itself does not carry.

/// A single match predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    High,
    Low,
    RisingEdge,
    FallingEdge,
    EitherEdge,
    NoEdge,
    Skip,
    /// Produced for out-of-range channel refs or negative skip counts;
    /// never matches.
    AlwaysFalse,
}

/// A single term inside a [`Condition`]. `channel` is meaningful only for
/// level/edge kinds; `num_samples_to_skip`/`num_samples_already_skipped`
/// only for `Skip`.
#[derive(Debug, Clone)]
pub struct Term {
    pub kind: TermKind,
    pub channel: usize,
    pub num_samples_to_skip: u64,
    pub num_samples_already_skipped: u64,
}

impl Term {
    /// Builds a level or edge term referencing `channel` (the decoder's
    /// declared channel index, not a host channel index). If `channel` is
    /// out of range for the decoder's declared channel count, the term is
    /// coerced to `AlwaysFalse` instead of rejected.
    pub fn level_or_edge(kind: TermKind, channel: i64, dec_num_channels: usize) -> Term {
        debug_assert!(!matches!(kind, TermKind::Skip | TermKind::AlwaysFalse));
        if channel < 0 || channel as usize >= dec_num_channels {
            return Term::always_false();
        }
        Term {
            kind,
            channel: channel as usize,
            num_samples_to_skip: 0,
            num_samples_already_skipped: 0,
        }
    }

    /// Builds a skip term. A negative skip count is coerced to
    /// `AlwaysFalse` rather than rejected.
    pub fn skip(num_samples_to_skip: i64) -> Term {
        if num_samples_to_skip < 0 {
            return Term::always_false();
        }
        Term {
            kind: TermKind::Skip,
            channel: 0,
            num_samples_to_skip: num_samples_to_skip as u64,
            num_samples_already_skipped: 0,
        }
    }

    pub fn always_false() -> Term {
        Term {
            kind: TermKind::AlwaysFalse,
            channel: 0,
            num_samples_to_skip: 0,
            num_samples_already_skipped: 0,
        }
    }

    /// Maps the single-character term tags a host binding commonly
    /// accepts ('h','l','r','f','e','n') onto a [`TermKind`]. Returns
    /// `None` for an unrecognized tag; `decode_core` itself never parses
    /// these, this is a convenience for adapter code.
    pub fn kind_from_tag(tag: char) -> Option<TermKind> {
        match tag {
            'h' => Some(TermKind::High),
            'l' => Some(TermKind::Low),
            'r' => Some(TermKind::RisingEdge),
            'f' => Some(TermKind::FallingEdge),
            'e' => Some(TermKind::EitherEdge),
            'n' => Some(TermKind::NoEdge),
            _ => None,
        }
    }
}

/// An ordered list of terms, matched by conjunction: a sample matches a
/// condition iff it matches every one of its terms.
pub type Condition = Vec<Term>;

/// Evaluates a single level/edge/always-false term against the previous
/// and current sampled bit for its channel. `Skip` terms are evaluated via
/// [`term_matches_skip`] instead, since they need no sample input.
pub fn term_matches(term: &Term, old_sample: bool, current_sample: bool) -> bool {
    match term.kind {
        TermKind::High => current_sample,
        TermKind::Low => !current_sample,
        TermKind::RisingEdge => !old_sample && current_sample,
        TermKind::FallingEdge => old_sample && !current_sample,
        TermKind::EitherEdge => old_sample != current_sample,
        TermKind::NoEdge => old_sample == current_sample,
        TermKind::AlwaysFalse => false,
        TermKind::Skip => unreachable!("skip terms are evaluated via term_matches_skip"),
    }
}

/// Evaluates (and advances) a `Skip` term for one scanned sample. Matches
/// when `already_skipped == to_skip`; otherwise increments
/// `already_skipped` and reports no match. The skip counter advances once
/// per scanned sample regardless of which sibling terms match.
pub fn term_matches_skip(term: &mut Term) -> bool {
    debug_assert_eq!(term.kind, TermKind::Skip);
    if term.num_samples_already_skipped == term.num_samples_to_skip {
        true
    } else {
        term.num_samples_already_skipped += 1;
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edge_terms_compare_previous_and_current() {
        let rising = Term::level_or_edge(TermKind::RisingEdge, 0, 1);
        assert!(term_matches(&rising, false, true));
        assert!(!term_matches(&rising, true, true));

        let no_edge = Term::level_or_edge(TermKind::NoEdge, 0, 1);
        assert!(term_matches(&no_edge, true, true));
        assert!(!term_matches(&no_edge, true, false));
    }

    #[test]
    fn out_of_range_channel_becomes_always_false() {
        let term = Term::level_or_edge(TermKind::High, 5, 2);
        assert_eq!(term.kind, TermKind::AlwaysFalse);
        assert!(!term_matches(&term, true, true));
    }

    #[test]
    fn negative_skip_becomes_always_false() {
        let term = Term::skip(-1);
        assert_eq!(term.kind, TermKind::AlwaysFalse);
    }

    #[test]
    fn skip_term_matches_after_exact_count() {
        let mut term = Term::skip(2);
        assert!(!term_matches_skip(&mut term));
        assert!(!term_matches_skip(&mut term));
        assert!(term_matches_skip(&mut term));
    }

    #[test]
    fn skip_zero_matches_immediately() {
        let mut term = Term::skip(0);
        assert!(term_matches_skip(&mut term));
    }
}
