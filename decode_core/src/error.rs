use thiserror::Error;

/// Stable error taxonomy for the decode engine.
///
/// Each variant corresponds to one of the small-integer error codes a
/// C-ABI-style host would see; this crate never allocates the integer
/// itself, it only guarantees the variant set is stable so a host adapter
/// can map it.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error("{0}")]
    Generic(String),

    #[error("allocation failed: {0}")]
    OutOfMemory(String),

    #[error("bad argument: {0}")]
    BadArgument(String),

    #[error("internal bug: {0}")]
    InternalBug(String),

    #[error("hosted decoder '{instance_id}' raised an error: {message}")]
    HostRuntime { instance_id: String, message: String },

    #[error("decoder path error: {0}")]
    DecoderPath(String),

    #[error("termination requested")]
    TerminationRequested,
}

/// Maps each taxon onto the stable small-integer vocabulary from the
/// error-handling design (`OK` itself is `Result::Ok` and has no
/// enum representation here).
impl EngineError {
    pub fn code(&self) -> i32 {
        match self {
            EngineError::Generic(_) => 1,
            EngineError::OutOfMemory(_) => 2,
            EngineError::BadArgument(_) => 3,
            EngineError::InternalBug(_) => 4,
            EngineError::HostRuntime { .. } => 5,
            EngineError::DecoderPath(_) => 6,
            EngineError::TerminationRequested => 7,
        }
    }
}

pub type EngineResult<T> = Result<T, EngineError>;

/// Normal control-flow outcome of a `wait()`-driven decode step, distinct
/// from `EngineError`: reaching end-of-stream is not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeOutcome {
    Matched,
    Eof,
    Terminated,
}
