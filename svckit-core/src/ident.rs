//! Request identifier generation.
//!
//! Thread IDs tie together the main log, the TDR stream, and any
//! downstream traces, so they must be unique under burst load and
//! sort by creation time. UUIDv7 gives both: a millisecond timestamp
//! prefix followed by random entropy from the process-wide OS RNG.

use uuid::Uuid;

/// Generate a new thread/request identifier.
///
/// Lexicographic order of the returned strings follows generation
/// time at millisecond granularity. This is an operational trace ID,
/// not a security token.
pub fn generate_thread_id() -> String {
    Uuid::now_v7().to_string()
}
