//! Dual-stream structured logging.
//!
//! A [`Logger`] owns two independent output streams: the main
//! application log (leveled JSON lines) and the TDR stream (one
//! transaction detail record per completed request). Each stream
//! writes either to stdout or to an hourly-rotating file with
//! age-based retention, selected by `LogConfig`.

pub mod logger;
pub mod rotate;
pub mod tdr;
pub mod value;

pub use logger::{Level, Logger};
pub use rotate::RotateWriter;
pub use tdr::TdrRecord;
pub use value::{Field, LogValue};
