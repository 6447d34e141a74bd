mod sink_error;

pub use sink_error::{SinkError, SinkErrorKind, SinkResult};
