//! Notify-Sinks Library
//!
//! Log sinks that deliver events to a team-chat service and to a push
//! notification service, plus the configuration and `tracing` integration
//! that wires them into a host application.

use shadow_rs::shadow;
shadow!(build);

pub mod cli;
pub mod config;
pub mod error;
pub mod external;
pub mod logger;
pub mod sinks;
