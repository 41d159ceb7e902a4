//! Tool identifiers the runtime may be allowed to invoke
//!
//! Tools are executed by the agent runtime, never by this crate. The
//! configuration only lists which of them a given agent may use.

mod tool;

pub use tool::Tool;
