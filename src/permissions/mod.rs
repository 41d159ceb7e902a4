//! Permission policy handed to the agent runtime
//!
//! The runtime owns enforcement. This module only names the policy so the
//! configuration can carry it as a typed value instead of a bare string.

mod mode;

pub use mode::PermissionMode;
