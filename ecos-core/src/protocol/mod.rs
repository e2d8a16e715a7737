//! ECoS reply grammar: framing lines, bracketed values and roster lines.
//!
//! Only the subset of the console's object/property grammar used by the
//! adapter is modelled here.

pub mod reply;
pub mod roster;
pub mod status;

pub use reply::{END_PREFIX, REPLY_PREFIX, Reply, ReplyBuilder, ReplyLine, bracketed};
pub use roster::{Train, parse_ids, parse_roster, parse_train};
pub use status::{ConsoleStatus, Direction};
