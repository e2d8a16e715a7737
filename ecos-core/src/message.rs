//! Request lines understood by the ECoS console.
//!
//! Each [`Request`] renders, via `Display`, to exactly one wire line.
//! Arguments are interpolated verbatim; the console grammar has no
//! escaping.

use std::fmt;

use crate::protocol::Direction;

/// Object id of the console itself (status, stop/go, info).
pub const CONSOLE_OBJECT: u32 = 1;

/// Object id of the locomotive manager (roster queries).
pub const LOCO_MANAGER_OBJECT: u32 = 10;

// ── Request ──────────────────────────────────────────────────────

/// All requests issued by the adapter.
///
/// Console-wide requests address object [`CONSOLE_OBJECT`]; train-scoped
/// requests carry the train's object id explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Request {
    // ── Console (object 1) ───────────────────────────────────────
    /// Query the run state (`GO` / `STOP`).
    GetStatus,
    /// Cut track power.
    EmergencyStop,
    /// Restore track power.
    Go,
    /// Query console information.
    GetInfo,

    // ── Locomotive manager (object 10) ───────────────────────────
    /// List locomotive ids.
    QueryLocomotives,
    /// List locomotive ids with name and address.
    QueryLocomotivesDetailed,

    // ── Train ────────────────────────────────────────────────────
    GetName { id: u32 },
    GetSpeed { id: u32 },
    SetSpeed { id: u32, speed: u32 },
    GetDirection { id: u32 },
    SetDirection { id: u32, dir: Direction },
    /// Take control of a train, forcibly stealing it from other handsets.
    TakeControl { id: u32 },
    ReleaseControl { id: u32 },
    SetFunction { id: u32, index: u32, enabled: bool },
    GetFunction { id: u32, index: u32 },
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Request::GetStatus => write!(f, "get({CONSOLE_OBJECT}, status)"),
            Request::EmergencyStop => write!(f, "set({CONSOLE_OBJECT}, stop)"),
            Request::Go => write!(f, "set({CONSOLE_OBJECT}, go)"),
            Request::GetInfo => write!(f, "get({CONSOLE_OBJECT}, info)"),

            Request::QueryLocomotives => write!(f, "queryObjects({LOCO_MANAGER_OBJECT})"),
            Request::QueryLocomotivesDetailed => {
                write!(f, "queryObjects({LOCO_MANAGER_OBJECT}, name, addr)")
            }

            Request::GetName { id } => write!(f, "get({id}, name)"),
            Request::GetSpeed { id } => write!(f, "get({id}, speed)"),
            Request::SetSpeed { id, speed } => write!(f, "set({id}, speed[{speed}])"),
            Request::GetDirection { id } => write!(f, "get({id}, dir)"),
            Request::SetDirection { id, dir } => write!(f, "set({id}, dir[{}])", dir.as_raw()),
            Request::TakeControl { id } => write!(f, "request({id}, control, force)"),
            Request::ReleaseControl { id } => write!(f, "release({id}, control)"),
            Request::SetFunction { id, index, enabled } => {
                write!(f, "set({id}, func[{index}, {}])", u8::from(enabled))
            }
            Request::GetFunction { id, index } => write!(f, "get({id}, func[{index}])"),
        }
    }
}
