// ABOUTME: Exec terminal sessions: WebSocket connector, vt100 emulator and the session multiplexer
// At most one session is live at a time; the multiplexer owns it

pub mod connector;
pub mod emulator;
pub mod error;
pub mod keys;
pub mod multiplexer;
pub mod protocol;
pub mod session;
pub mod target;

pub use connector::{ExecChannel, ExecConnector, WsConnector};
pub use emulator::TerminalEmulator;
pub use error::SessionError;
pub use keys::{encode_key, is_leave_key};
pub use multiplexer::SessionMultiplexer;
pub use protocol::{ConnectionState, ControlMessage, Inbound, Outbound, TerminalSize};
pub use session::{ExecSession, SessionEvent, CLOSED_INDICATOR, ERROR_INDICATOR};
pub use target::ExecTarget;
