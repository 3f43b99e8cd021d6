// ABOUTME: One interactive exec session: connection state, emulator and socket channel
// Sessions never reconnect on their own; reopening is an explicit user action

use tokio::sync::mpsc::error::TryRecvError;
use tracing::{debug, info, warn};

use super::connector::ExecChannel;
use super::emulator::TerminalEmulator;
use super::error::SessionError;
use super::protocol::{ConnectionState, Inbound, Outbound, TerminalSize};
use super::target::ExecTarget;

pub const CLOSED_INDICATOR: &str = "[Session closed]";
pub const ERROR_INDICATOR: &str = "[Connection error]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    Connected { title: String },
    Disconnected { title: String, reason: String },
}

pub struct ExecSession {
    id: u64,
    target: ExecTarget,
    state: ConnectionState,
    emulator: TerminalEmulator,
    channel: Option<ExecChannel>,
}

impl ExecSession {
    /// A session whose socket is still being opened. Only local text is shown.
    pub fn connecting(id: u64, target: ExecTarget, size: TerminalSize, scrollback: usize) -> Self {
        let mut emulator = TerminalEmulator::new(size, scrollback);
        emulator.process(format!("\x1b[1;36m{}\x1b[0m\r\n", target.title()).as_bytes());
        emulator.process(b"\x1b[33mConnecting...\x1b[0m\r\n");
        Self {
            id,
            target,
            state: ConnectionState::Connecting,
            emulator,
            channel: None,
        }
    }

    /// Completes a connection attempt started with `connecting`.
    pub fn attach(&mut self, result: Result<ExecChannel, SessionError>) -> SessionEvent {
        let title = self.target.title();
        match result {
            Ok(channel) => {
                info!("Exec session {} connected: {}", self.id, title);
                self.channel = Some(channel);
                self.state = ConnectionState::Connected;
                self.emulator
                    .process(b"\x1b[1;32m\xe2\x9c\x93 Connected\x1b[0m\r\n");
                let size = self.emulator.size();
                self.send(Outbound::Resize(size));
                SessionEvent::Connected { title }
            }
            Err(e) => {
                warn!("Exec session {} failed to connect: {}", self.id, e);
                self.state = ConnectionState::Disconnected;
                self.emulator
                    .write_line(&format!("\x1b[31m{ERROR_INDICATOR} {e}\x1b[0m"));
                SessionEvent::Disconnected {
                    title,
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Forwards keystrokes verbatim, one frame per call.
    pub fn send_input(&mut self, data: &str) -> Result<(), SessionError> {
        if self.state != ConnectionState::Connected {
            return Err(SessionError::Closed);
        }
        if self.send(Outbound::Input(data.to_string())) {
            Ok(())
        } else {
            Err(SessionError::Closed)
        }
    }

    /// Applies the new geometry to the emulator first, then reports the
    /// emulator's size to the server.
    pub fn resize(&mut self, size: TerminalSize) {
        self.emulator.resize(size);
        if self.state == ConnectionState::Connected {
            let current = self.emulator.size();
            debug!("Exec session {} resized to {}x{}", self.id, current.cols, current.rows);
            self.send(Outbound::Resize(current));
        }
    }

    /// Drains received frames into the emulator in arrival order.
    pub fn pump(&mut self) -> Vec<SessionEvent> {
        let mut events = Vec::new();
        loop {
            let Some(channel) = self.channel.as_mut() else {
                break;
            };
            match channel.inbound.try_recv() {
                Ok(Inbound::Data(bytes)) => self.emulator.process(&bytes),
                Ok(Inbound::Closed) | Err(TryRecvError::Disconnected) => {
                    events.push(self.mark_disconnected(CLOSED_INDICATOR, "Connection closed"));
                }
                Ok(Inbound::Error(reason)) => {
                    events.push(self.mark_disconnected(ERROR_INDICATOR, &reason));
                }
                Err(TryRecvError::Empty) => break,
            }
        }
        events
    }

    /// Closes the socket and releases the channel. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(channel) = self.channel.take() {
            info!("Closing exec session {}", self.id);
            let _ = channel.outbound.send(Outbound::Close);
            self.emulator
                .write_line(&format!("\x1b[33m{CLOSED_INDICATOR}\x1b[0m"));
        }
        self.state = ConnectionState::Disconnected;
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn target(&self) -> &ExecTarget {
        &self.target
    }

    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    pub fn emulator(&self) -> &TerminalEmulator {
        &self.emulator
    }

    pub fn emulator_mut(&mut self) -> &mut TerminalEmulator {
        &mut self.emulator
    }

    fn send(&self, message: Outbound) -> bool {
        self.channel
            .as_ref()
            .is_some_and(|channel| channel.outbound.send(message).is_ok())
    }

    fn mark_disconnected(&mut self, indicator: &str, reason: &str) -> SessionEvent {
        info!("Exec session {} disconnected: {}", self.id, reason);
        self.channel = None;
        self.state = ConnectionState::Disconnected;
        self.emulator
            .write_line(&format!("\x1b[33m{indicator}\x1b[0m"));
        SessionEvent::Disconnected {
            title: self.target.title(),
            reason: reason.to_string(),
        }
    }
}

impl Drop for ExecSession {
    fn drop(&mut self) {
        self.close();
    }
}
