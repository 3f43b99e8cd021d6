// ABOUTME: Owns the single active exec session and enforces one-at-a-time semantics
// Opening a new target closes the previous socket exactly once before connecting

use tracing::{debug, info};

use super::connector::ExecChannel;
use super::error::SessionError;
use super::protocol::{Outbound, TerminalSize};
use super::session::{ExecSession, SessionEvent};
use super::target::ExecTarget;

pub struct SessionMultiplexer {
    active: Option<ExecSession>,
    next_id: u64,
    scrollback: usize,
}

impl SessionMultiplexer {
    pub fn new(scrollback: usize) -> Self {
        Self {
            active: None,
            next_id: 1,
            scrollback,
        }
    }

    /// Tears down any current session and starts a connecting one for `target`.
    /// The returned id must be handed back to `attach` with the connect result.
    pub fn begin(&mut self, target: ExecTarget, size: TerminalSize) -> u64 {
        self.close();
        let id = self.next_id;
        self.next_id += 1;
        info!("Starting exec session {} for {}", id, target.title());
        self.active = Some(ExecSession::connecting(id, target, size, self.scrollback));
        id
    }

    /// Results for a session that has since been replaced are closed and dropped.
    pub fn attach(
        &mut self,
        id: u64,
        result: Result<ExecChannel, SessionError>,
    ) -> Option<SessionEvent> {
        match self.active.as_mut() {
            Some(session) if session.id() == id => Some(session.attach(result)),
            _ => {
                debug!("Discarding connect result for stale session {}", id);
                if let Ok(channel) = result {
                    let _ = channel.outbound.send(Outbound::Close);
                }
                None
            }
        }
    }

    /// Closes the socket but keeps the session on screen.
    pub fn disconnect(&mut self) {
        if let Some(session) = self.active.as_mut() {
            session.close();
        }
    }

    /// Closes the socket and forgets the session.
    pub fn close(&mut self) {
        if let Some(mut session) = self.active.take() {
            session.close();
        }
    }

    pub fn pump(&mut self) -> Vec<SessionEvent> {
        self.active
            .as_mut()
            .map(ExecSession::pump)
            .unwrap_or_default()
    }

    pub fn send_input(&mut self, data: &str) -> Result<(), SessionError> {
        self.active
            .as_mut()
            .ok_or(SessionError::Closed)?
            .send_input(data)
    }

    pub fn resize(&mut self, size: TerminalSize) {
        if let Some(session) = self.active.as_mut() {
            session.resize(size);
        }
    }

    pub fn active(&self) -> Option<&ExecSession> {
        self.active.as_ref()
    }

    pub fn active_mut(&mut self) -> Option<&mut ExecSession> {
        self.active.as_mut()
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    /// Target of the current session, for an explicit reconnect.
    pub fn reconnect_target(&self) -> Option<ExecTarget> {
        self.active.as_ref().map(|session| session.target().clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    fn container(name: &str) -> ExecTarget {
        ExecTarget::Container {
            id: format!("{name}-id"),
            name: name.to_string(),
        }
    }

    fn channel() -> (ExecChannel, mpsc::UnboundedReceiver<Outbound>) {
        let (out_tx, out_rx) = mpsc::unbounded_channel();
        let (_in_tx, in_rx) = mpsc::unbounded_channel();
        (ExecChannel::new(out_tx, in_rx), out_rx)
    }

    fn drain(rx: &mut mpsc::UnboundedReceiver<Outbound>) -> Vec<Outbound> {
        let mut out = Vec::new();
        while let Ok(message) = rx.try_recv() {
            out.push(message);
        }
        out
    }

    #[test]
    fn test_begin_closes_previous_session_once() {
        let mut mux = SessionMultiplexer::new(100);
        let first = mux.begin(container("web"), TerminalSize::default());
        let (ch, mut first_rx) = channel();
        mux.attach(first, Ok(ch));

        let second = mux.begin(container("db"), TerminalSize::default());
        assert_ne!(first, second);
        mux.close();

        let closes = drain(&mut first_rx)
            .into_iter()
            .filter(|m| *m == Outbound::Close)
            .count();
        assert_eq!(closes, 1);
    }

    #[test]
    fn test_stale_attach_is_closed() {
        let mut mux = SessionMultiplexer::new(100);
        let stale = mux.begin(container("web"), TerminalSize::default());
        let current = mux.begin(container("db"), TerminalSize::default());

        let (ch, mut rx) = channel();
        assert!(mux.attach(stale, Ok(ch)).is_none());
        assert_eq!(drain(&mut rx), vec![Outbound::Close]);
        assert_eq!(mux.active().map(ExecSession::id), Some(current));
    }

    #[test]
    fn test_input_without_session_is_refused() {
        let mut mux = SessionMultiplexer::new(100);
        assert!(matches!(mux.send_input("ls"), Err(SessionError::Closed)));
    }
}
