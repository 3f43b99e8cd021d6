// ABOUTME: Opens the exec WebSocket and bridges it to a pair of channels
// The socket is pumped by a spawned task; sessions only see ExecChannel

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::{HeaderName, HeaderValue};
use tokio_tungstenite::{connect_async, tungstenite};
use tracing::{debug, error, info, warn};
use url::Url;

use super::error::SessionError;
use super::protocol::{Inbound, Outbound};
use crate::api::{RequestContext, HOST_HEADER};

/// Channel halves for one live socket. Sending `Outbound::Close` (or dropping
/// the sender) ends the pump task.
pub struct ExecChannel {
    pub outbound: mpsc::UnboundedSender<Outbound>,
    pub inbound: mpsc::UnboundedReceiver<Inbound>,
    pub task: Option<JoinHandle<()>>,
}

impl ExecChannel {
    pub fn new(
        outbound: mpsc::UnboundedSender<Outbound>,
        inbound: mpsc::UnboundedReceiver<Inbound>,
    ) -> Self {
        Self {
            outbound,
            inbound,
            task: None,
        }
    }
}

#[async_trait]
pub trait ExecConnector: Send + Sync {
    async fn connect(&self, url: &Url, ctx: &RequestContext) -> Result<ExecChannel, SessionError>;
}

pub struct WsConnector {
    timeout: Duration,
}

impl WsConnector {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl ExecConnector for WsConnector {
    async fn connect(&self, url: &Url, ctx: &RequestContext) -> Result<ExecChannel, SessionError> {
        info!("Opening exec socket {}", url.path());

        let mut request = url.as_str().into_client_request()?;
        let headers = request.headers_mut();
        let host_header = HeaderName::from_bytes(HOST_HEADER.as_bytes())
            .map_err(|e| SessionError::Connect(e.to_string()))?;
        headers.insert(host_header, HeaderValue::from(ctx.host_id));
        if let Some(token) = ctx.token() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| SessionError::Connect(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let (ws_stream, response) = tokio::time::timeout(self.timeout, connect_async(request))
            .await
            .map_err(|_| {
                error!("Exec socket handshake timed out after {:?}", self.timeout);
                SessionError::Connect("connection timed out".to_string())
            })??;
        debug!("Exec socket handshake status: {:?}", response.status());

        let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
        let (inbound_tx, inbound_rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(pump(ws_stream, outbound_rx, inbound_tx));

        Ok(ExecChannel {
            outbound: outbound_tx,
            inbound: inbound_rx,
            task: Some(task),
        })
    }
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn pump(
    ws_stream: WsStream,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    inbound: mpsc::UnboundedSender<Inbound>,
) {
    let (mut sink, mut stream) = ws_stream.split();

    loop {
        tokio::select! {
            message = outbound.recv() => {
                let Some(message) = message else {
                    debug!("Exec session dropped its sender, closing socket");
                    let _ = sink.send(tungstenite::Message::Close(None)).await;
                    break;
                };
                let closing = message == Outbound::Close;
                if let Err(e) = sink.send(message.into_ws()).await {
                    warn!("Exec socket send failed: {}", e);
                    let _ = inbound.send(Inbound::Error(e.to_string()));
                    break;
                }
                if closing {
                    break;
                }
            }
            frame = stream.next() => {
                match frame {
                    Some(Ok(tungstenite::Message::Text(text))) => {
                        let _ = inbound.send(Inbound::Data(text.into_bytes()));
                    }
                    Some(Ok(tungstenite::Message::Binary(bytes))) => {
                        let _ = inbound.send(Inbound::Data(bytes));
                    }
                    Some(Ok(tungstenite::Message::Close(_))) | None => {
                        info!("Exec socket closed by server");
                        let _ = inbound.send(Inbound::Closed);
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        error!("Exec socket error: {}", e);
                        let _ = inbound.send(Inbound::Error(e.to_string()));
                        break;
                    }
                }
            }
        }
    }
    debug!("Exec socket pump finished");
}
