//! WebSocket transport for the client.
//!
//! Provides [`ConnectedTransport`] which handles socket I/O for JSON
//! frames. This is a thin layer that just sends/receives frames -
//! protocol logic remains in the sans-IO [`ChatSession`](crate::ChatSession).

use futures_util::{SinkExt, StreamExt};
use thiserror::Error;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage};

use crate::wire::{ClientFrame, InboundEnvelope};

/// Transport errors.
#[derive(Debug, Error)]
pub enum TransportError {
    /// Connection failed.
    #[error("connection failed: {0}")]
    Connection(String),

    /// Socket error on an established connection.
    #[error("socket error: {0}")]
    Socket(String),

    /// The peer sent something that is not a known frame.
    #[error("protocol error: {0}")]
    Protocol(String),
}

/// Connectivity notifications the I/O task reports upward.
///
/// The driver translates these one-to-one into session events
/// (`TransportDown`, `EnvelopeReceived`, ...).
#[derive(Debug)]
pub enum TransportNotice {
    /// A `receive_message` event arrived.
    Envelope(InboundEnvelope),
    /// The server or network closed the connection.
    Closed {
        /// Close reason, for the log.
        reason: String,
    },
    /// The socket failed mid-session.
    Failed {
        /// Failure reason, for the log.
        reason: String,
    },
}

/// Handle to an established WebSocket connection.
///
/// Provides channels for frame transport. Frames are sent/received via
/// the channels, and an internal task handles the socket I/O.
pub struct ConnectedTransport {
    /// Send frames to the server.
    pub to_server: mpsc::Sender<ClientFrame>,
    /// Receive notices from the server.
    pub from_server: mpsc::Receiver<TransportNotice>,
    /// Abort handle to stop the connection task.
    abort_handle: tokio::task::AbortHandle,
}

impl ConnectedTransport {
    /// Stop the connection.
    pub fn stop(&self) {
        self.abort_handle.abort();
    }
}

/// Connect to the messaging endpoint.
///
/// Returns a [`ConnectedTransport`] once the WebSocket handshake
/// completes. A handshake failure maps to the session's
/// `TransportFailed` event.
pub async fn connect(endpoint_url: &str) -> Result<ConnectedTransport, TransportError> {
    let (stream, _response) = connect_async(endpoint_url)
        .await
        .map_err(|e| TransportError::Connection(format!("handshake failed: {e}")))?;

    let (to_server_tx, to_server_rx) = mpsc::channel::<ClientFrame>(32);
    let (from_server_tx, from_server_rx) = mpsc::channel::<TransportNotice>(32);

    // Spawn connection handler
    let handle = tokio::spawn(run_connection(stream, to_server_rx, from_server_tx));

    Ok(ConnectedTransport {
        to_server: to_server_tx,
        from_server: from_server_rx,
        abort_handle: handle.abort_handle(),
    })
}

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

/// Run the connection, bridging between channels and the socket.
async fn run_connection(
    stream: WsStream,
    mut to_server: mpsc::Receiver<ClientFrame>,
    from_server: mpsc::Sender<TransportNotice>,
) {
    let (mut sink, mut source) = stream.split();

    loop {
        tokio::select! {
            outbound = to_server.recv() => {
                let Some(frame) = outbound else {
                    // Session hung up; close cleanly.
                    let _ = sink.close().await;
                    break;
                };
                match serde_json::to_string(&frame) {
                    Ok(json) => {
                        if let Err(e) = sink.send(WsMessage::Text(json)).await {
                            let _ = from_server
                                .send(TransportNotice::Failed { reason: e.to_string() })
                                .await;
                            break;
                        }
                    },
                    Err(e) => {
                        tracing::warn!(error = %e, "dropping unencodable frame");
                    },
                }
            },
            inbound = source.next() => {
                match inbound {
                    Some(Ok(message)) => {
                        if let Some(notice) = decode_notice(message) {
                            if from_server.send(notice).await.is_err() {
                                break;
                            }
                        }
                    },
                    Some(Err(e)) => {
                        let _ = from_server
                            .send(TransportNotice::Failed { reason: e.to_string() })
                            .await;
                        break;
                    },
                    None => {
                        let _ = from_server
                            .send(TransportNotice::Closed {
                                reason: "connection closed by peer".to_owned(),
                            })
                            .await;
                        break;
                    },
                }
            },
        }
    }
}

/// Decode one socket message into a notice, or `None` for frames the
/// session does not care about (pings, binary noise, unknown events).
fn decode_notice(message: WsMessage) -> Option<TransportNotice> {
    match message {
        WsMessage::Text(text) => match serde_json::from_str::<InboundEnvelope>(&text) {
            Ok(envelope) => Some(TransportNotice::Envelope(envelope)),
            Err(e) => {
                tracing::debug!(error = %e, "ignoring unrecognized frame");
                None
            },
        },
        WsMessage::Close(frame) => {
            let reason = frame
                .map(|f| f.reason.to_string())
                .filter(|r| !r.is_empty())
                .unwrap_or_else(|| "connection closed by peer".to_owned());
            Some(TransportNotice::Closed { reason })
        },
        _ => None,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tokio_tungstenite::tungstenite::Message as WsMessage;

    use super::{TransportNotice, decode_notice};

    #[test]
    fn text_frame_decodes_to_envelope() {
        let message = WsMessage::Text(
            r#"{"message":{"from":"u2","to":"u1","text":"hi","createdAt":5}}"#.to_owned(),
        );
        assert!(matches!(decode_notice(message), Some(TransportNotice::Envelope(_))));
    }

    #[test]
    fn unknown_text_is_ignored() {
        let message = WsMessage::Text(r#"{"event":"typing"}"#.to_owned());
        assert!(decode_notice(message).is_none());
    }

    #[test]
    fn ping_frames_are_ignored() {
        assert!(decode_notice(WsMessage::Ping(vec![])).is_none());
    }

    #[test]
    fn close_frame_reports_reason() {
        let notice = decode_notice(WsMessage::Close(None)).unwrap();
        assert!(matches!(notice, TransportNotice::Closed { .. }));
    }
}
