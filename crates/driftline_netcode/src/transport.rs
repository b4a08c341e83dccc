//! # UDP Transport
//!
//! Thin nonblocking UDP wrapper carrying encoded frames, one frame per
//! datagram.
//!
//! The link is deliberately dumb: no handshake, no reliability, no
//! ordering. Loss resilience belongs to redundant input transmission, and
//! connection lifecycle events are the driver's call — it pushes
//! `Connected`/`Disconnected` into the client's event channel when it
//! decides the peer is there or gone.

use std::io;
use std::net::{SocketAddr, UdpSocket};

use crossbeam_channel::Sender;

use crate::channel::NetEvent;
use crate::error::NetError;
use crate::protocol::{
    FrameReader, FrameWriter, InputMessage, Message, StateMessage, MAX_FRAME_SIZE,
};

/// Datagram counters.
#[derive(Clone, Copy, Debug, Default)]
pub struct LinkStats {
    /// Frames sent.
    pub frames_sent: u64,
    /// Frames received and decoded.
    pub frames_received: u64,
    /// Bytes sent.
    pub bytes_sent: u64,
    /// Bytes received.
    pub bytes_received: u64,
    /// Frames discarded because they failed to decode.
    pub decode_errors: u64,
    /// Socket receive errors.
    pub recv_errors: u64,
}

/// Nonblocking UDP endpoint speaking the frame codec.
pub struct UdpLink {
    socket: UdpSocket,
    peer: Option<SocketAddr>,
    writer: FrameWriter,
    recv_buffer: Box<[u8; MAX_FRAME_SIZE]>,
    stats: LinkStats,
}

impl UdpLink {
    /// Binds a link to the given local address.
    ///
    /// # Errors
    ///
    /// Returns the socket error if binding or configuring fails.
    pub fn bind(addr: SocketAddr) -> io::Result<Self> {
        let socket = UdpSocket::bind(addr)?;
        socket.set_nonblocking(true)?;

        Ok(Self {
            socket,
            peer: None,
            writer: FrameWriter::new(),
            recv_buffer: Box::new([0u8; MAX_FRAME_SIZE]),
            stats: LinkStats::default(),
        })
    }

    /// Local address the link is bound to.
    ///
    /// # Errors
    ///
    /// Returns the socket error if the address cannot be read.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Sets the peer outbound input frames go to.
    pub fn set_peer(&mut self, peer: SocketAddr) {
        self.peer = Some(peer);
    }

    /// Clears the peer; input sends become no-ops until a peer is set.
    pub fn clear_peer(&mut self) {
        self.peer = None;
    }

    /// Transfer counters.
    #[must_use]
    pub const fn stats(&self) -> &LinkStats {
        &self.stats
    }

    /// Sends an input frame to the configured peer. Without a peer the
    /// frame is silently dropped, mirroring a disconnected client.
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Oversize`] if the message cannot be framed and
    /// an [`NetError::Io`] if the socket send fails.
    pub fn send_input(&mut self, msg: &InputMessage) -> Result<(), NetError> {
        let Some(peer) = self.peer else {
            return Ok(());
        };
        if !self.writer.encode_input(msg) {
            return Err(NetError::Oversize);
        }
        let sent = self.socket.send_to(self.writer.as_slice(), peer)?;
        self.stats.frames_sent += 1;
        self.stats.bytes_sent += sent as u64;
        Ok(())
    }

    /// Sends a state frame to an explicit address (the authority answers
    /// whichever address the inputs came from).
    ///
    /// # Errors
    ///
    /// Returns [`NetError::Oversize`] if the message cannot be framed and
    /// an [`NetError::Io`] if the socket send fails.
    pub fn send_state(&mut self, msg: &StateMessage, to: SocketAddr) -> Result<(), NetError> {
        if !self.writer.encode_state(msg) {
            return Err(NetError::Oversize);
        }
        let sent = self.socket.send_to(self.writer.as_slice(), to)?;
        self.stats.frames_sent += 1;
        self.stats.bytes_sent += sent as u64;
        Ok(())
    }

    /// Receives and decodes the next pending frame, if any. Never blocks.
    ///
    /// Malformed frames are discarded whole, counted, and logged; the poll
    /// keeps going until a valid frame or an empty socket.
    pub fn poll(&mut self) -> Option<(Message, SocketAddr)> {
        loop {
            match self.socket.recv_from(&mut self.recv_buffer[..]) {
                Ok((len, from)) => {
                    self.stats.bytes_received += len as u64;
                    match FrameReader::new(&self.recv_buffer[..len]).decode() {
                        Ok(message) => {
                            self.stats.frames_received += 1;
                            return Some((message, from));
                        }
                        Err(err) => {
                            self.stats.decode_errors += 1;
                            tracing::warn!(%err, %from, "discarding malformed frame");
                        }
                    }
                }
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => return None,
                Err(err) => {
                    self.stats.recv_errors += 1;
                    tracing::warn!(%err, "socket receive failed");
                    return None;
                }
            }
        }
    }

    /// Drains the socket into a client's event channel, forwarding state
    /// frames as events. Anything else on a client link is a peer bug.
    pub fn pump_client(&mut self, events: &Sender<NetEvent>) {
        while let Some((message, from)) = self.poll() {
            match message {
                Message::State(state) => {
                    let _ = events.send(NetEvent::State(state));
                }
                Message::Input(_) => {
                    tracing::warn!(%from, "client link received an input frame, dropping");
                }
            }
        }
    }
}
