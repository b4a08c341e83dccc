//! # Frame Codec
//!
//! Serialization to and from pre-allocated frame buffers.
//!
//! ## Design
//!
//! - Writers are reused across frames; no per-frame allocation
//! - Little-endian scalars, direct memory copies for `Pod` records
//! - Decoding is all-or-nothing: any malformed frame is rejected whole

use bytemuck::bytes_of;

use crate::error::DecodeError;
use crate::protocol::messages::{InputMessage, WireInput, WireState};
use crate::protocol::{Message, MessageKind, StateMessage};
use crate::HISTORY_CAPACITY;

/// Maximum frame size: the kind byte, the input header, and a fully
/// redundant input window spanning the whole history ring.
pub const MAX_FRAME_SIZE: usize = 1 + 8 + HISTORY_CAPACITY * WireInput::SIZE;

/// Frame writer over a pre-allocated buffer, reused across frames.
pub struct FrameWriter {
    buffer: Box<[u8; MAX_FRAME_SIZE]>,
    position: usize,
}

impl FrameWriter {
    /// Creates a writer with a fresh buffer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: Box::new([0u8; MAX_FRAME_SIZE]),
            position: 0,
        }
    }

    /// Resets the writer for reuse.
    #[inline]
    pub fn reset(&mut self) {
        self.position = 0;
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub const fn len(&self) -> usize {
        self.position
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.position == 0
    }

    /// Returns the written frame.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer[..self.position]
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) -> bool {
        if self.position >= MAX_FRAME_SIZE {
            return false;
        }
        self.buffer[self.position] = value;
        self.position += 1;
        true
    }

    /// Writes an i32 in little-endian format.
    #[inline]
    pub fn write_i32(&mut self, value: i32) -> bool {
        if self.position + 4 > MAX_FRAME_SIZE {
            return false;
        }
        self.buffer[self.position..self.position + 4].copy_from_slice(&value.to_le_bytes());
        self.position += 4;
        true
    }

    /// Writes a `Pod` record directly.
    #[inline]
    pub fn write_pod<T: bytemuck::Pod>(&mut self, value: &T) -> bool {
        let bytes = bytes_of(value);
        if self.position + bytes.len() > MAX_FRAME_SIZE {
            return false;
        }
        self.buffer[self.position..self.position + bytes.len()].copy_from_slice(bytes);
        self.position += bytes.len();
        true
    }

    /// Encodes a complete input frame: kind byte, start tick, input count,
    /// then one record per covered tick.
    pub fn encode_input(&mut self, msg: &InputMessage) -> bool {
        self.reset();

        if !(self.write_u8(MessageKind::Input as u8)
            && self.write_i32(msg.start_tick as i32)
            && self.write_i32(msg.inputs.len() as i32))
        {
            return false;
        }

        for input in &msg.inputs {
            if !self.write_pod(&WireInput::from(*input)) {
                return false;
            }
        }

        true
    }

    /// Encodes a complete state frame: kind byte then the fixed-size state
    /// record.
    pub fn encode_state(&mut self, msg: &StateMessage) -> bool {
        self.reset();
        self.write_u8(MessageKind::State as u8) && self.write_pod(&WireState::from(msg))
    }
}

impl Default for FrameWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Frame reader over a received buffer.
pub struct FrameReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> FrameReader<'a> {
    /// Creates a reader over a frame.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Bytes not yet consumed.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Reads a single byte.
    #[inline]
    pub fn read_u8(&mut self) -> Option<u8> {
        if self.position >= self.buffer.len() {
            return None;
        }
        let value = self.buffer[self.position];
        self.position += 1;
        Some(value)
    }

    /// Reads an i32 in little-endian format.
    #[inline]
    pub fn read_i32(&mut self) -> Option<i32> {
        if self.position + 4 > self.buffer.len() {
            return None;
        }
        let value = i32::from_le_bytes([
            self.buffer[self.position],
            self.buffer[self.position + 1],
            self.buffer[self.position + 2],
            self.buffer[self.position + 3],
        ]);
        self.position += 4;
        Some(value)
    }

    /// Reads a `Pod` record directly.
    #[inline]
    pub fn read_pod<T: bytemuck::Pod>(&mut self) -> Option<T> {
        let size = std::mem::size_of::<T>();
        if self.position + size > self.buffer.len() {
            return None;
        }
        let slice = &self.buffer[self.position..self.position + size];
        self.position += size;
        bytemuck::try_pod_read_unaligned(slice).ok()
    }

    /// Decodes the frame into a message.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the frame is truncated, carries an
    /// unknown kind, encodes invalid field values, or has trailing bytes.
    /// The caller discards the frame entirely in every error case.
    pub fn decode(&mut self) -> Result<Message, DecodeError> {
        let kind_byte = self.read_u8().ok_or(DecodeError::Truncated)?;
        let kind = MessageKind::from_byte(kind_byte).ok_or(DecodeError::UnknownKind(kind_byte))?;

        let message = match kind {
            MessageKind::Input => {
                let start_tick = self.read_i32().ok_or(DecodeError::Truncated)?;
                if start_tick < 0 {
                    return Err(DecodeError::NegativeTick(start_tick));
                }

                let count = self.read_i32().ok_or(DecodeError::Truncated)?;
                if count <= 0 || count as usize > HISTORY_CAPACITY {
                    return Err(DecodeError::BadCount(count));
                }

                let mut inputs = Vec::with_capacity(count as usize);
                for _ in 0..count {
                    let wire: WireInput = self.read_pod().ok_or(DecodeError::Truncated)?;
                    inputs.push(wire.into());
                }

                Message::Input(InputMessage {
                    start_tick: start_tick as u32,
                    inputs,
                })
            }
            MessageKind::State => {
                let wire: WireState = self.read_pod().ok_or(DecodeError::Truncated)?;
                if wire.tick < 0 {
                    return Err(DecodeError::NegativeTick(wire.tick));
                }
                Message::State(wire.into_message())
            }
        };

        if self.remaining() != 0 {
            return Err(DecodeError::TrailingBytes(self.remaining()));
        }

        Ok(message)
    }
}
