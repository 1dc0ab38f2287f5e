// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bit-level sinks and sources the arithmetic coder reads and writes
//! through. `Packed{Sink,Source}` pack eight bits per output byte
//! (the normal wire format); `Unpacked{Sink,Source}` write one bit per
//! byte (`CodeBit`/`DecodeBit` in the reference), used for debugging or
//! callers that want a byte-per-bit framing.
//!
//! Both sources tolerate a short underlying read by treating missing bytes
//! as zero rather than erroring — per the design notes, this is normative
//! behaviour the final symbol's correctness depends on, not a bug to paper
//! over.

/// Accepts bits from the arithmetic encoder's renormalisation loop.
pub trait BitSink {
    fn push_bit(&mut self, bit: bool);
    /// Consume the sink, returning the accumulated bytes. For `PackedSink`
    /// this flushes a partially-filled final byte.
    fn into_bytes(self) -> Vec<u8>;
}

/// Feeds bits to the arithmetic decoder, one at a time, MSB-first within
/// each source byte. Exhausted input reads as zero bits forever.
pub trait BitSource {
    fn next_bit(&mut self) -> bool;
}

/// Packs eight bits per byte, MSB first — the default wire format.
pub struct PackedSink {
    bytes: Vec<u8>,
    current: u8,
    mask: u8,
}

impl PackedSink {
    pub fn new() -> Self {
        PackedSink { bytes: Vec::new(), current: 0, mask: 0x80 }
    }
}

impl Default for PackedSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BitSink for PackedSink {
    fn push_bit(&mut self, bit: bool) {
        if bit {
            self.current |= self.mask;
        }
        self.mask >>= 1;
        if self.mask == 0 {
            self.bytes.push(self.current);
            self.current = 0;
            self.mask = 0x80;
        }
    }

    fn into_bytes(self) -> Vec<u8> {
        let mut bytes = self.bytes;
        if self.mask != 0x80 {
            bytes.push(self.current);
        }
        bytes
    }
}

/// Reads bits MSB-first out of a packed byte slice. Exhausted input is
/// treated as an infinite run of zero bits, matching the reference
/// decoder's tolerant 1-byte `Read` at the tail of its input loop.
pub struct PackedSource<'a> {
    data: &'a [u8],
    pos: usize,
    current: u8,
    mask: u8,
}

impl<'a> PackedSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        let mut source = PackedSource { data, pos: 0, current: 0, mask: 0x80 };
        if let Some(&byte) = data.first() {
            source.current = byte;
            source.pos = 1;
        }
        source
    }
}

impl<'a> BitSource for PackedSource<'a> {
    fn next_bit(&mut self) -> bool {
        let bit = self.current & self.mask != 0;
        self.mask >>= 1;
        if self.mask == 0 {
            if self.pos < self.data.len() {
                self.current = self.data[self.pos];
                self.pos += 1;
                self.mask = 0x80;
            }
            // else: mask stays 0, every subsequent bit reads as zero.
        }
        bit
    }
}

/// Writes one byte (0x00 or 0x01) per bit — useful when a caller wants
/// byte-level framing for debugging rather than a packed stream.
pub struct UnpackedSink {
    bytes: Vec<u8>,
}

impl UnpackedSink {
    pub fn new() -> Self {
        UnpackedSink { bytes: Vec::new() }
    }
}

impl Default for UnpackedSink {
    fn default() -> Self {
        Self::new()
    }
}

impl BitSink for UnpackedSink {
    fn push_bit(&mut self, bit: bool) {
        self.bytes.push(bit as u8);
    }

    fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

/// Reads one bit per input byte (nonzero is `1`); exhausted input reads as
/// zero, mirroring `PackedSource`.
pub struct UnpackedSource<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> UnpackedSource<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        UnpackedSource { data, pos: 0 }
    }
}

impl<'a> BitSource for UnpackedSource<'a> {
    fn next_bit(&mut self) -> bool {
        let bit = self.data.get(self.pos).copied().unwrap_or(0) != 0;
        self.pos += 1;
        bit
    }
}
