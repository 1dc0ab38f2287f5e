// bwac
//
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounded-memory stream plumbing between pipeline stages.
//!
//! Per the design notes, the reference implementation wires every stage
//! boundary as a buffered Go channel (`chan []Symbol`) fed by a goroutine.
//! This module is the idiomatic-Rust rendition of that shape: each stage
//! boundary is a [`std::sync::mpsc::sync_channel`] of fixed-size chunks, and
//! each stage runs on its own `std::thread`. The channel's bound is the
//! "ring depth"; the chunk itself bounds how much data moves per send. A
//! full channel blocks the producing stage, which is exactly the
//! backpressure §5 requires, and closing the input `Sender` is the
//! cancellation primitive: the consuming stage observes `Err(RecvError)` and
//! drains to a close.

use std::sync::mpsc::{sync_channel, Receiver, RecvError, SyncSender};
use std::thread::JoinHandle;

/// Default number of items per chunk. Chosen to keep a single chunk well
/// under a page of memory for the `Symbol<u32>` case (16 bytes/symbol).
pub const CHUNK_SIZE: usize = 4096;

/// Default number of in-flight chunks a stage boundary may buffer before the
/// producer blocks.
pub const RING_DEPTH: usize = 4;

/// The receiving half of a stage boundary: a sequence of chunks, terminated
/// by channel closure.
pub struct ChunkReceiver<T> {
    rx: Receiver<Vec<T>>,
}

impl<T> ChunkReceiver<T> {
    fn new(rx: Receiver<Vec<T>>) -> Self {
        ChunkReceiver { rx }
    }

    /// Receive the next chunk, or `None` once the sender has closed and all
    /// buffered chunks have been drained.
    pub fn recv(&self) -> Option<Vec<T>> {
        match self.rx.recv() {
            Ok(chunk) => Some(chunk),
            Err(RecvError) => None,
        }
    }
}

impl<T> Iterator for ChunkReceiver<T> {
    type Item = Vec<T>;

    fn next(&mut self) -> Option<Self::Item> {
        self.recv()
    }
}

/// An iterator over the individual items of a chunked stream, flattening
/// chunk boundaries away for stages that only care about the item sequence.
pub struct ItemReceiver<T> {
    chunks: ChunkReceiver<T>,
    current: std::vec::IntoIter<T>,
}

impl<T> ItemReceiver<T> {
    pub fn new(chunks: ChunkReceiver<T>) -> Self {
        ItemReceiver { chunks, current: Vec::new().into_iter() }
    }
}

impl<T> Iterator for ItemReceiver<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        loop {
            if let Some(item) = self.current.next() {
                return Some(item);
            }
            let chunk = self.chunks.recv()?;
            self.current = chunk.into_iter();
        }
    }
}

/// A handle used by a producing stage to accumulate items into fixed-size
/// chunks and hand each off once full.
pub struct ChunkWriter<T> {
    tx: SyncSender<Vec<T>>,
    chunk_size: usize,
    current: Vec<T>,
}

impl<T> ChunkWriter<T> {
    fn new(tx: SyncSender<Vec<T>>, chunk_size: usize) -> Self {
        ChunkWriter { tx, chunk_size, current: Vec::with_capacity(chunk_size) }
    }

    /// Push one item, flushing a full chunk downstream if this item fills it.
    ///
    /// Returns `false` if the downstream receiver has gone away, in which
    /// case the caller should stop producing.
    pub fn push(&mut self, item: T) -> bool {
        self.current.push(item);
        if self.current.len() >= self.chunk_size {
            return self.flush();
        }
        true
    }

    /// Flush any partially-filled chunk. Called unconditionally at
    /// end-of-stream so a short final chunk is never lost.
    pub fn flush(&mut self) -> bool {
        if self.current.is_empty() {
            return true;
        }
        let chunk = std::mem::replace(&mut self.current, Vec::with_capacity(self.chunk_size));
        self.tx.send(chunk).is_ok()
    }
}

/// Create a new stage boundary with the default chunk size and ring depth.
pub fn channel<T: Send + 'static>() -> (ChunkWriter<T>, ChunkReceiver<T>) {
    channel_with(CHUNK_SIZE, RING_DEPTH)
}

/// Create a new stage boundary with an explicit chunk size and ring depth.
pub fn channel_with<T: Send + 'static>(
    chunk_size: usize,
    ring_depth: usize,
) -> (ChunkWriter<T>, ChunkReceiver<T>) {
    let (tx, rx) = sync_channel(ring_depth);
    (ChunkWriter::new(tx, chunk_size), ChunkReceiver::new(rx))
}

/// Spawn a pipeline stage on its own thread, matching the reference
/// implementation's one-goroutine-per-stage shape. The join handle is kept
/// by the composer and joined when the pipeline finishes.
///
/// Generic over the stage's return type so a stage can report back a value
/// (e.g. a symbol count) through `JoinHandle::join` rather than only a
/// side-effecting `()`.
pub fn spawn_stage<F, R>(name: &'static str, f: F) -> JoinHandle<R>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    std::thread::Builder::new()
        .name(name.to_string())
        .spawn(move || {
            log::trace!("stage '{name}' started");
            let result = f();
            log::trace!("stage '{name}' finished");
            result
        })
        .expect("failed to spawn pipeline stage thread")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunks_round_trip_through_the_ring() {
        let (mut writer, receiver) = channel_with::<u8>(4, 2);
        let handle = spawn_stage("test-producer", move || {
            for b in 0..10u8 {
                if !writer.push(b) {
                    break;
                }
            }
            writer.flush();
        });

        let items: Vec<u8> = ItemReceiver::new(receiver).collect();
        handle.join().unwrap();
        assert_eq!(items, (0..10u8).collect::<Vec<_>>());
    }

    #[test]
    fn empty_producer_yields_no_items() {
        let (mut writer, receiver) = channel_with::<u8>(4, 2);
        let handle = spawn_stage("test-empty-producer", move || {
            writer.flush();
        });
        let items: Vec<u8> = ItemReceiver::new(receiver).collect();
        handle.join().unwrap();
        assert!(items.is_empty());
    }
}
