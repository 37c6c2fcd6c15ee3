// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use detection_config::{Direction, SignatureId};

use crate::error::{DetectError, DetectResult};
use crate::flags::{DirectionFlags, InspectFlags};

/// Number of progress records per chunk. Chunks amortize allocations so the
/// common case of a handful of parked signatures costs a single allocation.
pub const CHUNK_SIZE: usize = 15;

/// The unit of resumption for a signature parked on a transaction: the
/// signature identity and the inspection progress accumulated so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TxRecord {
    pub sid: SignatureId,
    pub flags: InspectFlags,
}

/// The unit of resumption for a signature parked on the flow itself, used by
/// the generic application layer matchers. `cursor` is the index of the next
/// match instruction to try in the signature's flow program; it is resolved
/// against the signature table at dispatch time so rule reloads cannot leave
/// it dangling.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlowRecord {
    pub sid: SignatureId,
    pub flags: InspectFlags,
    pub cursor: usize,
}

/// Append-only sequence of progress records, stored in fixed-size chunks.
///
/// Records are never removed individually; the store is either fully alive or
/// reset as a whole. Iteration yields records in insertion order, which equals
/// rule evaluation order and is what makes continuation deterministic.
pub(crate) struct RecordStore<R> {
    chunks: Vec<Box<[R; CHUNK_SIZE]>>,
    cnt: usize,
}

impl<R: Copy + Default> RecordStore<R> {
    pub(crate) fn new() -> Self {
        Self {
            chunks: Vec::new(),
            cnt: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.cnt
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.cnt == 0
    }

    /// Appends a record, allocating a new chunk when the current one is full.
    /// Fails when `limit` records are already stored; the caller decides what
    /// losing the record means.
    pub(crate) fn append(&mut self, record: R, limit: usize) -> DetectResult<()> {
        if self.cnt >= limit {
            return Err(DetectError::StateStoreFull { limit });
        }
        let chunk = self.cnt / CHUNK_SIZE;
        if chunk == self.chunks.len() {
            self.chunks.push(Box::new([R::default(); CHUNK_SIZE]));
        }
        self.chunks[chunk][self.cnt % CHUNK_SIZE] = record;
        self.cnt += 1;
        Ok(())
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &R> {
        self.chunks
            .iter()
            .flat_map(|chunk| chunk.iter())
            .take(self.cnt)
    }

    pub(crate) fn get(&self, index: usize) -> Option<&R> {
        if index >= self.cnt {
            return None;
        }
        Some(&self.chunks[index / CHUNK_SIZE][index % CHUNK_SIZE])
    }

    pub(crate) fn get_mut(&mut self, index: usize) -> Option<&mut R> {
        if index >= self.cnt {
            return None;
        }
        Some(&mut self.chunks[index / CHUNK_SIZE][index % CHUNK_SIZE])
    }

    /// Forgets all records. Chunks are kept for reuse; the next append
    /// overwrites the first slot.
    pub(crate) fn reset(&mut self) {
        self.cnt = 0;
    }

    #[cfg(test)]
    pub(crate) fn chunk_count(&self) -> usize {
        self.chunks.len()
    }
}

/// Per-direction continuation state: the record store plus the file
/// bookkeeping folded over it.
pub(crate) struct DirectionState<R> {
    pub(crate) store: RecordStore<R>,
    pub(crate) flags: DirectionFlags,
    /// Number of file-interested signatures that reached SIG_CANT_MATCH.
    pub(crate) filestore_cnt: u16,
}

impl<R: Copy + Default> DirectionState<R> {
    fn new() -> Self {
        Self {
            store: RecordStore::new(),
            flags: DirectionFlags::empty(),
            filestore_cnt: 0,
        }
    }

    fn reset(&mut self) {
        self.store.reset();
        self.flags = DirectionFlags::empty();
        self.filestore_cnt = 0;
    }
}

/// Continuation state attached to one application layer transaction. Created
/// lazily the first time any signature parks on the transaction; destroyed
/// with it.
pub struct TxDetectState {
    dirs: [DirectionState<TxRecord>; 2],
}

impl Default for TxDetectState {
    fn default() -> Self {
        Self::new()
    }
}

impl TxDetectState {
    pub fn new() -> Self {
        Self {
            dirs: [DirectionState::new(), DirectionState::new()],
        }
    }

    pub(crate) fn dir(&self, dir: Direction) -> &DirectionState<TxRecord> {
        &self.dirs[dir.index()]
    }

    pub(crate) fn dir_mut(&mut self, dir: Direction) -> &mut DirectionState<TxRecord> {
        &mut self.dirs[dir.index()]
    }

    /// True when either direction holds parked records.
    pub fn has_records(&self) -> bool {
        self.dirs.iter().any(|d| !d.store.is_empty())
    }

    /// Zeroes counters and flags of both directions, freeing the engine to
    /// re-evaluate the transaction against a reloaded rule set.
    pub fn reset(&mut self) {
        for dir in &mut self.dirs {
            dir.reset();
        }
    }
}

/// Continuation state owned by the flow, holding the records of the generic
/// application layer matchers.
pub struct FlowDetectState {
    dirs: [DirectionState<FlowRecord>; 2],
}

impl Default for FlowDetectState {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowDetectState {
    pub fn new() -> Self {
        Self {
            dirs: [DirectionState::new(), DirectionState::new()],
        }
    }

    pub(crate) fn dir(&self, dir: Direction) -> &DirectionState<FlowRecord> {
        &self.dirs[dir.index()]
    }

    pub(crate) fn dir_mut(&mut self, dir: Direction) -> &mut DirectionState<FlowRecord> {
        &mut self.dirs[dir.index()]
    }

    /// Zeroes the counters of one direction, e.g. when the transaction cursor
    /// of that direction advances.
    pub fn reset_direction(&mut self, dir: Direction) {
        self.dirs[dir.index()].reset();
    }

    pub fn reset(&mut self) {
        for dir in &mut self.dirs {
            dir.reset();
        }
    }
}
