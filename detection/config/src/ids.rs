// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of an application layer transaction within a flow. Assigned by
/// the parser, monotonically increasing per flow.
pub type TxId = u64;

/// Version stamp the application layer parser bumps whenever newly received
/// bytes produced new parseable state. Monotonically non-decreasing per
/// direction.
pub type AlVersion = u64;

/// Compact signature identity assigned by the rule compiler.
/// SignatureId is between 0 (inclusive) and the total number of signatures in
/// the rule set (exclusive); it indexes the signature table directly, so no
/// signature body is ever copied into per-flow state.
#[derive(
    Clone, Copy, Serialize, Deserialize, Default, PartialEq, Eq, PartialOrd, Ord, Hash,
)]
pub struct SignatureId(u32);

impl SignatureId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn value(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SignatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "S{:05}", self.0)
    }
}

impl fmt::Debug for SignatureId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

/// Direction of traffic within a flow. All continuation state, counters and
/// version stamps are duplicated per direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    ToServer,
    ToClient,
}

impl Direction {
    /// Index into per-direction state pairs.
    pub fn index(self) -> usize {
        match self {
            Direction::ToServer => 0,
            Direction::ToClient => 1,
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Direction::ToServer => Direction::ToClient,
            Direction::ToClient => Direction::ToServer,
        }
    }

    /// Stable label for metrics and logging.
    pub fn label(self) -> &'static str {
        match self {
            Direction::ToServer => "to_server",
            Direction::ToClient => "to_client",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::ToServer => write!(f, "to-server"),
            Direction::ToClient => write!(f, "to-client"),
        }
    }
}
