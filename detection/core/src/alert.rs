// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use detection_config::{SignatureId, TxId};

/// Annotation bits attached to queued alerts so the output side knows how the
/// match was produced.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertFlags(u8);

impl AlertFlags {
    /// The alert came from stateful inspection rather than a single packet.
    pub const STATE_MATCH: AlertFlags = AlertFlags(1);
    /// The alert is bound to a specific application layer transaction.
    pub const TX: AlertFlags = AlertFlags(1 << 1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl fmt::Debug for AlertFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (
            self.contains(AlertFlags::STATE_MATCH),
            self.contains(AlertFlags::TX),
        ) {
            (true, true) => write!(f, "STATE_MATCH|TX"),
            (true, false) => write!(f, "STATE_MATCH"),
            (false, true) => write!(f, "TX"),
            (false, false) => write!(f, "(empty)"),
        }
    }
}

/// An alert record enqueued for the packet under evaluation. Formatting and
/// output policy live outside the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PacketAlert {
    pub sid: SignatureId,
    /// Set for transaction-bound matches.
    pub tx_id: Option<TxId>,
    pub flags: AlertFlags,
}
