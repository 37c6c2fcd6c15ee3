// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::any::Any;

use detection_config::{Direction, TxId};

use crate::record_store::TxDetectState;

/// Application layer protocols the continuation engine distinguishes. Only the
/// protocols it special-cases are named; everything else is `Unknown`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AppProto {
    Http,
    Smb,
    Dcerpc,
    Unknown,
}

impl AppProto {
    /// True for the message oriented protocols the single-shot DCE payload
    /// matcher applies to.
    pub fn is_dce(self) -> bool {
        matches!(self, AppProto::Smb | AppProto::Dcerpc)
    }
}

/// One application layer transaction as the continuation engine sees it.
///
/// Implemented by protocol parsers. The engine never keeps a reference to a
/// transaction across packets; it re-queries the parser by id each pass.
pub trait AppLayerTx: Send {
    /// Parser progress of this transaction for the direction. Compared
    /// against [`AppLayerState::completion_progress`] to decide whether the
    /// transaction is complete.
    fn progress(&self, dir: Direction) -> u8;

    fn detect_state(&self) -> Option<&TxDetectState>;

    fn detect_state_mut(&mut self) -> Option<&mut TxDetectState>;

    fn set_detect_state(&mut self, state: TxDetectState);

    /// True when a file appeared in this direction since the last call; the
    /// marker is consumed. Drives the `FILE_*_NEW` reconsideration bits.
    fn take_files_updated(&mut self, dir: Direction) -> bool;

    /// Downcast support for inspection engine callbacks.
    fn as_any(&self) -> &dyn Any;
}

/// The application layer parser state of one flow.
///
/// Transactions are produced monotonically and identified by their position:
/// ids `0..tx_count()` are or were visible, and the inspect id is the lowest
/// id the detection engine still considers pending for a direction.
pub trait AppLayerState: Send {
    /// Total number of transactions produced so far.
    fn tx_count(&self) -> u64;

    /// Looks up a transaction by id. May return None for ids the parser has
    /// already freed or not yet materialized.
    fn tx(&self, tx_id: TxId) -> Option<&dyn AppLayerTx>;

    fn tx_mut(&mut self, tx_id: TxId) -> Option<&mut dyn AppLayerTx>;

    /// The inspect cursor of the direction.
    fn inspect_id(&self, dir: Direction) -> TxId;

    fn set_inspect_id(&mut self, dir: Direction, tx_id: TxId);

    /// The progress value at which a transaction counts as complete for the
    /// direction.
    fn completion_progress(&self, dir: Direction) -> u8;

    /// Whether the parser can attach per-transaction detect state. Protocols
    /// answering false are served by the flow-scoped generic matchers only.
    fn supports_tx_detect_state(&self) -> bool {
        true
    }

    /// Downcast support for matchers and the file subsystem.
    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
