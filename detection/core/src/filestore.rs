// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use detection_config::{Direction, TxId};

use crate::flags::DirectionFlags;
use crate::parser::AppLayerState;
use crate::record_store::{DirectionState, TxRecord};

/// The file extraction subsystem as the continuation engine sees it.
///
/// `disable_storing` is the arbiter's terminal decision for a transaction and
/// direction; `store_files` is the filestore post-match side effect. Both run
/// under the flow write lock.
pub trait FileSubsystem: Send + Sync {
    /// Stop storing file bodies for the transaction and direction.
    fn disable_storing(&self, alstate: &mut dyn AppLayerState, tx_id: TxId, dir: Direction);

    /// Flag the transaction's files for storage.
    fn store_files(&self, alstate: &mut dyn AppLayerState, tx_id: TxId, dir: Direction);
}

/// For deployments without file extraction.
pub struct NoopFileSubsystem;

impl FileSubsystem for NoopFileSubsystem {
    fn disable_storing(&self, _alstate: &mut dyn AppLayerState, _tx_id: TxId, _dir: Direction) {}

    fn store_files(&self, _alstate: &mut dyn AppLayerState, _tx_id: TxId, _dir: Direction) {}
}

/// Decides when a transaction can stop storing files: once every
/// file-interested signature of the rule set has definitively given up on the
/// transaction, storage is disabled and never re-enabled.
pub(crate) struct FileStoreArbiter;

impl FileStoreArbiter {
    /// Records that one file-interested signature reached SIG_CANT_MATCH on
    /// the transaction. Returns true exactly once, when the count reaches the
    /// rule set's file rule count and storage must be disabled now.
    pub(crate) fn note_cant_match(
        dir_state: &mut DirectionState<TxRecord>,
        file_rule_count: usize,
    ) -> bool {
        dir_state.filestore_cnt = dir_state.filestore_cnt.saturating_add(1);
        debug_assert!(
            dir_state.filestore_cnt as usize <= file_rule_count,
            "filestore_cnt {} exceeds file rule count {file_rule_count}",
            dir_state.filestore_cnt
        );
        if file_rule_count > 0
            && dir_state.filestore_cnt as usize >= file_rule_count
            && !dir_state
                .flags
                .contains(DirectionFlags::FILE_STORE_DISABLED)
        {
            dir_state.flags.insert(DirectionFlags::FILE_STORE_DISABLED);
            return true;
        }
        false
    }

    /// Withdraws one signature's contribution because a new file made its
    /// negative verdict provisional again.
    pub(crate) fn note_reconsidered(dir_state: &mut DirectionState<TxRecord>) {
        dir_state.filestore_cnt = dir_state.filestore_cnt.saturating_sub(1);
    }
}
