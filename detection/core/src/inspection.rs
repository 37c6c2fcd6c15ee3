// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use detection_config::{Direction, TxId};

use crate::flags::InspectFlags;
use crate::parser::{AppLayerState, AppLayerTx, AppProto};
use crate::signature::{Signature, SmList};

/// Verdict of one inspection engine for one signature on one transaction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EngineVerdict {
    /// The engine's part of the signature matched.
    Match,
    /// The signature can no longer match this transaction.
    CantMatch,
    /// As `CantMatch`, raised by a file engine so the file store arbiter
    /// learns a file rule gave up.
    CantMatchFilestore,
    /// Not enough application layer data to decide; try again later.
    NeedsMoreData,
}

/// Callback of a registered inspection engine. Receives the signature under
/// evaluation, the application layer state, the transaction and its id, and
/// the direction being inspected.
pub type EngineCallback = Arc<
    dyn Fn(&Signature, &dyn AppLayerState, &dyn AppLayerTx, TxId, Direction) -> EngineVerdict
        + Send
        + Sync,
>;

/// One registered per-transaction inspection engine: the signature match list
/// it consumes, the engine-inspected bit it owns in progress records, and the
/// matcher behind it.
#[derive(Clone)]
pub struct InspectionEngine {
    pub sm_list: SmList,
    pub flag: InspectFlags,
    pub callback: EngineCallback,
}

impl InspectionEngine {
    pub fn new(sm_list: SmList, flag: InspectFlags, callback: EngineCallback) -> Self {
        Self {
            sm_list,
            flag,
            callback,
        }
    }
}

/// The process-wide table of inspection engines, keyed by application protocol
/// and direction. Engines are attempted in registration order, which is the
/// fixed inspection order continuation relies on.
#[derive(Default)]
pub struct InspectionEngineTable {
    engines: HashMap<(AppProto, Direction), Vec<InspectionEngine>>,
}

impl InspectionEngineTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, alproto: AppProto, dir: Direction, engine: InspectionEngine) {
        self.engines.entry((alproto, dir)).or_default().push(engine);
    }

    pub fn engines(&self, alproto: AppProto, dir: Direction) -> &[InspectionEngine] {
        self.engines
            .get(&(alproto, dir))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
