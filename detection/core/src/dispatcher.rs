// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use detection_config::{Direction, TxId};

use crate::flags::InspectFlags;
use crate::inspection::{EngineVerdict, InspectionEngine};
use crate::parser::{AppLayerState, AppLayerTx};
use crate::signature::Signature;

/// Aggregate verdict of one dispatcher pass over a signature's engines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TxInspectVerdict {
    /// Every engine the signature uses matched; the signature fired.
    Alert,
    /// Some engine ruled the signature out for this transaction.
    NoMatch,
    /// Undecided; the signature awaits more application layer data.
    MoreData,
}

/// What one dispatcher pass produced: the updated inspect flags and whether a
/// file engine reported that a file rule gave up.
#[derive(Debug)]
pub(crate) struct InspectOutcome {
    pub flags: InspectFlags,
    pub verdict: TxInspectVerdict,
    pub file_no_match: bool,
}

/// Runs the signature's inspection engines in their fixed order, skipping
/// engines whose bit is already set in `flags`, and folds the verdicts.
///
/// The fold: `Match` sets the engine's bit and proceeds; `CantMatch` (and its
/// filestore flavor) sets `SIG_CANT_MATCH` plus the engine's bit and stops;
/// `NeedsMoreData` stops without setting the bit. The signature alerts only
/// when every engine it uses has matched.
pub(crate) fn inspect_tx_signature(
    engines: &[InspectionEngine],
    signature: &Signature,
    alstate: &dyn AppLayerState,
    tx: &dyn AppLayerTx,
    tx_id: TxId,
    dir: Direction,
    mut flags: InspectFlags,
) -> InspectOutcome {
    let mut total_matches = 0u32;
    let mut file_no_match = false;

    for engine in engines {
        if !signature.uses(engine.sm_list) {
            continue;
        }
        if flags.contains(engine.flag) {
            // Decided on an earlier packet.
            continue;
        }
        match (engine.callback)(signature, alstate, tx, tx_id, dir) {
            EngineVerdict::Match => {
                flags.insert(engine.flag);
                total_matches += 1;
            }
            EngineVerdict::CantMatch => {
                flags.insert(InspectFlags::SIG_CANT_MATCH | engine.flag);
                break;
            }
            EngineVerdict::CantMatchFilestore => {
                flags.insert(InspectFlags::SIG_CANT_MATCH | engine.flag);
                file_no_match = true;
                break;
            }
            EngineVerdict::NeedsMoreData => break,
        }
    }

    if flags.contains(InspectFlags::SIG_CANT_MATCH) {
        return InspectOutcome {
            flags,
            verdict: TxInspectVerdict::NoMatch,
            file_no_match,
        };
    }

    let fully_inspected = engines
        .iter()
        .filter(|engine| signature.uses(engine.sm_list))
        .all(|engine| flags.contains(engine.flag));
    if fully_inspected && total_matches > 0 {
        flags.insert(InspectFlags::FULL_INSPECT);
        return InspectOutcome {
            flags,
            verdict: TxInspectVerdict::Alert,
            file_no_match,
        };
    }

    InspectOutcome {
        flags,
        verdict: TxInspectVerdict::MoreData,
        file_no_match,
    }
}
