// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use arc_swap::ArcSwap;
use prometheus::Registry;
use tracing::{debug, trace};

use detection_config::{AlVersion, Direction, Parameters, SignatureId, TxId};

use crate::context::Context;
use crate::dispatcher::{inspect_tx_signature, InspectOutcome, TxInspectVerdict};
use crate::filestore::{FileStoreArbiter, FileSubsystem};
use crate::flags::{DirectionFlags, InspectFlags};
use crate::flow::{Flow, Packet};
use crate::inspection::{EngineVerdict, InspectionEngineTable};
use crate::metrics::initialise_metrics;
use crate::parser::{AppLayerState, AppProto};
use crate::record_store::{FlowDetectState, FlowRecord, TxDetectState, TxRecord};
use crate::signature::{PostMatchAction, Signature, SignatureTable};
use crate::thread::DetectThreadCtx;

/// The read-only rule context of packet processing: the signature array and
/// the inspection engine table. Built once at startup or reload, then only
/// read; a reload constructs a fresh context and swaps it in atomically.
pub struct RuleContext {
    pub signatures: SignatureTable,
    pub engines: InspectionEngineTable,
}

/// Whether a flow direction carries continuation state worth another pass.
/// Lets the per-packet path skip the engine entirely in the common case.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InspectableState {
    /// No continuation state exists for the direction.
    None,
    /// State exists and the application layer advanced since the last pass.
    Updated,
    /// State exists but nothing inspectable changed.
    Unchanged,
}

/// The stateful signature continuation engine.
///
/// Signatures that could not be fully decided on a single packet park a
/// progress record on the transaction (or flow) they were evaluated against.
/// Later packets resume exactly the engines that are still undecided, alert
/// when the last one matches, and drop out the moment a signature provably
/// cannot match anymore.
///
/// Every entry point runs under the caller-held flow write lock; the engine
/// itself never blocks.
pub struct StatefulDetector {
    context: Arc<Context>,
    rules: ArcSwap<RuleContext>,
    files: Arc<dyn FileSubsystem>,
}

impl StatefulDetector {
    pub fn new(
        parameters: Parameters,
        rules: RuleContext,
        files: Arc<dyn FileSubsystem>,
        registry: &Registry,
    ) -> Self {
        let metrics = initialise_metrics(registry.clone());
        Self {
            context: Arc::new(Context::new(parameters, metrics)),
            rules: ArcSwap::from_pointee(rules),
            files,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_for_test(rules: RuleContext, files: Arc<dyn FileSubsystem>) -> Self {
        Self {
            context: Arc::new(Context::new_for_test()),
            rules: ArcSwap::from_pointee(rules),
            files,
        }
    }

    #[cfg(test)]
    pub(crate) fn new_for_test_with_parameters(
        parameters: Parameters,
        rules: RuleContext,
        files: Arc<dyn FileSubsystem>,
    ) -> Self {
        Self {
            context: Arc::new(Context::new_for_test().with_parameters(parameters)),
            rules: ArcSwap::from_pointee(rules),
            files,
        }
    }

    /// Number of signatures in the active rule context; sizes the per-thread
    /// state.
    pub fn signature_count(&self) -> usize {
        self.rules.load().signatures.len()
    }

    /// Installs a freshly compiled rule context. Callers must follow up with
    /// [`StatefulDetector::reset_live_transactions`] on every live flow so
    /// parked state from the retired context cannot leak into the new one.
    pub fn reload_rules(&self, rules: RuleContext) {
        debug!(
            "Installing rule context with {} signatures",
            rules.signatures.len()
        );
        self.rules.store(Arc::new(rules));
    }

    /// Whether the direction has continuation state, and whether the
    /// application layer advanced since it was last inspected.
    pub fn has_inspectable_state(
        &self,
        flow: &Flow,
        dir: Direction,
        alproto: AppProto,
        alversion: AlVersion,
    ) -> InspectableState {
        debug_assert_eq!(flow.alproto, alproto);

        let has_flow_records = flow
            .de_state
            .as_ref()
            .map_or(false, |state| !state.dir(dir).store.is_empty());
        let has_tx_records = flow.alstate.as_deref().map_or(false, |state| {
            (state.inspect_id(dir)..state.tx_count()).any(|tx_id| {
                state
                    .tx(tx_id)
                    .and_then(|tx| tx.detect_state())
                    .map_or(false, |ds| !ds.dir(dir).store.is_empty())
            })
        });
        if !has_flow_records && !has_tx_records {
            return InspectableState::None;
        }
        if flow.detect_version(dir) == alversion && !flow.is_eof(dir) {
            InspectableState::Unchanged
        } else {
            InspectableState::Updated
        }
    }

    /// Start path: first stateful evaluation of a signature the first pass
    /// matcher selected for this packet. Inspects all currently visible
    /// transactions (and the flow itself for generic rules), parking progress
    /// records where evaluation could not conclude. Returns whether the
    /// signature alerted.
    pub fn start_detection(
        &self,
        tctx: &mut DetectThreadCtx,
        flow: &mut Flow,
        _packet: &Packet,
        sid: SignatureId,
        dir: Direction,
        alversion: AlVersion,
    ) -> bool {
        let rules = self.rules.load();
        let signature = rules.signatures.get(sid);
        let alproto = flow.alproto;
        let mut alerted = false;
        let mut stored = false;

        // Transaction scoped inspection.
        let tx_meta = flow.alstate.as_deref().and_then(|state| {
            state.supports_tx_detect_state().then(|| {
                (
                    state.inspect_id(dir),
                    state.tx_count(),
                    state.completion_progress(dir),
                )
            })
        });
        if let Some((inspect_id, tx_count, complete_at)) = tx_meta {
            for tx_id in self.tx_window(inspect_id, tx_count) {
                let inspected = {
                    let state = flow
                        .alstate
                        .as_deref()
                        .expect("Application layer state was just read");
                    inspect_start_tx(&rules, signature, state, alproto, tx_id, dir)
                };
                // Transaction missing, or continuation already owns this
                // signature here.
                let Some((outcome, progress)) = inspected else {
                    continue;
                };

                if outcome.verdict == TxInspectVerdict::Alert {
                    alerted = true;
                    self.run_post_match(tctx, flow, signature, Some(tx_id), dir);
                }

                let is_last = tx_id + 1 == tx_count;
                let tx_done = progress >= complete_at;
                let definitive = outcome.verdict != TxInspectVerdict::MoreData;
                // Nothing will revisit the last transaction once it is
                // complete, so a record would be dead weight. Everything else
                // that made progress or concluded is remembered, negative
                // results included.
                let park = !(is_last && tx_done) && (definitive || !outcome.flags.is_empty());
                let feed_arbiter = outcome.file_no_match
                    || (outcome.flags.contains(InspectFlags::SIG_CANT_MATCH)
                        && signature.file_interested());

                if park || feed_arbiter {
                    let mut parked = false;
                    let disable = {
                        let state = flow
                            .alstate
                            .as_deref_mut()
                            .expect("Application layer state was just read");
                        let Some(tx) = state.tx_mut(tx_id) else {
                            continue;
                        };
                        if tx.detect_state().is_none() {
                            tx.set_detect_state(TxDetectState::new());
                            assert!(
                                tx.detect_state().is_some(),
                                "Parser advertised detect state support but dropped the attachment"
                            );
                            self.context
                                .metrics
                                .engine_metrics
                                .tx_detect_states_created
                                .inc();
                        }
                        let dir_state = tx
                            .detect_state_mut()
                            .expect("Detect state attached above")
                            .dir_mut(dir);
                        if park {
                            let record = TxRecord {
                                sid,
                                flags: outcome.flags,
                            };
                            match dir_state
                                .store
                                .append(record, self.context.parameters.max_state_records)
                            {
                                Ok(()) => {
                                    parked = true;
                                    self.context
                                        .metrics
                                        .engine_metrics
                                        .records_parked
                                        .with_label_values(&[dir.label()])
                                        .inc();
                                }
                                Err(err) => {
                                    debug!("Not parking {sid} on tx {tx_id}: {err}");
                                    self.context.metrics.engine_metrics.records_dropped.inc();
                                }
                            }
                        }
                        // A dropped record means the signature will be
                        // re-evaluated from scratch; counting it now would
                        // count it twice.
                        feed_arbiter
                            && (parked || !park)
                            && FileStoreArbiter::note_cant_match(
                                dir_state,
                                rules.signatures.file_rule_count(dir),
                            )
                    };
                    stored = stored || parked || feed_arbiter;
                    if disable {
                        self.disable_storing(flow, tx_id, dir);
                    }
                }
                tctx.process_flow_vars(flow.flow_vars_mut());
            }
        }

        // Generic flow program, for protocols matched at the application
        // layer rather than per transaction.
        if !signature.flow_program().is_empty() && flow.alstate.is_some() {
            let already_parked = flow.de_state.as_ref().map_or(false, |state| {
                state.dir(dir).store.iter().any(|record| record.sid == sid)
            });
            if !already_parked {
                let (flags, cursor, matched) = {
                    let state = flow
                        .alstate
                        .as_deref()
                        .expect("Application layer state was just read");
                    run_flow_program(signature, state, 0, InspectFlags::empty())
                };
                if matched {
                    alerted = true;
                    self.run_post_match(tctx, flow, signature, None, dir);
                }
                let record = FlowRecord { sid, flags, cursor };
                let de_state = flow.de_state.get_or_insert_with(FlowDetectState::new);
                match de_state
                    .dir_mut(dir)
                    .store
                    .append(record, self.context.parameters.max_state_records)
                {
                    Ok(()) => {
                        stored = true;
                        self.context
                            .metrics
                            .engine_metrics
                            .records_parked
                            .with_label_values(&[dir.label()])
                            .inc();
                    }
                    Err(err) => {
                        debug!("Not parking flow rule {sid}: {err}");
                        self.context.metrics.engine_metrics.records_dropped.inc();
                    }
                }
                tctx.process_flow_vars(flow.flow_vars_mut());
            }
        }

        // Single shot DCE payload matching; never parked.
        if let Some(matcher) = signature.dce_payload() {
            if alproto.is_dce() {
                let matched = flow
                    .alstate
                    .as_deref()
                    .map_or(false, |state| matcher(signature, state));
                if matched {
                    alerted = true;
                    self.run_post_match(tctx, flow, signature, None, dir);
                    tctx.process_flow_vars(flow.flow_vars_mut());
                }
            }
        }

        if stored {
            flow.update_detect_version(dir, alversion);
        }
        alerted
    }

    /// Continue path: resumes every parked record of the direction, replaying
    /// only the engines that are still undecided. Alerts are enqueued on the
    /// thread context as a side effect.
    pub fn continue_detection(
        &self,
        tctx: &mut DetectThreadCtx,
        flow: &mut Flow,
        packet: &Packet,
        dir: Direction,
        alversion: AlVersion,
    ) {
        let rules = self.rules.load();
        tctx.reset_no_new_state(rules.signatures.len());

        let eof = flow.is_eof(dir) || packet.eof;
        if flow.detect_version(dir) == alversion && !eof {
            trace!("No new inspectable state for {dir}, skipping continuation");
            self.context
                .metrics
                .engine_metrics
                .continuations_short_circuited
                .inc();
            return;
        }

        let tx_meta = flow.alstate.as_deref().and_then(|state| {
            state.supports_tx_detect_state().then(|| {
                (
                    state.inspect_id(dir),
                    state.tx_count(),
                    state.completion_progress(dir),
                )
            })
        });
        if let Some((inspect_id, tx_count, complete_at)) = tx_meta {
            for tx_id in self.tx_window(inspect_id, tx_count) {
                let progress = {
                    let state = flow
                        .alstate
                        .as_deref()
                        .expect("Application layer state was just read");
                    state.tx(tx_id).map(|tx| tx.progress(dir))
                };
                let Some(progress) = progress else {
                    continue;
                };
                let tx_in_progress = progress < complete_at;
                let is_last = tx_id + 1 == tx_count;

                // Raise the new-file invitation before walking the records.
                let record_count = {
                    let state = flow
                        .alstate
                        .as_deref_mut()
                        .expect("Application layer state was just read");
                    let Some(tx) = state.tx_mut(tx_id) else {
                        continue;
                    };
                    if tx.take_files_updated(dir) {
                        if let Some(ds) = tx.detect_state_mut() {
                            ds.dir_mut(dir)
                                .flags
                                .insert(DirectionFlags::file_new(dir));
                        }
                    }
                    tx.detect_state().map_or(0, |ds| ds.dir(dir).store.len())
                };

                for index in 0..record_count {
                    self.inspect_item(
                        tctx,
                        flow,
                        &rules,
                        tx_id,
                        index,
                        dir,
                        is_last,
                        tx_in_progress,
                    );
                    tctx.process_flow_vars(flow.flow_vars_mut());
                }

                // The invitation was honored by this pass.
                {
                    let state = flow
                        .alstate
                        .as_deref_mut()
                        .expect("Application layer state was just read");
                    if let Some(tx) = state.tx_mut(tx_id) {
                        if let Some(ds) = tx.detect_state_mut() {
                            ds.dir_mut(dir)
                                .flags
                                .remove(DirectionFlags::file_new(dir));
                        }
                    }
                }

                // Records of later transactions wait until this one is done.
                if tx_in_progress {
                    break;
                }
            }
        }

        self.continue_flow_records(tctx, flow, &rules, dir);

        flow.update_detect_version(dir, alversion);
    }

    /// Advances the parser's inspect cursor past every transaction that is
    /// complete for the direction.
    pub fn update_inspect_tx_id(&self, flow: &mut Flow, dir: Direction) {
        let Some(state) = flow.alstate.as_deref_mut() else {
            return;
        };
        let complete_at = state.completion_progress(dir);
        let tx_count = state.tx_count();
        let mut tx_id = state.inspect_id(dir);
        while tx_id < tx_count {
            match state.tx(tx_id) {
                Some(tx) if tx.progress(dir) < complete_at => break,
                // A missing transaction was already freed by the parser.
                _ => tx_id += 1,
            }
        }
        if tx_id != state.inspect_id(dir) {
            trace!("Advancing {dir} inspect cursor to tx {tx_id}");
            state.set_inspect_id(dir, tx_id);
        }
    }

    /// Zeroes the per-direction counters of the flow-scoped state, e.g. when
    /// the direction's transaction cursor advanced.
    pub fn reset_flow_state(&self, flow: &mut Flow, dir: Direction) {
        if let Some(state) = flow.de_state.as_mut() {
            state.reset_direction(dir);
        }
    }

    /// Engine reload hook: wipes the continuation state of every live
    /// transaction (both directions) and of the flow itself, freeing the
    /// engine to re-evaluate against the new rule set.
    pub fn reset_live_transactions(&self, flow: &mut Flow) {
        if let Some(state) = flow.alstate.as_deref_mut() {
            for tx_id in 0..state.tx_count() {
                if let Some(tx) = state.tx_mut(tx_id) {
                    if let Some(ds) = tx.detect_state_mut() {
                        ds.reset();
                        self.context.metrics.engine_metrics.live_tx_resets.inc();
                    }
                }
            }
        }
        if let Some(state) = flow.de_state.as_mut() {
            state.reset();
        }
        debug!("Reset live transaction detect state for reload");
    }

    /// The transaction ids one start or continue call walks, optionally
    /// bounded by configuration.
    fn tx_window(&self, inspect_id: TxId, tx_count: TxId) -> std::ops::Range<TxId> {
        let cap = self.context.parameters.max_inspected_txs_per_call;
        let end = if cap > 0 {
            tx_count.min(inspect_id.saturating_add(cap))
        } else {
            tx_count
        };
        inspect_id..end
    }

    /// Resumes one transaction-scoped record.
    #[allow(clippy::too_many_arguments)]
    fn inspect_item(
        &self,
        tctx: &mut DetectThreadCtx,
        flow: &mut Flow,
        rules: &RuleContext,
        tx_id: TxId,
        index: usize,
        dir: Direction,
        is_last: bool,
        tx_in_progress: bool,
    ) {
        // Snapshot the record and the direction's new-file invitation.
        let snapshot = flow
            .alstate
            .as_deref()
            .and_then(|state| state.tx(tx_id))
            .and_then(|tx| tx.detect_state())
            .and_then(|ds| {
                let dir_state = ds.dir(dir);
                dir_state.store.get(index).map(|record| {
                    (
                        *record,
                        dir_state.flags.contains(DirectionFlags::file_new(dir)),
                    )
                })
            });
        let Some((mut record, file_new)) = snapshot else {
            return;
        };

        let signature = rules.signatures.get(record.sid);
        let file_bit = InspectFlags::file_inspect(dir);
        let mut reconsidered_file_rule = false;

        if record.flags.contains(InspectFlags::FULL_INSPECT) {
            if record.flags.intersects(file_bit) && file_new {
                // A new file arrived: retract the conclusion and re-run the
                // file engine below.
                record.flags.remove(file_bit);
                record.flags.remove(InspectFlags::FULL_INSPECT);
            } else {
                if is_last || tx_in_progress {
                    tctx.publish_no_new_state(record.sid);
                }
                return;
            }
        } else if record.flags.contains(InspectFlags::SIG_CANT_MATCH) {
            if record.flags.intersects(file_bit) && file_new {
                record.flags.remove(file_bit);
                record.flags.remove(InspectFlags::SIG_CANT_MATCH);
                reconsidered_file_rule = signature.file_interested();
            } else {
                if is_last || tx_in_progress {
                    tctx.publish_no_new_state(record.sid);
                }
                return;
            }
        }

        // Resume the engines that are still undecided.
        let outcome = {
            let state = flow
                .alstate
                .as_deref()
                .expect("Record was read from this state");
            let Some(tx) = state.tx(tx_id) else {
                return;
            };
            inspect_tx_signature(
                rules.engines.engines(flow.alproto, dir),
                signature,
                state,
                tx,
                tx_id,
                dir,
                record.flags,
            )
        };
        self.context
            .metrics
            .engine_metrics
            .records_continued
            .with_label_values(&[dir.label()])
            .inc();

        let refused = outcome.file_no_match
            || (outcome.flags.contains(InspectFlags::SIG_CANT_MATCH)
                && signature.file_interested());
        let disable = {
            let state = flow
                .alstate
                .as_deref_mut()
                .expect("Record was read from this state");
            let Some(tx) = state.tx_mut(tx_id) else {
                return;
            };
            let dir_state = tx
                .detect_state_mut()
                .expect("Record was read from this state")
                .dir_mut(dir);
            if reconsidered_file_rule {
                FileStoreArbiter::note_reconsidered(dir_state);
            }
            if let Some(slot) = dir_state.store.get_mut(index) {
                *slot = TxRecord {
                    sid: record.sid,
                    flags: outcome.flags,
                };
            }
            refused
                && FileStoreArbiter::note_cant_match(
                    dir_state,
                    rules.signatures.file_rule_count(dir),
                )
        };
        if disable {
            self.disable_storing(flow, tx_id, dir);
        }

        if outcome.verdict == TxInspectVerdict::Alert {
            self.run_post_match(tctx, flow, signature, Some(tx_id), dir);
        }
        if is_last {
            tctx.publish_no_new_state(record.sid);
        }
    }

    /// Resumes the flow-scoped records of the direction.
    fn continue_flow_records(
        &self,
        tctx: &mut DetectThreadCtx,
        flow: &mut Flow,
        rules: &RuleContext,
        dir: Direction,
    ) {
        if flow.alstate.is_none() {
            return;
        }
        let record_count = flow
            .de_state
            .as_ref()
            .map_or(0, |state| state.dir(dir).store.len());
        for index in 0..record_count {
            let mut record = *flow
                .de_state
                .as_ref()
                .expect("Counted above")
                .dir(dir)
                .store
                .get(index)
                .expect("Counted above");
            let signature = rules.signatures.get(record.sid);

            if record
                .flags
                .intersects(InspectFlags::FULL_INSPECT | InspectFlags::SIG_CANT_MATCH)
            {
                tctx.publish_no_new_state(record.sid);
                continue;
            }

            let (flags, cursor, matched) = {
                let state = flow
                    .alstate
                    .as_deref()
                    .expect("Checked at entry");
                run_flow_program(signature, state, record.cursor, record.flags)
            };
            record.flags = flags;
            record.cursor = cursor;
            self.context
                .metrics
                .engine_metrics
                .records_continued
                .with_label_values(&[dir.label()])
                .inc();

            if let Some(slot) = flow
                .de_state
                .as_mut()
                .expect("Counted above")
                .dir_mut(dir)
                .store
                .get_mut(index)
            {
                *slot = record;
            }

            if matched {
                self.run_post_match(tctx, flow, signature, None, dir);
            }
            // Whatever happened, this record is settled for this packet.
            tctx.publish_no_new_state(record.sid);
            tctx.process_flow_vars(flow.flow_vars_mut());
        }
    }

    /// Applies a matched signature's side effects and enqueues the alert.
    fn run_post_match(
        &self,
        tctx: &mut DetectThreadCtx,
        flow: &mut Flow,
        signature: &Signature,
        tx_id: Option<TxId>,
        dir: Direction,
    ) {
        // Post-match code runs while this thread already holds the flow lock;
        // the marker keeps re-entrant code from locking again.
        tctx.set_flow_locked(true);
        for action in signature.postmatch() {
            match action {
                PostMatchAction::StoreFiles => {
                    if let (Some(tx_id), Some(state)) = (tx_id, flow.alstate.as_deref_mut()) {
                        self.files.store_files(state, tx_id, dir);
                    }
                }
                PostMatchAction::SetFlowVar { id, value } => {
                    tctx.stage_flow_var(*id, *value);
                }
            }
        }
        tctx.set_flow_locked(false);

        if signature.no_alert() {
            trace!("Suppressing alert for no-alert signature {}", signature.id());
        } else {
            tctx.append_alert(signature, tx_id);
            self.context.metrics.engine_metrics.state_alerts.inc();
        }
    }

    fn disable_storing(&self, flow: &mut Flow, tx_id: TxId, dir: Direction) {
        if let Some(state) = flow.alstate.as_deref_mut() {
            self.files.disable_storing(state, tx_id, dir);
        }
        self.context
            .metrics
            .engine_metrics
            .filestore_disabled
            .with_label_values(&[dir.label()])
            .inc();
        debug!("File storage disabled for tx {tx_id} {dir}");
    }
}

/// Inspects one transaction for the start path. Returns None when the
/// transaction is absent or already carries a record for this signature.
fn inspect_start_tx(
    rules: &RuleContext,
    signature: &Signature,
    state: &dyn AppLayerState,
    alproto: AppProto,
    tx_id: TxId,
    dir: Direction,
) -> Option<(InspectOutcome, u8)> {
    let tx = state.tx(tx_id)?;
    if tx.detect_state().map_or(false, |ds| {
        ds.dir(dir)
            .store
            .iter()
            .any(|record| record.sid == signature.id())
    }) {
        return None;
    }
    let progress = tx.progress(dir);
    let outcome = inspect_tx_signature(
        rules.engines.engines(alproto, dir),
        signature,
        state,
        tx,
        tx_id,
        dir,
        InspectFlags::empty(),
    );
    Some((outcome, progress))
}

/// Runs a signature's generic flow program from `cursor`. Each instruction
/// either advances the program, rules the signature out, or suspends it at
/// the instruction that needed more data. Returns the updated flags, the next
/// undecided instruction, and whether the program completed with at least one
/// match on this pass.
fn run_flow_program(
    signature: &Signature,
    state: &dyn AppLayerState,
    mut cursor: usize,
    mut flags: InspectFlags,
) -> (InspectFlags, usize, bool) {
    let program = signature.flow_program();
    let mut total_matches = 0u32;
    while cursor < program.len() {
        match (program[cursor])(signature, state) {
            EngineVerdict::Match => {
                total_matches += 1;
                cursor += 1;
            }
            EngineVerdict::CantMatch | EngineVerdict::CantMatchFilestore => {
                flags.insert(InspectFlags::SIG_CANT_MATCH | InspectFlags::FLOW);
                break;
            }
            EngineVerdict::NeedsMoreData => break,
        }
    }
    let matched = cursor == program.len()
        && !flags.contains(InspectFlags::SIG_CANT_MATCH)
        && total_matches > 0;
    if matched {
        flags.insert(InspectFlags::FULL_INSPECT | InspectFlags::FLOW);
    }
    (flags, cursor, matched)
}

#[cfg(test)]
#[path = "tests/http_continuation_tests.rs"]
mod http_continuation_tests;

#[cfg(test)]
#[path = "tests/file_inspect_tests.rs"]
mod file_inspect_tests;

#[cfg(test)]
#[path = "tests/flow_rule_tests.rs"]
mod flow_rule_tests;

#[cfg(test)]
#[path = "tests/reset_reload_tests.rs"]
mod reset_reload_tests;
