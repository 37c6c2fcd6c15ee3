// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use detection_config::{SignatureId, TxId};

use crate::alert::{AlertFlags, PacketAlert};
use crate::flow::Flow;
use crate::signature::Signature;

/// Per packet-processing-thread scratch state of the detection engine.
///
/// Holds everything the engine produces for the packet under evaluation: the
/// alert queue, the per-signature "no new state" filter consumed by the first
/// pass matcher, and staged flow variable updates. None of it is shared
/// between threads.
pub struct DetectThreadCtx {
    /// Signatures whose stateful inspection concluded for this packet; the
    /// first pass matcher skips starting them again.
    no_new_state: Vec<bool>,
    alerts: Vec<PacketAlert>,
    staged_flow_vars: Vec<(u32, u64)>,
    /// Set while post-match actions run so re-entrant code knows the flow
    /// write lock is already held by this thread.
    flow_locked: bool,
}

impl DetectThreadCtx {
    pub fn new(signature_count: usize) -> Self {
        Self {
            no_new_state: vec![false; signature_count],
            alerts: Vec::new(),
            staged_flow_vars: Vec::new(),
            flow_locked: false,
        }
    }

    /// Clears the per-packet filter. Called at the start of every continue
    /// pass; also resizes when a rule reload changed the signature count.
    pub(crate) fn reset_no_new_state(&mut self, signature_count: usize) {
        self.no_new_state.clear();
        self.no_new_state.resize(signature_count, false);
    }

    pub(crate) fn publish_no_new_state(&mut self, sid: SignatureId) {
        if let Some(slot) = self.no_new_state.get_mut(sid.value()) {
            *slot = true;
        }
    }

    /// True when stateful inspection may still produce something for the
    /// signature on this packet. The first pass matcher consults this before
    /// starting detection.
    pub fn has_new_state(&self, sid: SignatureId) -> bool {
        !self.no_new_state.get(sid.value()).copied().unwrap_or(false)
    }

    /// Enqueues an alert for the packet under evaluation.
    pub(crate) fn append_alert(&mut self, signature: &Signature, tx_id: Option<TxId>) {
        let mut flags = AlertFlags::STATE_MATCH;
        if tx_id.is_some() {
            flags.insert(AlertFlags::TX);
        }
        self.alerts.push(PacketAlert {
            sid: signature.id(),
            tx_id,
            flags,
        });
    }

    pub fn alerts(&self) -> &[PacketAlert] {
        &self.alerts
    }

    /// Drains the alerts queued for the packet under evaluation.
    pub fn take_alerts(&mut self) -> Vec<PacketAlert> {
        std::mem::take(&mut self.alerts)
    }

    pub(crate) fn stage_flow_var(&mut self, id: u32, value: u64) {
        self.staged_flow_vars.push((id, value));
    }

    /// Applies staged flow variable updates to the flow. Invoked after every
    /// record inspection, regardless of alert outcome, so side effects land
    /// deterministically.
    pub(crate) fn process_flow_vars(&mut self, flow_vars: &mut std::collections::HashMap<u32, u64>) {
        for (id, value) in self.staged_flow_vars.drain(..) {
            flow_vars.insert(id, value);
        }
    }

    /// Convenience wrapper for callers that hold the whole flow.
    pub fn process_flowvar_list(&mut self, flow: &mut Flow) {
        self.process_flow_vars(flow.flow_vars_mut());
    }

    pub(crate) fn set_flow_locked(&mut self, locked: bool) {
        self.flow_locked = locked;
    }

    /// True while the engine runs post-match actions under the flow write
    /// lock; re-entrant code must not lock the flow again.
    pub fn flow_locked(&self) -> bool {
        self.flow_locked
    }
}
