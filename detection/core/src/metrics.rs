// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use prometheus::{
    register_int_counter_vec_with_registry, register_int_counter_with_registry, IntCounter,
    IntCounterVec, Registry,
};

/// Metrics of the stateful detection engine.
pub(crate) struct Metrics {
    pub(crate) engine_metrics: EngineMetrics,
}

pub(crate) fn initialise_metrics(registry: Registry) -> Arc<Metrics> {
    Arc::new(Metrics {
        engine_metrics: EngineMetrics::new(&registry),
    })
}

#[cfg(test)]
pub(crate) fn test_metrics() -> Arc<Metrics> {
    initialise_metrics(Registry::new())
}

pub(crate) struct EngineMetrics {
    /// Progress records appended per direction, transaction and flow scoped.
    pub records_parked: IntCounterVec,
    /// Parked records resumed by the continue path.
    pub records_continued: IntCounterVec,
    /// Records that could not be parked because the store cap was reached.
    pub records_dropped: IntCounter,
    /// Alerts raised from stateful inspection.
    pub state_alerts: IntCounter,
    /// Continue calls skipped because the application layer had not advanced.
    pub continuations_short_circuited: IntCounter,
    /// Transaction detect states created lazily on first parking.
    pub tx_detect_states_created: IntCounter,
    /// File storage disabled for a (transaction, direction).
    pub filestore_disabled: IntCounterVec,
    /// Live transaction detect states wiped on engine reload.
    pub live_tx_resets: IntCounter,
}

impl EngineMetrics {
    fn new(registry: &Registry) -> Self {
        Self {
            records_parked: register_int_counter_vec_with_registry!(
                "detect_records_parked",
                "Number of progress records appended, by direction",
                &["direction"],
                registry,
            )
            .unwrap(),
            records_continued: register_int_counter_vec_with_registry!(
                "detect_records_continued",
                "Number of parked records resumed by the continue path, by direction",
                &["direction"],
                registry,
            )
            .unwrap(),
            records_dropped: register_int_counter_with_registry!(
                "detect_records_dropped",
                "Number of records dropped because the per-direction store cap was reached",
                registry,
            )
            .unwrap(),
            state_alerts: register_int_counter_with_registry!(
                "detect_state_alerts",
                "Number of alerts raised from stateful inspection",
                registry,
            )
            .unwrap(),
            continuations_short_circuited: register_int_counter_with_registry!(
                "detect_continuations_short_circuited",
                "Continue calls skipped because the app layer version had not advanced",
                registry,
            )
            .unwrap(),
            tx_detect_states_created: register_int_counter_with_registry!(
                "detect_tx_states_created",
                "Transaction detect states created lazily on first parking",
                registry,
            )
            .unwrap(),
            filestore_disabled: register_int_counter_vec_with_registry!(
                "detect_filestore_disabled",
                "File storage disabled for a transaction and direction",
                &["direction"],
                registry,
            )
            .unwrap(),
            live_tx_resets: register_int_counter_with_registry!(
                "detect_live_tx_resets",
                "Live transaction detect states wiped on engine reload",
                registry,
            )
            .unwrap(),
        }
    }
}
