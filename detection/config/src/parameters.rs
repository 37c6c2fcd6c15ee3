// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use serde::{Deserialize, Serialize};

/// Operational configurations of the stateful detection engine.
///
/// All fields bound resource usage of a single flow without affecting match
/// correctness on well-behaved traffic, so operators can tune them per
/// deployment.
///
/// NOTE: default values should make sense, so most operators should not need to specify any field.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Parameters {
    /// Maximum number of progress records kept per direction of a transaction
    /// or flow. When the cap is reached further signatures are simply not
    /// remembered for continuation, trading late matches for bounded memory.
    #[serde(default = "Parameters::default_max_state_records")]
    pub max_state_records: usize,

    /// Maximum number of transactions a single start or continue call walks.
    /// 0 means unbounded. Guards against a parser advertising a pathological
    /// transaction window.
    #[serde(default = "Parameters::default_max_inspected_txs_per_call")]
    pub max_inspected_txs_per_call: u64,
}

impl Parameters {
    pub fn default_max_state_records() -> usize {
        4096
    }

    pub fn default_max_inspected_txs_per_call() -> u64 {
        0
    }
}

impl Default for Parameters {
    fn default() -> Self {
        Self {
            max_state_records: Parameters::default_max_state_records(),
            max_inspected_txs_per_call: Parameters::default_max_inspected_txs_per_call(),
        }
    }
}
