// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use detection_config::Parameters;

#[cfg(test)]
use crate::metrics::test_metrics;
use crate::metrics::Metrics;

/// Context contains configuration and metrics shared by all components of the
/// stateful detection engine.
#[derive(Clone)]
pub(crate) struct Context {
    /// Operational parameters of this engine.
    pub parameters: Parameters,
    /// Metrics of this engine.
    pub metrics: Arc<Metrics>,
}

impl Context {
    pub(crate) fn new(parameters: Parameters, metrics: Arc<Metrics>) -> Self {
        Self {
            parameters,
            metrics,
        }
    }

    /// Create a test context with default parameters and a private registry.
    #[cfg(test)]
    pub(crate) fn new_for_test() -> Self {
        Context::new(Parameters::default(), test_metrics())
    }

    #[cfg(test)]
    pub(crate) fn with_parameters(mut self, parameters: Parameters) -> Self {
        self.parameters = parameters;
        self
    }
}
