// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;

use detection_config::{AlVersion, Direction};

use crate::parser::{AppLayerState, AppProto};
use crate::record_store::FlowDetectState;

/// Flows are shared across packet processing threads; within a flow, packets
/// are serialized by this write lock. The continuation engine executes
/// entirely while the lock is held, which is why its entry points take
/// `&mut Flow`.
pub type SharedFlow = Arc<RwLock<Flow>>;

/// The attributes of a packet the continuation engine reads. Decode and
/// payload handling happen elsewhere.
#[derive(Clone, Copy, Debug)]
pub struct Packet {
    pub direction: Direction,
    /// Set on the pseudo packet that flushes a flow at end of stream.
    pub eof: bool,
}

impl Packet {
    pub fn new(direction: Direction) -> Self {
        Self {
            direction,
            eof: false,
        }
    }

    pub fn eof(direction: Direction) -> Self {
        Self {
            direction,
            eof: true,
        }
    }
}

/// The per-flow state the continuation engine works on. Owned by the flow
/// table; handed to the engine under the flow write lock.
///
/// Ownership is hierarchical: the flow owns the parser state, the parser
/// state owns its transactions, and transactions own their detect state. The
/// engine holds no back-references, so no reference cycle can exist.
pub struct Flow {
    pub alproto: AppProto,
    pub alstate: Option<Box<dyn AppLayerState>>,
    /// Continuation state of the generic flow matchers, created lazily.
    pub(crate) de_state: Option<FlowDetectState>,
    /// Last application layer version inspected, per direction.
    detect_versions: [AlVersion; 2],
    /// End of flow markers, per direction.
    eof: [bool; 2],
    flow_vars: HashMap<u32, u64>,
}

impl Flow {
    pub fn new(alproto: AppProto) -> Self {
        Self {
            alproto,
            alstate: None,
            de_state: None,
            detect_versions: [0; 2],
            eof: [false; 2],
            flow_vars: HashMap::new(),
        }
    }

    pub fn with_alstate(alproto: AppProto, alstate: Box<dyn AppLayerState>) -> Self {
        let mut flow = Self::new(alproto);
        flow.alstate = Some(alstate);
        flow
    }

    pub fn set_eof(&mut self, dir: Direction) {
        self.eof[dir.index()] = true;
    }

    pub fn is_eof(&self, dir: Direction) -> bool {
        self.eof[dir.index()]
    }

    pub fn flow_detect_state(&self) -> Option<&FlowDetectState> {
        self.de_state.as_ref()
    }

    pub fn flow_detect_state_mut(&mut self) -> Option<&mut FlowDetectState> {
        self.de_state.as_mut()
    }

    pub fn flow_var(&self, id: u32) -> Option<u64> {
        self.flow_vars.get(&id).copied()
    }

    pub(crate) fn flow_vars_mut(&mut self) -> &mut HashMap<u32, u64> {
        &mut self.flow_vars
    }

    pub(crate) fn detect_version(&self, dir: Direction) -> AlVersion {
        self.detect_versions[dir.index()]
    }

    /// Stamps the direction with the version just inspected. The stamp never
    /// moves backwards.
    pub(crate) fn update_detect_version(&mut self, dir: Direction, version: AlVersion) {
        let stored = &mut self.detect_versions[dir.index()];
        debug_assert!(
            version >= *stored,
            "Application layer version moved backwards: {version} < {stored}"
        );
        if version > *stored {
            *stored = version;
        }
    }
}
