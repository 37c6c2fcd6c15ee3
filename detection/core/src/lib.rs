// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

mod alert;
mod context;
mod detector;
mod dispatcher;
mod error;
mod filestore;
mod flags;
mod flow;
mod inspection;
mod metrics;
mod parser;
mod record_store;
mod signature;
mod thread;

#[cfg(test)]
mod test_http;

pub use alert::{AlertFlags, PacketAlert};
pub use detector::{InspectableState, RuleContext, StatefulDetector};
pub use error::{DetectError, DetectResult};
pub use filestore::{FileSubsystem, NoopFileSubsystem};
pub use flags::{DirectionFlags, InspectFlags};
pub use flow::{Flow, Packet, SharedFlow};
pub use inspection::{EngineCallback, EngineVerdict, InspectionEngine, InspectionEngineTable};
pub use parser::{AppLayerState, AppLayerTx, AppProto};
pub use record_store::{FlowDetectState, FlowRecord, TxDetectState, TxRecord, CHUNK_SIZE};
pub use signature::{
    DcePayloadFn, FlowInstructionFn, MatchList, PostMatchAction, Signature, SignatureBuilder,
    SignatureFlags, SignatureTable, SmList,
};
pub use thread::DetectThreadCtx;
