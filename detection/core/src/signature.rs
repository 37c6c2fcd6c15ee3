// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use detection_config::{Direction, SignatureId};

use crate::inspection::EngineVerdict;
use crate::parser::AppLayerState;

/// Identifies which compiled match list of a signature an inspection engine
/// consumes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SmList {
    Uri,
    Method,
    Header,
    Cookie,
    ClientBody,
    ServerBody,
    /// File keywords (filename, filestore) share one list; the file engine of
    /// each direction consumes it.
    FileMatch,
    /// Generic application layer match program, run against the flow.
    AppLayer,
    /// Single-shot DCE payload matcher.
    DcePayload,
}

/// One compiled match list of a signature. The engine never interprets the
/// content; the inspection engines behind the callbacks do.
#[derive(Clone, Debug, Default)]
pub struct MatchList {
    pub patterns: Vec<Vec<u8>>,
}

/// One instruction of a signature's generic flow match program. Returns
/// `Match` to advance the program, `CantMatch` to rule the signature out, or
/// `NeedsMoreData` to suspend at this instruction.
pub type FlowInstructionFn =
    Arc<dyn Fn(&Signature, &dyn AppLayerState) -> EngineVerdict + Send + Sync>;

/// Single-shot DCE payload matcher, invoked when the application layer state
/// is SMB or DCERPC. True means the signature matched.
pub type DcePayloadFn = Arc<dyn Fn(&Signature, &dyn AppLayerState) -> bool + Send + Sync>;

/// Side effects a signature applies once it has fully matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PostMatchAction {
    /// Flag the files of the matched transaction for storage.
    StoreFiles,
    /// Set a flow variable.
    SetFlowVar { id: u32, value: u64 },
}

/// Behavioral flags of a signature.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct SignatureFlags(u8);

impl SignatureFlags {
    /// Suppress alert output; packet actions and post-match side effects
    /// still apply.
    pub const NO_ALERT: SignatureFlags = SignatureFlags(1);
    /// The signature inspects files; it participates in the file store
    /// arbiter's accounting.
    pub const FILE_INTERESTED: SignatureFlags = SignatureFlags(1 << 1);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

impl fmt::Debug for SignatureFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SignatureFlags({:#04x})", self.0)
    }
}

/// A compiled signature as the continuation engine sees it: identity, the
/// match lists the inspection engines consume, and post-match side effects.
/// Rule parsing and compilation happen elsewhere; this type is the read-only
/// product.
pub struct Signature {
    id: SignatureId,
    direction: Direction,
    flags: SignatureFlags,
    sm_lists: BTreeMap<SmList, MatchList>,
    flow_program: Vec<FlowInstructionFn>,
    dce_payload: Option<DcePayloadFn>,
    postmatch: Vec<PostMatchAction>,
}

impl Signature {
    pub fn builder(id: SignatureId) -> SignatureBuilder {
        SignatureBuilder {
            id,
            direction: Direction::ToServer,
            flags: SignatureFlags::empty(),
            sm_lists: BTreeMap::new(),
            flow_program: Vec::new(),
            dce_payload: None,
            postmatch: Vec::new(),
        }
    }

    pub fn id(&self) -> SignatureId {
        self.id
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn no_alert(&self) -> bool {
        self.flags.contains(SignatureFlags::NO_ALERT)
    }

    pub fn file_interested(&self) -> bool {
        self.flags.contains(SignatureFlags::FILE_INTERESTED)
    }

    /// True when the signature carries a match list for `list`, i.e. the
    /// engine bound to that list must be decided before the signature can
    /// fully match.
    pub fn uses(&self, list: SmList) -> bool {
        self.sm_lists.contains_key(&list)
    }

    pub fn match_list(&self, list: SmList) -> Option<&MatchList> {
        self.sm_lists.get(&list)
    }

    pub fn flow_program(&self) -> &[FlowInstructionFn] {
        &self.flow_program
    }

    pub fn dce_payload(&self) -> Option<&DcePayloadFn> {
        self.dce_payload.as_ref()
    }

    pub fn postmatch(&self) -> &[PostMatchAction] {
        &self.postmatch
    }
}

impl fmt::Debug for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signature")
            .field("id", &self.id)
            .field("direction", &self.direction)
            .field("lists", &self.sm_lists.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct SignatureBuilder {
    id: SignatureId,
    direction: Direction,
    flags: SignatureFlags,
    sm_lists: BTreeMap<SmList, MatchList>,
    flow_program: Vec<FlowInstructionFn>,
    dce_payload: Option<DcePayloadFn>,
    postmatch: Vec<PostMatchAction>,
}

impl SignatureBuilder {
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Adds a pattern to the given match list, creating the list on first use.
    pub fn pattern(mut self, list: SmList, pattern: &[u8]) -> Self {
        self.sm_lists
            .entry(list)
            .or_default()
            .patterns
            .push(pattern.to_vec());
        self
    }

    /// Marks the signature as filestore: the file engine must conclude for it
    /// and a full match flags the transaction's files for storage.
    pub fn filestore(mut self) -> Self {
        self.sm_lists.entry(SmList::FileMatch).or_default();
        self.postmatch.push(PostMatchAction::StoreFiles);
        self
    }

    pub fn no_alert(mut self) -> Self {
        self.flags.insert(SignatureFlags::NO_ALERT);
        self
    }

    pub fn set_flow_var(mut self, id: u32, value: u64) -> Self {
        self.postmatch.push(PostMatchAction::SetFlowVar { id, value });
        self
    }

    pub fn flow_instruction(mut self, instruction: FlowInstructionFn) -> Self {
        self.sm_lists.entry(SmList::AppLayer).or_default();
        self.flow_program.push(instruction);
        self
    }

    pub fn dce_payload(mut self, matcher: DcePayloadFn) -> Self {
        self.sm_lists.entry(SmList::DcePayload).or_default();
        self.dce_payload = Some(matcher);
        self
    }

    pub fn build(mut self) -> Signature {
        if self.sm_lists.contains_key(&SmList::FileMatch) {
            self.flags.insert(SignatureFlags::FILE_INTERESTED);
        }
        Signature {
            id: self.id,
            direction: self.direction,
            flags: self.flags,
            sm_lists: self.sm_lists,
            flow_program: self.flow_program,
            dce_payload: self.dce_payload,
            postmatch: self.postmatch,
        }
    }
}

/// The process-wide signature array, read-only during packet processing.
/// Signatures are stored at the index their id encodes.
pub struct SignatureTable {
    signatures: Vec<Signature>,
    /// Number of file-interested signatures per direction, the denominator of
    /// the file store arbiter.
    file_interested: [usize; 2],
}

impl SignatureTable {
    pub fn new(signatures: Vec<Signature>) -> Self {
        let mut file_interested = [0usize; 2];
        for (index, signature) in signatures.iter().enumerate() {
            assert_eq!(
                signature.id().value(),
                index,
                "Signature {} stored at index {index}",
                signature.id()
            );
            if signature.file_interested() {
                file_interested[signature.direction().index()] += 1;
            }
        }
        Self {
            signatures,
            file_interested,
        }
    }

    pub fn get(&self, sid: SignatureId) -> &Signature {
        &self.signatures[sid.value()]
    }

    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Signature> {
        self.signatures.iter()
    }

    /// How many file-interested signatures the rule set carries for the
    /// direction. When that many have given up on a transaction, file storage
    /// for it can be disabled.
    pub fn file_rule_count(&self, dir: Direction) -> usize {
        self.file_interested[dir.index()]
    }
}
