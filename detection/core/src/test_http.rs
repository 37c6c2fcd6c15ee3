// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

//! HTTP-flavored fixture for exercising the continuation engine end to end:
//! a minimal request parser producing transactions, the inspection engines a
//! real HTTP module would register, a file subsystem recording store
//! decisions, and a harness that drives the per-packet loop the enclosing
//! engine runs.

use std::any::Any;
use std::sync::Arc;

use detection_config::{AlVersion, Direction, Parameters, SignatureId, TxId};

use crate::detector::{InspectableState, RuleContext, StatefulDetector};
use crate::filestore::FileSubsystem;
use crate::flags::InspectFlags;
use crate::flow::{Flow, Packet};
use crate::inspection::{
    EngineCallback, EngineVerdict, InspectionEngine, InspectionEngineTable,
};
use crate::parser::{AppLayerState, AppLayerTx, AppProto};
use crate::record_store::{TxDetectState, TxRecord};
use crate::signature::{Signature, SignatureTable, SmList};
use crate::thread::DetectThreadCtx;
use crate::PacketAlert;

/// Request line parsed.
pub(crate) const PROGRESS_LINE: u8 = 1;
/// Header section complete.
pub(crate) const PROGRESS_HEADERS: u8 = 2;
/// Body complete; the transaction is done for the request side.
pub(crate) const PROGRESS_DONE: u8 = 3;

pub(crate) struct HttpFile {
    pub name: String,
    pub store: bool,
    pub nostore: bool,
}

pub(crate) struct HttpTx {
    pub method: String,
    pub uri: String,
    pub raw_headers: String,
    pub cookie: Option<String>,
    pub headers_complete: bool,
    pub content_length: usize,
    pub body: Vec<u8>,
    pub body_complete: bool,
    pub files: Vec<HttpFile>,
    store_disabled: [bool; 2],
    files_updated: [bool; 2],
    detect_state: Option<TxDetectState>,
}

impl HttpTx {
    fn new(method: String, uri: String) -> Self {
        Self {
            method,
            uri,
            raw_headers: String::new(),
            cookie: None,
            headers_complete: false,
            content_length: 0,
            body: Vec::new(),
            body_complete: false,
            files: Vec::new(),
            store_disabled: [false; 2],
            files_updated: [false; 2],
            detect_state: None,
        }
    }

    fn request_progress(&self) -> u8 {
        if self.body_complete {
            PROGRESS_DONE
        } else if self.headers_complete {
            PROGRESS_HEADERS
        } else {
            PROGRESS_LINE
        }
    }
}

impl AppLayerTx for HttpTx {
    fn progress(&self, dir: Direction) -> u8 {
        match dir {
            Direction::ToServer => self.request_progress(),
            // The fixture only models the request side.
            Direction::ToClient => 0,
        }
    }

    fn detect_state(&self) -> Option<&TxDetectState> {
        self.detect_state.as_ref()
    }

    fn detect_state_mut(&mut self) -> Option<&mut TxDetectState> {
        self.detect_state.as_mut()
    }

    fn set_detect_state(&mut self, state: TxDetectState) {
        self.detect_state = Some(state);
    }

    fn take_files_updated(&mut self, dir: Direction) -> bool {
        std::mem::take(&mut self.files_updated[dir.index()])
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

enum ParsePhase {
    Line,
    Headers,
    Body,
}

/// A line-based request parser, just real enough to produce the transaction
/// progression the engine cares about: request line, headers, body with
/// Content-Length, multipart file extraction, pipelined requests.
pub(crate) struct HttpState {
    txs: Vec<HttpTx>,
    inspect_ids: [TxId; 2],
    alversion: AlVersion,
    buffer: Vec<u8>,
    phase: ParsePhase,
}

impl HttpState {
    pub(crate) fn new() -> Self {
        Self {
            txs: Vec::new(),
            inspect_ids: [0; 2],
            alversion: 0,
            buffer: Vec::new(),
            phase: ParsePhase::Line,
        }
    }

    pub(crate) fn al_version(&self) -> AlVersion {
        self.alversion
    }

    pub(crate) fn http_tx(&self, tx_id: TxId) -> &HttpTx {
        &self.txs[tx_id as usize]
    }

    pub(crate) fn feed_to_server(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
        let mut advanced = false;
        loop {
            match self.phase {
                ParsePhase::Line => {
                    let Some(line) = self.take_line() else {
                        break;
                    };
                    if line.is_empty() {
                        continue;
                    }
                    let text = String::from_utf8_lossy(&line).into_owned();
                    let mut parts = text.split_whitespace();
                    let method = parts.next().unwrap_or("").to_string();
                    let uri = parts.next().unwrap_or("").to_string();
                    self.txs.push(HttpTx::new(method, uri));
                    self.phase = ParsePhase::Headers;
                    advanced = true;
                }
                ParsePhase::Headers => {
                    let Some(line) = self.take_line() else {
                        break;
                    };
                    advanced = true;
                    let tx = self.txs.last_mut().expect("Request line was parsed");
                    if line.is_empty() {
                        tx.headers_complete = true;
                        tx.content_length = content_length(&tx.raw_headers);
                        if tx.content_length == 0 {
                            tx.body_complete = true;
                            self.phase = ParsePhase::Line;
                        } else {
                            self.phase = ParsePhase::Body;
                        }
                    } else {
                        let text = String::from_utf8_lossy(&line).into_owned();
                        if let Some(value) = text.strip_prefix("Cookie:") {
                            tx.cookie = Some(value.trim().to_string());
                        }
                        tx.raw_headers.push_str(&text);
                        tx.raw_headers.push('\n');
                    }
                }
                ParsePhase::Body => {
                    let tx = self.txs.last_mut().expect("Request line was parsed");
                    let need = tx.content_length - tx.body.len();
                    if need == 0 {
                        tx.body_complete = true;
                        self.phase = ParsePhase::Line;
                        continue;
                    }
                    if self.buffer.is_empty() {
                        break;
                    }
                    let take = need.min(self.buffer.len());
                    tx.body.extend(self.buffer.drain(..take));
                    extract_files(tx);
                    advanced = true;
                    if tx.body.len() == tx.content_length {
                        tx.body_complete = true;
                        self.phase = ParsePhase::Line;
                    }
                }
            }
        }
        if advanced {
            self.alversion += 1;
        }
    }

    fn take_line(&mut self) -> Option<Vec<u8>> {
        let pos = self.buffer.windows(2).position(|window| window == b"\r\n")?;
        let line: Vec<u8> = self.buffer.drain(..pos).collect();
        self.buffer.drain(..2);
        Some(line)
    }
}

impl AppLayerState for HttpState {
    fn tx_count(&self) -> u64 {
        self.txs.len() as u64
    }

    fn tx(&self, tx_id: TxId) -> Option<&dyn AppLayerTx> {
        self.txs.get(tx_id as usize).map(|tx| tx as &dyn AppLayerTx)
    }

    fn tx_mut(&mut self, tx_id: TxId) -> Option<&mut dyn AppLayerTx> {
        self.txs
            .get_mut(tx_id as usize)
            .map(|tx| tx as &mut dyn AppLayerTx)
    }

    fn inspect_id(&self, dir: Direction) -> TxId {
        self.inspect_ids[dir.index()]
    }

    fn set_inspect_id(&mut self, dir: Direction, tx_id: TxId) {
        self.inspect_ids[dir.index()] = tx_id;
    }

    fn completion_progress(&self, _dir: Direction) -> u8 {
        PROGRESS_DONE
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn content_length(raw_headers: &str) -> usize {
    raw_headers
        .lines()
        .find_map(|line| line.strip_prefix("Content-Length:"))
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(0)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || haystack.len() < needle.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn contains_all(haystack: &[u8], patterns: &[Vec<u8>]) -> bool {
    patterns.iter().all(|p| find(haystack, p).is_some())
}

/// Registers multipart part filenames as extracted files, once each.
fn extract_files(tx: &mut HttpTx) {
    const MARKER: &[u8] = b"filename=\"";
    let body = tx.body.clone();
    let mut from = 0;
    while let Some(pos) = find(&body[from..], MARKER) {
        let start = from + pos + MARKER.len();
        let Some(end) = body[start..].iter().position(|&b| b == b'"') else {
            break;
        };
        let name = String::from_utf8_lossy(&body[start..start + end]).into_owned();
        if !tx.files.iter().any(|file| file.name == name) {
            let nostore = tx.store_disabled[Direction::ToServer.index()];
            tx.files.push(HttpFile {
                name,
                store: false,
                nostore,
            });
            tx.files_updated[Direction::ToServer.index()] = true;
        }
        from = start + end;
    }
}

/// File subsystem recording store decisions on the fixture transactions.
pub(crate) struct HttpFileSubsystem;

impl FileSubsystem for HttpFileSubsystem {
    fn disable_storing(&self, alstate: &mut dyn AppLayerState, tx_id: TxId, dir: Direction) {
        let state = alstate
            .as_any_mut()
            .downcast_mut::<HttpState>()
            .expect("HTTP fixture state");
        if let Some(tx) = state.txs.get_mut(tx_id as usize) {
            tx.store_disabled[dir.index()] = true;
            for file in &mut tx.files {
                if !file.store {
                    file.nostore = true;
                }
            }
        }
    }

    fn store_files(&self, alstate: &mut dyn AppLayerState, tx_id: TxId, _dir: Direction) {
        let state = alstate
            .as_any_mut()
            .downcast_mut::<HttpState>()
            .expect("HTTP fixture state");
        if let Some(tx) = state.txs.get_mut(tx_id as usize) {
            for file in &mut tx.files {
                file.store = true;
            }
        }
    }
}

fn http_tx_of<'a>(tx: &'a dyn AppLayerTx) -> &'a HttpTx {
    tx.as_any().downcast_ref::<HttpTx>().expect("HTTP fixture tx")
}

fn engine(sm_list: SmList, flag: InspectFlags, callback: EngineCallback) -> InspectionEngine {
    InspectionEngine::new(sm_list, flag, callback)
}

/// The request-side engines a real HTTP module registers, in their fixed
/// inspection order.
pub(crate) fn http_engine_table() -> InspectionEngineTable {
    let mut table = InspectionEngineTable::new();
    let ts = Direction::ToServer;

    table.register(
        AppProto::Http,
        ts,
        engine(
            SmList::Method,
            InspectFlags::METHOD,
            Arc::new(|signature, _state, tx, _tx_id, _dir| {
                let tx = http_tx_of(tx);
                let list = signature
                    .match_list(SmList::Method)
                    .expect("Engine invoked for its own list");
                if contains_all(tx.method.as_bytes(), &list.patterns) {
                    EngineVerdict::Match
                } else {
                    EngineVerdict::CantMatch
                }
            }),
        ),
    );

    table.register(
        AppProto::Http,
        ts,
        engine(
            SmList::Uri,
            InspectFlags::URI,
            Arc::new(|signature, _state, tx, _tx_id, _dir| {
                let tx = http_tx_of(tx);
                let list = signature
                    .match_list(SmList::Uri)
                    .expect("Engine invoked for its own list");
                if contains_all(tx.uri.as_bytes(), &list.patterns) {
                    EngineVerdict::Match
                } else {
                    EngineVerdict::CantMatch
                }
            }),
        ),
    );

    table.register(
        AppProto::Http,
        ts,
        engine(
            SmList::Header,
            InspectFlags::HEADER,
            Arc::new(|signature, _state, tx, _tx_id, _dir| {
                let tx = http_tx_of(tx);
                let list = signature
                    .match_list(SmList::Header)
                    .expect("Engine invoked for its own list");
                if contains_all(tx.raw_headers.as_bytes(), &list.patterns) {
                    EngineVerdict::Match
                } else if tx.headers_complete {
                    EngineVerdict::CantMatch
                } else {
                    EngineVerdict::NeedsMoreData
                }
            }),
        ),
    );

    table.register(
        AppProto::Http,
        ts,
        engine(
            SmList::Cookie,
            InspectFlags::COOKIE,
            Arc::new(|signature, _state, tx, _tx_id, _dir| {
                let tx = http_tx_of(tx);
                let list = signature
                    .match_list(SmList::Cookie)
                    .expect("Engine invoked for its own list");
                match &tx.cookie {
                    Some(cookie) if contains_all(cookie.as_bytes(), &list.patterns) => {
                        EngineVerdict::Match
                    }
                    Some(_) => EngineVerdict::CantMatch,
                    None if tx.headers_complete => EngineVerdict::CantMatch,
                    None => EngineVerdict::NeedsMoreData,
                }
            }),
        ),
    );

    table.register(
        AppProto::Http,
        ts,
        engine(
            SmList::ClientBody,
            InspectFlags::CLIENT_BODY,
            Arc::new(|signature, _state, tx, _tx_id, _dir| {
                let tx = http_tx_of(tx);
                let list = signature
                    .match_list(SmList::ClientBody)
                    .expect("Engine invoked for its own list");
                if contains_all(&tx.body, &list.patterns) {
                    EngineVerdict::Match
                } else if tx.body_complete {
                    EngineVerdict::CantMatch
                } else {
                    EngineVerdict::NeedsMoreData
                }
            }),
        ),
    );

    table.register(
        AppProto::Http,
        ts,
        engine(
            SmList::FileMatch,
            InspectFlags::FILE_TS,
            Arc::new(|signature, _state, tx, _tx_id, _dir| {
                let tx = http_tx_of(tx);
                let list = signature
                    .match_list(SmList::FileMatch)
                    .expect("Engine invoked for its own list");
                if tx.files.is_empty() {
                    return if tx.body_complete {
                        EngineVerdict::CantMatchFilestore
                    } else {
                        EngineVerdict::NeedsMoreData
                    };
                }
                if list.patterns.is_empty() {
                    // Pure filestore: any file satisfies it.
                    return EngineVerdict::Match;
                }
                if tx
                    .files
                    .iter()
                    .any(|file| contains_all(file.name.as_bytes(), &list.patterns))
                {
                    EngineVerdict::Match
                } else if tx.body_complete {
                    EngineVerdict::CantMatchFilestore
                } else {
                    EngineVerdict::NeedsMoreData
                }
            }),
        ),
    );

    table
}

/// Drives the per-packet loop the enclosing engine runs: feed the parser,
/// short-circuit check, continue parked state, start fresh candidates, then
/// advance the inspect cursor.
pub(crate) struct HttpHarness {
    pub detector: StatefulDetector,
    pub tctx: DetectThreadCtx,
    pub flow: Flow,
    sig_dirs: Vec<Direction>,
}

impl HttpHarness {
    pub(crate) fn new(signatures: Vec<Signature>) -> Self {
        let sig_dirs = signatures.iter().map(|s| s.direction()).collect();
        let rules = RuleContext {
            signatures: SignatureTable::new(signatures),
            engines: http_engine_table(),
        };
        let detector = StatefulDetector::new_for_test(rules, Arc::new(HttpFileSubsystem));
        Self::with_detector(detector, sig_dirs)
    }

    pub(crate) fn with_parameters(parameters: Parameters, signatures: Vec<Signature>) -> Self {
        let sig_dirs = signatures.iter().map(|s| s.direction()).collect();
        let rules = RuleContext {
            signatures: SignatureTable::new(signatures),
            engines: http_engine_table(),
        };
        let detector = StatefulDetector::new_for_test_with_parameters(
            parameters,
            rules,
            Arc::new(HttpFileSubsystem),
        );
        Self::with_detector(detector, sig_dirs)
    }

    fn with_detector(detector: StatefulDetector, sig_dirs: Vec<Direction>) -> Self {
        let tctx = DetectThreadCtx::new(detector.signature_count());
        let flow = Flow::with_alstate(AppProto::Http, Box::new(HttpState::new()));
        Self {
            detector,
            tctx,
            flow,
            sig_dirs,
        }
    }

    pub(crate) fn packet(&mut self, dir: Direction, data: &[u8]) -> Vec<PacketAlert> {
        self.run_packet(Packet::new(dir), data)
    }

    /// A pseudo packet flushing the direction at end of flow.
    pub(crate) fn packet_eof(&mut self, dir: Direction) -> Vec<PacketAlert> {
        self.run_packet(Packet::eof(dir), &[])
    }

    fn run_packet(&mut self, packet: Packet, data: &[u8]) -> Vec<PacketAlert> {
        let dir = packet.direction;
        if !data.is_empty() {
            self.http_state_mut().feed_to_server(data);
        }
        let alversion = self.al_version();

        match self
            .detector
            .has_inspectable_state(&self.flow, dir, AppProto::Http, alversion)
        {
            InspectableState::Updated => {
                self.detector
                    .continue_detection(&mut self.tctx, &mut self.flow, &packet, dir, alversion);
            }
            InspectableState::None | InspectableState::Unchanged => {
                self.tctx
                    .reset_no_new_state(self.detector.signature_count());
            }
        }

        for (index, sig_dir) in self.sig_dirs.clone().into_iter().enumerate() {
            let sid = SignatureId::new(index as u32);
            if sig_dir == dir && self.tctx.has_new_state(sid) {
                self.detector
                    .start_detection(&mut self.tctx, &mut self.flow, &packet, sid, dir, alversion);
            }
        }

        self.detector.update_inspect_tx_id(&mut self.flow, dir);
        self.tctx.take_alerts()
    }

    pub(crate) fn al_version(&self) -> AlVersion {
        self.http_state().al_version()
    }

    pub(crate) fn http_state(&self) -> &HttpState {
        self.flow
            .alstate
            .as_deref()
            .expect("Harness flows always carry state")
            .as_any()
            .downcast_ref::<HttpState>()
            .expect("HTTP fixture state")
    }

    pub(crate) fn http_state_mut(&mut self) -> &mut HttpState {
        self.flow
            .alstate
            .as_deref_mut()
            .expect("Harness flows always carry state")
            .as_any_mut()
            .downcast_mut::<HttpState>()
            .expect("HTTP fixture state")
    }

    /// Snapshot of the records parked on a transaction for one direction.
    pub(crate) fn records(&self, tx_id: TxId, dir: Direction) -> Vec<TxRecord> {
        self.http_state()
            .http_tx(tx_id)
            .detect_state()
            .map(|ds| ds.dir(dir).store.iter().copied().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parser_tracks_pipelined_requests() {
        let mut state = HttpState::new();
        state.feed_to_server(b"POST /one HTTP/1.0\r\n");
        assert_eq!(state.tx_count(), 1);
        assert_eq!(state.http_tx(0).request_progress(), PROGRESS_LINE);

        state.feed_to_server(b"Content-Length: 4\r\n\r\nbody");
        assert_eq!(state.http_tx(0).request_progress(), PROGRESS_DONE);

        state.feed_to_server(b"GET /two HTTP/1.1\r\nHost: x\r\n\r\n");
        assert_eq!(state.tx_count(), 2);
        assert_eq!(state.http_tx(1).method, "GET");
        assert_eq!(state.http_tx(1).request_progress(), PROGRESS_DONE);
    }

    #[test]
    fn parser_versions_only_on_progress() {
        let mut state = HttpState::new();
        state.feed_to_server(b"POST / HTTP/1.0\r\n");
        let version = state.al_version();

        // An empty segment parses nothing.
        state.feed_to_server(b"");
        assert_eq!(state.al_version(), version);

        state.feed_to_server(b"User-Agent: Mozilla/1.0\r\n");
        assert!(state.al_version() > version);
    }

    #[test]
    fn multipart_files_are_extracted_once() {
        let mut state = HttpState::new();
        let body = b"--AB\r\nContent-Disposition: form-data; name=\"f\"; filename=\"pic.jpg\"\r\n\r\nxxxx\r\n--AB--";
        let request = format!(
            "POST /upload.cgi HTTP/1.0\r\nContent-Length: {}\r\n\r\n",
            body.len()
        );
        state.feed_to_server(request.as_bytes());
        state.feed_to_server(body);

        let tx = state.http_tx(0);
        assert_eq!(tx.files.len(), 1);
        assert_eq!(tx.files[0].name, "pic.jpg");
        assert!(tx.body_complete);
    }
}
