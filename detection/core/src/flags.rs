// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use detection_config::Direction;

/// Per-record bitmap of inspection progress for one signature on one
/// transaction (or flow).
///
/// One bit per inspection engine kind records that the engine has returned a
/// decisive verdict, so continuation never re-runs work already done. The two
/// terminal bits summarize the record: `SIG_CANT_MATCH` (some engine ruled the
/// signature out) and `FULL_INSPECT` (every engine the signature uses has been
/// decided).
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct InspectFlags(u32);

impl InspectFlags {
    /// Every engine this signature uses has been decided.
    pub const FULL_INSPECT: InspectFlags = InspectFlags(1);
    /// At least one engine returned "cannot possibly match".
    pub const SIG_CANT_MATCH: InspectFlags = InspectFlags(1 << 1);

    // One engine-inspected bit per inspection engine kind.
    pub const URI: InspectFlags = InspectFlags(1 << 2);
    pub const METHOD: InspectFlags = InspectFlags(1 << 3);
    pub const HEADER: InspectFlags = InspectFlags(1 << 4);
    pub const COOKIE: InspectFlags = InspectFlags(1 << 5);
    pub const CLIENT_BODY: InspectFlags = InspectFlags(1 << 6);
    pub const SERVER_BODY: InspectFlags = InspectFlags(1 << 7);
    pub const FILE_TS: InspectFlags = InspectFlags(1 << 8);
    pub const FILE_TC: InspectFlags = InspectFlags(1 << 9);
    /// Generic application layer flow matcher.
    pub const FLOW: InspectFlags = InspectFlags(1 << 10);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True when all bits of `other` are set.
    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// True when any bit of `other` is set.
    pub fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// The file-inspect bit of the given direction.
    pub fn file_inspect(dir: Direction) -> Self {
        match dir {
            Direction::ToServer => Self::FILE_TS,
            Direction::ToClient => Self::FILE_TC,
        }
    }
}

impl BitOr for InspectFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for InspectFlags {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for InspectFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(InspectFlags, &str); 11] = [
            (InspectFlags::FULL_INSPECT, "FULL_INSPECT"),
            (InspectFlags::SIG_CANT_MATCH, "SIG_CANT_MATCH"),
            (InspectFlags::URI, "URI"),
            (InspectFlags::METHOD, "METHOD"),
            (InspectFlags::HEADER, "HEADER"),
            (InspectFlags::COOKIE, "COOKIE"),
            (InspectFlags::CLIENT_BODY, "CLIENT_BODY"),
            (InspectFlags::SERVER_BODY, "SERVER_BODY"),
            (InspectFlags::FILE_TS, "FILE_TS"),
            (InspectFlags::FILE_TC, "FILE_TC"),
            (InspectFlags::FLOW, "FLOW"),
        ];
        let mut first = true;
        for (flag, name) in NAMES {
            if self.intersects(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        if first {
            write!(f, "(empty)")?;
        }
        Ok(())
    }
}

/// Per-direction flags carried by a direction's state store.
///
/// The `FILE_*_NEW` bits invite records that previously concluded to be
/// reconsidered because a new file appeared; `FILE_STORE_DISABLED` is the
/// terminal verdict of the file store arbiter.
#[derive(Clone, Copy, Default, PartialEq, Eq)]
pub struct DirectionFlags(u8);

impl DirectionFlags {
    pub const FILE_TS_NEW: DirectionFlags = DirectionFlags(1);
    pub const FILE_TC_NEW: DirectionFlags = DirectionFlags(1 << 1);
    pub const FILE_STORE_DISABLED: DirectionFlags = DirectionFlags(1 << 2);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// The "new file arrived" bit of the given direction.
    pub fn file_new(dir: Direction) -> Self {
        match dir {
            Direction::ToServer => Self::FILE_TS_NEW,
            Direction::ToClient => Self::FILE_TC_NEW,
        }
    }
}

impl fmt::Debug for DirectionFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [(DirectionFlags, &str); 3] = [
            (DirectionFlags::FILE_TS_NEW, "FILE_TS_NEW"),
            (DirectionFlags::FILE_TC_NEW, "FILE_TC_NEW"),
            (DirectionFlags::FILE_STORE_DISABLED, "FILE_STORE_DISABLED"),
        ];
        let mut first = true;
        for (flag, name) in NAMES {
            if self.contains(flag) {
                if !first {
                    write!(f, "|")?;
                }
                write!(f, "{name}")?;
                first = false;
            }
        }
        if first {
            write!(f, "(empty)")?;
        }
        Ok(())
    }
}
