// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

use thiserror::Error;

/// Errors that can occur while managing signature continuation state.
///
/// The engine deliberately keeps this surface small: inspection itself never
/// fails, and a full record store is swallowed by the caller (the signature is
/// simply not remembered) so that packet processing always continues.
#[derive(Error, Debug)]
pub enum DetectError {
    #[error("progress record store reached its cap of {limit} records")]
    StateStoreFull { limit: usize },
}

pub type DetectResult<T> = Result<T, DetectError>;
