// Copyright (c) Mysten Labs, Inc.
// SPDX-License-Identifier: Apache-2.0

mod ids;
mod parameters;

pub use ids::*;
pub use parameters::*;
