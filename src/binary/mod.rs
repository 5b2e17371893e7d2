// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Binary building blocks shared by the FST codec and suggester persistence.

mod encoding;
mod header;

pub use encoding::*;
pub use header::*;
