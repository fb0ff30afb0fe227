// Copyright 2025 the Outliner Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Row index of the `i`-th item of a sub-data list.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_possible_wrap,
    reason = "Sub-data lists never approach i32::MAX items."
)]
pub(crate) fn index_i32(i: usize) -> i32 {
    i as i32
}

/// Position of the `i`-th item of a sub-data list.
#[allow(
    clippy::cast_possible_truncation,
    reason = "Sub-data lists are addressed with 32-bit indices."
)]
pub(crate) fn index_u32(i: usize) -> u32 {
    i as u32
}
