// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Tom F.

//! Common types shared by the governor and the pattern detector.

pub mod clock;
pub mod token;
