// ABOUTME: Re-export of application constants from coachline-core
// ABOUTME: Lets server modules import constants as crate::constants
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

pub use coachline_core::constants::*;
