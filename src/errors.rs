// ABOUTME: Re-export of the unified error system from coachline-core
// ABOUTME: Lets server modules import errors as crate::errors
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

//! # Unified Error Handling System
//!
//! The error types live in `coachline-core` so that they can be shared with
//! other workspace crates. This module re-exports them unchanged.

pub use coachline_core::errors::*;
