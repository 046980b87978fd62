// ABOUTME: Configuration management module for centralized server settings and parameters
// ABOUTME: Exposes the environment-driven server configuration and its sections
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence
//! Configuration module for the Coachline server
//!
//! All settings come from environment variables, with command line overrides
//! for the port and database URL applied by the binary.

/// Environment and server configuration
pub mod environment;

pub use environment::{AudienceConfig, DeliveryConfig, Environment, ServerConfig, SlotConfig};
