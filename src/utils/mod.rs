// ABOUTME: Utility modules for common functionality across the application
// ABOUTME: Contains shared parsing helpers for identifiers, dates, times and HTTP clients
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

/// Calendar date, clock time and local datetime parsing
pub mod datetime;
/// HTTP client configuration and helpers
pub mod http_client;
/// UUID parsing and validation utilities
pub mod uuid;
