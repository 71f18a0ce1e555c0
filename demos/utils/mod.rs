//! Utility functions for the demos
//!
//! This module provides device setup shared by the demo binaries.

pub mod network;
