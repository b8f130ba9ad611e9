// Constants module - centralized default values for configuration
//
// This module defines all default values used throughout the codebase.
// Using constants instead of magic numbers improves maintainability
// and makes it easier to understand and modify defaults.

// =============================================================================
// Server defaults
// =============================================================================

/// Default listen address
pub const DEFAULT_ADDRESS: &str = "0.0.0.0";

/// Default listen port
pub const DEFAULT_PORT: u16 = 8080;

// =============================================================================
// Storage defaults
// =============================================================================

/// Default AWS region when none is configured
pub const DEFAULT_REGION: &str = "us-east-2";

/// Key prefix under which derived artifacts are stored in the bucket
pub const CACHE_KEY_PREFIX: &str = "optimized";

/// Cache lifetime advertised on responses and cached artifacts (one year)
pub const CACHE_TTL_SECS: u64 = 31_536_000;

// =============================================================================
// Transformation defaults
// =============================================================================

/// Default compression quality for lossy formats
pub const DEFAULT_QUALITY: u8 = 80;

/// Lowest accepted compression quality
pub const MIN_QUALITY: u8 = 1;

/// Highest accepted compression quality
pub const MAX_QUALITY: u8 = 100;

/// AVIF encoder speed preset (1-10, lower is slower and better)
pub const AVIF_SPEED: u8 = 4;
