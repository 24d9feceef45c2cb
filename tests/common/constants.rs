//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When the fixture dataset changes, update only this file.

// ============================================================================
// Fixture Dataset
// ============================================================================

/// Number of rows in the fixture reviews file
pub const TOTAL_REVIEWS: usize = 8;

/// Region with 4 reviews, 2 of them negative
pub const REGION_CENTRAL: &str = "Central";

/// Region with 2 positive reviews
pub const REGION_WEST: &str = "West";

/// Region with 2 negative reviews
pub const REGION_EAST: &str = "East";

/// City of the Central region
pub const CITY_RIYADH: &str = "Riyadh";

/// City of the West region
pub const CITY_JEDDAH: &str = "Jeddah";

/// City of the East region
pub const CITY_DAMMAM: &str = "Dammam";

/// Museum in Riyadh, rated 5 twice, one review reads negative
pub const PLACE_MUSEUM: &str = "National Museum";

/// Restaurant in Riyadh
pub const PLACE_RESTAURANT: &str = "Najd Village";

/// Beach in Jeddah
pub const PLACE_BEACH: &str = "Corniche";

/// Park in Dammam, both reviews negative
pub const PLACE_PARK: &str = "King Fahd Park";

/// A region that no row carries
pub const UNKNOWN_REGION: &str = "Nowhere";

// ============================================================================
// Fixture Topic Model
// ============================================================================

/// Topics in the fixture model
pub const N_TOPICS: usize = 2;

/// Words per topic used for tags
pub const TOPIC_TOP_WORDS: usize = 3;

/// Topic index past the end of the model
pub const UNKNOWN_TOPIC: usize = 5;

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Cache age the test server advertises on data endpoints (seconds)
pub const CONTENT_CACHE_AGE_SEC: usize = 120;
