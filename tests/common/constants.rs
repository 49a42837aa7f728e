//! Shared constants for end-to-end tests
//!
//! This module contains all constants used across the test suite.
//! When test data changes (workflow ids, names, revision notes, etc.),
//! update only this file.

// ============================================================================
// Fake n8n Instances
// ============================================================================

/// API key accepted by the fake source instance
pub const SOURCE_API_KEY: &str = "source-key";

/// API key accepted by the fake destination instance
pub const DESTINATION_API_KEY: &str = "destination-key";

// ============================================================================
// Test Workflows
// ============================================================================

/// Active source workflow carrying a "Revision History" sticky note
pub const INVOICES_ID: &str = "wf-invoices";

/// Name of the invoices workflow
pub const INVOICES_NAME: &str = "Invoice Sync";

/// Active source workflow without revision note, with markup in its name
pub const REPORTS_ID: &str = "wf-reports";

/// Name of the reports workflow
pub const REPORTS_NAME: &str = "Weekly <Reports> & Alerts";

/// Inactive source workflow, never listed
pub const ARCHIVED_ID: &str = "wf-archived";

/// Revision note content of the invoices workflow on the source
pub const SOURCE_REVISION_CONTENT: &str = "* 2023-12-01T09:00:00.000Z: Initial version";

/// Revision note content of the invoices workflow on the destination
pub const DESTINATION_REVISION_CONTENT: &str =
    "* 2023-11-20T08:30:00.000Z: Imported\n* 2023-12-01T09:00:00.000Z: Initial version";

/// Id the fake destination assigns to the first created workflow
pub const FIRST_CREATED_ID: &str = "dest-1";

// ============================================================================
// Deployment
// ============================================================================

/// Deployment reason used by most tests
pub const REASON: &str = "Fix invoice rounding";

/// Timestamp every test clock is frozen at, as rendered in revision entries
pub const FROZEN_TIMESTAMP: &str = "2024-01-01T12:00:00.000Z";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
