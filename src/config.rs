//! Application configuration constants
//!
//! Central location for all configuration constants, resource limits,
//! and validation boundaries used throughout the application.

// ===== Voter Directory =====

/// How long a fetched voter snapshot stays valid before the next
/// `load()` goes back to the store (5 minutes).
pub const VOTER_CACHE_TTL_SECS: u64 = 300;

/// Quiet period after the last search keystroke before the query runs.
pub const SEARCH_DEBOUNCE_MS: u64 = 300;

/// Default number of records per directory page
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

/// Minimum selectable page size
pub const MIN_ITEMS_PER_PAGE: u32 = 5;

/// Maximum selectable page size.
/// Larger pages make the append-on-scroll list unwieldy on handsets.
pub const MAX_ITEMS_PER_PAGE: u32 = 100;

// ===== Thermal Printer =====

/// Maximum bytes per characteristic write. Common BLE thermal printers
/// reject payloads larger than this.
pub const PRINTER_CHUNK_SIZE: usize = 500;

/// Pause between chunk writes so the printer's input buffer can drain.
pub const PRINTER_CHUNK_DELAY_MS: u64 = 50;

/// Device-name prefixes offered in the pairing chooser. Covers the
/// portable receipt printers issued to booth teams.
pub const PRINTER_NAME_PATTERNS: &[&str] = &["MTP-", "PT-", "RPP", "POS", "Printer"];

/// Vendor service UUIDs known to expose a writable print characteristic.
/// Checked before falling back to the first writable characteristic.
pub const VENDOR_SERVICE_UUIDS: &[&str] = &[
    "000018f0-0000-1000-8000-00805f9b34fb",
    "49535343-fe7d-4ae5-8fa9-9fafd205e455",
    "e7810a71-73ae-499d-8c15-faa9aef0c3f2",
];

/// Family members printed on a receipt before the overflow counter
pub const RECEIPT_FAMILY_LIMIT: usize = 3;

// ===== Store Paths =====

/// Collection holding one document per voter
pub const VOTERS_PATH: &str = "voters";

/// Collection holding one document per polling booth
pub const BOOTHS_PATH: &str = "booths";

/// Collection holding one document per field staff member
pub const STAFF_PATH: &str = "karyakartas";

/// Append-only collection of sent campaigns
pub const CAMPAIGNS_PATH: &str = "campaigns";

/// Singleton branding/config document
pub const BRANDING_PATH: &str = "config/branding";
