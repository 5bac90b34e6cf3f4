//! Thermal receipt print pipeline
//!
//! Formats voter receipts as ESC/POS payloads and delivers them to a
//! paired wireless printer in bounded chunks.

pub mod pipeline;
pub mod receipt;
pub mod transport;

pub use pipeline::{ConnectionState, PrintService};
pub use receipt::{generate_receipt, transliterate, ReceiptLanguage};
pub use transport::{CharacteristicInfo, PrinterTransport, ServiceInfo};
