//! Services module
//!
//! High-level business logic built on the document store.

pub mod booths;
pub mod branding;
pub mod campaigns;
pub mod directory;
pub mod reports;
pub mod settings;
pub mod staff;
pub mod voters;

pub use booths::BoothService;
pub use branding::BrandingService;
pub use campaigns::CampaignService;
pub use directory::{Debouncer, DirectoryView, PageRequest, QueryResult, VoterDirectory, VoterFilter};
pub use reports::ReportsService;
pub use settings::{AppSettings, SettingsService};
pub use staff::KaryakartaService;
pub use voters::VoterService;
