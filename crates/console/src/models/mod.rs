//! Domain models for the documents the console manages.
//!
//! Field names serialize in camelCase to match the documents the mobile and
//! web clients already read. Fields that only exist on some documents are
//! optional with serde defaults, so partially-populated legacy documents
//! still deserialize.

pub mod admin;
pub mod advertisement;
pub mod location;
pub mod message;
pub mod report;
pub mod settings;
pub mod store;
pub mod user;
pub mod veterinarian;

pub use admin::AdminProfile;
pub use advertisement::{AdvertisementRecord, NewAdvertisement};
pub use location::{LocationRecord, NewLocation};
pub use message::{AdminMessage, MessageDraft, MessageKind};
pub use report::ReportRecord;
pub use settings::AppSettings;
pub use store::{NewStore, StoreRecord};
pub use user::{CustomClaims, UserRecord};
pub use veterinarian::{NewVeterinarian, VeterinarianRecord, VeterinarianUpdate};
