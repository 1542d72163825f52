pub mod directory;
pub mod filters;
pub mod query;

pub use directory::DoctorDirectory;
pub use filters::{apply_filters, extract_specialties, suggest};
