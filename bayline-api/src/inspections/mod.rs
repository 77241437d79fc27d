pub mod service;

pub use service::{InspectionPage, InspectionService};
