pub mod customer;
pub mod inspection;
pub mod inspection_item;
pub mod photo;
pub mod portal_token;
pub mod session;
pub mod shop;
pub mod template;
pub mod user;
pub mod vehicle;

pub use customer::Customer;
pub use inspection::{Inspection, InspectionStatus};
pub use inspection_item::{Condition, InspectionItem, InspectionSummary, ItemStatus};
pub use photo::Photo;
pub use portal_token::PortalToken;
pub use session::Session;
pub use shop::Shop;
pub use template::InspectionItemTemplate;
pub use user::{Role, User, UserPublic};
pub use vehicle::Vehicle;
