pub mod projection;
pub mod service;
pub mod token;

pub use projection::PortalProjection;
pub use service::PortalService;
pub use token::PortalTokenService;
