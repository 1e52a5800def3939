pub mod config;
pub mod email_log;
pub mod family;
pub mod hobby;
pub mod location;
pub mod member;
pub mod payment;
pub mod personnel;
pub mod session;

pub use config::*;
pub use email_log::*;
pub use family::*;
pub use hobby::*;
pub use location::*;
pub use member::*;
pub use payment::*;
pub use personnel::*;
pub use session::*;
