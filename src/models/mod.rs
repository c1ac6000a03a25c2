pub mod permission;
pub mod pressure;
pub mod reading;
pub mod record;

pub use permission::*;
pub use pressure::*;
pub use reading::*;
pub use record::*;
