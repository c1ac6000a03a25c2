mod clock;
pub mod mapping;
mod readings;
mod state;
pub mod window;

pub use clock::*;
pub use readings::*;
pub use state::*;
