pub mod price;
pub mod session;

pub use price::*;
pub use session::*;
