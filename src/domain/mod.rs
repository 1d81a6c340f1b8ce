mod attendance;
mod class;
mod user;

pub use attendance::*;
pub use class::*;
pub use user::*;
