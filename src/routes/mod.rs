mod attendance;
mod classes;
mod error;
mod login;
mod register;
mod user;

pub use attendance::*;
pub use classes::*;
pub use error::*;
pub use login::*;
pub use register::*;
pub use user::*;
