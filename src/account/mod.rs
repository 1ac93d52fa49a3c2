mod entity;
mod registration;

pub use entity::{Account, SignupInput, SignupOutput};
pub use registration::AccountService;
