// handlers/public/auth/mod.rs - account creation and token acquisition

pub mod register; // POST /api/users/
pub mod token; // POST /api/token

pub use register::register_post;
pub use token::token_post;
