/// API route modules
pub mod assets;
pub mod catalog;
pub mod health;
pub mod playback;
pub mod stream;
