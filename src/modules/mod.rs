pub mod auth;
pub mod landing;
