pub mod public_url;
pub mod response;
pub mod upload;
