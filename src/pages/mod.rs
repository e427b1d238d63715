pub mod generate;
pub mod home;
pub mod settings;
pub mod upload;
