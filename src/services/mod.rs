pub mod label_service;
pub mod post_service;
