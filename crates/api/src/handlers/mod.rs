pub mod admin;
pub mod whatsapp;
