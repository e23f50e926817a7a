//! Remote file store adapter (Google Drive v3 REST).

pub mod client;
pub mod links;

pub use client::DriveClient;
