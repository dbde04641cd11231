// Service exports
pub mod appwrite;
pub mod webhook;

pub use appwrite::{AppwriteClient, AppwriteCollections, AppwriteError, Query};
pub use webhook::{WebhookClient, WebhookError};
