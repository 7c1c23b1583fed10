mod client;

pub use client::{BasicAuth, MibObject, VendorClient};
pub use reqwest::Method;
