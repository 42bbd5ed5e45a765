pub mod client;
pub mod signing;

pub use client::{UpstreamPage, UpstreamSearch, YayaClient, YayaError};
pub use signing::{RequestSigner, SignedRequest};
