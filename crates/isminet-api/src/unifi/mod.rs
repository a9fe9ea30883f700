// Resource client
//
// Typed, site-scoped wrappers over `ApiClient`. Each endpoint group is
// an inherent `impl UnifiClient` block in its own file.

pub mod client;
pub mod clients;
pub mod devices;
pub mod networks;
pub mod sites;
pub mod system;
pub mod wireless;

pub use client::UnifiClient;
