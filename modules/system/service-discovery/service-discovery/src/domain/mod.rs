pub mod cluster;
pub mod codec;
pub mod discovery;
pub mod ports;
pub mod registration;
pub mod registry;
pub mod service;
