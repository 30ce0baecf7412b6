//! Hosted service providers behind the assembly boundaries.
//!
//! [`VoiceSynthesizer`] renders voice-overs through the ElevenLabs API and
//! [`StockLocator`] finds footage through the Shutterstock video search.
//! Both are constructed from [`spotcut_common::AppConfig`] sections and fail
//! fast when credentials are missing.

pub mod speech;
pub mod stock;

pub use speech::VoiceSynthesizer;
pub use stock::StockLocator;
