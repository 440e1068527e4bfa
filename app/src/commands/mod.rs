//! Command handlers.

pub mod influencer;
