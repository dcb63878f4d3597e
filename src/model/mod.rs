//! Data model for a traced message.

pub mod attachment;
pub mod record;
