//! Small rendering helpers shared by screens.

pub mod provider_status;
pub mod time_fmt;
