//! psu-reg-bot - LINE webhook bot for the PSU Pattani registration office

pub mod application;
pub mod domain;
pub mod infrastructure;
