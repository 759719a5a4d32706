// src/core/mod.rs

pub mod duration;
pub mod net;
