// src/core/mod.rs

pub mod charset;
pub mod html;
pub mod net;
pub mod sanitize;
