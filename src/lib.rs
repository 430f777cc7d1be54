//! aoview - progressive ambient occlusion viewer
//!
//! Library half of the viewer binary: configuration, scene mesh assembly,
//! and the systems the event loop drives.

pub mod config;
pub mod input;
pub mod scene;
pub mod systems;
