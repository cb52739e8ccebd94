//! Drawing surfaces and the compositor entry point.

pub mod backend;
pub mod composite;
pub mod cpu;

pub use backend::{DrawSurface, composite};
pub use cpu::CpuSurface;
