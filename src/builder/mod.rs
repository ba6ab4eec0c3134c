//! Build file generation.
//!
//! Turns resolved target descriptors into `CMakeLists.txt` files.

pub mod cmake;
pub mod sources;

pub use cmake::{CMakeEmitter, GeneratedFile, CMAKE_LISTS};
pub use sources::collect_sources;
