//! Items referenced by code that `sg_reflect_derive` generates.
//!
//! Generated code may land in crates without `alloc` in their extern prelude.

pub use alloc::vec::Vec;
