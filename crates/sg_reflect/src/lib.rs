#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

// -----------------------------------------------------------------------------
// Extern Self

// The derive macros emit `::sg_reflect::...` paths. Inside this crate (and its
// tests) that name has to resolve to `crate`.
extern crate self as sg_reflect;

// -----------------------------------------------------------------------------
// no_std support

extern crate alloc;

// Descriptor cells rely on `OnceLock` and `RwLock`.
extern crate std;

// -----------------------------------------------------------------------------
// Modules

pub mod access;
pub mod info;

// -----------------------------------------------------------------------------
// Top-Level exports

#[doc(hidden)]
pub mod __macro_exports;

pub use access::PrivateAccess;
pub use info::{Inspect, Typed};
pub use sg_reflect_derive as derive;
