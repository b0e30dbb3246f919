#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![no_std]

pub use sg_reflect as reflect;
pub use sg_retry as retry;

/// The items most tests need.
pub mod prelude {
    pub use sg_reflect::PrivateAccess;
    pub use sg_reflect::access::{AccessError, Returned, args};
    pub use sg_reflect::derive::{Inspect, inspect_methods};
    pub use sg_reflect::info::Typed;

    #[cfg(feature = "async")]
    pub use sg_retry::await_condition_async;
    pub use sg_retry::{RetryPolicy, await_condition, await_condition_with};
}
