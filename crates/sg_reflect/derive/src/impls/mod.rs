// -----------------------------------------------------------------------------
// Modules

mod methods;
mod trait_typed;

// -----------------------------------------------------------------------------
// Internal API

pub(crate) use methods::impl_declared_methods;
pub(crate) use trait_typed::impl_trait_typed;
