//! Wrappers that change *how* a validator runs, not *what* it accepts:
//! deferred construction for self-referential schemas and opt-in
//! memoization.

pub mod cached;
pub mod lazy;

pub use cached::{Cached, MokaCache, ValidationCache, cached};
pub use lazy::{Lazy, lazy};
