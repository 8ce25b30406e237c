//! Data contracts shared by the console core, backends and front-ends.

pub mod domain;
pub mod error;
pub mod protocol;
