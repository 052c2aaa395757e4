#![doc = include_str!("../README.md")]
#![no_std]

pub use ld_luatable as luatable;
pub use ld_reflect as reflect;

#[cfg(feature = "docgen")]
pub use ld_docgen as docgen;
