pub mod types;

mod defs;
pub mod isa;
