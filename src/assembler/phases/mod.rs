pub mod types;

pub mod classify;
pub mod generate;
pub mod preprocess;
pub mod resolve;
pub mod verify;

pub use generate::generate;
pub use preprocess::normalize;
pub use resolve::resolve;
pub use verify::verify;
