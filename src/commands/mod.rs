pub mod annotate;
pub mod compare;
pub mod dump;
pub mod sync;
