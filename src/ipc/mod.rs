//! Line protocol: one s-expression per line in, one per line out.

pub mod dispatch;
pub mod frame;
pub mod sexp;

pub use dispatch::handle_message;
