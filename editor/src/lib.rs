mod debounce;
mod session;

pub use debounce::*;
pub use session::*;
