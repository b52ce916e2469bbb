mod build;
mod io;
mod trigger;

pub use build::*;
pub use io::*;
pub use trigger::*;
