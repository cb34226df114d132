mod icon;
mod text;

pub use icon::*;
pub use text::*;
