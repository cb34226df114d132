mod actions;
mod tab;

pub use actions::*;
pub use tab::*;
