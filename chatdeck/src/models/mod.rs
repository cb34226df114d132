mod call;
mod conversation;
mod types;

pub use call::*;
pub use conversation::*;
pub use types::*;
