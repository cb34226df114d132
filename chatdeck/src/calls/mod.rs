mod filter;
mod row;
mod store;
mod tab;

pub use filter::*;
pub use row::*;
pub use store::*;
pub use tab::*;
