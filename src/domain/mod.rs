mod balance;
mod category;
mod money;
mod transaction;

pub use balance::*;
pub use category::*;
pub use money::*;
pub use transaction::*;
