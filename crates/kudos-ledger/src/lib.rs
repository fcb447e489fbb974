pub mod file;
pub mod ledger;
pub mod memory;
pub mod traits;

pub use file::*;
pub use ledger::*;
pub use memory::*;
pub use traits::*;
