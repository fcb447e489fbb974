pub mod defaults;
pub mod memory;
pub mod traits;

pub use defaults::*;
pub use memory::*;
pub use traits::*;
