pub mod ask;
pub mod intent;

pub use ask::*;
pub use intent::*;
