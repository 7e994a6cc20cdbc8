pub mod clothing;
pub mod music;
pub mod situation;
pub mod weather;

pub use clothing::*;
pub use music::*;
pub use situation::*;
pub use weather::*;
