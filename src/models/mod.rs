pub mod category;
pub mod geodata;
pub mod poi;
pub mod region;
pub mod scenario;
pub mod stats;

pub use category::*;
pub use geodata::*;
pub use poi::*;
pub use region::*;
pub use scenario::*;
pub use stats::*;
