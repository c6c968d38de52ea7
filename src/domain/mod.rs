pub mod pv;
pub mod series;
pub mod tmy;

pub use pv::*;
pub use series::*;
pub use tmy::*;
