pub mod catalog;
pub mod pair;
pub mod row;
pub mod value;

pub use catalog::*;
pub use pair::*;
pub use row::*;
pub use value::*;
