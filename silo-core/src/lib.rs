mod column;
mod convert;
mod ddl;
mod driver;
mod error;
mod executor;
mod pool;
mod value;
mod writer;

pub use column::*;
pub use convert::*;
pub use ddl::*;
pub use driver::*;
pub use error::*;
pub use executor::*;
pub use pool::*;
pub use value::*;
pub use writer::*;
