mod config;
mod convert;
mod ddl;
mod decode;
mod driver;
mod pool;
mod session;
mod sql_writer;
mod value_wrap;

pub use config::*;
pub use convert::*;
pub use ddl::*;
pub use decode::*;
pub use driver::*;
pub use pool::*;
pub use session::*;
pub use sql_writer::*;
