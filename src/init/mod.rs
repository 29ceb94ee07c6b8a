pub mod init_spec;
pub mod initializer;

pub use init_spec::InitSpec;
pub use initializer::{Constant, Distribution, Explicit, Initializer, Random};
