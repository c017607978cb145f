pub mod asserts;
pub mod fixtures;
pub mod sources;

#[allow(unused_imports)]
pub use asserts::*;
#[allow(unused_imports)]
pub use fixtures::*;
#[allow(unused_imports)]
pub use sources::*;
