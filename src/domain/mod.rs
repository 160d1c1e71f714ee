pub mod enrollment;
pub mod payment;
pub mod profile;
pub mod webhook_log;

pub use enrollment::*;
pub use payment::*;
pub use profile::*;
pub use webhook_log::*;
