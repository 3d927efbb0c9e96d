mod error;
pub use error::{ExecError, ExecResult};

pub mod r#fn;
pub use r#fn::{FnContext, FnLauncher};

pub mod limits;

#[cfg(feature = "proc")]
pub mod proc;
#[cfg(feature = "proc")]
pub use proc::ProcessLauncher;

#[cfg(feature = "proc")]
mod util;

pub mod prelude {
    pub use crate::FnLauncher;
    #[cfg(feature = "proc")]
    pub use crate::ProcessLauncher;
    pub use crate::error::{ExecError, ExecResult};
}
