//! Discrete delta kernels used to interpolate and spread quantities between markers and the lattice.

pub use self::kernel::{DeltaKernel, MAX_STENCIL_WIDTH};
pub use self::linear_kernel::LinearKernel;
pub use self::peskin_kernel::PeskinKernel;
pub use self::roma_kernel::RomaKernel;
pub use self::stencil::Stencil;

mod kernel;
mod linear_kernel;
mod peskin_kernel;
mod roma_kernel;
mod stencil;
