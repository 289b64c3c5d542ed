//! Transfer-function and state-space models of a permanent-magnet DC motor.
//!
//! Both representations are derived from the same five physical constants
//! and describe the same linear time-invariant system from armature voltage
//! to rotor speed.
//!
//! # Model Pipeline
//!
//! ```text
//! PhysicalParameters ─┬─ build_transfer_function ─→ TransferFunction ─┐
//!   (J, b, K, R, L)   │                                 ↑  ↓ convert  │ poles, dc_gain
//!                     └─ build_state_space ─────────→ StateSpaceModel ┴ step_response
//! ```
//!
//! # Quick Start
//!
//! ```
//! use motorlab_model::prelude::*;
//!
//! let params = presets::speed_example();
//! let tf = build_transfer_function(&params);
//! let ss = build_state_space(&params);
//!
//! let derived = state_space_to_transfer_function(&ss);
//! assert!(derived.is_equivalent(&tf, 1e-9));
//!
//! let response = ss.step_response(3.0, 0.001, 1.0).unwrap();
//! let metrics = response.metrics().unwrap();
//! assert!(metrics.settling_time.is_some());
//! ```

pub mod builder;
pub mod convert;
pub mod poly;
pub mod response;
pub mod state_space;
pub mod transfer_function;

/// Convenience re-exports for common usage.
pub mod prelude {
    pub use crate::builder::{
        MotorModel, MotorModelBuilder, build_state_space, build_transfer_function,
    };
    pub use crate::convert::{state_space_to_transfer_function, transfer_function_to_state_space};
    pub use crate::response::{DiscreteStateSpace, StepMetrics, StepResponse};
    pub use crate::state_space::StateSpaceModel;
    pub use crate::transfer_function::TransferFunction;
    pub use motorlab_core::prelude::*;
    pub use nalgebra::Complex;
}
