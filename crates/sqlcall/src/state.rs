//! Call states for the type-state pattern.
//!
//! A [`Call`](crate::Call) starts out [`Declaring`]: parameters and options
//! can be added, but there is no call string yet. Compiling consumes it and
//! yields a [`Compiled`] call, which is immutable and can be shared across
//! threads for repeated invocations.
//!
//! ```text
//! Declaring -> Compiled (via compile() or compile_with())
//! ```

use crate::context::CallContext;
use crate::reconcile::ReconciledParameterList;

/// Marker trait for call states.
///
/// This trait is sealed; only the states defined here are valid.
pub trait CallState: private::Sealed {}

/// The call is being defined.
#[derive(Debug, Clone, Copy, Default)]
pub struct Declaring;

/// The call has been reconciled against the database and is ready to run.
#[derive(Debug, Clone)]
pub struct Compiled {
    pub(crate) context: CallContext,
    pub(crate) parameters: ReconciledParameterList,
    pub(crate) call_string: String,
}

impl CallState for Declaring {}
impl CallState for Compiled {}

mod private {
    pub trait Sealed {}
    impl Sealed for super::Declaring {}
    impl Sealed for super::Compiled {}
}
