// Simulation session: the client-side lifecycle of one simulation pass.
// Dashboard -> Briefing -> Task -> Reflection, with a cosmetic task countdown.
// All backend calls go through catalog::SimulationApi.

pub mod decisions;
pub mod handlers;
pub mod machine;
pub mod state;
pub mod timer;

#[cfg(test)]
pub(crate) mod test_support;

use thiserror::Error;

use crate::catalog::ApiError;
use crate::report::ExportError;

pub use decisions::ValidationError;
pub use machine::SimulationSession;
pub use state::{SessionSnapshot, Step, Transition};

#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("A {0} request is already in flight")]
    Busy(Transition),

    #[error("Cannot {operation} from the {step} step")]
    InvalidTransition { operation: &'static str, step: Step },

    #[error("An attempt is already active; submit it or go back first")]
    AttemptActive,

    #[error("The session moved on before the {0} request finished")]
    Superseded(Transition),

    #[error(transparent)]
    Export(#[from] ExportError),
}
