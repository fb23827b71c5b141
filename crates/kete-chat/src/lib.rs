//! Conversational search session for Kete.
//!
//! Owns the transcript and the order modal, talks to the query endpoint
//! through a [`QueryClient`], and reports result-set changes to whatever
//! displays them via [`kete_core::SessionEvent`].

pub mod client;
pub mod error;
pub mod modal;
pub mod results;
pub mod session;
pub mod transcript;

pub use client::{HttpQueryClient, QueryClient, QueryError};
pub use error::ChatError;
pub use modal::{ModalState, OrderModal};
pub use results::{ResultGrid, ResultTile};
pub use session::{ChatSession, PendingQuery, SubmitOutcome};
pub use transcript::Transcript;
