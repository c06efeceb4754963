//! Rules-engine interface for kingside
//!
//! The game core never implements chess legality itself. Everything it needs
//! from a rules engine is expressed by the [`Rules`] trait: legal move
//! enumeration, move application, terminal detection, and text notation
//! round-trips. [`ShakmatyRules`] is the production implementation, a thin
//! adapter over the `shakmaty` crate. Sessions and the search can be tested
//! against any substitute implementation.
//!
//! ## Module Organization
//!
//! - `types` - Side and piece vocabulary shared across the workspace
//! - `error` - Rules and notation error types
//! - `rules` - The `Rules` trait
//! - `shakmaty_rules` - Production adapter over shakmaty

mod error;
mod rules;
mod shakmaty_rules;
mod types;

pub use error::{NotationError, RulesError};
pub use rules::Rules;
pub use shakmaty_rules::ShakmatyRules;
pub use types::{PieceKind, Side};
