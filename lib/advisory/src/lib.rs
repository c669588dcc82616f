//! Advisory composition over the riskwise core.
//!
//! Turns a risk id into a deterministic Turkish Markdown advisory: P/S
//! estimate, category-driven action plan, fixed KPI block, and retrieved
//! literature context. Also renders grouped digests for free-text prompts.

pub mod actions;
pub mod answer;
pub mod composer;
pub mod context;

pub use actions::{propose_actions, ActionItem};
pub use answer::{answer, AnswerStyle};
pub use composer::{compose, NOT_FOUND_NOTICE};
pub use context::AdvisoryContext;
