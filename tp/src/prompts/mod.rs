//! Prompt Template System
//!
//! Loads and renders `.pmt` (prompt template) files for the stage inputs.
//!
//! Template loading chain:
//! 1. Configured override directory, or `.travelplanner/prompts/{name}.pmt`
//! 2. `prompts/{name}.pmt` (repo default)
//! 3. Embedded fallback in code
//!
//! Templates use Handlebars syntax for variable substitution.

pub mod embedded;
mod loader;

pub use loader::PromptLoader;
