//! Graft - transactional, path-addressed edits to component trees
//!
//! Graft mutates source files through a structural snapshot: a command
//! addresses one node of a parsed component tree, the intended
//! post-edit tree is computed in memory, the owning source file is
//! rewritten under a backup scope, and the result is re-parsed and
//! structurally compared against the intention. Either the file ends up
//! fully transformed and verified, or it is restored byte-for-byte.
//!
//! # Architecture
//!
//! The codebase follows a strict layered architecture:
//!
//! - [`cli`] - Command-line interface layer (parses args, delegates to engine)
//! - [`engine`] - Orchestrates Parse → Project → Locate → Transact → Verify → Commit
//! - [`core`] - Domain types, tree model, path addressing, synthesis, config
//! - [`survey`] - Abstraction over the external source-to-tree parser
//! - [`pipeline`] - Abstraction over the build/deploy step and its ledger
//! - [`ui`] - Structured logging capability
//!
//! # Correctness Invariants
//!
//! Graft maintains the following invariants:
//!
//! 1. No filesystem mutation before a command parses, projects, and locates
//! 2. All file mutations flow through a single backup-scoped engine
//! 3. A committed edit has been independently re-parsed and verified
//! 4. A failed edit leaves every touched file byte-identical to before

pub mod cli;
pub mod core;
pub mod engine;
pub mod pipeline;
pub mod survey;
pub mod ui;
