//! # Batch type generation from JSON Schema
//!
//! Points a type generation engine at a whole directory tree of JSON Schema
//! documents and writes one source file per schema. Every schema found is
//! available for `$ref` resolution, including the ones excluded from
//! generation. A schema that fails to generate is logged and counted; the
//! rest of the batch still runs.
//!
//! ## Usage
//!
//! The `schema-typegen` binary reads `<ROOT>/schemas` and writes
//! `<ROOT>/result/<name>.ts` using the `quicktype` command line tool:
//!
//! ```bash
//! cargo run -p schema-typegen -- ./my-schemas -o api -l ts
//! ```
//!
//! Settings can also live in `typegen.kdl` in the root, see [`config`].
//!
//! From code:
//!
//! ```no_run
//! # async fn demo() -> schema_typegen::error::Result<()> {
//! let run = schema_typegen::generate_types("./my-schemas", "api", "ts").await?;
//! println!("{} generated, {} failed", run.succeeded(), run.failed());
//! # Ok(())
//! # }
//! ```
//!
//! ## Modules
//!
//! - [`fs`] - Recursive schema discovery
//! - [`corpus`] - The set of schemas available for reference resolution
//! - [`request`] - Per-schema generation requests and renderer options
//! - [`generator`] - The type generation engine boundary
//! - [`output`] - Writing generated files
//! - [`batch`] - The pipeline and its aggregated result

pub mod batch;
pub mod cli;
pub mod config;
pub mod corpus;
pub mod error;
pub mod fs;
pub mod generator;
pub mod output;
pub mod request;

pub use batch::{BatchRun, Pipeline, generate_types};
pub use config::BatchConfig;
pub use generator::{QuicktypeGenerator, TypeGenerator};
pub use request::{RendererOptions, TargetLanguage};
