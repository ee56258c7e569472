//! Orchestration layer: wires the compiler driver, parser, fixer registry,
//! applicator, and ledger into the diagnose / fix / interactive / watch /
//! report entry points. Frontend-agnostic so the CLI stays a thin shell.

mod adapters;
mod pipeline;
mod ports;
mod settings;
mod watch;

pub use adapters::DriverRevalidate;
pub use pipeline::{Doctor, FixRunReport, InteractiveOutcome, ledger_report};
pub use ports::{PromptChoice, UserPrompt};
pub use settings::DoctorSettings;

pub use srcdoctor_compile::{Compiler, DriverError, JavacDriver};
