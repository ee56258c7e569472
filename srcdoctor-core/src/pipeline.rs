use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use srcdoctor_compile::Compiler;
use srcdoctor_edit::{Applicator, ApplyError};
use srcdoctor_fixers::Registry;
use srcdoctor_ledger::Ledger;
use srcdoctor_parse::parse_diagnostics;
use srcdoctor_render::{render_fix_preview, render_report, render_snippet};
use srcdoctor_types::{Diagnostic, Fix, Severity};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::adapters::DriverRevalidate;
use crate::ports::{PromptChoice, UserPrompt};
use crate::settings::DoctorSettings;

/// Summary of one unattended `fix` run.
#[derive(Debug)]
pub struct FixRunReport {
    /// True iff the tree compiled cleanly when the run stopped.
    pub converged: bool,
    /// Compile rounds consumed.
    pub iterations: usize,
    /// Fixes that were applied and confirmed.
    pub applied: usize,
    /// Diagnostics still present at the end of the run.
    pub remaining: Vec<Diagnostic>,
}

/// How an interactive session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InteractiveOutcome {
    /// The tree compiles cleanly.
    Clean,
    /// Stopped with diagnostics outstanding: the user quit, or a full pass
    /// offered nothing that could be applied.
    Quit,
    /// The iteration bound was hit with diagnostics outstanding.
    IterationLimit,
}

/// The repair pipeline: compile, parse, match, apply, revalidate, repeat.
///
/// One `Doctor` owns one run: a fresh run id, an open ledger, and a compiler
/// driver bound to the repository. All modes share the same validated-apply
/// path, so no edit ever lands without a confirming recompile.
pub struct Doctor {
    settings: DoctorSettings,
    compiler: Box<dyn Compiler>,
    registry: Registry,
    applicator: Applicator,
    ledger: Ledger,
    run_id: Uuid,
}

impl Doctor {
    pub fn new(settings: DoctorSettings, compiler: Box<dyn Compiler>) -> anyhow::Result<Self> {
        let registry = Registry::builtin(settings.src_dir.clone());
        let applicator = Applicator::new(settings.backup_dir.clone());
        let ledger = Ledger::open(settings.ledger_path.clone())
            .with_context(|| format!("open ledger at {}", settings.ledger_path))?;
        Ok(Self {
            settings,
            compiler,
            registry,
            applicator,
            ledger,
            run_id: Uuid::new_v4(),
        })
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn settings(&self) -> &DoctorSettings {
        &self.settings
    }

    /// One full-tree compile; returns the diagnostics the run would act on.
    pub fn diagnose(&self) -> anyhow::Result<Vec<Diagnostic>> {
        let raw = self.compiler.compile_all()?;
        Ok(self.candidates(&raw))
    }

    /// Unattended repair to fixed point or the iteration bound.
    pub fn auto_fix(&self) -> anyhow::Result<FixRunReport> {
        let mut applied = 0usize;
        for round in 1..=self.settings.max_iterations {
            let diagnostics = self.diagnose()?;
            if diagnostics.is_empty() {
                info!(round, applied, "tree compiles cleanly");
                return Ok(FixRunReport {
                    converged: true,
                    iterations: round,
                    applied,
                    remaining: Vec::new(),
                });
            }
            info!(round, count = diagnostics.len(), "repair round");

            let mut changed = false;
            for diagnostic in &diagnostics {
                let Some(fix) = self.propose(diagnostic)? else {
                    debug!(path = %diagnostic.path, line = diagnostic.line, "no strategy matched");
                    continue;
                };
                if fix.confidence < self.settings.confidence_threshold {
                    debug!(
                        confidence = fix.confidence,
                        threshold = self.settings.confidence_threshold,
                        "below unattended threshold; skipped"
                    );
                    continue;
                }
                if self.apply(&fix)? {
                    applied += 1;
                    changed = true;
                }
            }

            if !changed {
                // Nothing this round moved the needle; more rounds would
                // re-derive the same stale fixes.
                let remaining = self.diagnose()?;
                return Ok(FixRunReport {
                    converged: remaining.is_empty(),
                    iterations: round,
                    applied,
                    remaining,
                });
            }
        }

        let remaining = self.diagnose()?;
        Ok(FixRunReport {
            converged: remaining.is_empty(),
            iterations: self.settings.max_iterations,
            applied,
            remaining,
        })
    }

    /// Prompt-per-fix repair. Every candidate is previewed before it touches
    /// the tree; quitting leaves already-confirmed fixes in place.
    pub fn interactive(&self, ui: &mut dyn UserPrompt) -> anyhow::Result<InteractiveOutcome> {
        for round in 1..=self.settings.max_iterations {
            let diagnostics = self.diagnose()?;
            if diagnostics.is_empty() {
                ui.show("No compiler diagnostics. Nothing to do.");
                return Ok(InteractiveOutcome::Clean);
            }
            ui.show(&format!(
                "Round {round}: {} diagnostic(s) to review",
                diagnostics.len()
            ));

            let mut changed = false;
            for diagnostic in &diagnostics {
                let lines = match read_lines(&diagnostic.path) {
                    Some(lines) => lines,
                    None => continue,
                };
                ui.show(&format!(
                    "\n{}:{}: {}",
                    diagnostic.path, diagnostic.line, diagnostic.message
                ));
                ui.show(&render_snippet(&lines, diagnostic.line));

                let Some(fix) = self.registry.find_fix(diagnostic, &lines) else {
                    ui.show("No automatic fix available for this one.");
                    continue;
                };
                ui.show(&render_fix_preview(&fix, &lines));

                match ui.choose()? {
                    PromptChoice::Apply => {
                        if self.apply(&fix)? {
                            ui.show("Applied and confirmed.");
                            changed = true;
                        } else {
                            ui.show("Fix did not hold; file restored.");
                        }
                    }
                    PromptChoice::Skip => continue,
                    PromptChoice::Quit => return Ok(InteractiveOutcome::Quit),
                }
            }

            if !changed {
                // A full pass with nothing applied: re-presenting the same
                // list would loop forever.
                let outcome = if self.diagnose()?.is_empty() {
                    InteractiveOutcome::Clean
                } else {
                    InteractiveOutcome::Quit
                };
                return Ok(outcome);
            }
        }
        Ok(InteractiveOutcome::IterationLimit)
    }

    /// Recompile one file and repair its diagnostics in place. Used by watch
    /// mode after a save event; returns how many fixes were confirmed.
    pub fn fix_file(&self, path: &Utf8Path) -> anyhow::Result<usize> {
        let raw = self.compiler.compile_file(path)?;
        let diagnostics = self.candidates(&raw);
        if diagnostics.is_empty() {
            return Ok(0);
        }
        let mut applied = 0usize;
        for diagnostic in &diagnostics {
            let Some(fix) = self.propose(diagnostic)? else {
                continue;
            };
            if fix.confidence < self.settings.confidence_threshold {
                continue;
            }
            if self.apply(&fix)? {
                applied += 1;
            }
        }
        Ok(applied)
    }

    /// Recent fix history, rendered for the terminal.
    pub fn report(&self) -> anyhow::Result<String> {
        let all = self.ledger.read_all()?;
        let total = all.len();
        let recent = self.ledger.recent(self.settings.report_limit)?;
        Ok(render_report(&recent, total))
    }

    fn candidates(&self, raw: &str) -> Vec<Diagnostic> {
        parse_diagnostics(raw, &self.settings.repo_root)
            .into_iter()
            .filter(|d| self.settings.include_warnings || d.severity == Severity::Error)
            .collect()
    }

    fn propose(&self, diagnostic: &Diagnostic) -> anyhow::Result<Option<Fix>> {
        let Some(lines) = read_lines(&diagnostic.path) else {
            warn!(path = %diagnostic.path, "diagnosed file unreadable; skipped");
            return Ok(None);
        };
        Ok(self.registry.find_fix(diagnostic, &lines))
    }

    /// Validated apply. Drift and vanished files are non-fatal (the fix is
    /// simply stale); a driver failure during revalidation aborts the run.
    fn apply(&self, fix: &Fix) -> anyhow::Result<bool> {
        let revalidate = DriverRevalidate::new(self.compiler.as_ref(), &self.settings.repo_root);
        match self
            .applicator
            .apply(fix, &revalidate, &self.ledger, self.run_id)
        {
            Ok(outcome) => Ok(outcome.success),
            Err(e @ ApplyError::Drift { .. }) => {
                warn!(error = %e, "stale fix discarded");
                Ok(false)
            }
            Err(e @ ApplyError::MissingFile { .. }) => {
                warn!(error = %e, "stale fix discarded");
                Ok(false)
            }
            Err(ApplyError::Revalidate { source }) => {
                Err(source.context("recompile after edit failed"))
            }
            Err(ApplyError::Io(e)) => Err(e).context("apply edit"),
        }
    }
}

/// Recent fix history for a repository, without touching the compiler. Lets
/// the report mode run on machines with no JDK installed.
pub fn ledger_report(settings: &DoctorSettings) -> anyhow::Result<String> {
    let mut all = srcdoctor_ledger::read_entries(&settings.ledger_path)?;
    let total = all.len();
    all.reverse();
    all.truncate(settings.report_limit);
    Ok(render_report(&all, total))
}

fn read_lines(path: &Utf8Path) -> Option<Vec<String>> {
    let text = fs::read_to_string(path).ok()?;
    Some(text.lines().map(str::to_owned).collect())
}
