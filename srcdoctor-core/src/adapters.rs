use camino::Utf8Path;
use srcdoctor_compile::Compiler;
use srcdoctor_edit::Revalidate;
use srcdoctor_parse::parse_diagnostics;
use srcdoctor_types::Diagnostic;

/// Bridges the compiler driver and the parser into the applicator's
/// revalidation seam: recompile one file, hand back fresh diagnostics.
pub struct DriverRevalidate<'a> {
    compiler: &'a dyn Compiler,
    repo_root: &'a Utf8Path,
}

impl<'a> DriverRevalidate<'a> {
    pub fn new(compiler: &'a dyn Compiler, repo_root: &'a Utf8Path) -> Self {
        Self { compiler, repo_root }
    }
}

impl Revalidate for DriverRevalidate<'_> {
    fn diagnostics_for(&self, file: &Utf8Path) -> anyhow::Result<Vec<Diagnostic>> {
        let raw = self.compiler.compile_file(file)?;
        Ok(parse_diagnostics(&raw, self.repo_root))
    }
}
