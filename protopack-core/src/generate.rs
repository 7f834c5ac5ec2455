//! Conditional regeneration of protobuf-derived sources.

use crate::compiler::locate_compiler;
use crate::error::{BuildError, BuildResult};
use crate::ports::{EnvPort, Invocation, ProcessPort};
use crate::settings::CodegenSettings;
use anyhow::Context;
use camino::Utf8Path;
use fs_err as fs;
use protopack_types::compiler::CompilerLocation;
use protopack_types::schema_source::{Freshness, GenerateOutcome, SchemaSource};
use tracing::{debug, info};

/// Compare modification times of a schema source and its derived output.
///
/// The output is `Current` only when strictly newer than the source.
pub fn freshness(source: &SchemaSource) -> anyhow::Result<Freshness> {
    if !source.output.exists() {
        return Ok(Freshness::Missing);
    }
    let src_mtime = fs::metadata(&source.source)?
        .modified()
        .with_context(|| format!("read mtime of {}", source.source))?;
    let out_mtime = fs::metadata(&source.output)?
        .modified()
        .with_context(|| format!("read mtime of {}", source.output))?;
    if src_mtime < out_mtime {
        Ok(Freshness::Current)
    } else {
        Ok(Freshness::Stale)
    }
}

/// `<compiler> -I=<dir> --<language>_out=<dir> <source>`, with the schema's
/// directory as both include and output root.
pub fn compiler_invocation(
    compiler: &Utf8Path,
    source: &SchemaSource,
    language: &str,
) -> Invocation {
    let dir = source.schema_dir();
    Invocation {
        program: compiler.to_path_buf(),
        args: vec![
            format!("-I={}", dir),
            format!("--{}_out={}", language, dir),
            source.source.to_string(),
        ],
    }
}

/// Regenerates schema sources, locating the compiler at most once and
/// only when some output actually needs it.
pub struct Regenerator<'a> {
    env: &'a dyn EnvPort,
    process: &'a dyn ProcessPort,
    codegen: &'a CodegenSettings,
    compiler: Option<CompilerLocation>,
}

impl<'a> Regenerator<'a> {
    pub fn new(
        env: &'a dyn EnvPort,
        process: &'a dyn ProcessPort,
        codegen: &'a CodegenSettings,
    ) -> Self {
        Self {
            env,
            process,
            codegen,
            compiler: None,
        }
    }

    /// The compiler resolved so far, if any regeneration needed one.
    pub fn compiler(&self) -> Option<&CompilerLocation> {
        self.compiler.as_ref()
    }

    pub fn into_compiler(self) -> Option<CompilerLocation> {
        self.compiler
    }

    fn resolve_compiler(&mut self) -> BuildResult<CompilerLocation> {
        if let Some(c) = &self.compiler {
            return Ok(c.clone());
        }
        let located = locate_compiler(
            self.env,
            &self.codegen.compiler_name,
            &self.codegen.compiler_env,
        )?;
        self.compiler = Some(located.clone());
        Ok(located)
    }

    /// Regenerate one schema source unless its output is already current.
    pub fn regenerate(&mut self, source: &SchemaSource) -> BuildResult<GenerateOutcome> {
        if !source.source.exists() {
            return Err(BuildError::MissingSchema {
                path: source.source.clone(),
            });
        }

        let state = freshness(source)?;
        if !state.needs_regeneration() {
            debug!(source = %source.source, output = %source.output, "output is current; skipping");
            return Ok(GenerateOutcome::Skipped);
        }

        let compiler = self.resolve_compiler()?;
        let invocation = compiler_invocation(&compiler.path, source, &self.codegen.language);
        info!("Running command: {}", invocation.command_line());

        let code = self
            .process
            .run(&invocation)
            .with_context(|| format!("run compiler for {}", source.source))?;
        if code != Some(0) {
            return Err(BuildError::CompilerFailed {
                schema: source.source.clone(),
                code,
            });
        }
        Ok(GenerateOutcome::Generated)
    }
}
