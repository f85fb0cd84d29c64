//! gocmt — add placeholder doc comments to undocumented Go declarations.
//!
//! Every top-level function, type, constant, and variable without a real
//! doc comment gets one built from a template (`// Name ...` by default).
//! Functions also list their parameters and results. Existing prose is never
//! touched; a comment that only repeats the name counts as missing.
//!
//! - **stdin mode**: `gocmt < file.go` prints the annotated file
//! - **file mode**: `gocmt [-i] [-t TEXT] [-d DIR] [FILES...]`

mod annotate;
mod cmap;
mod error;
mod model;
mod parser;
mod printer;
mod template;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{debug, error, warn};
use rayon::prelude::*;
use std::fs;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};
use template::CommentTemplate;

#[derive(Parser)]
#[command(
    name = "gocmt",
    about = "Add placeholder doc comments to undocumented top-level Go declarations"
)]
struct Cli {
    /// Go files (glob patterns supported). If omitted and no --dir, reads from stdin.
    files: Vec<String>,

    /// Process every .go file under this directory, recursively
    #[arg(short = 'd', long)]
    dir: Option<PathBuf>,

    /// Rewrite files in place instead of printing to stdout
    #[arg(short = 'i', long = "in-place")]
    in_place: bool,

    /// Comment text placed after the declaration name
    #[arg(short = 't', long, default_value = template::DEFAULT_TEMPLATE)]
    template: String,

    /// Log every documented declaration
    #[arg(short = 'v', long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let template = CommentTemplate::new(&cli.template).context("invalid --template")?;

    if cli.files.is_empty() && cli.dir.is_none() {
        return stdin_mode(&template, cli.in_place);
    }

    file_mode(&cli, &template)
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp(None)
        .init();
}

/// Annotate one file's source text and render it back.
fn annotate_source(path: &Path, source: &str, template: &CommentTemplate) -> Result<String> {
    let file = annotate::process_file(path, source, template)?;
    Ok(printer::print(&file))
}

/// stdin mode: read one Go file from stdin, write the annotated file to stdout.
fn stdin_mode(template: &CommentTemplate, in_place: bool) -> Result<()> {
    if in_place {
        warn!("--in-place has no effect when reading from stdin");
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("failed to read stdin")?;

    let output = annotate_source(Path::new("<stdin>"), &input, template)?;
    print!("{}", output);
    Ok(())
}

/// file mode: annotate every matched file, printing or rewriting each one.
fn file_mode(cli: &Cli, template: &CommentTemplate) -> Result<()> {
    let mut files = expand_globs(&cli.files)?;
    if let Some(dir) = &cli.dir {
        files.extend(walk_dir(dir)?);
    }
    files.sort();
    files.dedup();

    if files.is_empty() {
        bail!("no Go files to process");
    }

    // One SourceFile per file; nothing is shared between them
    let results: Vec<(&PathBuf, Result<Option<String>>)> = files
        .par_iter()
        .map(|path| (path, process_path(path, template, cli.in_place)))
        .collect();

    let mut failed = 0;
    let mut stdout = io::stdout().lock();
    for (path, result) in results {
        match result {
            Ok(Some(output)) => stdout
                .write_all(output.as_bytes())
                .context("failed to write stdout")?,
            Ok(None) => debug!("{} done", path.display()),
            Err(e) => {
                error!("{:#}", e);
                failed += 1;
            }
        }
    }

    if failed > 0 {
        bail!("{} of {} file(s) failed", failed, files.len());
    }
    Ok(())
}

/// Annotate the file at `path`. In place, the file is rewritten only when
/// its content changed and `None` is returned; otherwise the annotated text
/// is returned for printing.
fn process_path(path: &Path, template: &CommentTemplate, in_place: bool) -> Result<Option<String>> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let output = annotate_source(path, &source, template)?;

    if !in_place {
        return Ok(Some(output));
    }
    if output != source {
        fs::write(path, &output)
            .with_context(|| format!("failed to write {}", path.display()))?;
        debug!("wrote {}", path.display());
    }
    Ok(None)
}

/// Expand glob patterns into a list of real file paths.
/// Bare directory paths are scanned (non-recursively) for .go files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for pattern in patterns {
        let path = Path::new(pattern);
        if path.is_file() {
            files.push(path.to_path_buf());
            continue;
        }
        if path.is_dir() {
            let entries = fs::read_dir(path)
                .with_context(|| format!("failed to read directory: {}", path.display()))?;
            for entry in entries.flatten() {
                let p = entry.path();
                if p.is_file() && parser::is_go_source(&p) {
                    files.push(p);
                }
            }
            continue;
        }
        let matches: Vec<_> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?
            .filter_map(|r| r.ok())
            .filter(|p| p.is_file())
            .collect();
        if matches.is_empty() {
            warn!("no files matched: {}", pattern);
        }
        files.extend(matches);
    }
    Ok(files)
}

/// Every .go file under `dir`, recursively.
fn walk_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        bail!("not a directory: {}", dir.display());
    }
    let pattern = format!(
        "{}/**/*.go",
        glob::Pattern::escape(&dir.to_string_lossy())
    );
    let files = glob::glob(&pattern)
        .with_context(|| format!("invalid directory path: {}", dir.display()))?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();
    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "package p\n").unwrap();
    }

    #[test]
    fn walk_dir_is_recursive() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.go"));
        touch(&dir.path().join("sub/deeper/b.go"));
        touch(&dir.path().join("sub/notes.txt"));

        let mut files = walk_dir(dir.path()).unwrap();
        files.sort();
        assert_eq!(
            files,
            vec![dir.path().join("a.go"), dir.path().join("sub/deeper/b.go")]
        );
    }

    #[test]
    fn walk_dir_rejects_files() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.go");
        touch(&file);
        assert!(walk_dir(&file).is_err());
    }

    #[test]
    fn expand_globs_scans_directory_shallowly() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("a.go"));
        touch(&dir.path().join("sub/b.go"));
        touch(&dir.path().join("c.rs"));

        let files = expand_globs(&[dir.path().to_string_lossy().to_string()]).unwrap();
        assert_eq!(files, vec![dir.path().join("a.go")]);
    }

    #[test]
    fn expand_globs_matches_patterns() {
        let dir = TempDir::new().unwrap();
        touch(&dir.path().join("x.go"));
        touch(&dir.path().join("y.go"));

        let pattern = format!("{}/*.go", dir.path().display());
        let mut files = expand_globs(&[pattern]).unwrap();
        files.sort();
        assert_eq!(files, vec![dir.path().join("x.go"), dir.path().join("y.go")]);
    }

    #[test]
    fn annotate_source_round_trip() {
        let out = annotate_source(
            Path::new("t.go"),
            "package p\n\nvar Debug bool\n",
            &CommentTemplate::new("TODO").unwrap(),
        )
        .unwrap();
        assert_eq!(out, "package p\n\n// Debug TODO\nvar Debug bool\n");
    }

    #[test]
    fn process_path_in_place_rewrites() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("m.go");
        fs::write(&path, "package m\n\nfunc Run() {}\n").unwrap();

        let result = process_path(&path, &CommentTemplate::default(), true).unwrap();
        assert!(result.is_none());
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "package m\n\n// Run ...\nfunc Run() {}\n"
        );
    }
}
