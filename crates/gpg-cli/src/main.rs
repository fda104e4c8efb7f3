//! GPG command-line entrypoint (`spec.md` §6 "Command-line (GPG)"):
//! argv[0]'s basename selects the program identity (psmet/svgmet/cormet/
//! texmet), four positional arguments configure the run. This is a legacy
//! fixed-argc contract, not a flag-based CLI, so argument handling is done
//! by hand rather than through `clap` — see `DESIGN.md`.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gpg_backend::cmf::CmfBackend;
use gpg_backend::program::{resolve_program, ProgramInfo, ProgramType, PROGRAM_TYPES};
use gpg_backend::ps::PsBackend;
use gpg_backend::svg::SvgBackend;
use gpg_backend::texmet::TexMetBackend;
use gpg_backend::GraphicsBackend;
use gpg_config::{Environment, RunTime};
use gpg_engine::Engine;

const USAGE: &str = "usage: <program> <setup_file> <pdf_sub_directory> <pdf_filename> <run_time>";

enum CliError {
    Usage(String),
    Fatal(anyhow::Error),
}

impl<E: Into<anyhow::Error>> From<E> for CliError {
    fn from(err: E) -> Self {
        CliError::Fatal(err.into())
    }
}

fn program_basename(argv0: &str) -> String {
    Path::new(argv0)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn allowed_program_names() -> String {
    PROGRAM_TYPES.iter().map(|p| p.name).collect::<Vec<_>>().join(", ")
}

fn backend_for(program_type: ProgramType) -> Box<dyn GraphicsBackend> {
    match program_type {
        ProgramType::PsMet => Box::new(PsBackend::new()),
        ProgramType::SvgMet => Box::new(SvgBackend::new()),
        ProgramType::CorMet => Box::new(CmfBackend::new()),
        ProgramType::TexMet => Box::new(TexMetBackend::new()),
    }
}

/// The base fpdf source directory for a program is the directory map entry
/// sharing the program's own name (`spec.md` §6 "Environment and paths":
/// `psmet`/`svgmet`/`cormet`/`texmet` are the base fpdf dirs, distinct from
/// the `psout`/`svgout`/`corout`/`texout` base *output* dirs).
fn base_fpdf_dir(environment: &Environment, program: &ProgramInfo) -> String {
    environment.directories.get(program.name).unwrap_or_default().to_string()
}

fn entry_fpdf_path(base_dir: &str, sub_directory: &str, filename: &str) -> PathBuf {
    let mut path = PathBuf::from(base_dir);
    if !sub_directory.is_empty() {
        path.push(sub_directory);
    }
    let named = if filename.ends_with(".fpdf") {
        filename.to_string()
    } else {
        format!("{filename}.fpdf")
    };
    path.push(named);
    path
}

struct Args {
    program: &'static ProgramInfo,
    setup_file: PathBuf,
    pdf_sub_directory: String,
    pdf_filename: String,
    run_time: RunTime,
}

fn parse_args() -> Result<Args, CliError> {
    let mut argv = std::env::args();
    let argv0 = argv.next().unwrap_or_default();
    let rest: Vec<String> = argv.collect();

    let name = program_basename(&argv0);
    let program = resolve_program(&name).ok_or_else(|| {
        CliError::Usage(format!(
            "unknown program name '{name}', expected one of: {}",
            allowed_program_names()
        ))
    })?;

    let [setup_file, pdf_sub_directory, pdf_filename, run_time] = rest.as_slice() else {
        return Err(CliError::Usage(USAGE.to_string()));
    };

    let run_time = RunTime::parse(run_time).map_err(|err| CliError::Usage(err.to_string()))?;

    Ok(Args {
        program,
        setup_file: PathBuf::from(setup_file.clone()),
        pdf_sub_directory: pdf_sub_directory.clone(),
        pdf_filename: pdf_filename.clone(),
        run_time,
    })
}

fn run() -> Result<(), CliError> {
    let args = parse_args()?;

    let environment = gpg_config::env::load_from(Some(args.setup_file.clone()))?;
    let base_dir = base_fpdf_dir(&environment, args.program);
    let entry_path = entry_fpdf_path(&base_dir, &args.pdf_sub_directory, &args.pdf_filename);

    tracing::info!(
        target: "gpg.cli",
        program = args.program.name,
        entry = %entry_path.display(),
        year = args.run_time.year,
        day_of_year = args.run_time.day_of_year,
        hour = args.run_time.hour,
        "starting run"
    );

    let backend = backend_for(args.program.program_type);
    let mut engine = Engine::new(entry_path, environment, backend)
        .map_err(|err| CliError::Fatal(anyhow::anyhow!(err)))?;

    engine.ctx.codewords.pdf_dir = base_dir;
    engine.ctx.codewords.home_dir = engine.ctx.environment.directories.home.clone();
    engine.ctx.codewords.psout_dir = engine
        .ctx
        .environment
        .directories
        .get(args.program.out_codeword)
        .unwrap_or_default()
        .to_string();
    engine.ctx.codewords.year = format!("{:04}", args.run_time.year);
    engine.ctx.codewords.v_hour = format!("{:02}", args.run_time.hour);

    engine.run().map_err(|err| CliError::Fatal(anyhow::anyhow!(err)))?;

    for diag in &engine.ctx.diagnostics {
        tracing::warn!(target: "gpg.cli", "{diag}");
    }

    Ok(())
}

fn main() -> ExitCode {
    let _log_guard = gpg_config::logging::init(Path::new("."));

    match run() {
        Ok(()) => ExitCode::from(0),
        Err(CliError::Usage(msg)) => {
            eprintln!("{msg}");
            // spec.md §6 "Exit codes": usage/validation failure exits -1.
            ExitCode::from((-1i32) as u8)
        }
        Err(CliError::Fatal(err)) => {
            tracing::error!(target: "gpg.cli", error = %err, "fatal error");
            eprintln!("error: {err:#}");
            ExitCode::from(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_basename_strips_path_and_extension() {
        assert_eq!(program_basename("/usr/local/bin/psmet"), "psmet");
        assert_eq!(program_basename("svgmet.exe"), "svgmet");
    }

    #[test]
    fn entry_fpdf_path_adds_extension_when_missing() {
        let path = entry_fpdf_path("/data/psmet", "today", "surface");
        assert_eq!(path, PathBuf::from("/data/psmet/today/surface.fpdf"));
    }

    #[test]
    fn entry_fpdf_path_keeps_existing_extension() {
        let path = entry_fpdf_path("/data/psmet", "today", "surface.fpdf");
        assert_eq!(path, PathBuf::from("/data/psmet/today/surface.fpdf"));
    }

    #[test]
    fn entry_fpdf_path_skips_empty_sub_directory() {
        let path = entry_fpdf_path("/data/psmet", "", "surface");
        assert_eq!(path, PathBuf::from("/data/psmet/surface.fpdf"));
    }
}
