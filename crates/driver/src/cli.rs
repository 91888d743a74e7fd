use std::path::PathBuf;

use file_format::ProjectMetadata;

pub const DEFAULT_PROJECT: &str = "MIMO_28GHz_Final_Tune";
pub const DEFAULT_DESIGN: &str = "Exact_28GHz";

/// Parsed command line.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    /// Parameter file to build from; the tuned defaults otherwise.
    pub params: Option<PathBuf>,
    /// Solve settings JSON; the 28 GHz defaults otherwise.
    pub settings: Option<PathBuf>,
    pub journal: Option<PathBuf>,
    pub model: Option<PathBuf>,
    /// Write the parameter set in use and exit without building.
    pub write_params: Option<PathBuf>,
    pub report: bool,
    /// Project name; overrides the name stored in `params` when given.
    pub project: Option<String>,
    /// Design name; overrides the design stored in `params` when given.
    pub design: Option<String>,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            params: None,
            settings: None,
            journal: None,
            model: None,
            write_params: None,
            report: false,
            project: None,
            design: None,
        }
    }
}

impl Options {
    /// Metadata for written files: `loaded` (or fresh defaults) with any
    /// explicit `--project`/`--design` applied on top.
    pub fn metadata(&self, loaded: Option<ProjectMetadata>) -> ProjectMetadata {
        let mut metadata =
            loaded.unwrap_or_else(|| ProjectMetadata::new(DEFAULT_PROJECT, DEFAULT_DESIGN));
        if let Some(project) = &self.project {
            metadata.name = project.clone();
        }
        if let Some(design) = &self.design {
            metadata.design = design.clone();
        }
        metadata
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Run(Options),
    Help,
}

pub const USAGE: &str = "\
usage: mimo-build [options]

Build the two-element MIMO patch array, dry-run the solve against the
in-memory engine and write the results.

options:
  --params <path>        parameter file to build from
  --settings <path>      solve settings JSON
  --journal <path>       write the engine command journal as JSON
  --model <path>         write the built model file
  --write-params <path>  write the parameter set in use and exit
  --project <name>       project name for written files (overrides --params)
  --design <name>        design name for written files (overrides --params)
  --report               print the model report
  -h, --help             show this help

Log verbosity follows RUST_LOG (default: info).";

/// Parse arguments (without the program name).
pub fn parse<I>(args: I) -> Result<Command, String>
where
    I: IntoIterator<Item = String>,
{
    let mut opts = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        let mut value = |flag: &str| {
            args.next()
                .ok_or_else(|| format!("{flag} requires a value"))
        };
        match arg.as_str() {
            "--params" => opts.params = Some(PathBuf::from(value("--params")?)),
            "--settings" => opts.settings = Some(PathBuf::from(value("--settings")?)),
            "--journal" => opts.journal = Some(PathBuf::from(value("--journal")?)),
            "--model" => opts.model = Some(PathBuf::from(value("--model")?)),
            "--write-params" => {
                opts.write_params = Some(PathBuf::from(value("--write-params")?))
            }
            "--project" => opts.project = Some(value("--project")?),
            "--design" => opts.design = Some(value("--design")?),
            "--report" => opts.report = true,
            "--help" | "-h" => return Ok(Command::Help),
            other => return Err(format!("unknown argument '{other}'")),
        }
    }
    Ok(Command::Run(opts))
}
