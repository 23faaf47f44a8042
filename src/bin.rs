use ftt::FttBuilder;
use std::env;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use std::process;

#[derive(Debug, Default)]
struct CliArgs {
    filename: Option<String>,
    validate: bool,
    stats: bool,
    kinship: Option<(String, String)>,
    skip_postprocess: bool,
    help: bool,
}

fn print_help() {
    println!(
        "ftt - FamilyTree-Text inspection tool\n\
\n\
USAGE:\n\
  ftt <file.ftt>\n\
  ftt --validate <file.ftt>\n\
  ftt --kinship <ID_A> <ID_B> <file.ftt>\n\
  ftt --stats <file.ftt>\n\
\n\
OPTIONS:\n\
  -h, --help               Print this help\n\
  --validate                Run all validation passes and print diagnostics\n\
  --kinship <A> <B>         Print every relationship found between A and B\n\
  --stats                   Print record-count statistics\n\
  --skip-postprocess        Skip implicit-union/child reconciliation before acting\n"
    );
}

fn parse_args(argv: &[String]) -> Result<CliArgs, CliError> {
    let mut out = CliArgs::default();

    let mut i = 1;
    while i < argv.len() {
        match argv[i].as_str() {
            "-h" | "--help" => {
                out.help = true;
                i += 1;
            }
            "--validate" => {
                out.validate = true;
                i += 1;
            }
            "--stats" => {
                out.stats = true;
                i += 1;
            }
            "--skip-postprocess" => {
                out.skip_postprocess = true;
                i += 1;
            }
            "--kinship" => {
                let a = argv
                    .get(i + 1)
                    .ok_or_else(|| CliError::Usage("--kinship expects two ids".to_string()))?;
                let b = argv
                    .get(i + 2)
                    .ok_or_else(|| CliError::Usage("--kinship expects two ids".to_string()))?;
                out.kinship = Some((a.clone(), b.clone()));
                i += 3;
            }
            other if other.starts_with('-') => {
                return Err(CliError::Usage(format!("Unknown option: {other}")));
            }
            value => {
                if out.filename.is_some() {
                    return Err(CliError::Usage(format!(
                        "Found more args than expected: {:?}\n\
\
Hint: this tool expects exactly one .ftt file path (quote it if it contains spaces), for example:\n\
  ftt --validate \"/path/with spaces/family.ftt\"",
                        &argv[1..]
                    )));
                }
                out.filename = Some(value.to_string());
                i += 1;
            }
        }
    }

    Ok(out)
}

#[derive(Debug)]
enum CliError {
    Io(std::io::Error),
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CliError::Io(err) => write!(f, "IO error: {err}"),
            CliError::Usage(msg) => write!(f, "Usage error: {msg}"),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err)
    }
}

fn main() {
    match run() {
        Ok(RunOutcome::Success) => {
            process::exit(0);
        }
        Ok(RunOutcome::ValidationFailed) => {
            process::exit(2);
        }
        Err(e) => {
            let exit_code = match &e {
                CliError::Io(_) => 1,
                CliError::Usage(_) => 3,
            };
            eprintln!("Error: {e}");
            process::exit(exit_code);
        }
    }
}

#[derive(Debug)]
enum RunOutcome {
    Success,
    ValidationFailed,
}

fn run() -> Result<RunOutcome, CliError> {
    let argv: Vec<String> = env::args().collect();
    let args = parse_args(&argv)?;

    if args.help {
        print_help();
        process::exit(0);
    }

    let filename = args
        .filename
        .as_deref()
        .ok_or_else(|| CliError::Usage("Missing filename.".to_string()))?;

    let contents = read_relative(filename)?;

    let result = FttBuilder::new()
        .skip_postprocess(args.skip_postprocess)
        .build(&contents);

    if let Some((a, b)) = &args.kinship {
        let engine = result.kinship();
        match engine.calculate(a, b) {
            Ok(relationships) => {
                for rel in &relationships {
                    let description = engine.describe(rel, b);
                    println!("{}: {}", description.term, description.detail);
                }
                return Ok(RunOutcome::Success);
            }
            Err(err) => {
                return Err(CliError::Usage(err.to_string()));
            }
        }
    }

    if args.validate {
        let errors: Vec<_> = result.document.errors().collect();
        let warnings: Vec<_> = result.document.warnings().collect();
        println!(
            "Validation - errors: {}, warnings: {}",
            errors.len(),
            warnings.len()
        );
        for diagnostic in &errors {
            println!("{diagnostic}");
        }
        for diagnostic in &warnings {
            println!("{diagnostic}");
        }
        if errors.is_empty() {
            return Ok(RunOutcome::Success);
        }
        return Ok(RunOutcome::ValidationFailed);
    }

    result.document.stats();
    Ok(RunOutcome::Success)
}

fn read_relative(path: &str) -> Result<String, std::io::Error> {
    let path_buf: PathBuf = PathBuf::from(path);
    let absolute_path: PathBuf = fs::canonicalize(path_buf)?;
    fs::read_to_string(absolute_path)
}
