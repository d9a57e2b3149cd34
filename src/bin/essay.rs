use std::env;
use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use essaybase::config::{config_file_path, load_or_default, save};
use essaybase::orchestration::is_user_error;
use essaybase::{Audience, Credentials, EssayPipeline, EssayRequest};
use tracing_subscriber::EnvFilter;

const MISSING_FIELDS_WARNING: &str =
    "Por favor, complete todos los campos antes de generar el ensayo.";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = CliArgs::parse()?;
    if args.write_config {
        return write_default_config();
    }

    let config = load_or_default()?;
    let request = EssayRequest::new(args.title, args.thesis, args.authors, args.audience);
    if let Err(err) = request.validate() {
        eprintln!("{MISSING_FIELDS_WARNING} ({err})");
        return Ok(());
    }

    let credentials = Credentials::from_env().context("Provider credentials are required")?;
    let pipeline = EssayPipeline::from_config(&config, &credentials)?;
    let run = match pipeline.run(&request) {
        Ok(run) => run,
        Err(err) if is_user_error(&err) => {
            eprintln!("{MISSING_FIELDS_WARNING} ({err})");
            return Ok(());
        }
        Err(err) => return Err(err).context("Essay generation failed"),
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&run.summary())?);
    } else {
        println!("Ensayo generado:\n");
        println!("{}", run.display_markdown);
    }

    match &run.export {
        Ok(artifact) => {
            fs::create_dir_all(&args.out_dir)
                .with_context(|| format!("Unable to create {}", args.out_dir.display()))?;
            let path = args.out_dir.join(&artifact.file_name);
            fs::write(&path, &artifact.bytes)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("Documento guardado en {} ({})", path.display(), artifact.mime_type);
        }
        Err(err) => eprintln!("No se pudo generar el documento DOCX: {err}"),
    }

    Ok(())
}

struct CliArgs {
    title: String,
    thesis: String,
    authors: String,
    audience: Audience,
    out_dir: PathBuf,
    json: bool,
    write_config: bool,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut parsed = Self {
            title: String::new(),
            thesis: String::new(),
            authors: String::new(),
            audience: Audience::default(),
            out_dir: PathBuf::from("."),
            json: false,
            write_config: false,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--title" => parsed.title = args.next().context("Expected a value after --title")?,
                "--thesis" => {
                    parsed.thesis = args.next().context("Expected a value after --thesis")?
                }
                "--authors" => {
                    parsed.authors = args
                        .next()
                        .context("Expected comma-separated names after --authors")?
                }
                "--audience" => {
                    let value = args.next().context("Expected a value after --audience")?;
                    parsed.audience = value.parse().map_err(|err: String| anyhow!(err))?;
                }
                "--out" => {
                    parsed.out_dir =
                        PathBuf::from(args.next().context("Expected a directory after --out")?)
                }
                "--json" => parsed.json = true,
                "--write-config" => parsed.write_config = true,
                "--about" => {
                    print_about();
                    std::process::exit(0);
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                other => {
                    return Err(anyhow!(
                        "Unknown argument '{other}'. Run with --help for usage instructions."
                    ));
                }
            }
        }
        Ok(parsed)
    }
}

fn write_default_config() -> Result<()> {
    let path = config_file_path()?;
    if path.exists() {
        println!("Configuration already present at {}", path.display());
        return Ok(());
    }
    save(&load_or_default()?)?;
    println!("Default configuration written to {}", path.display());
    Ok(())
}

fn print_usage() {
    println!("Generador de Ensayos Académicos");
    println!("Usage: essay --title <text> --thesis <text> --authors <a, b> [options]");
    println!("Options:");
    println!("  --audience <level>   general | knowledgeable | specialist (default: general)");
    println!("  --out <dir>          Directory for the DOCX download (default: .)");
    println!("  --json               Print a JSON run summary instead of the essay");
    println!("  --write-config       Write the default config.toml and exit");
    println!("  --about              Describe the application and exit");
    println!("Environment: SERPLY_API_KEY, TOGETHER_API_KEY, ESSAYBASE_HOME, RUST_LOG");
}

fn print_about() {
    println!("Generador de Ensayos Académicos");
    println!();
    println!("Crea ensayos estructurados y documentados con inteligencia artificial.");
    println!();
    println!("Cómo usar la aplicación:");
    println!("  1. Indique el título de su ensayo (--title).");
    println!("  2. Escriba la tesis que quiere defender (--thesis).");
    println!("  3. Indique los autores que desea citar, separados por comas (--authors).");
    println!("  4. Ejecute el comando para buscar fuentes y generar el ensayo.");
    println!("  5. Lea el ensayo generado con enlaces a las fuentes citadas.");
    println!("  6. Abra el documento DOCX guardado, con enlaces activos.");
    println!();
    println!(
        "Nota: el contenido se genera con inteligencia artificial a partir de información \
         disponible en línea. Verifique siempre la información con fuentes académicas."
    );
}
