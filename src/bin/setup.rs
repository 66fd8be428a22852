use std::env;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use imager_profile::config::{load_or_default, save, workspace_root, WorkspacePaths};
use imager_profile::profiles::default_profile_fields;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = CliArgs::parse()?;
    let root = match args.root {
        Some(root) => root,
        None => workspace_root()?,
    };
    let paths = WorkspacePaths::new(root);
    paths.ensure()?;
    let config_path = paths.config_file();
    let mut config = load_or_default(&config_path)?;
    let defaults = &mut config.profile_defaults;

    let mut changed = !config_path.exists();
    if let Some(age) = args.age {
        changed |= defaults.age != age;
        defaults.age = age;
    }
    if let Some(camera) = args.camera {
        changed |= defaults.camera_type != camera;
        defaults.camera_type = camera;
    }
    if let Some(style) = args.style {
        changed |= defaults.photography_style != style;
        defaults.photography_style = style;
    }
    if let Some(status) = args.status {
        changed |= defaults.social_status != status;
        defaults.social_status = status;
    }

    // Refuse to record defaults that provisioning would reject.
    default_profile_fields(&config.profile_defaults)
        .context("Profile defaults are invalid; config not written")?;

    if changed {
        save(&config_path, &config)?;
        println!("Profile defaults recorded at {}", config_path.display());
    } else {
        println!("Profile defaults already configured.");
    }

    Ok(())
}

struct CliArgs {
    root: Option<PathBuf>,
    age: Option<i32>,
    camera: Option<String>,
    style: Option<String>,
    status: Option<String>,
}

impl CliArgs {
    fn parse() -> Result<Self> {
        let mut args = env::args().skip(1);
        let mut parsed = Self {
            root: None,
            age: None,
            camera: None,
            style: None,
            status: None,
        };
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--root" => {
                    let value = args.next().context("Expected a directory after --root")?;
                    parsed.root = Some(PathBuf::from(value));
                }
                "--age" => {
                    let value = args.next().context("Expected a number after --age")?;
                    parsed.age = Some(
                        value
                            .parse()
                            .with_context(|| format!("'{value}' is not a valid age"))?,
                    );
                }
                "--camera" => {
                    parsed.camera = Some(args.next().context("Expected a value after --camera")?);
                }
                "--style" => {
                    parsed.style = Some(args.next().context("Expected a value after --style")?);
                }
                "--status" => {
                    parsed.status = Some(args.next().context("Expected a value after --status")?);
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

fn print_usage() {
    println!("Imager profile setup");
    println!("Writes the profile defaults used when new accounts are provisioned.");
    println!("Usage: cargo run --bin setup -- [options]");
    println!("Options:");
    println!("  --root <dir>        Workspace root (default: $IMAGER_HOME or the OS data dir)");
    println!("  --age <n>           Default age (default: 18)");
    println!("  --camera <name>     Default camera type (default: Kodak)");
    println!("  --style <code>      Default photography style (default: PORTRAIT)");
    println!("  --status <code>     Default social status (default: PEASANT)");
}
