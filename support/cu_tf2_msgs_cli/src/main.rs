use anyhow::Context;
use clap::{Parser, Subcommand};
use cu_tf2_msgs::{read_wire_config, MessageRegistry, WireConfig};
use log::{debug, error};
use simplelog::{ColorChoice, Config, LevelFilter, TermLogger, TerminalMode};
use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Opts {
    /// Wire configuration in RON, CDR little endian when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the registered message types.
    List,
    /// Print the effective wire configuration.
    Config,
    /// Write a default constructed message of the given type.
    Sample {
        #[arg(short = 't', long = "type")]
        type_name: String,
        #[arg(short, long)]
        output: PathBuf,
    },
    /// Decode a captured message and print it.
    Decode {
        #[arg(short = 't', long = "type")]
        type_name: String,
        #[arg(short, long)]
        input: PathBuf,
    },
}

fn wire_config(opts: &Opts) -> anyhow::Result<WireConfig> {
    match &opts.config {
        Some(path) => Ok(read_wire_config(path)?),
        None => Ok(WireConfig::default()),
    }
}

fn run(opts: &Opts, out: &mut impl Write) -> anyhow::Result<()> {
    let wire = wire_config(opts)?;
    let registry = MessageRegistry::tf2_msgs(wire)?;

    match &opts.command {
        Command::List => {
            for name in registry.names() {
                writeln!(out, "tf2_msgs/{name}")?;
            }
        }
        Command::Config => {
            writeln!(out, "{}", registry.wire().serialize_ron()?)?;
        }
        Command::Sample { type_name, output } => {
            let msg = registry.construct(type_name)?;
            let bytes = registry.serialize(&msg)?;
            std::fs::write(output, &bytes)
                .with_context(|| format!("Failed to write {}", output.display()))?;
            debug!(
                "Wrote {} bytes of {type_name} to {}",
                bytes.len(),
                output.display()
            );
        }
        Command::Decode { type_name, input } => {
            let bytes = std::fs::read(input)
                .with_context(|| format!("Failed to read {}", input.display()))?;
            let msg = registry.deserialize(type_name, &bytes)?;
            writeln!(out, "{msg:#?}")?;
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let opts = Opts::parse();

    let level = if opts.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Info
    };
    if let Err(e) = TermLogger::init(
        level,
        Config::default(),
        TerminalMode::Mixed,
        ColorChoice::Auto,
    ) {
        eprintln!("Failed to set up logging: {e}");
    }

    match run(&opts, &mut std::io::stdout().lock()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn run_args(args: &[&str]) -> anyhow::Result<String> {
        let opts = Opts::try_parse_from(args)?;
        let mut out = Vec::new();
        run(&opts, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    #[test]
    fn test_list() {
        let out = run_args(&["cu-tf2-msgs", "list"]).unwrap();
        let lines: Vec<_> = out.lines().collect();
        assert_eq!(lines.len(), 9);
        assert!(lines.contains(&"tf2_msgs/LookupTransformActionGoal"));
    }

    #[test]
    fn test_sample_then_decode() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("wire.ron");
        std::fs::write(&config, "(format: Bincode)").unwrap();
        let config = config.to_str().unwrap();
        let capture = tmp.path().join("goal.bin");
        let capture = capture.to_str().unwrap();

        run_args(&[
            "cu-tf2-msgs",
            "-c",
            config,
            "sample",
            "-t",
            "LookupTransformGoal",
            "-o",
            capture,
        ])
        .unwrap();
        let out = run_args(&[
            "cu-tf2-msgs",
            "decode",
            "--config",
            config,
            "--type",
            "LookupTransformGoal",
            "--input",
            capture,
        ])
        .unwrap();
        assert!(out.starts_with("LookupTransformGoal("));
        assert!(out.contains("advanced: false"));

        // same bytes read as CDR
        let as_cdr = ["cu-tf2-msgs", "decode", "-t", "LookupTransformGoal", "-i", capture];
        assert!(run_args(&as_cdr).is_err());
    }

    #[test]
    fn test_unknown_type() {
        let tmp = tempfile::tempdir().unwrap();
        let capture = tmp.path().join("x.bin");
        let err = run_args(&[
            "cu-tf2-msgs",
            "sample",
            "-t",
            "NoSuchType",
            "-o",
            capture.to_str().unwrap(),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("NoSuchType"));
    }

    #[test]
    fn test_ros1_capture() {
        let tmp = tempfile::tempdir().unwrap();
        let config = tmp.path().join("wire.ron");
        std::fs::write(&config, "(format: Ros1)").unwrap();
        let config = config.to_str().unwrap();
        let capture = tmp.path().join("error.bin");
        let capture = capture.to_str().unwrap();

        let sample = ["cu-tf2-msgs", "-c", config, "sample", "-t", "TF2Error", "-o", capture];
        run_args(&sample).unwrap();
        // frame length 5, code 0, empty string
        assert_eq!(std::fs::read(capture).unwrap(), [5, 0, 0, 0, 0, 0, 0, 0, 0]);

        let decode = ["cu-tf2-msgs", "-c", config, "decode", "-t", "TF2Error", "-i", capture];
        let out = run_args(&decode).unwrap();
        assert!(out.contains("NoError"));
    }

    #[test]
    fn test_config_prints_defaults() {
        let out = run_args(&["cu-tf2-msgs", "config"]).unwrap();
        assert!(out.contains("format: Cdr"));
        assert!(out.contains("byte_order: Little"));
    }
}
