mod commands;
mod reader;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use argbind_core::SyntaxConfig;

#[derive(Parser)]
#[command(
    name = "argbind",
    version,
    about = "argbind switch binder: bind and validate /name:value switches against a YAML schema"
)]
struct Cli {
    /// Log binding decisions to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bind arguments against a schema and report the values or the first failure
    Bind {
        /// Schema file (YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,

        /// Raw arguments to bind
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },

    /// List the switches of a schema with their accepted values
    Describe {
        /// Schema file (YAML)
        #[arg(short, long)]
        schema: PathBuf,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,
    },

    /// Split arguments into switch tokens without a schema
    Lex {
        /// Switch prefix characters
        #[arg(long, default_value = "/")]
        prefix: String,

        /// Name/value delimiter characters
        #[arg(long, default_value = ":")]
        delimiter: String,

        /// Pattern a switch name has to match in full
        #[arg(long)]
        pattern: Option<String>,

        /// Output format: human (default) or json
        #[arg(long, default_value = "human")]
        format: String,

        /// Raw arguments to tokenize
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        args: Vec<String>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Bind {
            schema,
            format,
            args,
        } => match commands::bind::run_bind(&schema, &args, &format) {
            Ok((output, failed)) => {
                println!("{output}");
                if failed {
                    process::exit(1);
                }
            }
            Err(e) => {
                eprintln!("Error: {e:#}");
                process::exit(1);
            }
        },
        Commands::Describe { schema, format } => {
            match commands::describe::run_describe(&schema, &format) {
                Ok(output) => {
                    println!("{output}");
                }
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    process::exit(1);
                }
            }
        }
        Commands::Lex {
            prefix,
            delimiter,
            pattern,
            format,
            args,
        } => {
            let mut config = SyntaxConfig {
                prefix_chars: prefix,
                delimiter_chars: delimiter,
                ..SyntaxConfig::default()
            };
            if let Some(pattern) = pattern {
                config.name_pattern = pattern;
            }
            match commands::lex::run_lex(&config, &args, &format) {
                Ok((output, failures)) => {
                    println!("{output}");
                    if failures > 0 {
                        process::exit(1);
                    }
                }
                Err(e) => {
                    eprintln!("Error: {e:#}");
                    process::exit(1);
                }
            }
        }
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
