use clap::Parser;
use screen_hinting::cli::commands::{cmd_exec, cmd_inspect, cmd_replay, format_inspect, to_json};
use screen_hinting::cli::config::{Cli, Commands, build_sink, init_logging, load_config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config = load_config(cli.config.as_deref());

    // CLI flags > config file
    let sink = build_sink(
        &config.telemetry,
        cli.trace_file.as_deref(),
        cli.bridge_url.as_deref(),
    );

    match cli.command {
        Commands::Inspect { screen, format } => {
            let report = cmd_inspect(&screen, &config)?;
            match format.as_str() {
                "json" => println!("{}", to_json(&report)?),
                _ => print!("{}", format_inspect(&report)),
            }
        }
        Commands::Exec {
            screen,
            commands,
            cancel_gestures,
        } => {
            let report = cmd_exec(&screen, &commands, cancel_gestures, &config, sink)?;
            println!("{}", to_json(&report)?);
        }
        Commands::Replay { script } => {
            let report = cmd_replay(&script, &config, sink)?;
            println!("{}", to_json(&report)?);
        }
    }

    Ok(())
}
