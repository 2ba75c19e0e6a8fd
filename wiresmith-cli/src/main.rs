//! Wiresmith CLI - Wokwi circuit diagrams from a parts list.

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::{Path, PathBuf};
use std::process;
use wiresmith::diagram::{simplify_for_visibility, summarize};
use wiresmith::layout::{describe_position, step_instructions};
use wiresmith::wiring::{catalogue_group, display_name};
use wiresmith::{
    auto_place, classify, load_parts, progressive_steps, Diagram, DiagramSource, Document,
    McuFamily, Netlist, OllamaOracle, Synthesis, SynthesisOptions, WiresmithCore,
};

#[derive(Parser)]
#[command(name = "wiresmith")]
#[command(about = "Wokwi circuit diagram generator", long_about = None)]
#[command(version)]
struct Cli {
    /// Log progress to stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Wire a parts list into a diagram.json
    Generate {
        /// JSON file with an array of parts (or a diagram with a "parts" array)
        #[arg(value_name = "PARTS")]
        parts: PathBuf,

        /// Write the diagram here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Place parts around the microcontroller before wiring
        #[arg(long)]
        auto_layout: bool,

        /// Ask a local Ollama model to improve the diagram
        #[arg(long)]
        oracle: bool,

        /// Ollama server URL
        #[arg(long, value_name = "URL")]
        ollama_url: Option<String>,

        /// Ollama model name
        #[arg(long)]
        model: Option<String>,

        /// Include pin-exhaustion warnings in the diagram
        #[arg(long)]
        report_pins: bool,

        /// Do not add series resistors to LEDs and buzzers
        #[arg(long)]
        no_safety: bool,

        /// JSON options file; command-line flags take precedence
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Summary format
        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Build the circuit one part at a time, one diagram per step
    Progressive {
        #[arg(value_name = "PARTS")]
        parts: PathBuf,

        /// Directory for step_<n>_circuit.json files
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,

        /// Do not add series resistors to LEDs and buzzers
        #[arg(long)]
        no_safety: bool,

        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Summarise an existing diagram.json
    Inspect {
        #[arg(value_name = "DIAGRAM")]
        diagram: PathBuf,

        /// Write a copy with high-contrast colours and simple routes
        #[arg(long, value_name = "OUT")]
        fix_visibility: Option<PathBuf>,

        #[arg(short, long, value_enum, default_value = "human")]
        format: OutputFormat,
    },

    /// Show how part types are categorised
    Classify {
        #[arg(value_name = "TYPE", required = true)]
        types: Vec<String>,
    },

    /// List supported microcontroller families and their pins
    Families,
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output for scripts
    Json,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Generate {
            parts,
            output,
            auto_layout,
            oracle,
            ollama_url,
            model,
            report_pins,
            no_safety,
            config,
            format,
        } => {
            let overrides = Overrides {
                oracle,
                ollama_url,
                model,
                report_pins,
                no_safety,
            };
            handle_generate(
                &parts,
                output.as_deref(),
                auto_layout,
                config.as_deref(),
                overrides,
                format,
            )
            .await
        }
        Commands::Progressive {
            parts,
            out_dir,
            no_safety,
            config,
        } => handle_progressive(&parts, &out_dir, no_safety, config.as_deref()),
        Commands::Inspect {
            diagram,
            fix_visibility,
            format,
        } => handle_inspect(&diagram, fix_visibility.as_deref(), format),
        Commands::Classify { types } => {
            handle_classify(&types);
            Ok(0)
        }
        Commands::Families => {
            handle_families();
            Ok(0)
        }
    };

    let exit_code = match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            1
        }
    };
    process::exit(exit_code);
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        2 => tracing::Level::DEBUG,
        _ => tracing::Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Flags that override the options file.
struct Overrides {
    oracle: bool,
    ollama_url: Option<String>,
    model: Option<String>,
    report_pins: bool,
    no_safety: bool,
}

fn load_options(config: Option<&Path>) -> Result<SynthesisOptions> {
    match config {
        Some(path) => SynthesisOptions::from_file(path)
            .with_context(|| format!("failed to read config {}", path.display())),
        None => Ok(SynthesisOptions::default()),
    }
}

fn apply_overrides(options: &mut SynthesisOptions, overrides: Overrides) {
    if overrides.oracle {
        options.enable_oracle = true;
    }
    if let Some(url) = overrides.ollama_url {
        options.oracle.url = Some(url);
    }
    if let Some(model) = overrides.model {
        options.oracle.model = Some(model);
    }
    if overrides.report_pins {
        options.report_pin_exhaustion = true;
    }
    if overrides.no_safety {
        options.insert_safety_resistors = false;
    }
}

async fn handle_generate(
    parts_path: &Path,
    output: Option<&Path>,
    auto_layout: bool,
    config: Option<&Path>,
    overrides: Overrides,
    format: OutputFormat,
) -> Result<i32> {
    let mut options = load_options(config)?;
    apply_overrides(&mut options, overrides);

    let mut parts = load_parts(parts_path)
        .with_context(|| format!("failed to load parts from {}", parts_path.display()))?;
    if auto_layout {
        parts = auto_place(&parts);
    }

    let synthesis = if options.enable_oracle {
        let oracle = OllamaOracle::from_config(&options.oracle);
        WiresmithCore::synthesize_with_oracle(&parts, &options, Some(&oracle)).await
    } else {
        WiresmithCore::synthesize(&parts, &options)
    };

    match output {
        Some(path) => {
            synthesis
                .write_to(path)
                .with_context(|| format!("failed to write {}", path.display()))?;
            match format {
                OutputFormat::Human => print_summary(&synthesis, Some(path)),
                OutputFormat::Json => print_json_summary(&synthesis, Some(path))?,
            }
        }
        None => {
            println!("{}", synthesis.to_json()?);
            if matches!(format, OutputFormat::Human) {
                eprint!("{}", summary_text(&synthesis, None));
            }
        }
    }

    Ok(if synthesis.is_error() { 1 } else { 0 })
}

fn summary_text(synthesis: &Synthesis, output: Option<&Path>) -> String {
    let mut text = String::new();
    let Some(diagram) = synthesis.diagram() else {
        if let Some(error) = synthesis.document.error() {
            text.push_str(&format!("Synthesis failed: {}\n", error));
        }
        return text;
    };

    text.push_str(&format!(
        "Generated {} parts, {} connections\n",
        diagram.parts.len(),
        diagram.connections.len()
    ));
    if let DiagramSource::Oracle(name) = &synthesis.source {
        text.push_str(&format!("  Source: {}\n", name));
    }
    for id in &synthesis.inserted_resistors {
        text.push_str(&format!("  Added series resistor {}\n", id));
    }
    for warning in &synthesis.warnings {
        text.push_str(&format!("  Warning: {}\n", warning));
    }
    if let Some(path) = output {
        text.push_str(&format!("  Written to {}\n", path.display()));
    }
    text
}

fn print_summary(synthesis: &Synthesis, output: Option<&Path>) {
    print!("{}", summary_text(synthesis, output));
}

fn print_json_summary(synthesis: &Synthesis, output: Option<&Path>) -> Result<()> {
    let source = match &synthesis.source {
        DiagramSource::Deterministic => "deterministic".to_string(),
        DiagramSource::Oracle(name) => name.clone(),
    };
    let summary = serde_json::json!({
        "ok": !synthesis.is_error(),
        "error": synthesis.document.error(),
        "parts": synthesis.diagram().map(|d| d.parts.len()).unwrap_or(0),
        "connections": synthesis.diagram().map(|d| d.connections.len()).unwrap_or(0),
        "inserted_resistors": synthesis.inserted_resistors,
        "warnings": synthesis.warnings,
        "source": source,
        "output": output.map(|p| p.display().to_string()),
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    Ok(())
}

fn handle_progressive(
    parts_path: &Path,
    out_dir: &Path,
    no_safety: bool,
    config: Option<&Path>,
) -> Result<i32> {
    let mut options = load_options(config)?;
    if no_safety {
        options.insert_safety_resistors = false;
    }

    let parts = load_parts(parts_path)
        .with_context(|| format!("failed to load parts from {}", parts_path.display()))?;
    let placed = auto_place(&parts);
    let steps = progressive_steps(&parts, &options);

    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    println!("Building circuit in {} steps", steps.len());
    for (i, (step, part)) in steps.iter().zip(&placed).enumerate() {
        let n = i + 1;
        let path = out_dir.join(format!("step_{}_circuit.json", n));
        step.write_to(&path)
            .with_context(|| format!("failed to write {}", path.display()))?;
        let notes = out_dir.join(format!("step_{}_instructions.txt", n));
        std::fs::write(&notes, step_instructions(n, step, part))
            .with_context(|| format!("failed to write {}", notes.display()))?;

        let prefix = if n == 1 { "" } else { "+ " };
        println!("STEP {}: {}{}", n, prefix, display_name(&part.part_type));
        println!("    Position: {}", describe_position(part));
        if let Some(diagram) = step.diagram() {
            println!(
                "    {} parts, {} connections -> {}",
                diagram.parts.len(),
                diagram.connections.len(),
                path.display()
            );
        }
    }
    Ok(0)
}

fn handle_inspect(path: &Path, fix_visibility: Option<&Path>, format: OutputFormat) -> Result<i32> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let document = Document::from_json(&content)
        .with_context(|| format!("{} is not a diagram", path.display()))?;
    let diagram = match document {
        Document::Diagram(d) => d,
        Document::Error(e) => bail!("{} holds an error document: {}", path.display(), e.error),
    };

    match format {
        OutputFormat::Human => print_inspection(&diagram),
        OutputFormat::Json => {
            let netlist = Netlist::from_diagram(&diagram);
            let report = serde_json::json!({
                "parts": diagram.parts.len(),
                "wires": summarize(&diagram),
                "unconnected": netlist.unconnected_parts(),
                "dangling": netlist.dangling_wires(),
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }

    if let Some(out) = fix_visibility {
        let fixed = simplify_for_visibility(&diagram);
        std::fs::write(out, fixed.to_json_pretty()?)
            .with_context(|| format!("failed to write {}", out.display()))?;
        if matches!(format, OutputFormat::Human) {
            println!("\nWrote high-visibility copy to {}", out.display());
        }
    }
    Ok(0)
}

fn print_inspection(diagram: &Diagram) {
    let netlist = Netlist::from_diagram(diagram);
    let summary = summarize(diagram);

    println!("Parts: {}", diagram.parts.len());
    for part in &diagram.parts {
        println!("  {:<12} {}", part.id, part.part_type);
    }
    println!("\nWires: {}", summary.total);
    for (color, count) in &summary.colors {
        println!("  {:<10} {}", color, count);
    }

    let unconnected = netlist.unconnected_parts();
    if !unconnected.is_empty() {
        println!("\nUnconnected parts: {}", unconnected.join(", "));
    }
    for wire in netlist.dangling_wires() {
        println!("Dangling wire: {}", wire);
    }
}

fn handle_classify(types: &[String]) {
    for part_type in types {
        println!("{}", part_type);
        let group = catalogue_group(part_type);
        if let Some(family) = McuFamily::detect(part_type) {
            println!("    Category: microcontroller, {} ({})", family, group);
            println!("    Name:     {}", display_name(part_type));
            continue;
        }
        let category = classify(part_type);
        println!("    Category: {} ({})", category, group);
        println!("    Name:     {}", display_name(part_type));
        if category.needs_series_resistor() {
            println!("    Gets a series resistor");
        }
    }
}

fn handle_families() {
    println!("Supported microcontroller families:\n");
    for family in McuFamily::ALL {
        let board = family.profile();
        println!("  {}", board.name);
        println!("    Digital: {}", board.digital.join(", "));
        println!("    PWM:     {}", board.pwm.join(", "));
        println!("    Analog:  {}", board.analog.join(", "));
        println!("    Ground:  {}", board.grounds.join(", "));
        let rails: Vec<&str> = [board.power_5v, board.power_3v3].into_iter().flatten().collect();
        println!("    Power:   {}", rails.join(", "));
        println!("    I2C:     SDA {}, SCL {}", board.i2c_sda, board.i2c_scl);
        println!(
            "    SPI:     MOSI {}, MISO {}, SCK {}",
            board.spi.mosi, board.spi.miso, board.spi.sck
        );
        println!();
    }
}
