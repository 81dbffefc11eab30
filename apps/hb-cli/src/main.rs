use clap::{Parser, Subcommand};
use hb_app::project_service::{self, ConfigOverrides};
use hb_app::{AppResult, DesignProgressEvent, DesignReport};
use hb_project::DesignMode;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "hb-cli")]
#[command(about = "Hydrobal CLI - Hydronic heating design and balancing", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate project file syntax, structure and catalog references
    Validate {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
    },
    /// Run the design pipeline on a project
    Design {
        /// Path to the project YAML or JSON file
        project_path: PathBuf,
        /// Override the design mode (existing, fixed, pump, balancing)
        #[arg(long, value_parser = parse_mode)]
        mode: Option<DesignMode>,
        /// Override the design ΔT in K
        #[arg(long)]
        delta_t: Option<f64>,
        /// Override the supply temperature in °C (fixed mode)
        #[arg(long)]
        supply_temp: Option<f64>,
        /// Print the report as JSON instead of tables
        #[arg(long)]
        json: bool,
        /// Also write the JSON report to this file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List pump or valve catalogs
    #[command(subcommand)]
    Catalog(CatalogCommands),
}

#[derive(Subcommand)]
enum CatalogCommands {
    /// List pump models and speeds
    Pumps {
        /// Include the custom entries of this project
        #[arg(long)]
        project: Option<PathBuf>,
    },
    /// List valve types
    Valves {
        /// Include the custom entries of this project
        #[arg(long)]
        project: Option<PathBuf>,
    },
}

fn parse_mode(s: &str) -> Result<DesignMode, String> {
    s.parse()
}

fn main() -> AppResult<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Validate { project_path } => cmd_validate(&project_path),
        Commands::Design {
            project_path,
            mode,
            delta_t,
            supply_temp,
            json,
            output,
        } => {
            let overrides = ConfigOverrides {
                mode,
                delta_t_c: delta_t,
                supply_temperature_c: supply_temp,
            };
            cmd_design(&project_path, &overrides, json, output.as_deref())
        }
        Commands::Catalog(catalog_cmd) => match catalog_cmd {
            CatalogCommands::Pumps { project } => cmd_catalog_pumps(project.as_deref()),
            CatalogCommands::Valves { project } => cmd_catalog_valves(project.as_deref()),
        },
    }
}

fn cmd_validate(project_path: &Path) -> AppResult<()> {
    println!("Validating project: {}", project_path.display());
    let project = project_service::load_project(project_path)?;
    project_service::validate_project(&project)?;
    println!("✓ Project is valid");
    println!(
        "  Rooms: {}  Radiators: {}  Collectors: {}",
        project.rooms.len(),
        project.radiators.len(),
        project.collectors.len()
    );
    Ok(())
}

fn cmd_design(
    project_path: &Path,
    overrides: &ConfigOverrides,
    json: bool,
    output: Option<&Path>,
) -> AppResult<()> {
    let mut project = project_service::load_project(project_path)?;
    overrides.apply(&mut project);

    let report = project_service::design_project_with_progress(
        &project,
        Some(&mut |event| {
            if !json {
                render_cli_progress(&event);
            }
        }),
    )?;
    if !json {
        clear_progress_line();
    }

    if let Some(path) = output {
        project_service::write_report_json(path, &report)?;
        tracing::info!(path = %path.display(), "report written");
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
        if let Some(path) = output {
            println!("\n✓ Report written to {}", path.display());
        }
    }
    Ok(())
}

fn cmd_catalog_pumps(project_path: Option<&Path>) -> AppResult<()> {
    let project = project_path.map(project_service::load_project).transpose()?;
    let catalogs = project_service::catalogs_for(project.as_ref())?;
    let pumps = project_service::list_pumps(&catalogs);

    if pumps.is_empty() {
        println!("No pumps in catalog");
    } else {
        println!("Pumps:");
        for pump in pumps {
            println!(
                "  {} - speeds: {}  flow {:.0}..{:.0} kg/h",
                pump.model,
                pump.speeds.join(", "),
                pump.flow_range_kg_h.0,
                pump.flow_range_kg_h.1
            );
        }
    }
    Ok(())
}

fn cmd_catalog_valves(project_path: Option<&Path>) -> AppResult<()> {
    let project = project_path.map(project_service::load_project).transpose()?;
    let catalogs = project_service::catalogs_for(project.as_ref())?;
    let valves = project_service::list_valves(&catalogs);

    if valves.is_empty() {
        println!("No valves in catalog");
    } else {
        println!("Valves:");
        for valve in valves {
            println!(
                "  {} - {} ({} positions, kv open {:.3})",
                valve.name, valve.description, valve.positions, valve.kv_open
            );
        }
    }
    Ok(())
}

fn print_report(report: &DesignReport) {
    println!(
        "Design mode: {}  ΔT = {:.2} K  supply = {:.1} °C",
        report.mode.as_str(),
        report.delta_t_c,
        report.supply_temperature_c
    );

    println!("\nRadiators:");
    println!(
        "  {:>4} {:>4} {:<16} {:>8} {:>8} {:>7} {:>7} {:>8} {:>5} {:>6} {:>9} {:<18} {:>4} {:>9}",
        "id",
        "room",
        "collector",
        "heat W",
        "extra W",
        "Ts °C",
        "Tr °C",
        "kg/h",
        "d mm",
        "m/s",
        "Δp Pa",
        "valve",
        "pos",
        "Δp+v Pa"
    );
    for r in &report.radiators {
        println!(
            "  {:>4} {:>4} {:<16} {:>8.1} {:>8.1} {:>7.1} {:>7.1} {:>8.1} {:>5} {:>6.3} {:>9.1} {:<18} {:>4} {:>9.1}",
            r.id,
            r.room,
            r.collector,
            r.heat_loss_w,
            r.extra_power_w,
            r.supply_temperature_c,
            r.return_temperature_c,
            r.mass_flow_kg_h,
            r.diameter_mm,
            r.velocity_m_s,
            r.dp_total_pa,
            r.valve.valve_name,
            r.valve.position,
            r.valve.dp_total_with_valve_pa
        );
    }

    println!("\nCollectors:");
    for c in &report.collectors {
        println!(
            "  {:<16} {:>8.1} kg/h  d = {} mm  v = {:.3} m/s  Δp = {:.1} Pa",
            c.name, c.mass_flow_kg_h, c.diameter_mm, c.velocity_m_s, c.dp_pa
        );
    }

    let m = &report.metrics;
    println!("\nSummary:");
    println!("  Total heat loss: {:.1} W", m.total_heat_loss_w);
    println!("  Total rated power: {:.1} W", m.total_rated_power_w);
    if m.total_extra_power_w > 0.0 {
        println!("  Extra power needed: {:.1} W", m.total_extra_power_w);
    }
    println!("  Total flow: {:.1} kg/h", m.total_flow_kg_h);
    println!("  Weighted ΔT: {:.2} K", m.weighted_delta_t_c);
    if let Some(h) = &m.highest_supply {
        println!(
            "  Highest supply: {:.1} °C (radiator {})",
            h.supply_temperature_c, h.radiator
        );
    }
    println!("  Water volume: {:.2} l", m.total_water_volume_l);
    println!("  Index circuit: {:.1} Pa", m.index_circuit_pa);

    if let Some(pump) = &report.pump {
        println!("\nPump: {} {}", pump.model, pump.speed);
        match &pump.operating_point {
            Some(op) => println!(
                "  Operating point: {:.1} kg/h at {:.2} kPa",
                op.flow_kg_h, op.head_kpa
            ),
            None => println!("  No operating point within the pump curve"),
        }
        if let Some(search) = &pump.search {
            println!("  ΔT search: {} trial(s)", search.trials.len());
        }
    }

    if !report.warnings.is_empty() {
        println!("\nWarnings:");
        for w in &report.warnings {
            println!("  ! {}", w);
        }
    }
}

fn clear_progress_line() {
    eprint!("\r{}\r", " ".repeat(100));
    let _ = io::stderr().flush();
}

fn render_cli_progress(event: &DesignProgressEvent) {
    let mut line = format!(
        "\r[{}] {}  elapsed={:.2}s",
        event.mode.as_str(),
        event.stage.label(),
        event.elapsed_wall_s
    );
    if let Some(msg) = &event.message {
        line.push_str(&format!("  {}", msg));
    }
    eprint!("{}", line);
    let _ = io::stderr().flush();
}
