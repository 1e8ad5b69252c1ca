//! Command line front end for the WGS84 transform engine.
//!
//! Angles cross the engine boundary in radians. `--degrees` converts on this
//! side of the boundary only.

use std::io;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};
use wgs84_core::{EcefPoint, GeodeticPoint, GeodeticTransformer, InverseConfig, InverseMethod};

/// Sample point converted when no subcommand is given
const SAMPLE_POINT: GeodeticPoint = GeodeticPoint {
    lat: 0.429407141487312,
    lon: 2.11220668133798,
    alt: 0.0,
};

#[derive(Parser, Debug)]
#[command(name = "wgs84")]
#[command(about = "Convert between WGS84 geodetic and ECEF coordinates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Inverse (ECEF to geodetic) algorithm
    #[arg(long, value_enum, default_value_t = MethodArg::FixedPoint, global = true)]
    method: MethodArg,

    /// Latitude convergence tolerance in radians
    #[arg(long, default_value_t = 1e-12, global = true)]
    tolerance: f64,

    /// Iteration cap for the latitude iteration
    #[arg(long, default_value_t = 10, global = true)]
    max_iterations: usize,

    /// Read and print angles in degrees instead of radians
    #[arg(long, global = true)]
    degrees: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Convert the built-in sample point to ECEF and back
    Sample,
    /// Convert a geodetic point to ECEF
    Forward {
        #[arg(long, allow_negative_numbers = true)]
        lat: f64,
        #[arg(long, allow_negative_numbers = true)]
        lon: f64,
        #[arg(long, allow_negative_numbers = true, default_value_t = 0.0)]
        alt: f64,
    },
    /// Convert an ECEF point to geodetic coordinates
    Inverse {
        #[arg(long, allow_negative_numbers = true)]
        x: f64,
        #[arg(long, allow_negative_numbers = true)]
        y: f64,
        #[arg(long, allow_negative_numbers = true)]
        z: f64,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
enum MethodArg {
    FixedPoint,
    Osen,
}

impl From<MethodArg> for InverseMethod {
    fn from(method: MethodArg) -> Self {
        match method {
            MethodArg::FixedPoint => InverseMethod::FixedPoint,
            MethodArg::Osen => InverseMethod::Osen,
        }
    }
}

impl Cli {
    fn inverse_config(&self) -> InverseConfig {
        InverseConfig {
            method: self.method.into(),
            tolerance: self.tolerance,
            max_iterations: self.max_iterations,
        }
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    fmt()
        .with_writer(io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

fn angles_to_radians(p: GeodeticPoint) -> GeodeticPoint {
    GeodeticPoint::new(p.lat.to_radians(), p.lon.to_radians(), p.alt)
}

fn angles_to_degrees(p: GeodeticPoint) -> GeodeticPoint {
    GeodeticPoint::new(p.lat.to_degrees(), p.lon.to_degrees(), p.alt)
}

fn format_geodetic(p: &GeodeticPoint, degrees: bool) -> String {
    let unit = if degrees { "deg" } else { "rad" };
    format!(
        "lat={:.12} {unit}  lon={:.12} {unit}  alt={:.6} m",
        p.lat, p.lon, p.alt
    )
}

fn format_ecef(p: &EcefPoint) -> String {
    format!("x={:.6} m  y={:.6} m  z={:.6} m", p.x, p.y, p.z)
}

/// Convert `input` (angles in radians) forward and back, returning both
/// results
fn round_trip(
    engine: &GeodeticTransformer,
    input: GeodeticPoint,
) -> Result<(EcefPoint, GeodeticPoint)> {
    let ecef = engine
        .lla_to_ecef(&[input])
        .context("geodetic to ECEF conversion failed")?;
    let lla = engine
        .ecef_to_lla(&ecef)
        .context("ECEF to geodetic conversion failed")?;
    Ok((ecef[0], lla[0]))
}

fn run(cli: Cli) -> Result<()> {
    let engine =
        GeodeticTransformer::with_config(cli.inverse_config()).context("invalid inverse options")?;
    info!(config = ?engine.config(), "transform engine ready");

    let display = |p: GeodeticPoint| {
        if cli.degrees {
            angles_to_degrees(p)
        } else {
            p
        }
    };

    match &cli.command {
        None | Some(Command::Sample) => {
            let (ecef, lla) = round_trip(&engine, SAMPLE_POINT)?;
            println!("input:  {}", format_geodetic(&display(SAMPLE_POINT), cli.degrees));
            println!("ecef:   {}", format_ecef(&ecef));
            println!("lla:    {}", format_geodetic(&display(lla), cli.degrees));
        }
        Some(Command::Forward { lat, lon, alt }) => {
            let mut lla = GeodeticPoint::new(*lat, *lon, *alt);
            if cli.degrees {
                lla = angles_to_radians(lla);
            }
            let ecef = engine
                .lla_to_ecef(&[lla])
                .context("geodetic to ECEF conversion failed")?;
            println!("{}", format_ecef(&ecef[0]));
        }
        Some(Command::Inverse { x, y, z }) => {
            let lla = engine
                .ecef_to_lla(&[EcefPoint::new(*x, *y, *z)])
                .context("ECEF to geodetic conversion failed")?;
            println!("{}", format_geodetic(&display(lla[0]), cli.degrees));
        }
    }

    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(cli)
}
