use std::{
    error::Error,
    path::{Path, PathBuf},
    process::ExitCode,
};

use clap::{Parser, Subcommand};
use histothresh::adjust::{Adjustment, BrightenMode};
use histothresh::core::parse_level;
use histothresh::io::{load_raster, save_plane, save_raster};
use histothresh::threshold::{
    NiblackParams, SauvolaParams, ThresholdMethod, WolfJolionParams, DEFAULT_WINDOW_SIZE,
};
use histothresh::{run_pipeline, HistogramReport, Operation, Output, PipelineConfig};
use log::info;

#[derive(Parser)]
#[command(name = "histothresh")]
#[command(version, about = "Histograms, point transforms and thresholds for RGB images", long_about = None)]
struct Cli {
    /// Log level: error, warn, info, debug or trace
    #[arg(long, global = true, value_name = "LEVEL", default_value = "info")]
    log_level: String,

    /// Emit JSON log lines (needs the `tracing` feature)
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute per-channel histograms and print or save them as JSON
    Histogram {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Write the report here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Include the luma histogram
        #[arg(long)]
        gray: bool,
    },

    /// Apply a point transform to every channel
    Adjust {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(subcommand)]
        op: AdjustCmd,
    },

    /// Binarize the luma of an image
    Threshold {
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        #[arg(value_name = "OUTPUT")]
        output: PathBuf,

        #[command(subcommand)]
        method: ThresholdCmd,
    },

    /// Run a JSON pipeline config
    Run {
        #[arg(value_name = "CONFIG")]
        config: PathBuf,
    },
}

#[derive(Subcommand)]
enum AdjustCmd {
    /// Limit samples to [low, high]
    Clamp { low: u8, high: u8 },

    /// Rescale each channel from its extrema onto [new_min, new_max]
    Normalize {
        #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
        new_min: i32,
        #[arg(long, default_value_t = 255, allow_negative_numbers = true)]
        new_max: i32,
    },

    /// Add k to every sample, saturating
    Add {
        #[arg(allow_negative_numbers = true)]
        k: i32,
    },

    /// Brighten with gain (255 - b) / 255
    Brighten {
        #[arg(allow_negative_numbers = true)]
        b: f64,

        /// "upper" keeps 255 fixed, anything else keeps 0 fixed
        #[arg(long, default_value = "upper")]
        mode: String,
    },

    /// Scale contrast by alpha around 128
    Contrast {
        #[arg(allow_negative_numbers = true)]
        alpha: f64,
    },

    /// Stretch each channel onto [low, high]
    Stretch {
        #[arg(allow_negative_numbers = true)]
        low: i32,
        #[arg(allow_negative_numbers = true)]
        high: i32,
    },
}

#[derive(Subcommand)]
enum ThresholdCmd {
    /// Foreground where gray >= t
    Manual {
        #[arg(allow_negative_numbers = true)]
        t: i32,
    },

    /// Valley between the first two histogram peaks
    Bimodal,

    /// Otsu's between-class variance maximum
    Otsu,

    /// Foreground where t_low <= gray <= t_high
    Double {
        #[arg(allow_negative_numbers = true)]
        t_low: i32,
        #[arg(allow_negative_numbers = true)]
        t_high: i32,
    },

    /// Strong pixels plus weak pixels next to a strong one
    Hysteresis {
        #[arg(allow_negative_numbers = true)]
        t_low: i32,
        #[arg(allow_negative_numbers = true)]
        t_high: i32,
    },

    /// mean + k * std
    Niblack {
        #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,
        #[arg(long, default_value_t = -0.2, allow_negative_numbers = true)]
        k: f64,
    },

    /// mean * (1 + k * (std / r - 1))
    Sauvola {
        #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,
        #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
        k: f64,
        #[arg(long, default_value_t = 128.0)]
        r: f64,
    },

    /// Sauvola variant anchored on the image minimum
    Wolf {
        #[arg(long, default_value_t = DEFAULT_WINDOW_SIZE)]
        window: usize,
        #[arg(long, default_value_t = 0.5, allow_negative_numbers = true)]
        k: f64,
    },
}

impl AdjustCmd {
    fn to_adjustment(&self) -> Adjustment {
        match *self {
            AdjustCmd::Clamp { low, high } => Adjustment::Clamp { low, high },
            AdjustCmd::Normalize { new_min, new_max } => Adjustment::Normalize { new_min, new_max },
            AdjustCmd::Add { k } => Adjustment::AddConstant { k },
            AdjustCmd::Brighten { b, ref mode } => {
                let Ok(mode) = mode.parse::<BrightenMode>();
                Adjustment::BrightenWithRange { b, mode }
            }
            AdjustCmd::Contrast { alpha } => Adjustment::Contrast { alpha },
            AdjustCmd::Stretch { low, high } => Adjustment::StretchHistogram { low, high },
        }
    }
}

impl ThresholdCmd {
    fn to_method(&self) -> ThresholdMethod {
        match *self {
            ThresholdCmd::Manual { t } => ThresholdMethod::Manual { t },
            ThresholdCmd::Bimodal => ThresholdMethod::BimodalValley,
            ThresholdCmd::Otsu => ThresholdMethod::Otsu,
            ThresholdCmd::Double { t_low, t_high } => ThresholdMethod::Double { t_low, t_high },
            ThresholdCmd::Hysteresis { t_low, t_high } => {
                ThresholdMethod::DoubleHysteresis { t_low, t_high }
            }
            ThresholdCmd::Niblack { window, k } => ThresholdMethod::Niblack(NiblackParams {
                window_size: window,
                k,
            }),
            ThresholdCmd::Sauvola { window, k, r } => ThresholdMethod::Sauvola(SauvolaParams {
                window_size: window,
                k,
                r,
            }),
            ThresholdCmd::Wolf { window, k } => ThresholdMethod::WolfJolion(WolfJolionParams {
                window_size: window,
                k,
            }),
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    histothresh::core::init_with_level(parse_level(&cli.log_level))?;
    if cli.json_logs {
        log::warn!("--json-logs ignored: built without the tracing feature");
    }
    Ok(())
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> Result<(), Box<dyn Error>> {
    tracing_log::LogTracer::init()?;
    histothresh::core::init_tracing(cli.json_logs, parse_level(&cli.log_level));
    Ok(())
}

fn run_operation(input: &Path, output: &Path, op: Operation) -> Result<(), Box<dyn Error>> {
    let raster = load_raster(input)?;
    match op.apply(&raster)? {
        Output::Raster(r) => save_raster(&r, output)?,
        Output::Plane(p) => save_plane(&p, output)?,
    }
    info!("{} -> {}", op.name(), output.display());
    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = init_logging(&cli) {
        eprintln!("error: {err}");
        return ExitCode::FAILURE;
    }
    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn Error>> {
    match command {
        Commands::Histogram {
            input,
            output,
            gray,
        } => {
            let raster = load_raster(&input)?;
            let report = HistogramReport::from_raster(&raster, gray)?
                .with_source(input.display().to_string());
            match output {
                Some(path) => {
                    report.write_json(&path)?;
                    info!("histogram written to {}", path.display());
                }
                None => println!("{}", report.to_json()?),
            }
        }
        Commands::Adjust { input, output, op } => {
            run_operation(&input, &output, Operation::Adjust(op.to_adjustment()))?;
        }
        Commands::Threshold {
            input,
            output,
            method,
        } => {
            run_operation(&input, &output, Operation::Threshold(method.to_method()))?;
        }
        Commands::Run { config } => {
            let cfg = PipelineConfig::load_json(&config)?;
            let report = run_pipeline(&cfg)?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
    }
    Ok(())
}
