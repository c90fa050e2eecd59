//! Dump or patch the license area of a PlayStation disc image (BIN)

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use psxlicense::{BlobExtraction, LicenseArea, LicensePatch, LicenseResult, Region};

#[derive(Parser)]
#[command(name = "licensetool")]
#[command(about = "Read and patch the license area of PlayStation disc images", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Dump the license text and logo TMD to NAME.TXT and NAME.TMD
    Dump {
        /// Path to a PSX disc image BIN
        bin: PathBuf,

        /// Name for the .TXT and .TMD output files
        #[arg(short, long, default_value = "LICENSE")]
        output: String,
    },

    /// Patch the license text and/or logo TMD in place
    Patch {
        /// Path to a PSX disc image BIN
        bin: PathBuf,

        /// Sets region string and padding. May be JP, EUR or US
        #[arg(short, long)]
        region: Option<Region>,

        /// Sets the license text, overriding the region's default string
        #[arg(short, long)]
        text: Option<String>,

        /// Path to a TMD file to insert in the license area (PSX boot logo)
        #[arg(long)]
        tmd: Option<PathBuf>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let res = match cli.command {
        Commands::Dump { bin, output } => dump(bin, output),
        Commands::Patch {
            bin,
            region,
            text,
            tmd,
        } => patch(bin, region, text, tmd),
    };

    if let Err(e) = res {
        log::error!("{}", e);
        process::exit(1);
    }
}

fn dump(bin: PathBuf, output: String) -> LicenseResult<()> {
    let mut file = File::open(&bin)?;

    let area = LicenseArea::read_from(&mut file)?;

    match area.region() {
        Some(Region::Europe) => log::info!("Detected European license"),
        Some(Region::Us) => log::info!("Detected American license"),
        Some(Region::Japan) => log::info!("Detected Japanese license"),
        None => log::warn!(
            "Unknown license type? Check file is a PSX disc image BIN. Attempting to continue..."
        ),
    }

    let txt = format!("{}.TXT", output);
    let tmd = format!("{}.TMD", output);

    fs::write(&txt, area.text_export())?;
    fs::write(&tmd, area.blob(BlobExtraction::Logical))?;

    log::info!("Dumped license data to {}, {}", txt, tmd);

    Ok(())
}

fn patch(
    bin: PathBuf,
    region: Option<Region>,
    text: Option<String>,
    tmd: Option<PathBuf>,
) -> LicenseResult<()> {
    let blob = match tmd {
        Some(path) => Some(fs::read(path)?),
        None => None,
    };

    let patch = LicensePatch {
        region,
        text: text.map(String::into_bytes),
        blob,
    };

    let mut file = OpenOptions::new().read(true).write(true).open(&bin)?;

    let mut area = LicenseArea::read_from(&mut file)?;

    let report = patch.apply(&mut area)?;

    if report.text_truncated {
        log::warn!("Text is above 70 characters, it has been truncated");
    }

    if let Some(over_by) = report.blob_over_assumed_limit {
        log::warn!(
            "The TMD file may be larger than the PSX BIOS will read (oversized by {} bytes)",
            over_by
        );
    }

    area.write_to(&mut file)?;

    log::info!("{} was patched", bin.display());

    Ok(())
}
