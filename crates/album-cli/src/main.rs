mod batch;
mod logger;
mod prompt;
mod report;

use album_layout::{
    GreedyGrouper, GroupingStrategy, LayoutConfig, LayoutEngine, PageMargins, PairGrouper,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::{LevelFilter, info, warn};
use std::path::PathBuf;

use crate::batch::{Batch, export_all, list_folders};
use crate::logger::AppLogger;
use crate::prompt::{FixedPrompter, Prompter, StdinPrompter, confirm};
use crate::report::BatchReport;

#[derive(Parser)]
#[command(
    name = "album",
    about = "Build one photo album document per folder and export them to PDF",
    version
)]
struct Cli {
    /// Folder holding one subfolder of photos per album
    root: PathBuf,

    /// Where document copies are collected for export [default: ROOT/documents]
    #[arg(long)]
    documents_dir: Option<PathBuf>,

    /// Where PDFs are written [default: ROOT/pdf]
    #[arg(long)]
    pdf_dir: Option<PathBuf>,

    /// Title for new documents instead of asking
    #[arg(long)]
    title: Option<String>,

    /// Comment for new documents instead of asking
    #[arg(long)]
    comment: Option<String>,

    /// Never ask; new documents are titled with their folder name
    #[arg(long)]
    no_prompt: bool,

    /// Export without asking for confirmation
    #[arg(short, long)]
    yes: bool,

    /// Also write the final report as CSV
    #[arg(long)]
    report: Option<PathBuf>,

    /// Layout configuration file (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Paper size
    #[arg(long, value_enum)]
    paper: Option<PaperArg>,

    /// Page orientation
    #[arg(long, value_enum)]
    orientation: Option<OrientationArg>,

    /// Page margin in cm (uniform on all sides)
    #[arg(long)]
    margin: Option<f32>,

    /// Preferred minimum image width in cm
    #[arg(long)]
    min_width: Option<f32>,

    /// How images are grouped onto pages
    #[arg(long, default_value = "greedy", value_enum)]
    strategy: StrategyArg,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Clone, Copy, ValueEnum)]
enum PaperArg {
    A3,
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

#[derive(Clone, Copy, ValueEnum)]
enum OrientationArg {
    Portrait,
    Landscape,
}

#[derive(Clone, Copy, ValueEnum)]
enum StrategyArg {
    /// Up to four images per page
    Greedy,
    /// Two images per page
    Pairs,
}

impl From<PaperArg> for album_layout::PaperSize {
    fn from(arg: PaperArg) -> Self {
        match arg {
            PaperArg::A3 => Self::A3,
            PaperArg::A4 => Self::A4,
            PaperArg::A5 => Self::A5,
            PaperArg::Letter => Self::Letter,
            PaperArg::Legal => Self::Legal,
            PaperArg::Tabloid => Self::Tabloid,
        }
    }
}

impl From<OrientationArg> for album_layout::Orientation {
    fn from(arg: OrientationArg) -> Self {
        match arg {
            OrientationArg::Portrait => Self::Portrait,
            OrientationArg::Landscape => Self::Landscape,
        }
    }
}

impl From<StrategyArg> for Box<dyn GroupingStrategy> {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Greedy => Box::new(GreedyGrouper),
            StrategyArg::Pairs => Box::new(PairGrouper),
        }
    }
}

impl Cli {
    /// Config file (or defaults) with command line overrides applied
    async fn layout_config(&self) -> Result<LayoutConfig> {
        let mut config = match &self.config {
            Some(path) => LayoutConfig::load(path)
                .await
                .with_context(|| format!("loading {}", path.display()))?,
            None => LayoutConfig::default(),
        };
        if let Some(paper) = self.paper {
            config.paper_size = paper.into();
        }
        if let Some(orientation) = self.orientation {
            config.orientation = orientation.into();
        }
        if let Some(margin) = self.margin {
            config.margins = PageMargins::uniform(margin);
        }
        if let Some(min_width) = self.min_width {
            config.min_image_width_cm = min_width;
        }
        Ok(config)
    }

    fn prompter(&self) -> Box<dyn Prompter> {
        if self.no_prompt || self.title.is_some() || self.comment.is_some() {
            Box::new(FixedPrompter {
                title: self.title.clone(),
                comment: self.comment.clone().unwrap_or_default(),
            })
        } else {
            Box::new(StdinPrompter::stdin())
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    let logger = AppLogger::new(1000, level);
    logger.clone().init()?;

    let config = cli.layout_config().await?;
    let strategy: Box<dyn GroupingStrategy> = cli.strategy.into();
    let engine = LayoutEngine::with_strategy(config, strategy)?;

    let documents_dir = cli
        .documents_dir
        .clone()
        .unwrap_or_else(|| cli.root.join("documents"));
    let pdf_dir = cli.pdf_dir.clone().unwrap_or_else(|| cli.root.join("pdf"));
    tokio::fs::create_dir_all(&documents_dir)
        .await
        .with_context(|| format!("creating {}", documents_dir.display()))?;
    tokio::fs::create_dir_all(&pdf_dir)
        .await
        .with_context(|| format!("creating {}", pdf_dir.display()))?;

    let folders = list_folders(&cli.root, &[documents_dir.as_path(), pdf_dir.as_path()]).await?;
    info!("{} folders under {}", folders.len(), cli.root.display());

    let mut report = BatchReport::default();
    {
        // The prompter may hold the stdin lock; release it before the export question
        let mut prompter = cli.prompter();
        Batch::new(engine, &documents_dir)
            .run(&folders, prompter.as_mut(), &mut report)
            .await;
    }

    let export = cli.yes
        || confirm(
            &mut std::io::stdin().lock(),
            &mut std::io::stdout(),
            &format!("Export the documents in {} to PDF?", documents_dir.display()),
        )?;
    if export {
        export_all(&documents_dir, &pdf_dir, &mut report).await?;
    } else {
        info!("export skipped");
    }

    report.print(&mut std::io::stdout())?;

    let warnings = logger.get_entries().len();
    if warnings > 0 {
        println!("{} warnings or errors were logged", warnings);
    }

    if let Some(path) = &cli.report {
        match report.write_csv(path) {
            Ok(()) => println!("Report written to {}", path.display()),
            Err(e) => warn!("cannot write report {}: {}", path.display(), e),
        }
    }

    Ok(())
}
