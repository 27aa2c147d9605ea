use clap::{Parser, Subcommand};

mod db;
mod diagnostics;
mod model;
mod render;
mod select;
mod series;
mod stats;

pub type Result<T> = anyhow::Result<T>;

#[derive(Parser)]
#[command(name = "membench-report")]
#[command(about = "VM memory-tuning benchmark report builder", long_about = None)]
struct Cli {
    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the HTML report (validates the dataset while running).
    Report {
        #[arg(long)]
        db: String,

        #[arg(short = 'o', long)]
        out: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.cmd {
        Commands::Report { db, out } => {
            // 1) Parse + validate db.json.
            let records = db::load_records(&db)?;

            // 2) Aggregate into per-test tabs.
            let data = model::build_report_data(&records)?;

            // 3) Render HTML.
            let html = render::render_html_report(&data)?;
            std::fs::write(&out, html)?;
            println!("Wrote {}", out);
        }
    }

    Ok(())
}
