use clap::{Parser, Subcommand};
use polars::prelude::{AnyValue, DataFrame};
use resourceflow::{
    Config, DashboardKpis, Heatmap, ResourceSummary, Snapshot, SortDirection, SortField, WeekKey,
    classify_utilization, display_percentage, load_snapshot_from_csv, load_snapshot_from_json,
    parse_capacity, sort_resources, status_legend, summarize_resources, telemetry,
};
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "resourceflow", about = "Resource utilization tables, KPIs and heatmaps")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Classify a single capacity/hours pair
    Classify {
        capacity: String,
        hours: f64,
        #[arg(long)]
        inactive: bool,
    },
    /// Show the resource table
    Table {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long, default_value = "name")]
        sort: SortField,
        #[arg(long, default_value = "asc")]
        dir: SortDirection,
        #[arg(long)]
        week: Option<WeekKey>,
    },
    /// Show the KPI card figures
    Kpis {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        week: Option<WeekKey>,
    },
    /// Show the capacity heatmap (utilization % per week)
    Heatmap {
        #[command(flatten)]
        source: SourceArgs,
        #[arg(long)]
        from: WeekKey,
        #[arg(long, default_value_t = 8)]
        weeks: usize,
    },
    /// List statuses with their priority and display style
    Statuses,
}

#[derive(clap::Args)]
struct SourceArgs {
    /// JSON snapshot, or a resources CSV
    snapshot: PathBuf,
    /// Allocations CSV (only with a resources CSV)
    #[arg(long)]
    allocations: Option<PathBuf>,
}

impl SourceArgs {
    fn load(&self) -> Result<Snapshot, resourceflow::IngestError> {
        let is_csv = self
            .snapshot
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            load_snapshot_from_csv(&self.snapshot, self.allocations.as_deref())
        } else {
            load_snapshot_from_json(&self.snapshot)
        }
    }
}

fn render_text_table(headers: &[String], rows: &[Vec<String>]) -> String {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if ci < widths.len() && len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    let mut sep = String::from("+");
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let render_row = |cells: &[String]| {
        let mut line = String::from("|");
        for (ci, w) in widths.iter().enumerate() {
            let cell = cells.get(ci).map(String::as_str).unwrap_or("");
            let pad = w.saturating_sub(cell.chars().count());
            line.push(' ');
            line.push_str(cell);
            line.push_str(&" ".repeat(pad));
            line.push_str(" |");
        }
        line
    };

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    out.push_str(&render_row(headers));
    out.push('\n');
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        out.push_str(&render_row(row.as_slice()));
        out.push('\n');
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn render_df_as_text_table(df: &DataFrame) -> String {
    let columns = df.get_columns();
    let headers: Vec<String> = columns.iter().map(|c| c.name().to_string()).collect();
    let mut rows = Vec::with_capacity(df.height());
    for row_idx in 0..df.height() {
        let row = columns
            .iter()
            .map(|col| match col.get(row_idx) {
                Ok(AnyValue::Null) | Err(_) => String::new(),
                Ok(AnyValue::Float64(v)) => format!("{v:.0}%"),
                Ok(AnyValue::String(s)) => s.to_string(),
                Ok(other) => other.to_string(),
            })
            .collect();
        rows.push(row);
    }
    render_text_table(&headers, &rows)
}

fn bar(percentage: f64) -> String {
    let filled = (display_percentage(percentage) / 10.0).round() as usize;
    "#".repeat(filled)
}

fn render_summaries(summaries: &[ResourceSummary]) -> String {
    let headers = [
        "id", "name", "role", "department", "capacity", "hours", "projects", "util", "", "status",
    ]
    .map(String::from);
    let rows: Vec<Vec<String>> = summaries
        .iter()
        .map(|s| {
            let style = s.utilization.style;
            vec![
                s.resource.id.clone(),
                s.resource.name.clone(),
                s.resource.role.clone().unwrap_or_default(),
                s.resource.department.clone().unwrap_or_default(),
                format!("{:.1}", s.resource.weekly_capacity),
                format!("{:.1}", s.allocated_hours),
                s.project_count.to_string(),
                format!("{:.1}%", s.utilization.percentage),
                bar(s.utilization.percentage),
                format!("{} {}", style.icon, style.label),
            ]
        })
        .collect();
    render_text_table(&headers, &rows)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Classify {
            capacity,
            hours,
            inactive,
        } => {
            let result = classify_utilization(parse_capacity(Some(&capacity)), hours, !inactive);
            println!(
                "{:.1}% {} {} ({})",
                result.percentage,
                result.style.icon,
                result.style.label,
                result.status
            );
        }
        Command::Table {
            source,
            sort,
            dir,
            week,
        } => {
            let snapshot = source.load()?;
            let summaries = summarize_resources(&snapshot, week.as_ref());
            let ordered = sort_resources(&summaries, sort, dir);
            print!("{}", render_summaries(&ordered));
        }
        Command::Kpis { source, week } => {
            let snapshot = source.load()?;
            let summaries = summarize_resources(&snapshot, week.as_ref());
            let kpis = DashboardKpis::from_summaries(&summaries);
            println!("{}", kpis.to_cli_summary());
            for (status, count) in &kpis.status_counts {
                println!("  {:<16} {}", status.as_str(), count);
            }
        }
        Command::Heatmap {
            source,
            from,
            weeks,
        } => {
            if weeks == 0 {
                return Err("--weeks must be at least 1".into());
            }
            let snapshot = source.load()?;
            let heatmap = Heatmap::starting_at(&snapshot, from, weeks);
            print!("{}", render_df_as_text_table(&heatmap.to_dataframe()?));
        }
        Command::Statuses => {
            for entry in status_legend() {
                println!(
                    "  {:<16} priority={} {} {:<15} {}",
                    entry.status.as_str(),
                    entry.priority,
                    entry.style.icon,
                    entry.style.label,
                    entry.style.color_class
                );
            }
        }
    }
    Ok(())
}

fn main() -> ExitCode {
    let logging = Config::from_env()
        .map(|config| config.logging())
        .unwrap_or_else(|_| Config::default().logging());
    telemetry::init_tracing(&logging);

    match run(Cli::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::FAILURE
        }
    }
}
