// Entry point and CLI flow.
//
// - `show` renders the dashboard once for a selection given on the command
//   line, optionally exporting the filtered view and metrics.
// - `interactive` keeps a selection in memory and re-renders the page after
//   every change, reading the cost table through the TTL cache.
// - `slider` runs the date slider demo.
mod cache;
mod chart;
mod config;
mod dashboard;
mod error;
mod loader;
mod metrics;
mod output;
mod reshape;
mod schema;
mod select;
mod slider;
mod types;
mod util;

use clap::Parser;
use config::{Cli, Command, DataArgs, ShowArgs, SliderArgs};
use error::{DashboardError, Result};
use select::default_entities;
use std::io::{self, Write};
use std::process::exit;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use types::Selection;

const EXPORT_PREVIEW_ROWS: usize = 3;

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();
}

fn print_summary(rows: usize, controls: &dashboard::Controls) {
    println!(
        "Processing dataset... ({} cost rows, {} users, months {}..{})\n",
        util::format_int(rows),
        util::format_int(controls.users.len()),
        controls.bounds.0,
        controls.bounds.1
    );
}

/// Handle `show`: one evaluation of the page for the selection on the
/// command line.
fn handle_show(args: ShowArgs) -> Result<()> {
    let table = cache::cost_table(&args.data.data, args.data.cache_ttl())?;
    let controls = dashboard::controls(&table)?;
    print_summary(table.len(), &controls);
    let (min, max) = controls.bounds;

    let users = if args.users.is_empty() {
        default_entities(&controls.users, &args.data.default_users)
    } else {
        args.users.clone()
    };
    let selection = Selection::clamped(
        args.from.unwrap_or(min),
        args.to.unwrap_or(max),
        controls.bounds,
        users,
    )?;

    let page = dashboard::evaluate(
        &table,
        &selection,
        args.data.delta_policy(),
        args.data.chart_width,
    );
    print!("{}", page.text);

    if let Some(dir) = &args.export_dir {
        std::fs::create_dir_all(dir)?;
        let view_path = dir.join("filtered_costs.csv");
        let metrics_path = dir.join("metrics.json");
        output::write_csv(&view_path, &page.view.rows)?;
        output::write_json(&metrics_path, &page.metrics)?;
        info!(dir = %dir.display(), rows = page.view.rows.len(), "exported dashboard data");
        print!("{}", output::preview_table_rows(&page.view.rows, EXPORT_PREVIEW_ROWS));
        println!("(Filtered view exported to {})", view_path.display());
        println!("(Metrics exported to {})", metrics_path.display());
    }
    Ok(())
}

/// Print `prompt` and read one trimmed line. `None` on end of input.
fn read_line(prompt: &str) -> Option<String> {
    print!("{}", prompt);
    let _ = io::stdout().flush();
    let mut buf = String::new();
    match io::stdin().read_line(&mut buf) {
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

/// Resolve a comma separated answer against the user list. Entries may be
/// names or 1-based positions in the printed list.
fn parse_user_choice(answer: &str, users: &[String]) -> Vec<String> {
    answer
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .filter_map(|s| match s.parse::<usize>() {
            Ok(n) if (1..=users.len()).contains(&n) => Some(users[n - 1].clone()),
            _ => users.iter().find(|u| u.as_str() == s).cloned(),
        })
        .collect()
}

/// Re-read the table through the cache and render the page. Controls and
/// selection are rebuilt from that table, so a reload after the TTL shows
/// the current users and months.
fn render(args: &DataArgs, selection: &Selection) -> Result<(dashboard::Controls, Selection)> {
    let table = cache::cost_table(&args.data, args.cache_ttl())?;
    let (controls, selection) = dashboard::refresh_controls(&table, selection)?;
    let page = dashboard::evaluate(&table, &selection, args.delta_policy(), args.chart_width);
    println!("{}", page.text);
    Ok((controls, selection))
}

/// Handle `interactive`: a menu loop standing in for the month slider and
/// user multiselect.
fn handle_interactive(args: DataArgs) -> Result<()> {
    let table = cache::cost_table(&args.data, args.cache_ttl())?;
    let controls = dashboard::controls(&table)?;
    print_summary(table.len(), &controls);
    let (min, max) = controls.bounds;
    let selection = Selection {
        from: min,
        to: max,
        entities: default_entities(&controls.users, &args.default_users),
    };
    let (mut controls, mut selection) = render(&args, &selection)?;

    loop {
        let (min, max) = controls.bounds;
        println!("[1] Which months are you interested in? ({}..{})", min, max);
        println!("[2] Which users would you like to view?");
        println!("[3] Refresh");
        println!("[4] Exit\n");
        let Some(choice) = read_line("Enter choice: ") else {
            break;
        };
        match choice.as_str() {
            "1" => {
                let from = read_line(&format!("From month [{}]: ", selection.from))
                    .and_then(|s| util::parse_u32_safe(Some(&s)))
                    .unwrap_or(selection.from);
                let to = read_line(&format!("To month [{}]: ", selection.to))
                    .and_then(|s| util::parse_u32_safe(Some(&s)))
                    .unwrap_or(selection.to);
                let picked = Selection::clamped(from, to, controls.bounds, selection.entities)?;
                (controls, selection) = render(&args, &picked)?;
            }
            "2" => {
                for (i, u) in controls.users.iter().enumerate() {
                    println!("  {:>3}. {}", i + 1, u);
                }
                let answer = read_line("Users (names or numbers, comma separated; blank for none): ")
                    .unwrap_or_default();
                selection.entities = parse_user_choice(&answer, &controls.users);
                (controls, selection) = render(&args, &selection)?;
            }
            "3" => (controls, selection) = render(&args, &selection)?,
            "4" | "q" => {
                println!("Exiting the program.");
                break;
            }
            _ => println!("Invalid choice. Please enter 1, 2, 3 or 4.\n"),
        }
    }
    Ok(())
}

/// Handle `slider`: show the slider, move it to the requested date and echo
/// the result.
fn handle_slider(args: SliderArgs) -> Result<()> {
    let mut slider = slider::DateSlider::start_time()?
        .with_step(args.step_days)
        .with_format(&args.format);
    if let Some(raw) = args.value.as_deref() {
        let date = util::parse_date_safe(Some(raw))
            .ok_or_else(|| DashboardError::InvalidDate(raw.to_string()))?;
        slider.select(date);
    }
    println!("{} [{} .. {}] {}", slider.label, slider.min, slider.max, slider.display());
    println!("Start time: {}", slider.value);
    Ok(())
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        None => handle_show(ShowArgs::default()),
        Some(Command::Show(args)) => handle_show(args),
        Some(Command::Interactive(args)) => handle_interactive(args),
        Some(Command::Slider(args)) => handle_slider(args),
    };

    if let Err(e) = result {
        error!("{}", e);
        eprintln!("Error: {}", e);
        exit(1);
    }
}
