// Entry point and high-level CLI flow.
//
// - Load and validate the exported submissions, printing diagnostics.
// - Rank every farmer and export the leaderboard.
// - Build the (optionally filtered) dashboard: crop distribution, wastage
//   reasons and the JSON summary.
mod args;

use args::Args;
use clap::Parser;
use harvest_rank::dashboard::{filter_options, summarize, Filter};
use harvest_rank::loader::{source_for, LoadReport};
use harvest_rank::output;
use harvest_rank::util::{format_int, format_number};
use harvest_rank::{Leaderboard, Result, SubmissionRecord};
use log::{debug, error};
use std::process::ExitCode;

fn print_load_report(report: &LoadReport) {
    println!(
        "Processing dataset... ({} rows read, {} usable)",
        format_int(report.total_rows),
        format_int(report.loaded_rows)
    );
    if report.rejected_rows() > 0 {
        println!(
            "Note: {} rows skipped due to parse/validation errors:",
            format_int(report.rejected_rows())
        );
        for (reason, count) in &report.rejected {
            println!("  - {}: {}", reason.label(), format_int(*count));
        }
    }
    println!();
}

/// Rank every farmer, export the leaderboard and report one farmer's
/// position when asked.
fn handle_leaderboard(args: &Args, data: &[SubmissionRecord]) -> Result<()> {
    let board = Leaderboard::compute(data);
    let rows = board.rows();
    let file = args.out_dir.join("leaderboard.csv");
    output::write_csv(&file, &rows)?;
    output::preview_table(
        "Farmer Leaderboard",
        Some("Score = yield per acre x (1 - wastage %)"),
        &rows,
        args.preview_rows,
    );
    println!("(Full table exported to {})\n", file.display());

    if let Some(farmer) = &args.farmer {
        match board.entry_for(farmer) {
            Some(e) => println!(
                "Farmer {} ({}) is ranked #{} of {} with a score of {}.\n",
                e.farmer_id,
                e.farmer_name,
                e.rank,
                format_int(board.len()),
                format_number(e.score, 2)
            ),
            None => println!("Farmer {} is unranked (no valid submissions).\n", farmer),
        }
    }
    Ok(())
}

/// Build the dashboard for the selected province, district and crop.
fn handle_dashboard(args: &Args, data: &[SubmissionRecord]) -> Result<()> {
    let filter = Filter {
        province: args.province.clone(),
        district: args.district.clone(),
        crop: args.crop.clone(),
    };
    let options = filter_options(data, args.province.as_deref());
    debug!("filter options: {:?}", options);

    let summary = summarize(data, &filter);

    let file = args.out_dir.join("crop_distribution.csv");
    output::write_csv(&file, &summary.crop_distribution)?;
    output::preview_table(
        "Crop Distribution",
        Some("Number of submissions by crop type"),
        &summary.crop_distribution,
        args.preview_rows,
    );
    println!("(Full table exported to {})\n", file.display());

    let file = args.out_dir.join("wastage_reasons.csv");
    output::write_csv(&file, &summary.wastage_reasons)?;
    output::preview_table(
        "Wastage Reasons",
        Some("Distribution of crop wastage causes"),
        &summary.wastage_reasons,
        args.preview_rows,
    );
    println!("(Full table exported to {})\n", file.display());

    output::write_json(&args.out_dir.join("summary.json"), &summary)?;
    println!("Summary Stats (summary.json):");
    println!(
        "{{\"total_submissions\": {}, \"total_yield\": {}, \"avg_wastage\": {}, \"top_crops\": {:?}}}\n",
        format_int(summary.total_submissions),
        format_number(summary.total_yield, 2),
        format_number(summary.avg_wastage, 1),
        summary.top_crops
    );
    if !options.provinces.is_empty() {
        println!("Provinces available: {}", options.provinces.join(", "));
    }
    if !options.districts.is_empty() {
        println!("Districts available: {}", options.districts.join(", "));
    }
    if !options.crops.is_empty() {
        println!("Crops available: {}\n", options.crops.join(", "));
    }
    Ok(())
}

fn run(args: &Args) -> Result<()> {
    let source = source_for(&args.input, args.input_type.as_deref())?;
    let (data, report) = source.load()?;
    print_load_report(&report);

    handle_leaderboard(args, &data)?;
    handle_dashboard(args, &data)?;
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();
    debug!("args: {:?}", args);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:?}", e);
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}
