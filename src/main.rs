use std::path::{Path, PathBuf};
use std::process::ExitCode;

use gtest_lens::report::{self, ReportSummary, ReportsById};
use gtest_lens::run::{self, OutcomeStatus, TestCommand, TestItem};
use gtest_lens::{config, output, Result};

const USAGE: &str = "Usage: gtest-lens <report <report.json> [source-file] | scan [project-root] | command <binary> <source-file> <test-id>...>";

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt::init();

    let args: Vec<String> = std::env::args().collect();

    match dispatch(&args).await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::FAILURE
        }
    }
}

async fn dispatch(args: &[String]) -> Result<ExitCode> {
    match args.get(1).map(|s| s.as_str()) {
        Some("report") if args.len() >= 3 => {
            show_report(Path::new(&args[2]), args.get(3).map(PathBuf::from)).await
        }
        Some("scan") => {
            let root = args.get(2).map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
            scan(&root)
        }
        Some("command") if args.len() >= 5 => {
            print_command(&args[2], Path::new(&args[3]), &args[4..])
        }
        _ => {
            eprintln!("{}", USAGE);
            Ok(ExitCode::from(2))
        }
    }
}

async fn show_report(path: &Path, source: Option<PathBuf>) -> Result<ExitCode> {
    let reports_by_id = report::load(path).await?;
    let root = item_tree(&reports_by_id, source);
    let outcomes = run::evaluate(&root, &reports_by_id);

    for outcome in &outcomes {
        println!("{} {:?} ({} run(s))", outcome.id, outcome.status, outcome.runs);
        for message in &outcome.messages {
            println!("{}", message.render());
        }
    }

    let summary = ReportSummary::from_reports(&reports_by_id);
    print_summary(path, &summary);
    let details = output::write_details(path, &summary, &outcomes)?;
    println!("Details: {}", details.display());

    let failed = outcomes.iter().any(|o| o.status == OutcomeStatus::Failed);
    Ok(if failed { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn scan(project_root: &Path) -> Result<ExitCode> {
    let settings = config::resolve(Some(project_root));
    let build_folder = settings.build_folder_in(project_root);
    let paths = report::discover(&build_folder, &settings.report_prefix)?;
    if paths.is_empty() {
        println!("No reports found in {}", build_folder.display());
        return Ok(ExitCode::SUCCESS);
    }

    let mut ok = true;
    for (path, parsed) in report::parse_all(&paths) {
        match parsed {
            Ok(reports_by_id) => {
                let summary = ReportSummary::from_reports(&reports_by_id);
                ok &= summary.failed == 0;
                print_summary(&path, &summary);
            }
            Err(e) => {
                ok = false;
                eprintln!("{}: {}", path.display(), e);
            }
        }
    }

    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

fn print_command(binary: &str, source: &Path, ids: &[String]) -> Result<ExitCode> {
    let cwd = std::env::current_dir()?;
    let settings = config::resolve(Some(&cwd));
    let build_folder = settings.build_folder_in(&cwd);
    let items: Vec<TestItem> = ids
        .iter()
        .map(|id| TestItem::test_case(id.as_str(), source))
        .collect();
    let selected: Vec<&TestItem> = items.iter().collect();

    let filter = run::run_filter(&selected);
    let report_name = run::report_file_name(source, &settings.report_prefix);
    let command = TestCommand::for_binary(binary, &build_folder, &filter, &report_name)?;

    println!("{}", command.display());
    Ok(ExitCode::SUCCESS)
}

/// One file item holding a test case per logical id of the report. Messages
/// anchor at `source` when given, otherwise at the file GoogleTest recorded.
fn item_tree(reports_by_id: &ReportsById, source: Option<PathBuf>) -> TestItem {
    let cases = reports_by_id
        .iter()
        .map(|(id, reports)| {
            let file = source
                .clone()
                .or_else(|| reports.first().map(|r| PathBuf::from(&r.file)))
                .unwrap_or_default();
            TestItem::test_case(id.as_str(), file)
        })
        .collect();
    TestItem::file(source.unwrap_or_default(), cases)
}

fn print_summary(path: &Path, summary: &ReportSummary) {
    println!(
        "{}: {} passed, {} failed, {} skipped ({} ms)",
        path.display(),
        summary.passed,
        summary.failed,
        summary.skipped,
        summary.duration_ms
    );
}
