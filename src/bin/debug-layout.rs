/// Diagnostic tool to verify scan → tree → layout pipeline
use std::path::PathBuf;
use std::sync::mpsc;

use anyhow::Context;
use clap::Parser;

use diskmap_rs::layout::LayoutConfig;
use diskmap_rs::render::Rgb;
use diskmap_rs::scanner::types::ScanProgress;
use diskmap_rs::scanner::{self, DirectoryScanner};
use diskmap_rs::ui::navigation::Navigator;
use diskmap_rs::ui::{snapshot, tooltip};

#[derive(Parser, Debug)]
#[command(name = "debug-layout", version, about = "Print the treemap layout of a directory")]
struct Cli {
    /// Directory to scan
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Read records from a JSON file (`[{"path": .., "size": ..}]`) instead of scanning
    #[arg(long)]
    records: Option<PathBuf>,

    /// Viewport width
    #[arg(long, default_value_t = 1280.0)]
    width: f64,

    /// Viewport height
    #[arg(long, default_value_t = 800.0)]
    height: f64,

    /// Number of largest rectangles to list
    #[arg(long, default_value_t = 10)]
    top: usize,

    /// Base color for file tiles
    #[arg(long, default_value = "#3498db")]
    base_color: Rgb,

    /// Drill into this folder (path relative to the scan root) before printing
    #[arg(long)]
    drill: Option<String>,

    /// Print the view snapshot as JSON instead of the summary
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("diskmap_rs=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let base_path = cli.path.display().to_string();

    let mut nav = Navigator::new(LayoutConfig {
        base_color: cli.base_color,
    });
    nav.resize(cli.width, cli.height);

    match &cli.records {
        Some(file) => {
            let records = scanner::load_records(file)
                .with_context(|| format!("reading records from {}", file.display()))?;
            nav.scan(&records, &base_path)?;
        }
        None => {
            let (tx, rx) = mpsc::channel();
            let source = DirectoryScanner::new(&cli.path).with_progress(tx);
            nav.scan_from(&source, &base_path)
                .with_context(|| format!("scanning {}", cli.path.display()))?;
            for event in rx.try_iter() {
                if let ScanProgress::Error { path, message } = event {
                    eprintln!("skipped {}: {}", path.display(), message);
                }
            }
        }
    }

    if let Some(folder) = &cli.drill {
        let target = nav
            .current()
            .and_then(|view| view.find(folder))
            .with_context(|| format!("no such folder: {}", folder))?;
        anyhow::ensure!(nav.drill_into(target), "cannot drill into {}", folder);
    }

    if cli.json {
        let snap = snapshot::snapshot(&nav).context("nothing to display")?;
        println!("{}", serde_json::to_string_pretty(&snap)?);
        return Ok(());
    }

    let view = nav.current().context("nothing to display")?;
    let root = view.tree.get(view.root);
    println!("=== DIAGNOSTIC: Tree → Layout Pipeline ===");
    println!(
        "[1] View: {} (size={}, nodes={}, can_go_back={})",
        view.base_path,
        tooltip::format_size(root.size),
        view.tree.len(),
        nav.can_go_back()
    );

    let Some(layout) = &view.layout else {
        println!("[2] No layout (viewport {}x{} is not usable)", cli.width, cli.height);
        return Ok(());
    };
    println!("[2] Layout computed: {} rectangles", layout.len());

    println!("\n[3] Top {} largest rectangles below the root:", cli.top);
    let mut sorted: Vec<_> = layout.rects.iter().filter(|r| r.node != view.root).collect();
    sorted.sort_by(|a, b| b.area().total_cmp(&a.area()));
    for (i, rect) in sorted.iter().take(cli.top).enumerate() {
        let info = tooltip::build_tooltip(&view.tree, view.root, rect.node);
        println!(
            "    [{}] '{}' {:.1}x{:.1} at ({:.1}, {:.1}) depth={} color={} size={} ({:.1}%)",
            i,
            info.path,
            rect.w,
            rect.h,
            rect.x,
            rect.y,
            rect.depth,
            rect.color,
            info.size_display,
            info.percent_of_root
        );
    }

    // Direct children of the view root should tile the viewport exactly.
    let covered: f64 = view
        .tree
        .children(view.root)
        .filter_map(|c| layout.get(c))
        .map(|r| r.area())
        .sum();
    let viewport_area = cli.width * cli.height;
    println!("\n[4] Coverage of first level:");
    println!("    Total rect area: {:.0}", covered);
    println!("    Viewport area:   {:.0}", viewport_area);
    println!("    Coverage: {:.1}%", covered / viewport_area * 100.0);

    let labels = layout
        .rects
        .iter()
        .filter_map(|r| tooltip::label_for(&view.tree, view.root, r))
        .count();
    println!("\n[5] Labelled tiles: {} (out of {})", labels, layout.len());

    Ok(())
}
