mod mcp;

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use viewscan::{Config, PageSummary, Session};

#[derive(Parser)]
#[command(name = "viewscan")]
#[command(about = "Snapshot the interactive elements visible in a page's viewport")]
#[command(version)]
struct Cli {
    /// Config file (YAML)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Verbose output (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Quiet mode (only errors)
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Open a URL and print its snapshot
    Scan {
        url: String,

        /// Output format
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,

        /// Run in headless mode (overrides config)
        #[arg(long)]
        headless: bool,
    },
    /// Run the MCP server on stdio
    Serve,
    /// Validate config and print the effective settings
    Check,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Text output of `scan`: header, one line per element, element count.
fn render_summary(summary: &PageSummary) -> String {
    let mut out = format!("URL: {}\nTitle: {}\n", summary.url, summary.title);
    for line in &summary.elements {
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!(
        "{} interactive elements in viewport\n",
        summary.element_count
    ));
    out
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.quiet {
        Level::ERROR
    } else {
        match cli.verbose {
            0 => Level::WARN,
            1 => Level::INFO,
            _ => Level::DEBUG,
        }
    };

    // stdout carries scan output and the MCP transport
    FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();

    let mut config = match cli.config {
        Some(ref path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Command::Scan {
            url,
            format,
            headless,
        } => {
            if headless {
                config.browser.headless = true;
            }
            let mut session = Session::launch(&config.browser, config.settle).await?;
            let result = match session.goto(&url).await {
                Ok(snapshot) => match format {
                    Format::Text => {
                        print!("{}", render_summary(&snapshot.summary()));
                        Ok(())
                    }
                    Format::Json => serde_json::to_string_pretty(snapshot)
                        .map(|json| println!("{}", json))
                        .map_err(anyhow::Error::from),
                },
                Err(e) => Err(e.into()),
            };
            session.close().await?;
            result
        }
        Command::Serve => mcp::run_server(config).await,
        Command::Check => {
            let b = &config.browser;
            println!("Config valid");
            println!("  Headless: {}", b.headless);
            println!("  Viewport: {}x{}", b.viewport.width, b.viewport.height);
            if let Some(ref proxy) = b.proxy {
                println!("  Proxy: {}", proxy);
            }
            if let Some(ref ua) = b.user_agent {
                println!("  User agent: {}", ua);
            }
            println!(
                "  Settle: navigate {}ms, refresh {}ms, network idle {}ms",
                config.settle.navigate_ms, config.settle.refresh_ms, config.settle.network_idle_ms
            );
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use viewscan::{CapturedNode, CapturedPage, ElementScanner, Rect};

    #[test]
    fn test_render_summary() {
        let page = CapturedPage::new("https://example.com/", "Example", 800.0, 600.0)
            .with_node(
                CapturedNode::new("A")
                    .attr("href", "/docs")
                    .text(" Docs ")
                    .rect(Rect::new(2.0, 3.0, 40.0, 16.0)),
            )
            .with_node(CapturedNode::new("BUTTON").text("Hidden").rect(Rect::new(0.0, 900.0, 40.0, 16.0)));
        let summary = ElementScanner::scan(&page).summary();
        assert_eq!(
            render_summary(&summary),
            "URL: https://example.com/\nTitle: Example\n[1] <a> Docs (at x:2, y:3)\n1 interactive elements in viewport\n"
        );
    }

    #[test]
    fn test_render_summary_empty() {
        let summary = ElementScanner::scan(&CapturedPage::new("about:blank", "", 800.0, 600.0)).summary();
        assert_eq!(
            render_summary(&summary),
            "URL: about:blank\nTitle: \n0 interactive elements in viewport\n"
        );
    }
}
