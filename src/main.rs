use anyhow::{Context, Result};
use cli::Cli;
use indicatif::{ProgressBar, ProgressStyle};
use novel_book::book::write_example_manifest;
use novel_book::container::{font_href, FontRef};
use novel_book::styles::StyleSheet;
use novel_book::{Book, BookAssembler, BuildError, RenderStats};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;

mod cli;
mod logger;

fn main() -> ExitCode {
    if let Err(e) = try_main() {
        eprintln!("{}: {e:#}", console::style("Error").red());
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main() -> Result<()> {
    use clap::Parser;
    let cli = Cli::parse();
    logger::init(cli.verbose)?;

    match cli.command {
        cli::Commands::Init { path } => {
            write_example_manifest(&path)?;
            println!("Wrote example manifest to {}", path.display());
            Ok(())
        }
        cli::Commands::Render { manifest, output } => render(&manifest, output),
        cli::Commands::Stylesheet { manifest } => print_stylesheet(&manifest),
    }
}

fn render(manifest: &Path, output: Option<PathBuf>) -> Result<()> {
    println!("Loading book...");
    let mut book = Book::load_manifest(manifest)?;
    if let Some(output) = output {
        book.output_path = output;
    }

    let progress = ProgressBar::new_spinner();
    progress.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .expect("can parse progress style"),
    );
    progress.enable_steady_tick(Duration::from_millis(100));

    match BookAssembler::new(&progress).build(&book) {
        Ok(stats) => print_summary(&stats),
        Err(BuildError::Cleanup {
            path,
            source,
            outcome: Ok(stats),
        }) => {
            eprintln!(
                "{}: failed to remove temporary workspace {}: {source}",
                console::style("Warning").yellow(),
                path.display()
            );
            print_summary(&stats);
        }
        Err(e) => return Err(e).with_context(|| "Failed to render EPUB"),
    }

    Ok(())
}

fn print_summary(stats: &RenderStats) {
    let size = byte_unit::Byte::from_u64(stats.bytes_written)
        .get_appropriate_unit(byte_unit::UnitType::Binary)
        .to_string();

    println!();
    println!("  EPUB:         {} ({size})", stats.output_path.display());
    println!("  Chapters:     {}", stats.chapter_count);
    println!("  Sub-sections: {}", stats.subsection_count);
    if stats.cover_embedded {
        println!("  Cover:        embedded");
    }
    if stats.font_embedded {
        println!("  Font:         embedded");
    }
    println!("  Took:         {:.2?}", stats.elapsed);
}

fn print_stylesheet(manifest: &Path) -> Result<()> {
    let book = Book::load_manifest(manifest)?;

    if let Some(path) = book.stylesheet_opt() {
        let css = std::fs::read_to_string(&path)
            .with_context(|| format!("Failed to read stylesheet {}", path.display()))?;
        eprintln!("Book uses the custom stylesheet {}", path.display());
        print!("{css}");
        return Ok(());
    }

    let mut sheet = StyleSheet::from_book(&book).with_context(|| "Failed to build stylesheet")?;
    if let Some(font) = book.font_opt().filter(|font| font.exists()) {
        sheet = sheet.with_embedded_font(FontRef::new(font_href(&font)));
    }
    print!("{sheet}");
    Ok(())
}
