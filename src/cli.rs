use clap::Parser;
use std::path::PathBuf;

pub const HELP_KEYS: &str = "\
Key Bindings:
  Esc           : Close the gallery
  Right         : Next item
  Left          : Previous item

Mouse:
  Thumbnail     : Show that item
  < / >         : Previous / next item
  X / backdrop  : Close the gallery
";

#[derive(Parser)]
#[command(
    name = "lightbox",
    about = "A lightbox-style image and video viewer",
    after_help = HELP_KEYS
)]
pub struct Cli {
    /// Files or directories to show
    #[arg(required_unless_present = "manifest")]
    pub paths: Vec<PathBuf>,

    /// TOML manifest listing items with captions, thumbnails and sizes
    #[arg(long, value_name = "FILE")]
    pub manifest: Option<PathBuf>,

    /// Title shown next to each caption (overrides the manifest's title)
    #[arg(short, long)]
    pub title: Option<String>,

    /// Recurse into subdirectories
    #[arg(short, long)]
    pub recursive: bool,

    /// Follow symbolic links (default: false)
    #[arg(long)]
    pub follow_links: bool,

    /// Memory budget for decoded images (e.g. 512MB, 2GB). Default: 10% of RAM.
    #[arg(short, long)]
    pub memory: Option<String>,

    /// Number of decode threads. Default: available parallelism, 2 to 8.
    #[arg(long)]
    pub threads: Option<usize>,
}

pub fn parse_memory_budget(s: &str) -> u64 {
    let s = s.trim().to_uppercase();
    let (num, unit, fallback) = if let Some(num) = s.strip_suffix("GB") {
        (num, 1024 * 1024 * 1024, 1.0)
    } else if let Some(num) = s.strip_suffix("MB") {
        (num, 1024 * 1024, 512.0)
    } else {
        (s.as_str(), 1024 * 1024, 512.0)
    };
    (num.trim().parse::<f64>().unwrap_or(fallback) * unit as f64) as u64
}

pub fn default_memory_budget() -> u64 {
    let mut sys = sysinfo::System::new();
    sys.refresh_memory();
    sys.total_memory() / 10
}

pub fn default_threads() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(4)
        .clamp(2, 8)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_budget_units() {
        assert_eq!(parse_memory_budget("2GB"), 2 * 1024 * 1024 * 1024);
        assert_eq!(parse_memory_budget(" 1.5 gb "), 1536 * 1024 * 1024);
        assert_eq!(parse_memory_budget("256MB"), 256 * 1024 * 1024);
        assert_eq!(parse_memory_budget("64"), 64 * 1024 * 1024);
        assert_eq!(parse_memory_budget("lots"), 512 * 1024 * 1024);
    }

    #[test]
    fn cli_accepts_manifest_without_paths() {
        let cli = Cli::try_parse_from(["lightbox", "--manifest", "g.toml", "-t", "Trip"]).unwrap();
        assert!(cli.paths.is_empty());
        assert_eq!(cli.title.as_deref(), Some("Trip"));
        assert!(Cli::try_parse_from(["lightbox"]).is_err());
        let cli = Cli::try_parse_from(["lightbox", "-r", "a", "b"]).unwrap();
        assert!(cli.recursive);
        assert_eq!(cli.paths.len(), 2);
    }
}
