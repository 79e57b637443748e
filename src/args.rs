use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Print label rectangles only
    Regions,
    /// Run OCR on every row and print usernames
    Usernames,
}

#[derive(Debug)]
pub struct Args {
    pub mode: Mode,
    pub screenshot: PathBuf,
    pub templates: Vec<PathBuf>,
    pub config: Option<PathBuf>,
    pub debug_mode: bool,
}

impl Args {
    /// Parse the process arguments; `None` means help/version was printed or parsing failed
    pub fn parse() -> Option<Self> {
        Self::parse_from(env::args().skip(1))
    }

    pub fn parse_from(args: impl IntoIterator<Item = String>) -> Option<Self> {
        let mut mode = Mode::Usernames;
        let mut screenshot: Option<PathBuf> = None;
        let mut templates: Vec<PathBuf> = Vec::new();
        let mut config: Option<PathBuf> = None;
        let mut debug_mode = false;

        for arg in args {
            if arg == "--help" || arg == "-h" {
                print_help();
                return None;
            } else if arg == "--version" || arg == "-v" {
                println!(
                    "Row Locate v{} (built {})",
                    env!("ROW_LOCATE_VERSION_DISPLAY"),
                    env!("ROW_LOCATE_BUILD_YEAR")
                );
                return None;
            } else if arg == "--debug" {
                debug_mode = true;
            } else if arg == "--regions-only" || arg == "-r" {
                mode = Mode::Regions;
            } else if let Some(path) = arg.strip_prefix("--screenshot=") {
                screenshot = Some(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("--template=") {
                templates.push(PathBuf::from(path));
            } else if let Some(path) = arg.strip_prefix("--config=") {
                config = Some(PathBuf::from(path));
            } else {
                eprintln!("❌ Unknown argument: {}", arg);
                print_help();
                return None;
            }
        }

        let Some(screenshot) = screenshot else {
            eprintln!("❌ Missing --screenshot=PATH");
            print_help();
            return None;
        };
        if templates.is_empty() {
            eprintln!("❌ At least one --template=PATH is required");
            print_help();
            return None;
        }

        Some(Args {
            mode,
            screenshot,
            templates,
            config,
            debug_mode,
        })
    }
}

fn print_help() {
    println!("🔎 Row Locate - usernames from list screenshots");
    println!();
    println!("USAGE:");
    println!("    row-locate --screenshot=PATH --template=PATH [--template=PATH ...] [FLAGS]");
    println!();
    println!("FLAGS:");
    println!("    --screenshot=PATH   Screenshot of the followers/following list");
    println!("    --template=PATH     Icon template (follow, following, message); repeatable");
    println!("                        Names like follow-[x,y,w,h].png are cropped to that region");
    println!("    --config=PATH       TOML configuration (default: iPhone 14 Plus calibration)");
    println!("    --regions-only, -r  Print label rectangles without running OCR");
    println!("    --debug             Enable debug logging (overridden by RUST_LOG)");
    println!("    --help, -h          Show this help message");
    println!("    --version, -v       Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    row-locate --screenshot=list.png --template=follow.png --template=following.png");
    println!("    row-locate --screenshot=list.png --template=follow.png --regions-only");
    println!("    row-locate --config=pixel7.toml --screenshot=list.png --template=message.png");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_full_command_line() {
        let parsed = Args::parse_from(args(&[
            "--screenshot=list.png",
            "--template=follow.png",
            "--template=following.png",
            "--config=row.toml",
            "-r",
            "--debug",
        ]))
        .unwrap();

        assert_eq!(parsed.mode, Mode::Regions);
        assert_eq!(parsed.screenshot, PathBuf::from("list.png"));
        assert_eq!(parsed.templates.len(), 2);
        assert_eq!(parsed.config, Some(PathBuf::from("row.toml")));
        assert!(parsed.debug_mode);
    }

    #[test]
    fn test_defaults_to_usernames_mode() {
        let parsed =
            Args::parse_from(args(&["--screenshot=a.png", "--template=b.png"])).unwrap();
        assert_eq!(parsed.mode, Mode::Usernames);
        assert!(parsed.config.is_none());
    }

    #[test]
    fn test_missing_inputs_and_unknown_flags() {
        assert!(Args::parse_from(args(&["--template=b.png"])).is_none());
        assert!(Args::parse_from(args(&["--screenshot=a.png"])).is_none());
        assert!(Args::parse_from(args(&["--screenshot=a.png", "--template=b.png", "--gui"])).is_none());
    }
}
