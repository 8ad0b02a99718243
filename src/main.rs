use crossterm::style::Stylize;
use record_browser::config::Config;
use record_browser::data;
use record_browser::ui::App;
use record_browser::utils::logging;
use record_browser::view::{GridViewState, SortOrder};
use tracing::info;

mod table_display;

/// Flags that consume the following argument.
const VALUE_FLAGS: &[&str] = &["--notes", "--search", "--sort", "--page-size", "--page"];

fn print_help() {
    println!(
        "{}",
        "record-browser - sortable, filterable terminal grid for record files"
            .blue()
            .bold()
    );
    println!();
    println!("{}", "Usage:".yellow());
    println!("  record-browser [OPTIONS] FILE.json|FILE.csv|FILE.tsv");
    println!();
    println!("{}", "Options:".yellow());
    println!(
        "  {}       - Render FILE's text in the detail pane",
        "--notes FILE".green()
    );
    println!(
        "  {}      - Start with a search already applied",
        "--search TEXT".green()
    );
    println!(
        "  {} - Start sorted by KEY, e.g. --sort Age:desc",
        "--sort KEY[:asc|desc]".green()
    );
    println!(
        "  {}      - Override the configured rows per page",
        "--page-size N".green()
    );
    println!(
        "  {}            - Print the filtered table to stdout and exit",
        "--print".green()
    );
    println!(
        "  {}           - With --print, print only page N",
        "--page N".green()
    );
    println!(
        "  {}  - Write an annotated config file and exit",
        "--generate-config".green()
    );
    println!("  {}            - Verbose file logging", "--debug".green());
    println!("  {}         - Show this help", "-h, --help".green());
    println!("  {}      - Show the version", "-V, --version".green());
    println!();
    println!("{}", "Keys:".yellow());
    println!("  /  search    f  filter column    s  sort column    Enter  open record");
    println!("  Press ? inside the browser for the full reference.");
    println!();
}

fn flag_value(args: &[String], flag: &str) -> Option<String> {
    args.iter()
        .position(|arg| arg == flag)
        .and_then(|pos| args.get(pos + 1))
        .cloned()
}

/// First positional argument, skipping over flags and their values.
fn positional_file(args: &[String]) -> Option<String> {
    let mut i = 0;
    while i < args.len() {
        let arg = &args[i];
        if VALUE_FLAGS.contains(&arg.as_str()) {
            i += 2;
            continue;
        }
        if arg.starts_with('-') {
            i += 1;
            continue;
        }
        return Some(arg.clone());
    }
    None
}

fn parse_sort(spec: &str) -> (String, SortOrder) {
    match spec.split_once(':') {
        Some((key, "desc")) => (key.to_string(), SortOrder::Descending),
        Some((key, _)) => (key.to_string(), SortOrder::Ascending),
        None => (spec.to_string(), SortOrder::Ascending),
    }
}

fn main() -> anyhow::Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|arg| arg == "-h" || arg == "--help") {
        print_help();
        return Ok(());
    }
    if args.iter().any(|arg| arg == "-V" || arg == "--version") {
        println!("record-browser {}", env!("CARGO_PKG_VERSION"));
        return Ok(());
    }

    if args.contains(&"--generate-config".to_string()) {
        match Config::get_config_path() {
            Ok(path) => {
                if let Some(parent) = path.parent() {
                    if let Err(e) = std::fs::create_dir_all(parent) {
                        eprintln!("Error creating config directory: {}", e);
                        std::process::exit(1);
                    }
                }
                if let Err(e) = std::fs::write(&path, Config::create_default_with_comments()) {
                    eprintln!("Error writing config file: {}", e);
                    std::process::exit(1);
                }
                println!("Configuration file created at: {:?}", path);
                return Ok(());
            }
            Err(e) => {
                eprintln!("Error determining config path: {}", e);
                std::process::exit(1);
            }
        }
    }

    let debug = args.contains(&"--debug".to_string());
    let default_filter = if debug {
        "record_browser=debug"
    } else {
        "record_browser=info"
    };
    match logging::init_file_logging(default_filter) {
        Ok(path) => {
            if debug {
                eprintln!("Debug logs: {}", path.display());
                eprintln!("Tail with: tail -f {}", path.display());
            }
        }
        Err(e) => eprintln!("Warning: file logging disabled: {}", e),
    }

    let mut config = Config::load().unwrap_or_else(|e| {
        eprintln!("Config error: {} (using defaults)", e);
        Config::default()
    });

    if let Some(n) = flag_value(&args, "--page-size") {
        match n.parse::<usize>() {
            Ok(n) if n > 0 => config.display.page_size = n,
            _ => {
                eprintln!("Invalid --page-size value: {}", n);
                std::process::exit(1);
            }
        }
    }

    let Some(file) = positional_file(&args) else {
        eprintln!("No data file given. Try: record-browser demos/patients.json");
        eprintln!();
        print_help();
        std::process::exit(1);
    };

    let set = match data::load_path(&file) {
        Ok(set) => set,
        Err(e) => {
            eprintln!("Failed to load {}: {:#}", file, e);
            std::process::exit(1);
        }
    };
    info!(
        file = %file,
        records = set.records.len(),
        columns = set.columns.len(),
        "collection loaded"
    );

    let notes_text = match flag_value(&args, "--notes") {
        Some(notes_file) => match std::fs::read_to_string(&notes_file) {
            Ok(text) => Some(text),
            Err(e) => {
                eprintln!("Failed to read {}: {}", notes_file, e);
                std::process::exit(1);
            }
        },
        None => None,
    };

    let search = flag_value(&args, "--search");
    let sort = flag_value(&args, "--sort").map(|spec| parse_sort(&spec));
    let page = match flag_value(&args, "--page") {
        Some(n) => match n.parse::<usize>() {
            Ok(n) if n > 0 => Some(n),
            _ => {
                eprintln!("Invalid --page value: {}", n);
                std::process::exit(1);
            }
        },
        None => None,
    };

    if args.contains(&"--print".to_string()) {
        let mut state = GridViewState::new();
        if let Some(search) = &search {
            state.set_search(search.clone());
        }
        if let Some((key, order)) = sort {
            state.sort = Some(record_browser::view::SortSpec {
                key,
                order,
            });
        }
        if let Some(n) = page {
            state.set_page(n);
        }
        table_display::print_records(&set, &state, page.map(|_| config.display.page_size));
        return Ok(());
    }

    let mut app = App::new(set, &config, notes_text);
    if let Some(search) = &search {
        app.set_initial_search(search);
    }
    if let Some((key, order)) = &sort {
        app.set_initial_sort(key, *order);
    }
    app.run()
}
