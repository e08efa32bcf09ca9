use clap::{Parser, Subcommand};
use gridedit::cli;
use gridedit::config::EditorConfig;
use gridedit::error::EditorResult;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridedit")]
#[command(about = "Load a spreadsheet, edit cells in place, save it back to .xlsx")]
#[command(long_about = "gridedit - spreadsheet grid editor
Reads the first worksheet of .xlsx/.xls/.xlsb/.ods files as a grid of text cells.
Row 1 is the header; data rows are editable. Saves as single-sheet .xlsx.

COMMANDS:
  show   - Print the grid of a spreadsheet
  edit   - Set cells and save
  repl   - Interactive editing session

CELL REFERENCES:
  A1 notation (B2 = second row, second column) or zero-based row,col (1,1)

EXAMPLES:
  gridedit show prices.xlsx
  gridedit show prices.xlsx --json
  gridedit edit prices.xlsx --set B2=4.50 --set A3=Muffin -o prices_new.xlsx
  gridedit repl prices.xlsx")]
#[command(version)]
struct Cli {
    /// YAML configuration file
    #[arg(long, global = true, env = "GRIDEDIT_CONFIG")]
    config: Option<PathBuf>,

    /// Show debug logging on stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the grid of a spreadsheet
    Show {
        /// Spreadsheet file (.xlsx, .xls)
        file: PathBuf,

        /// Print the grid as a JSON array of rows
        #[arg(long)]
        json: bool,
    },

    #[command(long_about = "Set one or more cells and save the result as .xlsx.

The header row (row 1) cannot be changed unless 'editable_header: true'
is set in the configuration file.

OUTPUT:
  -o <path>        Write to this path
  --out-dir <dir>  Write into <dir> under the input file name (.xlsx)
  (neither)        Write into the current directory under the input file name

EXAMPLE:
  gridedit edit stock.xlsx --set B2=12 --set \"C3=on order\" -o stock.xlsx")]
    /// Set cells and save
    Edit {
        /// Spreadsheet file (.xlsx, .xls)
        file: PathBuf,

        /// Cell assignment CELL=VALUE (repeatable)
        #[arg(short, long = "set", value_name = "CELL=VALUE", required = true)]
        set: Vec<String>,

        /// Output file path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output directory (file keeps the input name)
        #[arg(long, conflicts_with = "output")]
        out_dir: Option<PathBuf>,
    },

    /// Interactive editing session
    Repl {
        /// Spreadsheet to load on start
        file: Option<PathBuf>,
    },
}

fn main() -> EditorResult<()> {
    let cli = Cli::parse();
    cli::init_logging(cli.verbose);

    let config = match &cli.config {
        Some(path) => EditorConfig::from_yaml_file(path)?,
        None => EditorConfig::default(),
    };
    let color = !cli.no_color;

    match cli.command {
        Commands::Show { file, json } => cli::show(file, json, config, color),

        Commands::Edit {
            file,
            set,
            output,
            out_dir,
        } => cli::edit(file, set, output, out_dir, config, cli.verbose),

        Commands::Repl { file } => cli::repl(file, config, color),
    }
}
