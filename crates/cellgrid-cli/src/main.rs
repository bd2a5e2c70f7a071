//! Cellgrid CLI - inspect and edit table declarations

use anyhow::{Context, Result};
use cellgrid::prelude::*;
use cellgrid::{decode, encode, Cell};
use clap::{Parser, Subcommand};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "cellgrid")]
#[command(author, version, about = "Table declaration inspection and editing tool")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the resolved cell matrix
    Render {
        /// Table declaration (JSON)
        input: PathBuf,

        /// Local overlay to layer on top (JSON object of address -> cell)
        #[arg(long)]
        overlay: Option<PathBuf>,

        /// Print the matrix as JSON instead of a text grid
        #[arg(long)]
        json: bool,

        /// Give empty cells a placeholder size
        #[arg(long)]
        placeholder: bool,
    },

    /// Show the effective style of a cell with its row and column styles
    Style {
        /// Table declaration (JSON)
        input: PathBuf,

        /// Cell address, e.g. B3
        address: String,
    },

    /// Walk the grid from a cell and print every landing cell
    Navigate {
        /// Table declaration (JSON)
        input: PathBuf,

        /// Starting cell address
        from: String,

        /// Moves to make: up, down, left or right
        #[arg(required = true)]
        moves: Vec<Direction>,
    },

    /// Convert between A1 addresses and zero-based indices
    #[command(alias = "addr")]
    Address {
        /// An A1 address, or a row index when COL is given
        value: String,

        /// Zero-based column index
        col: Option<usize>,
    },

    /// Set the text content of a cell
    Set {
        input: PathBuf,
        address: String,
        content: String,

        /// Output declaration file (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Insert a row before AT (default: append)
    AddRow(StructuralArgs),

    /// Remove row AT (default: the last row)
    RemoveRow(StructuralArgs),

    /// Insert a column before AT (default: append)
    AddColumn(StructuralArgs),

    /// Remove column AT (default: the last column)
    RemoveColumn(StructuralArgs),
}

#[derive(clap::Args)]
struct StructuralArgs {
    /// Table declaration (JSON)
    input: PathBuf,

    /// Zero-based row or column index
    #[arg(long)]
    at: Option<usize>,

    /// Output declaration file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Render {
            input,
            overlay,
            json,
            placeholder,
        } => render(&input, overlay.as_deref(), json, placeholder),
        Commands::Style { input, address } => show_style(&input, &address),
        Commands::Navigate { input, from, moves } => navigate(&input, &from, &moves),
        Commands::Address { value, col } => convert_address(&value, col),
        Commands::Set {
            input,
            address,
            content,
            output,
        } => set_content(&input, &address, content, output.as_deref()),
        Commands::AddRow(args) => structural(args, TableChange::AddRow),
        Commands::RemoveRow(args) => structural(args, TableChange::RemoveRow),
        Commands::AddColumn(args) => structural(args, TableChange::AddColumn),
        Commands::RemoveColumn(args) => structural(args, TableChange::RemoveColumn),
    }
}

#[derive(Clone, Copy)]
enum TableChange {
    AddRow,
    RemoveRow,
    AddColumn,
    RemoveColumn,
}

fn load_declaration(path: &Path) -> Result<TableDeclaration> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read '{}'", path.display()))?;
    TableDeclaration::from_json(&text)
        .with_context(|| format!("Failed to parse '{}'", path.display()))
}

fn open_engine(path: &Path) -> Result<TableEngine<InMemoryDocument>> {
    let declaration = load_declaration(path)?;
    Ok(TableEngine::new(
        declaration.clone(),
        InMemoryDocument::new(declaration),
    ))
}

fn runtime() -> Result<tokio::runtime::Runtime> {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .context("Failed to start the async runtime")
}

fn write_declaration(declaration: &TableDeclaration, output: Option<&Path>) -> Result<()> {
    let json = declaration
        .to_json()
        .context("Failed to serialize the declaration")?;
    if let Some(path) = output {
        std::fs::write(path, &json)
            .with_context(|| format!("Failed to write '{}'", path.display()))?;
        eprintln!("Wrote '{}'", path.display());
    } else {
        let mut stdout = io::stdout();
        writeln!(stdout, "{json}").context("Failed to write to stdout")?;
    }
    Ok(())
}

fn render(input: &Path, overlay: Option<&Path>, json: bool, placeholder: bool) -> Result<()> {
    let declaration = load_declaration(input)?;
    let options = GridOptions::new().with_empty_cell_placeholder(placeholder);
    let mut engine = TableEngine::with_options(
        declaration.clone(),
        InMemoryDocument::new(declaration),
        options,
    );

    if let Some(path) = overlay {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read '{}'", path.display()))?;
        let overlay: OverlayMap = serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse overlay '{}'", path.display()))?;
        engine = engine.with_overlay(overlay);
    }

    let matrix = engine.resolved_matrix()?;
    if json {
        let text = serde_json::to_string_pretty(matrix).context("Failed to serialize the matrix")?;
        println!("{text}");
        return Ok(());
    }

    // Header row of column letters
    let header: Vec<String> = (0..matrix.col_count())
        .map(CellCoord::column_to_letters)
        .collect();
    println!("\t{}", header.join("\t"));
    for (r, row) in matrix.rows().enumerate() {
        let cells: Vec<String> = row.iter().map(cell_marker).collect();
        println!("{}\t{}", r + 1, cells.join("\t"));
    }
    Ok(())
}

/// Text shown for a cell in the grid: its content, or where it is merged into
fn cell_marker(cell: &Cell) -> String {
    match cell.subsumed_by {
        Some(owner) => format!("<{owner}>"),
        None => {
            let text = cell.content.to_string();
            text.replace(['\t', '\n'], " ")
        }
    }
}

fn show_style(input: &Path, address: &str) -> Result<()> {
    let engine = open_engine(input)?;
    let coord = decode(address).with_context(|| format!("Invalid address '{address}'"))?;

    let cell = engine.effective_style(coord.row, coord.col)?;
    let row = engine.row_style(coord.row)?;
    let column = engine.column_style(coord.col)?;
    let table = engine.table_style()?;

    println!("cell:   {}", cell.to_css());
    println!("row:    {}", row.to_css());
    println!("column: {}", column.to_css());
    println!("table:  {}", table.to_css());
    Ok(())
}

fn navigate(input: &Path, from: &str, moves: &[Direction]) -> Result<()> {
    let mut engine = open_engine(input)?;
    let start = decode(from).with_context(|| format!("Invalid address '{from}'"))?;

    let owner = engine
        .select_cell(start.row, start.col, false)
        .with_context(|| format!("Cell {from} is outside the table"))?;
    println!("start\t{owner}");
    for &direction in moves {
        let target = engine.dispatch_move(direction, false)?;
        println!("{direction}\t{target}");
    }
    Ok(())
}

fn convert_address(value: &str, col: Option<usize>) -> Result<()> {
    match col {
        Some(col) => {
            let row: usize = value
                .parse()
                .with_context(|| format!("Invalid row index '{value}'"))?;
            println!("{}", encode(row, col));
        }
        None => {
            let coord = decode(value).with_context(|| format!("Invalid address '{value}'"))?;
            println!("{}\t{}", coord.row, coord.col);
        }
    }
    Ok(())
}

fn set_content(input: &Path, address: &str, content: String, output: Option<&Path>) -> Result<()> {
    let mut engine = open_engine(input)?;
    let coord = decode(address).with_context(|| format!("Invalid address '{address}'"))?;

    let outcome = runtime()?.block_on(engine.save_cell(coord, CellContent::text(content)))?;
    if let SaveOutcome::Applied(persisted) = &outcome {
        eprintln!("{coord} = {persisted}");
    }
    let document = engine.into_service();
    write_declaration(document.declaration(), output)
}

fn structural(args: StructuralArgs, op: TableChange) -> Result<()> {
    let mut engine = open_engine(&args.input)?;
    let rt = runtime()?;

    rt.block_on(async {
        match op {
            TableChange::AddRow => engine.add_row(args.at).await,
            TableChange::RemoveRow => engine.remove_row(args.at).await,
            TableChange::AddColumn => engine.add_column(args.at).await,
            TableChange::RemoveColumn => engine.remove_column(args.at).await,
        }
    })?;

    let matrix = engine.resolved_matrix()?;
    eprintln!("Table is now {} rows x {} columns", matrix.row_count(), matrix.col_count());
    let document = engine.into_service();
    write_declaration(document.declaration(), args.output.as_deref())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_moves() {
        let cli = Cli::try_parse_from(["cellgrid", "navigate", "t.json", "A1", "right", "Down"]).unwrap();
        match cli.command {
            Commands::Navigate { moves, .. } => {
                assert_eq!(moves, vec![Direction::Right, Direction::Down]);
            }
            _ => panic!("expected navigate"),
        }
        assert!(Cli::try_parse_from(["cellgrid", "navigate", "t.json", "A1", "sideways"]).is_err());
    }

    #[test]
    fn test_edits_round_trip_through_files() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("table.json");
        let output = dir.path().join("edited.json");
        std::fs::write(&input, r#"{"countRow": 2, "countCol": 2, "rows": [{"row": ["a", "b"]}]}"#)
            .unwrap();

        set_content(&input, "B2", "new".to_string(), Some(&output)).unwrap();
        let edited = load_declaration(&output).unwrap();
        assert_eq!(edited.cell_content(CellCoord::new(1, 1)), CellContent::text("new"));

        let args = StructuralArgs {
            input: output.clone(),
            at: Some(0),
            output: Some(output.clone()),
        };
        structural(args, TableChange::AddRow).unwrap();
        let edited = load_declaration(&output).unwrap();
        assert_eq!(edited.declared_rows(), 3);
        assert_eq!(edited.cell_content(CellCoord::new(2, 1)), CellContent::text("new"));
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = load_declaration(Path::new("does-not-exist.json")).unwrap_err();
        assert!(err.to_string().contains("does-not-exist.json"));
    }

    #[test]
    fn test_merged_cell_marker() {
        let mut cell = Cell::empty();
        cell.subsumed_by = Some(CellCoord::new(0, 0));
        assert_eq!(cell_marker(&cell), "<A1>");
    }
}
