use std::{
    fs::{self, File},
    io::ErrorKind,
    path::{Path, PathBuf},
};

use csv::{ReaderBuilder, Terminator, Trim, WriterBuilder};
use serde::{Deserialize, Serialize};

use crate::{
    domain::{
        expense::DATE_FORMAT, parse_amount, parse_date, ExpenseCategory, ExpenseLedger,
        ExpenseRecord, ProjectSettings, Stage, StageCatalog,
    },
    errors::{BudgetError, Result},
    utils::paths::{
        ensure_dir, project_file_in, read_error, resolve_base, tmp_path, write_atomic,
        write_error,
    },
};

use super::{LoadReport, StorageBackend};

pub const DEFAULT_CATALOG_FILE: &str = "stages.csv";
pub const DEFAULT_LEDGER_FILE: &str = "expenses.csv";

const CATALOG_HEADERS: [&str; 2] = ["stage", "estimated_cost"];
const LEDGER_HEADERS: [&str; 6] = [
    "date",
    "description",
    "stage",
    "category",
    "supplier",
    "actual_cost",
];

/// Stores the catalog and ledger as two CSV files and project settings as
/// JSON, all under one root directory.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    catalog_path: PathBuf,
    ledger_path: PathBuf,
    project_path: PathBuf,
}

impl CsvStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        Self::with_files(root, DEFAULT_CATALOG_FILE, DEFAULT_LEDGER_FILE)
    }

    pub fn with_files(root: Option<PathBuf>, catalog_file: &str, ledger_file: &str) -> Result<Self> {
        let root = resolve_base(root);
        ensure_dir(&root)?;
        Ok(Self {
            catalog_path: root.join(catalog_file),
            ledger_path: root.join(ledger_file),
            project_path: project_file_in(&root),
        })
    }

    pub fn catalog_path(&self) -> &Path {
        &self.catalog_path
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    pub fn project_path(&self) -> &Path {
        &self.project_path
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StageRow {
    stage: String,
    estimated_cost: String,
}

impl TryFrom<StageRow> for Stage {
    type Error = BudgetError;

    fn try_from(row: StageRow) -> Result<Self> {
        if row.stage.is_empty() {
            return Err(BudgetError::validation("stage is required"));
        }
        let amount = parse_amount(&row.estimated_cost)?;
        crate::domain::amount::ensure_non_negative("estimated cost", amount)?;
        Ok(Stage::new(row.stage, amount))
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ExpenseRow {
    date: String,
    #[serde(default)]
    description: String,
    stage: String,
    category: String,
    #[serde(default)]
    supplier: String,
    actual_cost: String,
}

impl TryFrom<ExpenseRow> for ExpenseRecord {
    type Error = BudgetError;

    fn try_from(row: ExpenseRow) -> Result<Self> {
        let record = ExpenseRecord::new(
            parse_date(&row.date)?,
            row.description,
            row.stage,
            row.category.parse::<ExpenseCategory>()?,
            row.supplier,
            parse_amount(&row.actual_cost)?,
        );
        record.validate()?;
        Ok(record)
    }
}

impl From<&ExpenseRecord> for ExpenseRow {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            date: record.date.format(DATE_FORMAT).to_string(),
            description: record.description.clone(),
            stage: record.stage.clone(),
            category: record.category.as_str().to_string(),
            supplier: record.supplier.clone(),
            actual_cost: record.actual_cost.to_string(),
        }
    }
}

fn read_rows<R, T>(path: &Path, required: &[&str]) -> Result<Option<LoadReport<T>>>
where
    R: for<'de> Deserialize<'de>,
    T: TryFrom<R, Error = BudgetError>,
{
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(read_error(path, err)),
    };
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(file);

    let headers = reader.headers().map_err(|err| read_error(path, err))?.clone();
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|column| !headers.iter().any(|header| header == *column))
        .collect();
    if !missing.is_empty() {
        return Err(read_error(
            path,
            format!("missing column(s): {}", missing.join(", ")),
        ));
    }

    let mut report = LoadReport::default();
    for (index, result) in reader.deserialize::<R>().enumerate() {
        let line = index + 2;
        let converted = result
            .map_err(|err| BudgetError::StorageRead(err.to_string()))
            .and_then(T::try_from);
        match converted {
            Ok(item) => report.items.push(item),
            Err(err) => {
                let warning = format!("{}: skipped line {line}: {err}", path.display());
                tracing::warn!("{warning}");
                report.warnings.push(warning);
            }
        }
    }
    Ok(Some(report))
}

fn write_rows<R: Serialize>(
    path: &Path,
    headers: &[&str],
    rows: impl IntoIterator<Item = R>,
) -> Result<()> {
    if let Some(parent) = path.parent() {
        ensure_dir(parent)?;
    }
    let tmp = tmp_path(path);
    let mut writer = WriterBuilder::new()
        .has_headers(false)
        .terminator(Terminator::Any(b'\n'))
        .from_path(&tmp)
        .map_err(|err| write_error(&tmp, err))?;
    writer
        .write_record(headers)
        .map_err(|err| write_error(&tmp, err))?;
    for row in rows {
        writer.serialize(row).map_err(|err| write_error(&tmp, err))?;
    }
    writer.flush().map_err(|err| write_error(&tmp, err))?;
    drop(writer);
    fs::rename(&tmp, path).map_err(|err| write_error(path, err))
}

impl StorageBackend for CsvStorage {
    fn load_catalog(&self) -> Result<Option<LoadReport<Stage>>> {
        read_rows::<StageRow, Stage>(&self.catalog_path, &CATALOG_HEADERS)
    }

    fn save_catalog(&self, catalog: &StageCatalog) -> Result<()> {
        let rows = catalog.stages().iter().map(|stage| StageRow {
            stage: stage.name.clone(),
            estimated_cost: stage.estimated_cost.to_string(),
        });
        write_rows(&self.catalog_path, &CATALOG_HEADERS, rows)?;
        tracing::info!(path = %self.catalog_path.display(), stages = catalog.len(), "catalog saved");
        Ok(())
    }

    fn load_ledger(&self) -> Result<Option<LoadReport<ExpenseRecord>>> {
        // Only the columns without a serde default are mandatory.
        read_rows::<ExpenseRow, ExpenseRecord>(
            &self.ledger_path,
            &["date", "stage", "category", "actual_cost"],
        )
    }

    fn save_ledger(&self, ledger: &ExpenseLedger) -> Result<()> {
        let rows = ledger.all_records().iter().map(ExpenseRow::from);
        write_rows(&self.ledger_path, &LEDGER_HEADERS, rows)?;
        tracing::info!(path = %self.ledger_path.display(), records = ledger.len(), "ledger saved");
        Ok(())
    }

    fn load_project(&self) -> Result<Option<ProjectSettings>> {
        let data = match fs::read_to_string(&self.project_path) {
            Ok(data) => data,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(read_error(&self.project_path, err)),
        };
        serde_json::from_str(&data)
            .map(Some)
            .map_err(|err| read_error(&self.project_path, err))
    }

    fn save_project(&self, project: &ProjectSettings) -> Result<()> {
        let json = serde_json::to_string_pretty(project)
            .map_err(|err| write_error(&self.project_path, err))?;
        write_atomic(&self.project_path, &json)
    }
}
