use crate::{
    config::{Config, ConfigManager},
    core::{ProjectSession, SeriesKind},
    currency::format_amount,
    domain::{parse_amount, parse_date, Amount, ExpenseCategory, ExpenseRecord},
    errors::CliError,
    storage::{CsvStorage, PersistenceGateway},
};

use super::{
    output,
    table::{Table, TableColumn},
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Exit,
}

pub const COMMANDS: [(&str, &str); 11] = [
    ("stages", "stages                          list stages and their estimates"),
    ("estimate", "estimate <stage> <amount>       set the estimate of a stage"),
    (
        "add",
        "add <date> <stage> <category> <supplier> <amount> [description]",
    ),
    ("records", "records                         list expenses in entry order"),
    ("report", "report                          estimated vs actual per stage"),
    ("summary", "summary                         project totals and sale value"),
    ("sale-value", "sale-value [amount]             show or set the sale value"),
    ("chart", "chart                           estimated/actual series per stage"),
    ("check", "check                           report data-quality issues"),
    ("help", "help                            show this list"),
    ("exit", "exit                            leave the shell"),
];

/// Session plus configuration used by every shell command.
pub struct ShellContext {
    session: ProjectSession,
    config: Config,
}

impl ShellContext {
    pub fn open() -> Result<Self, CliError> {
        let manager = ConfigManager::new();
        let config = manager.load()?;
        let storage = CsvStorage::with_files(
            Some(manager.base_dir().to_path_buf()),
            &config.catalog_file,
            &config.ledger_file,
        )?;
        let gateway = PersistenceGateway::new(Box::new(storage), config.stages.clone());
        Ok(Self::new(ProjectSession::open(gateway), config))
    }

    pub fn new(session: ProjectSession, config: Config) -> Self {
        Self { session, config }
    }

    pub fn report_load_warnings(&self) {
        for warning in self.session.load_warnings() {
            output::warning(warning);
        }
    }

    pub fn dispatch(&mut self, command: &str, args: &[&str]) -> Result<LoopControl, CliError> {
        match command {
            "stages" => self.list_stages(),
            "estimate" => self.set_estimate(args)?,
            "add" => self.add_expense(args)?,
            "records" => self.list_records(),
            "report" => self.stage_report(),
            "summary" => self.summary(),
            "sale-value" => self.sale_value(args)?,
            "chart" => self.chart(),
            "check" => self.check(),
            "help" => print_help(),
            "exit" | "quit" => return Ok(LoopControl::Exit),
            other => {
                return Err(CliError::Command(format!(
                    "unknown command `{other}`; type `help`"
                )))
            }
        }
        Ok(LoopControl::Continue)
    }

    fn money(&self, amount: Amount) -> String {
        format_amount(amount, &self.config.currency, &self.config.locale)
    }

    fn list_stages(&self) {
        output::section("Stages");
        let mut table = Table::new(vec![TableColumn::left("Stage"), TableColumn::right("Estimated")]);
        for stage in self.session.state().catalog.stages() {
            table.push_row(vec![stage.name.clone(), self.money(stage.estimated_cost)]);
        }
        println!("{}", table.render());
    }

    fn set_estimate(&mut self, args: &[&str]) -> Result<(), CliError> {
        let [stage, amount] = args else {
            return Err(usage("estimate"));
        };
        let amount = parse_amount(amount)?;
        self.session.update_estimate(stage, amount)?;
        output::success(format!("Estimate for {stage} set to {}", self.money(amount)));
        Ok(())
    }

    fn add_expense(&mut self, args: &[&str]) -> Result<(), CliError> {
        if args.len() < 5 {
            return Err(usage("add"));
        }
        let category: ExpenseCategory = args[2].parse()?;
        let record = ExpenseRecord::new(
            parse_date(args[0])?,
            args[5..].join(" "),
            args[1],
            category,
            args[3],
            parse_amount(args[4])?,
        );
        let known_stage = self.session.state().catalog.contains(&record.stage);
        let stage = record.stage.clone();
        self.session.record_expense(record)?;
        output::success(format!("Expense recorded for {stage}"));
        if !known_stage {
            output::warning(format!("stage `{stage}` is not in the catalog"));
        }
        Ok(())
    }

    fn list_records(&self) {
        let records = self.session.state().ledger.all_records();
        output::section("Expenses");
        if records.is_empty() {
            output::info("No expenses recorded yet.");
            return;
        }
        let mut table = Table::new(vec![
            TableColumn::left("Date"),
            TableColumn::left("Description"),
            TableColumn::left("Stage"),
            TableColumn::left("Category"),
            TableColumn::left("Supplier"),
            TableColumn::right("Cost"),
        ]);
        for record in records {
            table.push_row(vec![
                record.date.to_string(),
                record.description.clone(),
                record.stage.clone(),
                record.category.to_string(),
                record.supplier.clone(),
                self.money(record.actual_cost),
            ]);
        }
        println!("{}", table.render());
    }

    fn stage_report(&self) {
        output::section("Estimated vs actual by stage");
        let mut table = Table::new(vec![
            TableColumn::left("Stage"),
            TableColumn::right("Estimated"),
            TableColumn::right("Actual"),
            TableColumn::right("Balance"),
            TableColumn::left(""),
        ]);
        for row in self.session.state().variance().per_stage_report() {
            let overrun = row.is_overrun();
            let balance = self.money(row.balance);
            table.push_row(vec![
                row.stage,
                self.money(row.estimated),
                self.money(row.actual),
                if overrun { output::overrun(&balance) } else { balance },
                if overrun { output::overrun("OVERRUN") } else { String::new() },
            ]);
        }
        println!("{}", table.render());
    }

    fn summary(&self) {
        let state = self.session.state();
        let totals = state.variance().project_totals();
        output::section("Project summary");
        println!("Actual total:    {}", self.money(totals.actual_total));
        println!("Estimated total: {}", self.money(totals.estimated_total));
        println!("Balance:         {}", self.money(totals.balance));
        println!("Sale value:      {}", self.money(state.sale_value()));
    }

    fn sale_value(&mut self, args: &[&str]) -> Result<(), CliError> {
        match args {
            [] => println!("Sale value: {}", self.money(self.session.state().sale_value())),
            [amount] => {
                let amount = parse_amount(amount)?;
                self.session.set_sale_value(amount)?;
                output::success(format!("Sale value set to {}", self.money(amount)));
            }
            _ => return Err(usage("sale-value")),
        }
        Ok(())
    }

    fn chart(&self) {
        output::section("Estimated x actual by stage");
        let mut table = Table::new(vec![
            TableColumn::left("Stage"),
            TableColumn::left("Series"),
            TableColumn::right("Amount"),
        ]);
        for point in self.session.state().variance().burndown_series() {
            let amount = self.money(point.amount);
            let series = match (point.kind, point.overrun) {
                (SeriesKind::Actual, true) => output::overrun("Actual (over)"),
                (kind, _) => kind.to_string(),
            };
            table.push_row(vec![point.stage, series, amount]);
        }
        println!("{}", table.render());
    }

    fn check(&self) {
        let issues = self.session.data_quality(&self.config.suppliers);
        if issues.is_empty() {
            output::success("No data-quality issues found.");
        }
        for issue in issues {
            output::warning(issue);
        }
    }
}

fn usage(command: &str) -> CliError {
    let line = COMMANDS
        .iter()
        .find(|(name, _)| *name == command)
        .map(|(_, usage)| *usage)
        .unwrap_or(command);
    CliError::Input(format!("usage: {}", line.split("  ").next().unwrap_or(line).trim()))
}

fn print_help() {
    output::section("Commands");
    for (_, line) in COMMANDS {
        println!("  {line}");
    }
    println!(
        "  categories: {}",
        ExpenseCategory::ALL.map(|category| category.as_str()).join(", ")
    );
}
