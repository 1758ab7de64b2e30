//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::fmt::{self, Write as _};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvLedgerAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::account::{Account, AccountProfile, AccountType};
use crate::domain::config_validation::validate_account_config;
use crate::domain::error::PropfirmError;
use crate::domain::firm::{self, FirmId};
use crate::domain::payout::PayoutOutcome;
use crate::domain::pnl;
use crate::domain::program::Program;
use crate::domain::rules::{AccountRules, WithdrawalRules};
use crate::ports::config_port::ConfigPort;
use crate::ports::ledger_port::LedgerPort;

#[derive(Parser, Debug)]
#[command(name = "propfirm", about = "Prop firm account rule engine")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List supported firms
    Firms,
    /// Print the account and withdrawal rules for a firm and size
    Rules {
        #[arg(short, long)]
        firm: String,
        #[arg(short, long)]
        size: f64,
        #[arg(long)]
        funded: bool,
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        notes: String,
    },
    /// Load an account and its ledger, then report eligibility and payouts
    Check {
        #[arg(short, long)]
        config: PathBuf,
        /// Directory holding the ledger CSVs; overrides [ledger] path
        #[arg(short, long)]
        ledger: Option<PathBuf>,
    },
    /// Validate an account configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Firms => {
            print!("{}", format_firms());
            Ok(())
        }
        Command::Rules {
            firm,
            size,
            funded,
            name,
            notes,
        } => run_rules(&firm, size, funded, &name, &notes),
        Command::Check { config, ledger } => run_check(&config, ledger.as_deref()),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn format_firms() -> String {
    let mut out = String::new();
    for id in FirmId::ALL {
        let _ = writeln!(out, "{:<18} {}", id.key(), id);
    }
    out
}

fn run_rules(firm: &str, size: f64, funded: bool, name: &str, notes: &str) -> Result<(), PropfirmError> {
    let firm = FirmId::resolve(firm);
    let account_type = if funded {
        AccountType::Funded
    } else {
        AccountType::Eval
    };
    let mut profile = AccountProfile::new(size, account_type)
        .with_name(name)
        .with_notes(notes);
    profile.program = Program::detect(firm, account_type, name, notes);

    print!("{}", format_rules(firm, &profile)?);
    Ok(())
}

/// Both rule sets for `profile`, or `UnsupportedTier` when the firm has none.
pub fn format_rules(firm: FirmId, profile: &AccountProfile) -> Result<String, PropfirmError> {
    let strategy = firm::strategy_for(firm);
    let rules = strategy
        .account_rules(profile)
        .ok_or_else(|| PropfirmError::UnsupportedTier {
            firm: strategy.name().to_string(),
            size: profile.size,
        })?;
    let withdrawal = strategy.withdrawal_rules(profile);

    let mut out = String::new();
    let _ = write!(out, "{} {:.0} {}", strategy.name(), profile.size, profile.account_type);
    if let Some(program) = profile.program {
        let _ = write!(out, " ({})", program);
    }
    let _ = writeln!(out);
    let _ = write!(out, "{}", AccountRulesView(&rules));
    let _ = write!(out, "{}", WithdrawalRulesView(&withdrawal));
    let _ = writeln!(out, "  buffer:             {:.2}", strategy.buffer(profile.size));
    Ok(out)
}

struct AccountRulesView<'a>(&'a AccountRules);

impl fmt::Display for AccountRulesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let r = self.0;
        writeln!(f, "Account rules")?;
        writeln!(f, "  profit target:      {:.2}", r.profit_target)?;
        writeln!(f, "  max drawdown:       {:.2}", r.max_drawdown)?;
        writeln!(f, "  daily loss limit:   {:.2}", r.daily_loss_limit)?;
        writeln!(f, "  consistency:        {:.0}%", r.consistency_rule)?;
        writeln!(f, "  min trading days:   {}", r.min_trading_days)?;
        writeln!(
            f,
            "  max contracts:      {} mini / {} micro",
            r.max_contracts.mini, r.max_contracts.micro
        )
    }
}

struct WithdrawalRulesView<'a>(&'a WithdrawalRules);

impl fmt::Display for WithdrawalRulesView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let w = self.0;
        writeln!(f, "Withdrawal rules")?;
        writeln!(f, "  tax rate:           {:.0}%", w.tax_rate * 100.0)?;
        writeln!(f, "  frequency:          {}", w.frequency)?;
        if w.requires_cycles {
            let c = &w.cycle_requirements;
            writeln!(
                f,
                "  cycle:              {} days, {:.2} min/day, {:.0}% withdrawable",
                c.days_per_cycle, c.min_daily_profit, c.withdrawal_percentage
            )?;
        }
        writeln!(f, "  buffer required:    {}", if w.has_buffer { "yes" } else { "no" })?;
        writeln!(f, "  min withdrawal:     {:.2}", w.min_withdrawal)?;
        match w.max_withdrawal {
            Some(max) => writeln!(f, "  max withdrawal:     {:.2}", max),
            None => writeln!(f, "  max withdrawal:     uncapped"),
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, PropfirmError> {
    FileConfigAdapter::from_file(path)
}

fn setting(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .filter(|value| !value.trim().is_empty())
}

/// Builds an account from a validated `[account]` section.
///
/// An explicit `program` replaces the one detected from name and notes.
pub fn build_account(config: &dyn ConfigPort) -> Result<Account, PropfirmError> {
    let firm_key = config
        .get_string("account", "firm")
        .ok_or_else(|| PropfirmError::missing("account", "firm"))?;
    let firm = FirmId::resolve(&firm_key);

    let size = config.get_double("account", "size", 0.0);
    if size <= 0.0 {
        return Err(PropfirmError::invalid("account", "size", "size must be positive"));
    }

    let account_type = match setting(config, "account", "type") {
        Some(value) => value
            .parse::<AccountType>()
            .map_err(|reason| PropfirmError::invalid("account", "type", reason))?,
        None => AccountType::default(),
    };

    let name = config.get_string("account", "name").unwrap_or_default();
    let notes = config.get_string("account", "notes").unwrap_or_default();
    let mut account = Account::new(firm, size, account_type, name, notes);

    if let Some(value) = setting(config, "account", "program") {
        let program = Program::parse(firm, &value).ok_or_else(|| {
            PropfirmError::invalid("account", "program", format!("'{}' is not a {} program", value, firm))
        })?;
        account = account.with_program(program);
    }
    Ok(account)
}

/// Appends the ledger series named `stem` to `account`.
pub fn load_ledger(account: &mut Account, ledger: &dyn LedgerPort, stem: &str) -> Result<(), PropfirmError> {
    for entry in ledger.load_pnl(stem)? {
        account.record_pnl(entry.date, entry.amount);
    }
    for withdrawal in ledger.load_withdrawals(stem)? {
        account.record_withdrawal(withdrawal.date, withdrawal.amount);
    }
    Ok(())
}

/// Ledger directory: the CLI override, else `[ledger] path` relative to the
/// config file. `None` when no ledger is configured.
fn resolve_ledger_dir(config: &dyn ConfigPort, config_path: &Path, cli_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(dir) = cli_override {
        return Some(dir.to_path_buf());
    }
    let dir = PathBuf::from(config.get_string("ledger", "path")?);
    if dir.is_absolute() {
        return Some(dir);
    }
    Some(
        config_path
            .parent()
            .map(|parent| parent.join(&dir))
            .unwrap_or(dir),
    )
}

fn run_check(config_path: &Path, ledger_override: Option<&Path>) -> Result<(), PropfirmError> {
    let config = load_config(config_path)?;
    validate_account_config(&config)?;
    let mut account = build_account(&config)?;

    if let Some(dir) = resolve_ledger_dir(&config, config_path, ledger_override) {
        let stem = config
            .get_string("ledger", "stem")
            .ok_or_else(|| PropfirmError::missing("ledger", "stem"))?;
        info!(dir = %dir.display(), stem = %stem, "loading ledger");
        load_ledger(&mut account, &CsvLedgerAdapter::new(dir), &stem)?;
    }

    let report = CheckReport::build(&account)?;
    print!("{report}");
    Ok(())
}

fn run_validate(config_path: &Path) -> Result<(), PropfirmError> {
    let config = load_config(config_path)?;
    validate_account_config(&config)?;
    let account = build_account(&config)?;
    println!(
        "{}: {} {:.0} {}{} is valid",
        config_path.display(),
        account.firm,
        account.size,
        account.account_type,
        account
            .program
            .map(|p| format!(" ({})", p))
            .unwrap_or_default()
    );
    Ok(())
}

/// Everything `check` derives from one account and its ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct CheckReport {
    pub name: String,
    pub firm: FirmId,
    pub size: f64,
    pub account_type: AccountType,
    pub program: Option<Program>,
    pub trading_days: usize,
    pub total_pnl: f64,
    pub total_withdrawals: f64,
    pub balance: f64,
    pub peak_balance: f64,
    pub max_drawdown: f64,
    pub rules: AccountRules,
    pub buffer: f64,
    pub eligible_for_validation: bool,
    pub withdrawal: PayoutOutcome,
    pub tax_rate: f64,
    /// Withdrawable amount after the firm's share is withheld.
    pub net_withdrawal: f64,
}

impl CheckReport {
    pub fn build(account: &Account) -> Result<Self, PropfirmError> {
        let rules = account
            .account_rules()
            .ok_or_else(|| PropfirmError::UnsupportedTier {
                firm: account.firm.to_string(),
                size: account.size,
            })?;
        let curve = account.running_balance();
        let withdrawal = account.withdrawal_outcome();
        let withdrawal_rules = account.withdrawal_rules();

        Ok(CheckReport {
            name: account.name.clone(),
            firm: account.firm,
            size: account.size,
            account_type: account.account_type,
            program: account.program,
            trading_days: account.daily_pnl().trading_days(),
            total_pnl: account.total_pnl(),
            total_withdrawals: account.total_withdrawals(),
            balance: account.balance(),
            peak_balance: account.peak_balance(),
            max_drawdown: pnl::max_drawdown(&curve),
            rules,
            buffer: account.buffer(),
            eligible_for_validation: account.is_eligible_for_validation(),
            withdrawal,
            tax_rate: withdrawal_rules.tax_rate,
            net_withdrawal: withdrawal_rules.net_of_tax(withdrawal.amount()),
        })
    }
}

impl fmt::Display for CheckReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let title = if self.name.is_empty() {
            self.firm.to_string()
        } else {
            self.name.clone()
        };
        write!(f, "{}: {} {:.0} {}", title, self.firm, self.size, self.account_type)?;
        if let Some(program) = self.program {
            write!(f, " ({})", program)?;
        }
        writeln!(f)?;
        writeln!(f, "  trading days:       {}", self.trading_days)?;
        writeln!(f, "  total pnl:          {:.2}", self.total_pnl)?;
        writeln!(f, "  withdrawn:          {:.2}", self.total_withdrawals)?;
        writeln!(f, "  balance:            {:.2}", self.balance)?;
        writeln!(f, "  peak balance:       {:.2}", self.peak_balance)?;
        writeln!(
            f,
            "  max drawdown:       {:.2} of {:.2}",
            self.max_drawdown, self.rules.max_drawdown
        )?;
        writeln!(f, "  buffer:             {:.2}", self.buffer)?;
        if self.account_type == AccountType::Eval {
            writeln!(
                f,
                "  eligible to fund:   {}",
                if self.eligible_for_validation { "yes" } else { "no" }
            )?;
        }
        match self.withdrawal {
            PayoutOutcome::NotApplicable => writeln!(f, "  withdrawable:       n/a"),
            PayoutOutcome::Blocked { gate } => {
                writeln!(f, "  withdrawable:       0.00 (blocked: {})", gate)
            }
            PayoutOutcome::BelowMinimum { amount, minimum } => writeln!(
                f,
                "  withdrawable:       0.00 ({:.2} is below the {:.2} minimum)",
                amount, minimum
            ),
            PayoutOutcome::Available(amount) => writeln!(
                f,
                "  withdrawable:       {:.2} ({:.2} after {:.0}% withheld)",
                amount,
                self.net_withdrawal,
                self.tax_rate * 100.0
            ),
        }
    }
}
