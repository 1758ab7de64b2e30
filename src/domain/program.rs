//! Per-firm account programs (sub-types).
//!
//! A program is resolved once, when an account is created or imported, and
//! stored on the account. Free-text keyword matching over the account name and
//! notes survives only as [`Program::detect`], the import-time heuristic used
//! when no explicit program was given.

use std::fmt;

use super::account::AccountType;
use super::firm::FirmId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TptPlan {
    Pro,
    ProPlus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PhidiasPlan {
    Eval,
    Cash,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LucidPlan {
    Flex,
    Pro,
    Direct,
    Live,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SelectOption {
    Flex,
    Daily,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TradeifyPlan {
    Growth,
    Select(SelectOption),
    Lightning,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Program {
    TakeProfitTrader(TptPlan),
    Phidias(PhidiasPlan),
    Lucid(LucidPlan),
    Tradeify(TradeifyPlan),
}

/// Case-insensitive view over an account's name and notes.
pub struct Keywords {
    haystack: String,
}

impl Keywords {
    pub fn new(name: &str, notes: &str) -> Self {
        Keywords {
            haystack: format!("{} {}", name, notes).to_lowercase(),
        }
    }

    pub fn mentions(&self, needle: &str) -> bool {
        self.haystack.contains(needle)
    }
}

impl TptPlan {
    pub fn detect(keywords: &Keywords) -> Self {
        if keywords.mentions("pro+") || keywords.mentions("live") {
            TptPlan::ProPlus
        } else {
            TptPlan::Pro
        }
    }
}

impl PhidiasPlan {
    pub fn detect(keywords: &Keywords, account_type: AccountType) -> Self {
        if keywords.mentions("live") {
            PhidiasPlan::Live
        } else if keywords.mentions("cash") || account_type == AccountType::Funded {
            PhidiasPlan::Cash
        } else {
            PhidiasPlan::Eval
        }
    }
}

impl LucidPlan {
    pub fn detect(keywords: &Keywords) -> Self {
        if keywords.mentions("live") {
            LucidPlan::Live
        } else if keywords.mentions("direct") {
            LucidPlan::Direct
        } else if keywords.mentions("pro") {
            LucidPlan::Pro
        } else {
            LucidPlan::Flex
        }
    }

    /// Direct and Live accounts are funded from day one.
    pub fn skips_evaluation(self) -> bool {
        matches!(self, LucidPlan::Direct | LucidPlan::Live)
    }
}

impl TradeifyPlan {
    pub fn detect(keywords: &Keywords) -> Self {
        if keywords.mentions("lightning") {
            TradeifyPlan::Lightning
        } else if keywords.mentions("select") {
            if keywords.mentions("daily") {
                TradeifyPlan::Select(SelectOption::Daily)
            } else {
                TradeifyPlan::Select(SelectOption::Flex)
            }
        } else {
            TradeifyPlan::Growth
        }
    }
}

impl Program {
    /// Keyword heuristic: infers the program for `firm` from free text.
    ///
    /// Returns `None` for firms that have a single program.
    pub fn detect(firm: FirmId, account_type: AccountType, name: &str, notes: &str) -> Option<Self> {
        let keywords = Keywords::new(name, notes);
        match firm {
            FirmId::TakeProfitTrader => Some(Program::TakeProfitTrader(TptPlan::detect(&keywords))),
            FirmId::Phidias => Some(Program::Phidias(PhidiasPlan::detect(
                &keywords,
                account_type,
            ))),
            FirmId::Lucid => Some(Program::Lucid(LucidPlan::detect(&keywords))),
            FirmId::Tradeify => Some(Program::Tradeify(TradeifyPlan::detect(&keywords))),
            FirmId::TopStep | FirmId::Apex | FirmId::Bulenox | FirmId::Default => None,
        }
    }

    /// Parses an explicit program name for `firm` (e.g. from a config file).
    pub fn parse(firm: FirmId, value: &str) -> Option<Self> {
        let key: String = value
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| !matches!(c, ' ' | '-' | '_'))
            .collect();
        match (firm, key.as_str()) {
            (FirmId::TakeProfitTrader, "pro") => Some(Program::TakeProfitTrader(TptPlan::Pro)),
            (FirmId::TakeProfitTrader, "pro+" | "proplus" | "live") => {
                Some(Program::TakeProfitTrader(TptPlan::ProPlus))
            }
            (FirmId::Phidias, "eval") => Some(Program::Phidias(PhidiasPlan::Eval)),
            (FirmId::Phidias, "cash") => Some(Program::Phidias(PhidiasPlan::Cash)),
            (FirmId::Phidias, "live") => Some(Program::Phidias(PhidiasPlan::Live)),
            (FirmId::Lucid, "flex") => Some(Program::Lucid(LucidPlan::Flex)),
            (FirmId::Lucid, "pro") => Some(Program::Lucid(LucidPlan::Pro)),
            (FirmId::Lucid, "direct") => Some(Program::Lucid(LucidPlan::Direct)),
            (FirmId::Lucid, "live") => Some(Program::Lucid(LucidPlan::Live)),
            (FirmId::Tradeify, "growth") => Some(Program::Tradeify(TradeifyPlan::Growth)),
            (FirmId::Tradeify, "select" | "selectflex") => {
                Some(Program::Tradeify(TradeifyPlan::Select(SelectOption::Flex)))
            }
            (FirmId::Tradeify, "selectdaily") => {
                Some(Program::Tradeify(TradeifyPlan::Select(SelectOption::Daily)))
            }
            (FirmId::Tradeify, "lightning") => Some(Program::Tradeify(TradeifyPlan::Lightning)),
            _ => None,
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Program::TakeProfitTrader(TptPlan::Pro) => "PRO",
            Program::TakeProfitTrader(TptPlan::ProPlus) => "PRO+",
            Program::Phidias(PhidiasPlan::Eval) => "EVAL",
            Program::Phidias(PhidiasPlan::Cash) => "CASH",
            Program::Phidias(PhidiasPlan::Live) => "LIVE",
            Program::Lucid(LucidPlan::Flex) => "FLEX",
            Program::Lucid(LucidPlan::Pro) => "PRO",
            Program::Lucid(LucidPlan::Direct) => "DIRECT",
            Program::Lucid(LucidPlan::Live) => "LIVE",
            Program::Tradeify(TradeifyPlan::Growth) => "GROWTH",
            Program::Tradeify(TradeifyPlan::Select(SelectOption::Flex)) => "SELECT (flex)",
            Program::Tradeify(TradeifyPlan::Select(SelectOption::Daily)) => "SELECT (daily)",
            Program::Tradeify(TradeifyPlan::Lightning) => "LIGHTNING",
        };
        f.write_str(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keywords_are_case_insensitive() {
        let keywords = Keywords::new("Phidias LIVE #1", "");
        assert!(keywords.mentions("live"));
        assert!(!keywords.mentions("cash"));
    }

    #[test]
    fn tpt_plus_by_either_keyword() {
        assert_eq!(TptPlan::detect(&Keywords::new("TPT PRO+ 50k", "")), TptPlan::ProPlus);
        assert_eq!(TptPlan::detect(&Keywords::new("TPT", "went live")), TptPlan::ProPlus);
        assert_eq!(TptPlan::detect(&Keywords::new("TPT PRO", "")), TptPlan::Pro);
        assert_eq!(TptPlan::detect(&Keywords::new("", "")), TptPlan::Pro);
    }

    #[test]
    fn phidias_priority_live_over_cash() {
        let keywords = Keywords::new("cash account", "moved to live");
        assert_eq!(
            PhidiasPlan::detect(&keywords, AccountType::Funded),
            PhidiasPlan::Live
        );
    }

    #[test]
    fn phidias_funded_defaults_to_cash() {
        let keywords = Keywords::new("Phidias 50k", "");
        assert_eq!(
            PhidiasPlan::detect(&keywords, AccountType::Funded),
            PhidiasPlan::Cash
        );
        assert_eq!(
            PhidiasPlan::detect(&keywords, AccountType::Eval),
            PhidiasPlan::Eval
        );
    }

    #[test]
    fn lucid_priority_order() {
        assert_eq!(LucidPlan::detect(&Keywords::new("Lucid Pro", "live")), LucidPlan::Live);
        assert_eq!(LucidPlan::detect(&Keywords::new("Lucid Direct", "")), LucidPlan::Direct);
        assert_eq!(LucidPlan::detect(&Keywords::new("LucidPro", "")), LucidPlan::Pro);
        assert_eq!(LucidPlan::detect(&Keywords::new("Lucid 50k", "")), LucidPlan::Flex);
        assert!(LucidPlan::Direct.skips_evaluation());
        assert!(!LucidPlan::Pro.skips_evaluation());
    }

    #[test]
    fn tradeify_select_options() {
        assert_eq!(
            TradeifyPlan::detect(&Keywords::new("Select", "daily payouts")),
            TradeifyPlan::Select(SelectOption::Daily)
        );
        assert_eq!(
            TradeifyPlan::detect(&Keywords::new("Select 100k", "")),
            TradeifyPlan::Select(SelectOption::Flex)
        );
        assert_eq!(
            TradeifyPlan::detect(&Keywords::new("Lightning select", "")),
            TradeifyPlan::Lightning
        );
        assert_eq!(TradeifyPlan::detect(&Keywords::new("", "")), TradeifyPlan::Growth);
    }

    #[test]
    fn detect_single_program_firms() {
        assert_eq!(Program::detect(FirmId::TopStep, AccountType::Funded, "live", ""), None);
        assert_eq!(Program::detect(FirmId::Default, AccountType::Eval, "", ""), None);
    }

    #[test]
    fn parse_explicit_programs() {
        assert_eq!(
            Program::parse(FirmId::Tradeify, "Select-Daily"),
            Some(Program::Tradeify(TradeifyPlan::Select(SelectOption::Daily)))
        );
        assert_eq!(
            Program::parse(FirmId::TakeProfitTrader, "PRO+"),
            Some(Program::TakeProfitTrader(TptPlan::ProPlus))
        );
        assert_eq!(
            Program::parse(FirmId::Phidias, "cash"),
            Some(Program::Phidias(PhidiasPlan::Cash))
        );
        assert_eq!(Program::parse(FirmId::Phidias, "direct"), None);
        assert_eq!(Program::parse(FirmId::TopStep, "pro"), None);
    }

    #[test]
    fn display_labels() {
        assert_eq!(Program::Lucid(LucidPlan::Direct).to_string(), "DIRECT");
        assert_eq!(
            Program::Tradeify(TradeifyPlan::Select(SelectOption::Flex)).to_string(),
            "SELECT (flex)"
        );
    }
}
