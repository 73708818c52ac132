//! Command recognition
//!
//! Slash commands (`/today`, `/setbudget weekly`) and the main-menu button
//! texts map to a [`Command`]. Anything else is not a command and goes to
//! expense intake.

use super::reply::{MENU_BUDGET, MENU_CATEGORIES, MENU_HELP, MENU_SETTINGS, MENU_TODAY, MENU_WEEK};
use crate::models::{BudgetPeriod, ReportPeriod};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Start,
    Help,
    Report(ReportPeriod),
    /// Start budget entry; `None` asks which period
    SetBudget(Option<BudgetPeriod>),
    ShowBudget,
    Settings,
    /// Change currency; `None` lists the options
    Currency(Option<String>),
    Language,
    Cancel,
    Unknown(String),
}

impl Command {
    /// Recognize a command, or `None` for free text
    pub fn parse(text: &str) -> Option<Self> {
        let text = text.trim();

        match text {
            MENU_TODAY => return Some(Self::Report(ReportPeriod::Today)),
            MENU_WEEK => return Some(Self::Report(ReportPeriod::Week)),
            MENU_CATEGORIES => return Some(Self::Report(ReportPeriod::Month)),
            MENU_BUDGET => return Some(Self::SetBudget(None)),
            MENU_SETTINGS => return Some(Self::Settings),
            MENU_HELP => return Some(Self::Help),
            _ => {}
        }

        let rest = text.strip_prefix('/')?;
        let (name, args) = match rest.split_once(char::is_whitespace) {
            Some((name, args)) => (name, args.trim()),
            None => (rest, ""),
        };
        // Group chats address commands as /today@SomeBot
        let name = name.split('@').next().unwrap_or(name).to_lowercase();

        let command = match name.as_str() {
            "start" => Self::Start,
            "help" => Self::Help,
            "today" => Self::Report(ReportPeriod::Today),
            "week" => Self::Report(ReportPeriod::Week),
            "categories" | "category" | "month" => Self::Report(ReportPeriod::Month),
            "setbudget" | "budget" => Self::SetBudget(args.parse().ok()),
            "dailybudget" => Self::SetBudget(Some(BudgetPeriod::Daily)),
            "weeklybudget" => Self::SetBudget(Some(BudgetPeriod::Weekly)),
            "mybudget" | "limits" => Self::ShowBudget,
            "settings" => Self::Settings,
            "currency" => Self::Currency((!args.is_empty()).then(|| args.to_string())),
            "language" => Self::Language,
            "cancel" => Self::Cancel,
            _ => Self::Unknown(format!("/{}", name)),
        };
        Some(command)
    }
}
