//! Outbound messages
//!
//! The core only names a set of choices; the transport decides how to show
//! them (reply keyboard, inline buttons, a numbered list...).

use serde::{Deserialize, Serialize};

use crate::currency::Currency;

/// One option within a choice set
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Choice {
    /// What the user sees
    pub label: String,
    /// The utterance to send back when the option is picked
    pub utterance: String,
}

impl Choice {
    fn same(text: &str) -> Self {
        Self {
            label: text.to_string(),
            utterance: text.to_string(),
        }
    }

    fn new(label: impl Into<String>, utterance: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            utterance: utterance.into(),
        }
    }
}

/// Named groups of options a reply can offer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChoiceSet {
    MainMenu,
    Settings,
    Currencies,
    BudgetPeriods,
}

/// Menu button texts, also accepted as commands
pub const MENU_TODAY: &str = "📊 Today";
pub const MENU_WEEK: &str = "📅 Week";
pub const MENU_CATEGORIES: &str = "📈 Categories";
pub const MENU_BUDGET: &str = "💰 Budget";
pub const MENU_SETTINGS: &str = "⚙️ Settings";
pub const MENU_HELP: &str = "ℹ️ Help";

impl ChoiceSet {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MainMenu => "main_menu",
            Self::Settings => "settings",
            Self::Currencies => "currencies",
            Self::BudgetPeriods => "budget_periods",
        }
    }

    pub fn options(&self) -> Vec<Choice> {
        match self {
            Self::MainMenu => [
                MENU_TODAY,
                MENU_WEEK,
                MENU_CATEGORIES,
                MENU_BUDGET,
                MENU_SETTINGS,
                MENU_HELP,
            ]
            .iter()
            .map(|text| Choice::same(text))
            .collect(),
            Self::Settings => vec![
                Choice::new("💱 Currency", "/currency"),
                Choice::new("🌐 Language", "/language"),
            ],
            Self::Currencies => Currency::all()
                .iter()
                .map(|c| {
                    Choice::new(
                        format!("{} {}", c.symbol(), c.code()),
                        format!("/currency {}", c.code()),
                    )
                })
                .collect(),
            Self::BudgetPeriods => vec![
                Choice::new("Daily", "/setbudget daily"),
                Choice::new("Weekly", "/setbudget weekly"),
            ],
        }
    }
}

/// A reply to one utterance
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutboundMessage {
    pub text: String,
    pub choices: Option<ChoiceSet>,
}

impl OutboundMessage {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            choices: None,
        }
    }

    pub fn with_choices(text: impl Into<String>, choices: ChoiceSet) -> Self {
        Self {
            text: text.into(),
            choices: Some(choices),
        }
    }
}
