//! Conversation state machine
//!
//! [`Assistant::handle_utterance`] is the single entry point transports call.
//! Every utterance is handled under its user's lock: load (or register) the
//! user, route by the persisted conversation state, act, write the state back.
//! Domain errors become reply text; storage errors are logged and answered
//! with a generic apology.

mod command;
mod locks;
mod reply;

pub use command::Command;
pub use locks::UserLocks;
pub use reply::{
    Choice, ChoiceSet, OutboundMessage, MENU_BUDGET, MENU_CATEGORIES, MENU_HELP, MENU_SETTINGS,
    MENU_TODAY, MENU_WEEK,
};

use chrono::{DateTime, Local, TimeZone};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, info};

use crate::aggregate::{aggregate, PeriodSummary};
use crate::config::AppConfig;
use crate::currency::{self, Currency};
use crate::db::Database;
use crate::error::{Error, Result};
use crate::intake::{parse_amount, parse_expense};
use crate::models::{BudgetPeriod, ConversationState, ReportPeriod, User, UserUpdate};
use crate::report::{format_budget_limits, format_category_shares, format_money, format_report};

const USAGE_TIP: &str = "📖 How to add expenses:\n\
    Send a message in the format:\n\
    amount category description\n\
    Example: 500 food pizza";

const HELP_TEXT: &str = "ℹ️ Moneylytics keeps track of what you spend.\n\
    \n\
    Add an expense: amount category description\n\
    Example: 12,50 coffee with Ann\n\
    \n\
    /today - today's report\n\
    /week - last 7 days\n\
    /categories - where the money went this month\n\
    /setbudget - set a daily or weekly limit\n\
    /mybudget - show your limits\n\
    /currency - change your currency\n\
    /settings - settings";

/// One inbound message from a user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Utterance {
    pub user_id: i64,
    pub text: String,
    #[serde(default)]
    pub display_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

impl Utterance {
    pub fn new(user_id: i64, display_name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            user_id,
            text: text.into(),
            display_name: display_name.into(),
            username: None,
        }
    }
}

/// A rendered report plus the summary it was built from
#[derive(Debug, Clone, Serialize)]
pub struct PeriodReport {
    pub period: ReportPeriod,
    pub text: String,
    /// `None` when the period has no expenses
    pub summary: Option<PeriodSummary>,
}

/// The chat assistant shared by every transport
pub struct Assistant {
    db: Database,
    config: AppConfig,
    locks: UserLocks,
}

impl Assistant {
    pub fn new(db: Database, config: AppConfig) -> Self {
        Self {
            db,
            config,
            locks: UserLocks::new(),
        }
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Handle one utterance and produce the reply
    pub fn handle_utterance(&self, utterance: &Utterance) -> OutboundMessage {
        let user_id = utterance.user_id;
        self.locks
            .with_user(user_id, || match self.dispatch(utterance) {
                Ok(reply) => reply,
                Err(e) => error_reply(user_id, &e),
            })
    }

    /// Build the report for `period` as of now, in local time
    pub fn period_report(&self, user_id: i64, period: ReportPeriod) -> Result<PeriodReport> {
        self.period_report_at(user_id, period, Local::now())
    }

    /// Build the report for `period` as of `now`
    pub fn period_report_at<Tz: TimeZone>(
        &self,
        user_id: i64,
        period: ReportPeriod,
        now: DateTime<Tz>,
    ) -> Result<PeriodReport> {
        let user = self
            .db
            .get_user(user_id)?
            .ok_or(Error::UserNotFound(user_id))?;
        let (start, end) = period.window(now, &self.config)?;
        let expenses = self.db.expenses_in_range(user_id, start, end)?;

        let summary = match aggregate(&expenses, &user.currency_symbol()) {
            Ok(summary) => summary,
            Err(Error::EmptyPeriod) => {
                return Ok(PeriodReport {
                    period,
                    text: self.empty_period_text(period),
                    summary: None,
                })
            }
            Err(e) => return Err(e),
        };

        let text = match period {
            ReportPeriod::Today => {
                format_report(&summary, "📊 Today's report:", "🔥 Largest expense")
            }
            ReportPeriod::Week => format_report(
                &summary,
                &format!("📅 Report for the last {} days:", self.config.week_days),
                "🔥 Largest expense of the week",
            ),
            ReportPeriod::Month => format_category_shares(
                &summary,
                &format!("📈 Categories for the last {} days:", self.config.month_days),
            ),
        };

        Ok(PeriodReport {
            period,
            text,
            summary: Some(summary),
        })
    }

    fn empty_period_text(&self, period: ReportPeriod) -> String {
        match period {
            ReportPeriod::Today => "You don't have any expenses today".to_string(),
            ReportPeriod::Week => format!(
                "You don't have any expenses in the last {} days",
                self.config.week_days
            ),
            ReportPeriod::Month => format!(
                "You don't have any expenses in the last {} days",
                self.config.month_days
            ),
        }
    }

    fn dispatch(&self, utterance: &Utterance) -> Result<OutboundMessage> {
        let (user, created) = self.db.ensure_user(
            utterance.user_id,
            &utterance.display_name,
            utterance.username.as_deref(),
        )?;
        let text = utterance.text.trim();
        debug!(user_id = user.id, state = %user.conversation_state, "Handling utterance");

        if let Some(period) = user.conversation_state.budget_period() {
            return self.handle_budget_entry(&user, period, text);
        }

        if created
            || user.conversation_state == ConversationState::AwaitingCurrencyChoice
            || !user.has_currency()
        {
            return self.handle_onboarding(&user, created, text);
        }

        match Command::parse(text) {
            Some(command) => self.handle_command(&user, command),
            None => self.handle_expense(&user, text),
        }
    }

    fn handle_budget_entry(
        &self,
        user: &User,
        period: BudgetPeriod,
        text: &str,
    ) -> Result<OutboundMessage> {
        if Command::parse(text) == Some(Command::Cancel) {
            self.db
                .set_conversation_state(user.id, ConversationState::Idle)?;
            return Ok(OutboundMessage::with_choices(
                "Budget setup cancelled.",
                ChoiceSet::MainMenu,
            ));
        }

        let limit = match parse_amount(text) {
            Ok(limit) if limit > 0.0 => limit,
            Ok(limit) => return Ok(budget_retry(&Error::NonPositiveAmount(limit), period)),
            Err(e) if e.is_user_error() => return Ok(budget_retry(&e, period)),
            Err(e) => return Err(e),
        };

        let mut update = period.update(limit);
        update.conversation_state = Some(ConversationState::Idle);
        let user = self.db.upsert_user(user.id, &update)?;
        info!(user_id = user.id, period = %period, limit, "Budget limit set");

        Ok(OutboundMessage::with_choices(
            format!(
                "✅ Your {} budget is set to {}",
                period,
                format_money(limit, &user.currency_symbol())
            ),
            ChoiceSet::MainMenu,
        ))
    }

    fn handle_onboarding(&self, user: &User, created: bool, text: &str) -> Result<OutboundMessage> {
        if created || user.conversation_state != ConversationState::AwaitingCurrencyChoice {
            self.db
                .set_conversation_state(user.id, ConversationState::AwaitingCurrencyChoice)?;
            return Ok(OutboundMessage::with_choices(
                format!(
                    "👋 Hello, {}! I'm Moneylytics, I help you keep track of your expenses.\n\
                     First, choose your currency:",
                    display_name(user)
                ),
                ChoiceSet::Currencies,
            ));
        }

        let token = match Command::parse(text) {
            Some(Command::Currency(Some(token))) => token,
            Some(_) => {
                return Ok(OutboundMessage::with_choices(
                    "Please choose your currency first:",
                    ChoiceSet::Currencies,
                ))
            }
            None => text.to_string(),
        };
        match currency::normalize(&token) {
            Ok(currency) => self.apply_currency(user, currency),
            Err(e @ Error::UnknownCurrency(_)) => Ok(OutboundMessage::with_choices(
                format!("{}\nPlease choose your currency:", e.user_message()),
                ChoiceSet::Currencies,
            )),
            Err(e) => Err(e),
        }
    }

    fn apply_currency(&self, user: &User, currency: Currency) -> Result<OutboundMessage> {
        let first_time = !user.has_currency();
        let update = UserUpdate {
            currency: Some(currency),
            conversation_state: Some(ConversationState::Idle),
            ..Default::default()
        };
        self.db.upsert_user(user.id, &update)?;
        info!(user_id = user.id, currency = %currency, "Currency set");

        let mut text = format!(
            "✅ Your currency is set to {} {}",
            currency.symbol(),
            currency.code()
        );
        if first_time {
            text.push_str("\n\n");
            text.push_str(USAGE_TIP);
        }
        Ok(OutboundMessage::with_choices(text, ChoiceSet::MainMenu))
    }

    fn handle_command(&self, user: &User, command: Command) -> Result<OutboundMessage> {
        debug!(user_id = user.id, ?command, "Command");
        let reply = match command {
            Command::Start => OutboundMessage::with_choices(
                format!(
                    "👋 Hello, {}! Send me your expenses and I'll keep the books.",
                    display_name(user)
                ),
                ChoiceSet::MainMenu,
            ),
            Command::Help => OutboundMessage::with_choices(HELP_TEXT, ChoiceSet::MainMenu),
            Command::Report(period) => {
                OutboundMessage::text(self.period_report(user.id, period)?.text)
            }
            Command::SetBudget(None) => OutboundMessage::with_choices(
                "Which budget do you want to set?",
                ChoiceSet::BudgetPeriods,
            ),
            Command::SetBudget(Some(period)) => {
                self.db
                    .set_conversation_state(user.id, period.awaiting_state())?;
                OutboundMessage::text(budget_prompt(period))
            }
            Command::ShowBudget => OutboundMessage::text(format_budget_limits(user)),
            Command::Settings => {
                OutboundMessage::with_choices("⚙️ Settings", ChoiceSet::Settings)
            }
            Command::Currency(None) => {
                OutboundMessage::with_choices("Choose your currency:", ChoiceSet::Currencies)
            }
            Command::Currency(Some(token)) => match currency::normalize(&token) {
                Ok(currency) => self.apply_currency(user, currency)?,
                Err(e @ Error::UnknownCurrency(_)) => {
                    OutboundMessage::with_choices(e.user_message(), ChoiceSet::Currencies)
                }
                Err(e) => return Err(e),
            },
            Command::Language => OutboundMessage::text("Language is under development 🚧"),
            Command::Cancel => OutboundMessage::text("Nothing to cancel"),
            Command::Unknown(name) => OutboundMessage::text(format!(
                "Unknown command {}. Send /help to see what I can do.",
                name
            )),
        };
        Ok(reply)
    }

    fn handle_expense(&self, user: &User, text: &str) -> Result<OutboundMessage> {
        let parsed = parse_expense(text, self.config.large_amount_threshold)?;
        let expense = self.db.append_expense(user.id, &parsed.expense)?;

        let mut reply = format!(
            "✅ {}, your expense has been saved: {} on {}",
            display_name(user),
            format_money(expense.amount, &user.currency_symbol()),
            expense.category
        );
        if let Some(advisory) = parsed.advisory {
            info!(user_id = user.id, amount = expense.amount, "Large amount accepted");
            reply.push('\n');
            reply.push_str(&advisory.message());
        }
        Ok(OutboundMessage::text(reply))
    }
}

fn display_name(user: &User) -> &str {
    if !user.first_name.is_empty() {
        &user.first_name
    } else {
        user.username.as_deref().unwrap_or("there")
    }
}

fn budget_prompt(period: BudgetPeriod) -> String {
    format!(
        "Send your {} budget limit as a number (e.g. 250), or /cancel",
        period
    )
}

fn budget_retry(e: &Error, period: BudgetPeriod) -> OutboundMessage {
    OutboundMessage::text(format!("{}\n{}", e.user_message(), budget_prompt(period)))
}

fn error_reply(user_id: i64, e: &Error) -> OutboundMessage {
    if e.is_user_error() {
        debug!(user_id, error = %e, "Rejected utterance");
    } else {
        error!(user_id, error = %e, "Failed to handle utterance");
    }
    OutboundMessage::text(e.user_message())
}
