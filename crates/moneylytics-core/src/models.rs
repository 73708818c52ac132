//! Domain models for Moneylytics

use chrono::{DateTime, Duration, LocalResult, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::error::{Error, Result};
use crate::currency::{self, Currency};

/// A chat user, keyed by the numeric id the transport supplies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub username: Option<String>,
    pub first_name: String,
    /// Canonical currency code, empty until the user picks one
    pub currency: Option<String>,
    pub daily_budget: Option<f64>,
    pub weekly_budget: Option<f64>,
    pub conversation_state: ConversationState,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn has_currency(&self) -> bool {
        self.currency.as_deref().is_some_and(|c| !c.trim().is_empty())
    }

    /// Display symbol for the user's currency ("" before onboarding finishes)
    pub fn currency_symbol(&self) -> String {
        match self.currency.as_deref() {
            Some(code) if !code.trim().is_empty() => currency::symbol_for(code),
            _ => String::new(),
        }
    }
}

/// Fields to merge into a user profile. `None` leaves the stored value untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserUpdate {
    pub first_name: Option<String>,
    pub username: Option<String>,
    pub currency: Option<Currency>,
    pub daily_budget: Option<f64>,
    pub weekly_budget: Option<f64>,
    pub conversation_state: Option<ConversationState>,
}

impl UserUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A stored expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// An expense before it is persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewExpense {
    pub amount: f64,
    pub category: String,
    pub description: Option<String>,
}

/// Where a user is in a multi-step conversation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ConversationState {
    #[default]
    #[serde(rename = "none")]
    Idle,
    AwaitingDailyBudget,
    AwaitingWeeklyBudget,
    AwaitingCurrencyChoice,
}

impl ConversationState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "none",
            Self::AwaitingDailyBudget => "awaiting_daily_budget",
            Self::AwaitingWeeklyBudget => "awaiting_weekly_budget",
            Self::AwaitingCurrencyChoice => "awaiting_currency_choice",
        }
    }

    /// Budget period this state is collecting a limit for, if any
    pub fn budget_period(&self) -> Option<BudgetPeriod> {
        match self {
            Self::AwaitingDailyBudget => Some(BudgetPeriod::Daily),
            Self::AwaitingWeeklyBudget => Some(BudgetPeriod::Weekly),
            _ => None,
        }
    }
}

impl std::str::FromStr for ConversationState {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" | "" => Ok(Self::Idle),
            "awaiting_daily_budget" => Ok(Self::AwaitingDailyBudget),
            "awaiting_weekly_budget" => Ok(Self::AwaitingWeeklyBudget),
            "awaiting_currency_choice" => Ok(Self::AwaitingCurrencyChoice),
            _ => Err(format!("Unknown conversation state: {}", s)),
        }
    }
}

impl std::fmt::Display for ConversationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Budget limit periods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BudgetPeriod {
    Daily,
    Weekly,
}

impl BudgetPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }

    /// State that collects the limit for this period
    pub fn awaiting_state(&self) -> ConversationState {
        match self {
            Self::Daily => ConversationState::AwaitingDailyBudget,
            Self::Weekly => ConversationState::AwaitingWeeklyBudget,
        }
    }

    /// Profile update that stores `limit` for this period
    pub fn update(&self, limit: f64) -> UserUpdate {
        match self {
            Self::Daily => UserUpdate {
                daily_budget: Some(limit),
                ..Default::default()
            },
            Self::Weekly => UserUpdate {
                weekly_budget: Some(limit),
                ..Default::default()
            },
        }
    }
}

impl std::str::FromStr for BudgetPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "weekly" | "week" => Ok(Self::Weekly),
            _ => Err(format!("Unknown budget period: {}", s)),
        }
    }
}

impl std::fmt::Display for BudgetPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Fixed report windows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    /// The current local calendar day
    Today,
    /// Trailing `week_days` days up to now
    Week,
    /// Trailing `month_days` days up to now (categories view)
    Month,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Inclusive `[start, end]` window for this period, computed from `now`
    ///
    /// "Today" uses the calendar day of `now`'s own time zone; the trailing
    /// windows are plain day offsets with no calendar logic. A trailing
    /// window reaching past the representable date range is `InvalidData`.
    pub fn window<Tz: TimeZone>(
        &self,
        now: DateTime<Tz>,
        config: &AppConfig,
    ) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
        let now_utc = now.with_timezone(&Utc);
        let window = match self {
            Self::Today => {
                let day = now.date_naive();
                let tz = now.timezone();
                // and_hms_opt only fails for out-of-range fields
                let start = day.and_hms_opt(0, 0, 0).unwrap_or_default();
                let end = day.and_hms_opt(23, 59, 59).unwrap_or_default();
                (local_to_utc(&tz, start), local_to_utc(&tz, end))
            }
            Self::Week => (trailing_start(now_utc, config.week_days)?, now_utc),
            Self::Month => (trailing_start(now_utc, config.month_days)?, now_utc),
        };
        Ok(window)
    }
}

fn trailing_start(now: DateTime<Utc>, days: i64) -> Result<DateTime<Utc>> {
    Duration::try_days(days)
        .and_then(|span| now.checked_sub_signed(span))
        .ok_or_else(|| {
            Error::InvalidData(format!("report window of {} days is out of range", days))
        })
}

/// Map a local wall-clock time to UTC, skipping forward over DST gaps
fn local_to_utc<Tz: TimeZone>(tz: &Tz, naive: NaiveDateTime) -> DateTime<Utc> {
    let mut candidate = naive;
    for _ in 0..4 {
        match tz.from_local_datetime(&candidate) {
            LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
                return dt.with_timezone(&Utc)
            }
            LocalResult::None => candidate += Duration::minutes(30),
        }
    }
    naive.and_utc()
}

impl std::str::FromStr for ReportPeriod {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "today" | "day" => Ok(Self::Today),
            "week" => Ok(Self::Week),
            "month" | "categories" => Ok(Self::Month),
            _ => Err(format!(
                "Unknown period: {}. Available: today, week, month",
                s
            )),
        }
    }
}

impl std::fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_conversation_state_round_trip() {
        for state in [
            ConversationState::Idle,
            ConversationState::AwaitingDailyBudget,
            ConversationState::AwaitingWeeklyBudget,
            ConversationState::AwaitingCurrencyChoice,
        ] {
            assert_eq!(state.as_str().parse::<ConversationState>().unwrap(), state);
        }
        assert!("waiting".parse::<ConversationState>().is_err());
    }

    #[test]
    fn test_today_window_uses_local_day() {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 3, 10, 1, 30, 0).unwrap();
        let (start, end) = ReportPeriod::Today
            .window(now, &AppConfig::default())
            .unwrap();

        // Local midnight at +02:00 is 22:00 UTC the previous day
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 9, 22, 0, 0).unwrap());
        assert_eq!(end, Utc.with_ymd_and_hms(2024, 3, 10, 21, 59, 59).unwrap());
    }

    #[test]
    fn test_trailing_windows() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let config = AppConfig::default();

        let (start, end) = ReportPeriod::Week.window(now, &config).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 24, 12, 0, 0).unwrap());
        assert_eq!(end, now);

        let (start, _) = ReportPeriod::Month.window(now, &config).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap());
    }

    #[test]
    fn test_trailing_window_out_of_range() {
        let now = Utc.with_ymd_and_hms(2024, 3, 31, 12, 0, 0).unwrap();
        let config = AppConfig {
            week_days: 1_000_000_000,
            month_days: i64::MAX,
            ..AppConfig::default()
        };

        assert!(matches!(
            ReportPeriod::Week.window(now, &config),
            Err(Error::InvalidData(_))
        ));
        assert!(matches!(
            ReportPeriod::Month.window(now, &config),
            Err(Error::InvalidData(_))
        ));
        assert!(ReportPeriod::Today.window(now, &config).is_ok());
    }

    #[test]
    fn test_budget_period_update_touches_one_field() {
        let update = BudgetPeriod::Weekly.update(100.0);
        assert_eq!(update.weekly_budget, Some(100.0));
        assert!(update.daily_budget.is_none());
        assert!(update.conversation_state.is_none());
    }

    #[test]
    fn test_user_currency_symbol() {
        let mut user = User {
            id: 1,
            username: None,
            first_name: "Ann".into(),
            currency: None,
            daily_budget: None,
            weekly_budget: None,
            conversation_state: ConversationState::Idle,
            created_at: Utc::now(),
        };
        assert!(!user.has_currency());
        assert_eq!(user.currency_symbol(), "");

        user.currency = Some("UAH".into());
        assert!(user.has_currency());
        assert_eq!(user.currency_symbol(), "₴");
    }
}
