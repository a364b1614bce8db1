use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Self-reported activity level, used to pick the TDEE multiplier and the
/// training block of the weekly plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    High,
    VeryHigh,
}

impl ActivityLevel {
    /// Match free text against the known level names, case-insensitively.
    /// Accepts the Portuguese names (with and without accents) and the
    /// English ones.
    pub fn from_text(text: &str) -> Option<Self> {
        match text.trim().to_lowercase().as_str() {
            "sedentario" | "sedentário" | "sedentary" => Some(Self::Sedentary),
            "leve" | "light" => Some(Self::Light),
            "moderado" | "moderate" => Some(Self::Moderate),
            "alto" | "high" => Some(Self::High),
            "muito alto" | "very high" | "very-high" => Some(Self::VeryHigh),
            _ => None,
        }
    }

    pub fn multiplier(self) -> f64 {
        match self {
            Self::Sedentary => 1.2,
            Self::Light => 1.375,
            Self::Moderate => 1.55,
            Self::High => 1.725,
            Self::VeryHigh => 1.9,
        }
    }
}

/// How the user wants to track intake.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Approach {
    /// Option A: count calories and macros in a tracking app.
    CalorieCounting,
    /// Option B: plate-portion method, no counting.
    PortionMethod,
}

impl Approach {
    /// Parse the `A`/`B` menu choice.
    pub fn from_choice(text: &str) -> Option<Self> {
        match text.trim().to_uppercase().as_str() {
            "A" => Some(Self::CalorieCounting),
            "B" => Some(Self::PortionMethod),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::CalorieCounting => "Contagem de calorias",
            Self::PortionMethod => "Método por porções",
        }
    }
}

/// The user's profile, filled in during onboarding.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct UserProfile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    /// Free text; only used to pick the BMR formula branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sex: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height_cm: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity_level: Option<ActivityLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dietary_restrictions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub physical_limitations: Option<String>,
    /// Total daily energy expenditure (kcal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tdee: Option<u32>,
    /// Daily deficit (kcal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_deficit: Option<u32>,
    /// Daily intake target (kcal)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub calorie_target: Option<u32>,
    /// Daily protein target (g)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protein_target_g: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub step_target: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approach: Option<Approach>,
}

/// One day of check-in data. Keyed by date; at most one per date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogEntry {
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight_kg: Option<f64>,
    /// Hours slept the previous night
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sleep_hours: Option<f64>,
    /// 0 = not hungry, 10 = starving
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hunger_level: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<String>,
    /// Meals for the day, newline-separated in logging order.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meal_log: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl LogEntry {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            weight_kg: None,
            sleep_hours: None,
            hunger_level: None,
            steps: None,
            mood: None,
            meal_log: None,
            notes: None,
        }
    }

    /// Add a meal to the day's log, keeping earlier meals.
    pub fn append_meal(&mut self, meal: &str) {
        self.meal_log = Some(match self.meal_log.take() {
            Some(prev) if !prev.is_empty() => format!("{}\n{}", prev, meal),
            _ => meal.to_string(),
        });
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}
