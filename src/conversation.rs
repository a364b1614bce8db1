//! The coaching conversation.
//!
//! [`advance`] is the turn function: it takes the current [`State`] and the
//! raw user text, applies validated input to the [`ProfileStore`] and returns
//! the assistant messages together with the next state. Invalid input never
//! changes state; the reply re-prompts instead. [`Session`] wraps it with the
//! state value, the transcript and the clock.

use std::fmt;
use std::str::FromStr;

use anyhow::Result;
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::commands::{Command, GoalField};
use crate::config::CoachConfig;
use crate::metrics::{targets_for_level, CALORIE_DEFICIT, DEFAULT_STEP_TARGET};
use crate::models::{ActivityLevel, Approach, LogEntry, Role, Turn, UserProfile};
use crate::report::build_report;
use crate::store::{FileStore, KeyValueStore, ProfileStore};
use crate::templates as text;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum State {
    // onboarding
    Age,
    Sex,
    Height,
    Weight,
    Goal,
    Activity,
    Restrictions,
    Limitations,
    ApproachChoice,
    /// Hub reached after onboarding; every flow returns here.
    Commands,
    // daily check-in
    CheckinWeight,
    CheckinSleep,
    CheckinHunger,
    CheckinSteps,
    CheckinMood,
    MealEntry,
    // goal review
    GoalReview,
    GoalPickField,
    GoalSetCalories,
    GoalSetProtein,
    GoalSetSteps,
    GoalSetApproach,
}

impl State {
    pub fn name(self) -> &'static str {
        match self {
            Self::Age => "age",
            Self::Sex => "sex",
            Self::Height => "height",
            Self::Weight => "weight",
            Self::Goal => "goal",
            Self::Activity => "activity",
            Self::Restrictions => "restrictions",
            Self::Limitations => "limitations",
            Self::ApproachChoice => "approach-choice",
            Self::Commands => "commands",
            Self::CheckinWeight => "checkin-weight",
            Self::CheckinSleep => "checkin-sleep",
            Self::CheckinHunger => "checkin-hunger",
            Self::CheckinSteps => "checkin-steps",
            Self::CheckinMood => "checkin-mood",
            Self::MealEntry => "meal-entry",
            Self::GoalReview => "goal-review",
            Self::GoalPickField => "goal-pick-field",
            Self::GoalSetCalories => "goal-set-calories",
            Self::GoalSetProtein => "goal-set-protein",
            Self::GoalSetSteps => "goal-set-steps",
            Self::GoalSetApproach => "goal-set-approach",
        }
    }

    pub fn is_onboarding(self) -> bool {
        matches!(
            self,
            Self::Age
                | Self::Sex
                | Self::Height
                | Self::Weight
                | Self::Goal
                | Self::Activity
                | Self::Restrictions
                | Self::Limitations
                | Self::ApproachChoice
        )
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A write made to the backing store during a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    ProfileSaved,
    LogsSaved,
}

/// Outcome of one user turn.
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    /// Assistant messages, in order. Usually one; the weekly plan sends two.
    pub messages: Vec<String>,
    /// State after the turn.
    pub state: State,
    pub effects: Vec<Effect>,
}

impl Reply {
    /// No messages and no writes; the conversation stays in `state`.
    fn unchanged(state: State) -> Self {
        Self {
            messages: Vec::new(),
            state,
            effects: Vec::new(),
        }
    }

    /// All messages joined by newlines.
    pub fn text(&self) -> String {
        self.messages.join("\n")
    }
}

/// Store access for a single turn, recording which writes happened.
struct TurnCtx<'a, S> {
    data: &'a mut ProfileStore<S>,
    today: NaiveDate,
    effects: Vec<Effect>,
}

impl<S: KeyValueStore> TurnCtx<'_, S> {
    fn profile(&self) -> &UserProfile {
        self.data.profile()
    }

    fn save_profile(&mut self, f: impl FnOnce(&mut UserProfile)) -> Result<()> {
        self.data.update_profile(f)?;
        self.effects.push(Effect::ProfileSaved);
        Ok(())
    }

    fn save_today(&mut self, f: impl FnOnce(&mut LogEntry)) -> Result<()> {
        self.data.update_log(self.today, f)?;
        self.effects.push(Effect::LogsSaved);
        Ok(())
    }

    fn today(&self) -> Option<&LogEntry> {
        self.data.log_for(self.today)
    }

    fn reply(self, state: State, messages: Vec<String>) -> Reply {
        Reply {
            messages,
            state,
            effects: self.effects,
        }
    }

    fn go(self, state: State, message: impl Into<String>) -> Reply {
        self.reply(state, vec![message.into()])
    }
}

fn parse_in<T>(input: &str, min: T, max: T) -> Option<T>
where
    T: FromStr + PartialOrd,
{
    input.parse::<T>().ok().filter(|v| *v >= min && *v <= max)
}

/// Finite float, accepting a decimal comma.
fn parse_float(input: &str) -> Option<f64> {
    input
        .replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn parse_float_in(input: &str, min: f64, max: f64) -> Option<f64> {
    parse_float(input).filter(|v| (min..=max).contains(v))
}

/// The state and greeting a session starts with.
pub fn initial_state(has_saved_profile: bool) -> (State, &'static str) {
    if has_saved_profile {
        (State::Commands, text::WELCOME_BACK)
    } else {
        (State::Age, text::INTRO)
    }
}

/// Process one user input in `state`. `input` is trimmed here, and blank input
/// is a no-op: no messages, same state, nothing written. Only store failures
/// are returned as errors.
pub fn advance<S: KeyValueStore>(
    state: State,
    input: &str,
    data: &mut ProfileStore<S>,
    today: NaiveDate,
) -> Result<Reply> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(Reply::unchanged(state));
    }
    let ctx = TurnCtx {
        data,
        today,
        effects: Vec::new(),
    };

    let reply = step(state, ctx, input)?;

    if reply.state == state {
        debug!(state = %state, effects = reply.effects.len(), "stayed in state");
    } else {
        debug!(from = %state, to = %reply.state, "transition");
    }
    Ok(reply)
}

/// One turn in `state`, with every state handled in place.
fn step<S: KeyValueStore>(
    state: State,
    mut ctx: TurnCtx<'_, S>,
    input: &str,
) -> Result<Reply> {
    Ok(match state {
        // onboarding
        State::Age => match parse_in::<u32>(input, 10, 100) {
            Some(age) => {
                ctx.save_profile(|p| p.age = Some(age))?;
                ctx.go(State::Sex, text::ASK_SEX)
            }
            None => ctx.go(State::Age, text::INVALID_AGE),
        },
        State::Sex => {
            ctx.save_profile(|p| p.sex = Some(input.to_string()))?;
            ctx.go(State::Height, text::ASK_HEIGHT)
        }
        State::Height => match parse_in::<u32>(input, 100, 250) {
            Some(height) => {
                ctx.save_profile(|p| p.height_cm = Some(height))?;
                ctx.go(State::Weight, text::ASK_WEIGHT)
            }
            None => ctx.go(State::Height, text::INVALID_HEIGHT),
        },
        State::Weight => match parse_float_in(input, 30.0, 300.0) {
            Some(weight) => {
                ctx.save_profile(|p| p.weight_kg = Some(weight))?;
                ctx.go(State::Goal, text::ASK_GOAL)
            }
            None => ctx.go(State::Weight, text::INVALID_WEIGHT),
        },
        State::Goal => {
            ctx.save_profile(|p| p.goal = Some(input.to_string()))?;
            ctx.go(State::Activity, text::ASK_ACTIVITY)
        }
        State::Activity => match ActivityLevel::from_text(input) {
            // "muito alto" has a multiplier but is not offered here
            Some(level) if level != ActivityLevel::VeryHigh => {
                ctx.save_profile(|p| p.activity_level = Some(level))?;
                ctx.go(State::Restrictions, text::ASK_RESTRICTIONS)
            }
            _ => ctx.go(State::Activity, text::INVALID_ACTIVITY),
        },
        State::Restrictions => {
            ctx.save_profile(|p| p.dietary_restrictions = Some(input.to_string()))?;
            ctx.go(State::Limitations, text::ASK_LIMITATIONS)
        }
        State::Limitations => complete_onboarding(ctx, input)?,
        State::ApproachChoice => match Approach::from_choice(input) {
            Some(approach) => {
                ctx.save_profile(|p| p.approach = Some(approach))?;
                let message = text::approach_chosen(approach, ctx.profile());
                ctx.go(State::Commands, message)
            }
            None => ctx.go(State::ApproachChoice, text::INVALID_APPROACH),
        },
        State::Commands => dispatch(ctx, input)?,
        // daily log
        State::CheckinWeight => match parse_float(input) {
            Some(weight) => {
                ctx.save_today(|e| e.weight_kg = Some(weight))?;
                ctx.go(State::CheckinSleep, text::ASK_SLEEP)
            }
            None => ctx.go(State::CheckinWeight, text::INVALID_CHECKIN_WEIGHT),
        },
        State::CheckinSleep => match parse_float_in(input, 0.0, 24.0) {
            Some(hours) => {
                ctx.save_today(|e| e.sleep_hours = Some(hours))?;
                ctx.go(State::CheckinHunger, text::ASK_HUNGER)
            }
            None => ctx.go(State::CheckinSleep, text::INVALID_SLEEP),
        },
        State::CheckinHunger => match parse_in::<u8>(input, 0, 10) {
            Some(hunger) => {
                ctx.save_today(|e| e.hunger_level = Some(hunger))?;
                ctx.go(State::CheckinSteps, text::ASK_STEPS)
            }
            None => ctx.go(State::CheckinHunger, text::INVALID_HUNGER),
        },
        State::CheckinSteps => match input.parse::<u64>() {
            Ok(steps) => {
                ctx.save_today(|e| e.steps = Some(steps))?;
                ctx.go(State::CheckinMood, text::ASK_MOOD)
            }
            Err(_) => ctx.go(State::CheckinSteps, text::INVALID_STEPS),
        },
        State::CheckinMood => {
            ctx.save_today(|e| e.mood = Some(input.to_string()))?;
            let feedback = ctx.today().map(text::checkin_feedback).unwrap_or_default();
            ctx.go(State::Commands, feedback)
        }
        State::MealEntry => {
            ctx.save_today(|e| e.append_meal(input))?;
            ctx.go(State::Commands, text::MEAL_SAVED)
        }
        // goal review
        State::GoalReview => {
            if input.to_lowercase().contains("sim") {
                ctx.go(State::GoalPickField, text::PICK_GOAL_FIELD)
            } else {
                ctx.go(State::Commands, text::GOALS_KEPT)
            }
        }
        State::GoalPickField => match GoalField::pick(input) {
            Some(GoalField::Calories) => {
                let prompt = text::current_goal(ctx.profile().calorie_target, " kcal", 1800);
                ctx.go(State::GoalSetCalories, prompt)
            }
            Some(GoalField::Protein) => {
                let prompt = text::current_goal(ctx.profile().protein_target_g, "g", 120);
                ctx.go(State::GoalSetProtein, prompt)
            }
            Some(GoalField::Steps) => {
                let prompt = text::current_goal(ctx.profile().step_target, "", 10000);
                ctx.go(State::GoalSetSteps, prompt)
            }
            Some(GoalField::Approach) => ctx.go(State::GoalSetApproach, text::PICK_APPROACH),
            None => ctx.go(State::GoalPickField, text::INVALID_GOAL_FIELD),
        },
        State::GoalSetCalories => match parse_in::<u32>(input, 1000, 4000) {
            Some(kcal) => {
                ctx.save_profile(|p| p.calorie_target = Some(kcal))?;
                info!(calorie_target = kcal, "goal updated");
                ctx.go(State::Commands, text::goal_updated(kcal, " kcal"))
            }
            None => ctx.go(State::GoalSetCalories, text::INVALID_CALORIE_GOAL),
        },
        State::GoalSetProtein => match parse_in::<u32>(input, 50, 300) {
            Some(grams) => {
                ctx.save_profile(|p| p.protein_target_g = Some(grams))?;
                info!(protein_target = grams, "goal updated");
                ctx.go(State::Commands, text::goal_updated(grams, "g"))
            }
            None => ctx.go(State::GoalSetProtein, text::INVALID_PROTEIN_GOAL),
        },
        State::GoalSetSteps => match parse_in::<u32>(input, 1000, 30000) {
            Some(steps) => {
                ctx.save_profile(|p| p.step_target = Some(steps))?;
                info!(step_target = steps, "goal updated");
                ctx.go(State::Commands, text::goal_updated(steps, " passos"))
            }
            None => ctx.go(State::GoalSetSteps, text::INVALID_STEP_GOAL),
        },
        State::GoalSetApproach => match Approach::from_choice(input) {
            Some(approach) => {
                ctx.save_profile(|p| p.approach = Some(approach))?;
                info!(?approach, "goal updated");
                ctx.go(State::Commands, text::approach_updated(approach))
            }
            None => ctx.go(State::GoalSetApproach, text::INVALID_APPROACH_GOAL),
        },
    })
}

/// First onboarding state whose answer is missing from the profile.
fn missing_answer(profile: &UserProfile) -> Option<(State, &'static str)> {
    if profile.age.is_none() {
        Some((State::Age, text::INTRO))
    } else if profile.height_cm.is_none() {
        Some((State::Height, text::ASK_HEIGHT))
    } else if profile.weight_kg.is_none() {
        Some((State::Weight, text::ASK_WEIGHT))
    } else if profile.activity_level.is_none() {
        Some((State::Activity, text::ASK_ACTIVITY))
    } else {
        None
    }
}

/// Store the limitations answer and derive the energy targets.
fn complete_onboarding<S: KeyValueStore>(
    mut ctx: TurnCtx<'_, S>,
    input: &str,
) -> Result<Reply> {
    ctx.save_profile(|p| p.physical_limitations = Some(input.to_string()))?;

    let profile = ctx.profile();
    let (Some(weight), Some(height), Some(age), Some(level)) = (
        profile.weight_kg,
        profile.height_cm,
        profile.age,
        profile.activity_level,
    ) else {
        // Only reachable with a hand-edited store; ask again for what is missing.
        let (state, prompt) = missing_answer(profile).unwrap_or((State::Age, text::INTRO));
        return Ok(ctx.go(state, prompt));
    };
    let sex = profile.sex.clone().unwrap_or_else(|| "masculino".to_string());
    let targets = targets_for_level(weight, height, age, &sex, level);

    ctx.save_profile(|p| {
        p.tdee = Some(targets.tdee);
        p.calorie_deficit = Some(CALORIE_DEFICIT);
        p.calorie_target = Some(targets.calorie_target);
        p.protein_target_g = Some(targets.protein_target);
        p.step_target = Some(DEFAULT_STEP_TARGET);
    })?;
    info!(
        tdee = targets.tdee,
        calorie_target = targets.calorie_target,
        protein_target = targets.protein_target,
        "onboarding complete"
    );

    let message = text::onboarding_summary(
        targets.tdee,
        targets.calorie_target,
        targets.protein_target,
    );
    Ok(ctx.go(State::ApproachChoice, message))
}

fn dispatch<S: KeyValueStore>(ctx: TurnCtx<'_, S>, input: &str) -> Result<Reply> {
    let Some(command) = Command::parse(input) else {
        debug!(input, "unrecognized command");
        return Ok(ctx.go(State::Commands, text::UNKNOWN_COMMAND));
    };

    Ok(match command {
        Command::Help => ctx.go(State::Commands, text::HELP),
        Command::CheckIn => ctx.go(State::CheckinWeight, text::CHECKIN_START),
        Command::LogMeal => ctx.go(State::MealEntry, text::MEAL_START),
        Command::WeeklyPlan => {
            let plan = text::weekly_plan(ctx.profile());
            ctx.reply(State::Commands, vec![plan, text::PLAN_NEXT_STEP.to_string()])
        }
        Command::ShoppingList => ctx.go(State::Commands, text::shopping_list()),
        Command::Report => {
            let report = build_report(ctx.data.logs());
            ctx.go(State::Commands, report)
        }
        Command::ReviewGoals => {
            let summary = text::goal_summary(ctx.profile());
            ctx.go(State::GoalReview, summary)
        }
    })
}

/// A single user's conversation: current state, data and transcript.
pub struct Session<S> {
    data: ProfileStore<S>,
    state: State,
    transcript: Vec<Turn>,
}

impl Session<FileStore> {
    /// Open a session persisted under `config.data_dir`.
    pub fn open(config: &CoachConfig) -> Result<Self> {
        let store = FileStore::new(&config.data_dir)?;
        let data = ProfileStore::load_with_keys(store, &config.profile_key, &config.logs_key)?;
        Ok(Self::from_data(data))
    }
}

impl<S: KeyValueStore> Session<S> {
    /// Load saved data from `store` and greet the user.
    pub fn start(store: S) -> Result<Self> {
        Ok(Self::from_data(ProfileStore::load(store)?))
    }

    pub fn from_data(data: ProfileStore<S>) -> Self {
        let (state, greeting) = initial_state(data.has_saved_profile());
        Self {
            data,
            state,
            transcript: vec![Turn {
                role: Role::Assistant,
                text: greeting.to_string(),
            }],
        }
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn profile(&self) -> &UserProfile {
        self.data.profile()
    }

    pub fn logs(&self) -> &[LogEntry] {
        self.data.logs()
    }

    pub fn transcript(&self) -> &[Turn] {
        &self.transcript
    }

    pub fn into_store(self) -> S {
        self.data.into_inner()
    }

    /// Submit user text, logging into today's (UTC) entry.
    pub fn submit(&mut self, input: &str) -> Result<Reply> {
        self.submit_on(Utc::now().date_naive(), input)
    }

    /// Submit user text with an explicit date for log writes. Blank input is
    /// ignored and returns an empty reply.
    pub fn submit_on(&mut self, today: NaiveDate, input: &str) -> Result<Reply> {
        // nothing goes into the transcript either
        if input.trim().is_empty() {
            return Ok(Reply::unchanged(self.state));
        }

        self.transcript.push(Turn {
            role: Role::User,
            text: input.to_string(),
        });
        let reply = advance(self.state, input, &mut self.data, today)?;
        self.state = reply.state;
        self.transcript
            .extend(reply.messages.iter().map(|m| Turn {
                role: Role::Assistant,
                text: m.clone(),
            }));
        Ok(reply)
    }
}
