use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use lean_coach::conversation::{advance, Effect};
use lean_coach::models::{Role, Turn};
use lean_coach::store::{LOGS_KEY, PROFILE_KEY};
use lean_coach::templates;
use lean_coach::{
    build_report, Approach, CoachConfig, KeyValueStore, LogEntry, MemoryStore, ProfileStore,
    Session, State, UserProfile,
};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, d).unwrap()
}

fn fresh_session() -> Session<MemoryStore> {
    Session::start(MemoryStore::new()).unwrap()
}

/// Walk a fresh session through onboarding up to (not including) `limitations`.
fn answer_until_limitations(session: &mut Session<MemoryStore>) {
    for input in ["30", "masculino", "175", "70", "perder 8kg", "moderado", "não"] {
        session.submit_on(day(1), input).unwrap();
    }
    assert_eq!(session.state(), State::Limitations);
}

fn onboarded_session() -> Session<MemoryStore> {
    let mut session = fresh_session();
    answer_until_limitations(&mut session);
    session.submit_on(day(1), "nenhuma").unwrap();
    session.submit_on(day(1), "a").unwrap();
    assert_eq!(session.state(), State::Commands);
    session
}

#[test]
fn new_user_starts_onboarding_with_intro() {
    let session = fresh_session();
    assert_eq!(session.state(), State::Age);
    assert!(session.state().is_onboarding());
    assert_eq!(
        session.transcript(),
        &[Turn {
            role: Role::Assistant,
            text: templates::INTRO.to_string()
        }]
    );
}

#[test]
fn saved_profile_starts_at_commands() {
    let mut kv = MemoryStore::new();
    kv.set(PROFILE_KEY, r#"{"age":41,"weight_kg":90.0}"#).unwrap();

    let session = Session::start(kv).unwrap();
    assert_eq!(session.state(), State::Commands);
    assert_eq!(session.profile().age, Some(41));
    assert_eq!(session.transcript()[0].text, templates::WELCOME_BACK);
}

#[test]
fn age_accepts_whole_range_and_rejects_the_rest() {
    for age in [10u32, 55, 100] {
        let mut session = fresh_session();
        let reply = session.submit_on(day(1), &age.to_string()).unwrap();
        assert_eq!(reply.state, State::Sex);
        assert_eq!(session.profile().age, Some(age));
        assert_eq!(reply.effects, vec![Effect::ProfileSaved]);
    }

    for bad in ["9", "101", "abc", "30.5", "-20"] {
        let mut session = fresh_session();
        let reply = session.submit_on(day(1), bad).unwrap();
        assert_eq!(reply.state, State::Age, "input {bad:?}");
        assert_eq!(reply.messages, vec![templates::INVALID_AGE.to_string()]);
        assert!(reply.effects.is_empty());
        assert_eq!(session.profile().age, None);
    }
}

#[test]
fn onboarding_bounds_are_enforced_without_clamping() {
    let mut session = fresh_session();
    session.submit_on(day(1), "30").unwrap();
    session.submit_on(day(1), "feminino").unwrap();

    assert_eq!(session.submit_on(day(1), "99").unwrap().state, State::Height);
    assert_eq!(session.submit_on(day(1), "251").unwrap().state, State::Height);
    assert_eq!(session.submit_on(day(1), "165").unwrap().state, State::Weight);

    assert_eq!(session.submit_on(day(1), "29.9").unwrap().state, State::Weight);
    assert_eq!(session.submit_on(day(1), "NaN").unwrap().state, State::Weight);
    assert_eq!(session.submit_on(day(1), "62,5").unwrap().state, State::Goal);
    assert_eq!(session.profile().weight_kg, Some(62.5));
    assert_eq!(session.profile().height_cm, Some(165));
}

type StoredValue = fn(&ProfileStore<MemoryStore>) -> Option<f64>;

fn stored_height(data: &ProfileStore<MemoryStore>) -> Option<f64> {
    data.profile().height_cm.map(f64::from)
}

fn stored_weight(data: &ProfileStore<MemoryStore>) -> Option<f64> {
    data.profile().weight_kg
}

fn stored_sleep(data: &ProfileStore<MemoryStore>) -> Option<f64> {
    data.log_for(day(1)).and_then(|e| e.sleep_hours)
}

fn stored_hunger(data: &ProfileStore<MemoryStore>) -> Option<f64> {
    data.log_for(day(1)).and_then(|e| e.hunger_level).map(f64::from)
}

fn stored_calories(data: &ProfileStore<MemoryStore>) -> Option<f64> {
    data.profile().calorie_target.map(f64::from)
}

fn stored_protein(data: &ProfileStore<MemoryStore>) -> Option<f64> {
    data.profile().protein_target_g.map(f64::from)
}

fn stored_step_goal(data: &ProfileStore<MemoryStore>) -> Option<f64> {
    data.profile().step_target.map(f64::from)
}

#[test]
fn numeric_bounds_are_inclusive() {
    let cases: [(State, State, StoredValue, [&str; 2], [&str; 2]); 7] = [
        (State::Height, State::Weight, stored_height, ["100", "250"], ["99", "251"]),
        (State::Weight, State::Goal, stored_weight, ["30", "300"], ["29.9", "300.1"]),
        (State::CheckinSleep, State::CheckinHunger, stored_sleep, ["0", "24"], ["-0.1", "24.1"]),
        (State::CheckinHunger, State::CheckinSteps, stored_hunger, ["0", "10"], ["-1", "11"]),
        (
            State::GoalSetCalories,
            State::Commands,
            stored_calories,
            ["1000", "4000"],
            ["999", "4001"],
        ),
        (State::GoalSetProtein, State::Commands, stored_protein, ["50", "300"], ["49", "301"]),
        (
            State::GoalSetSteps,
            State::Commands,
            stored_step_goal,
            ["1000", "30000"],
            ["999", "30001"],
        ),
    ];

    for (state, next, read, accepted, rejected) in cases {
        for input in accepted {
            let mut data = ProfileStore::load(MemoryStore::new()).unwrap();
            let reply = advance(state, input, &mut data, day(1)).unwrap();
            assert_eq!(reply.state, next, "{state} {input:?}");
            assert_eq!(read(&data), Some(input.parse::<f64>().unwrap()), "{state} {input:?}");
        }
        for input in rejected {
            let mut data = ProfileStore::load(MemoryStore::new()).unwrap();
            let reply = advance(state, input, &mut data, day(1)).unwrap();
            assert_eq!(reply.state, state, "{state} {input:?}");
            assert!(reply.effects.is_empty(), "{state} {input:?}");
            assert_eq!(read(&data), None, "{state} {input:?}");
        }
    }
}

#[test]
fn activity_accepts_accent_variants_only_from_the_offered_set() {
    let mut session = fresh_session();
    for input in ["30", "m", "170", "80", "saúde"] {
        session.submit_on(day(1), input).unwrap();
    }
    assert_eq!(session.state(), State::Activity);

    let reply = session.submit_on(day(1), "muito alto").unwrap();
    assert_eq!(reply.state, State::Activity);
    assert_eq!(reply.messages[0], templates::INVALID_ACTIVITY);

    let reply = session.submit_on(day(1), "Sedentário").unwrap();
    assert_eq!(reply.state, State::Restrictions);
}

#[test]
fn derived_targets_are_set_when_limitations_are_answered() {
    let mut session = fresh_session();
    answer_until_limitations(&mut session);

    let before = session.profile();
    assert_eq!(before.tdee, None);
    assert_eq!(before.calorie_target, None);
    assert_eq!(before.protein_target_g, None);

    let reply = session.submit_on(day(1), "joelho operado").unwrap();
    assert_eq!(reply.state, State::ApproachChoice);
    assert!(reply.messages[0].contains("~2556 kcal"));

    let p = session.profile();
    assert_eq!(p.tdee, Some(2556));
    assert_eq!(p.calorie_deficit, Some(400));
    assert_eq!(p.calorie_target, Some(2156));
    assert_eq!(p.protein_target_g, Some(112));
    assert_eq!(p.step_target, Some(8000));
    assert_eq!(p.physical_limitations.as_deref(), Some("joelho operado"));
}

#[test]
fn approach_choice_is_case_insensitive() {
    let mut session = fresh_session();
    answer_until_limitations(&mut session);
    session.submit_on(day(1), "não").unwrap();

    assert_eq!(session.submit_on(day(1), "c").unwrap().state, State::ApproachChoice);
    let reply = session.submit_on(day(1), "b").unwrap();
    assert_eq!(reply.state, State::Commands);
    assert!(reply.messages[0].contains("MÉTODO POR PORÇÕES"));
    assert_eq!(session.profile().approach, Some(Approach::PortionMethod));
}

#[test]
fn command_dispatch_ignores_case_and_whitespace() {
    let mut a = onboarded_session();
    let mut b = onboarded_session();
    let ra = a.submit_on(day(2), "  CHECKIN  ").unwrap();
    let rb = b.submit_on(day(2), "checkin").unwrap();
    assert_eq!(ra, rb);
    assert_eq!(ra.state, State::CheckinWeight);
}

#[test]
fn unknown_command_keeps_state() {
    let mut session = onboarded_session();
    let reply = session.submit_on(day(2), "dieta").unwrap();
    assert_eq!(reply.state, State::Commands);
    assert_eq!(reply.messages, vec![templates::UNKNOWN_COMMAND.to_string()]);
}

#[test]
fn blank_input_is_ignored() {
    let mut session = fresh_session();
    let reply = session.submit_on(day(1), "   ").unwrap();
    assert!(reply.messages.is_empty());
    assert_eq!(session.state(), State::Age);
    assert_eq!(session.transcript().len(), 1);
}

#[test]
fn blank_input_is_a_no_op_for_advance() {
    let mut data = ProfileStore::load(MemoryStore::new()).unwrap();
    let reply = advance(State::Sex, "   ", &mut data, day(1)).unwrap();
    assert_eq!(reply.state, State::Sex);
    assert!(reply.messages.is_empty());
    assert!(reply.effects.is_empty());
    assert_eq!(data.profile().sex, None);
    assert_eq!(data.into_inner().get(PROFILE_KEY).unwrap(), None);
}

#[test]
fn checkin_records_one_entry_and_gives_feedback() {
    let mut session = onboarded_session();
    session.submit_on(day(2), "checkin").unwrap();

    assert_eq!(session.submit_on(day(2), "x").unwrap().state, State::CheckinWeight);
    assert_eq!(session.submit_on(day(2), "69.4").unwrap().state, State::CheckinSleep);
    assert_eq!(session.submit_on(day(2), "25").unwrap().state, State::CheckinSleep);
    assert_eq!(session.submit_on(day(2), "6").unwrap().state, State::CheckinHunger);
    assert_eq!(session.submit_on(day(2), "11").unwrap().state, State::CheckinHunger);
    assert_eq!(session.submit_on(day(2), "8").unwrap().state, State::CheckinSteps);
    assert_eq!(session.submit_on(day(2), "muitos").unwrap().state, State::CheckinSteps);
    assert_eq!(session.submit_on(day(2), "3000").unwrap().state, State::CheckinMood);

    let reply = session.submit_on(day(2), "cansado").unwrap();
    assert_eq!(reply.state, State::Commands);
    assert_eq!(reply.effects, vec![Effect::LogsSaved]);
    let feedback = &reply.messages[0];
    assert!(feedback.contains("Fome alta"));
    assert!(feedback.contains("Sono abaixo do ideal"));
    assert!(feedback.contains("Poucos passos"));

    assert_eq!(session.logs().len(), 1);
    let entry = &session.logs()[0];
    assert_eq!(entry.date, day(2));
    assert_eq!(entry.weight_kg, Some(69.4));
    assert_eq!(entry.sleep_hours, Some(6.0));
    assert_eq!(entry.hunger_level, Some(8));
    assert_eq!(entry.steps, Some(3000));
    assert_eq!(entry.mood.as_deref(), Some("cansado"));
}

#[test]
fn meals_accumulate_per_date() {
    let mut session = onboarded_session();
    for (date, meal) in [(day(3), "ovos"), (day(3), "frango com arroz"), (day(4), "iogurte")] {
        assert_eq!(session.submit_on(date, "refeicao").unwrap().state, State::MealEntry);
        let reply = session.submit_on(date, meal).unwrap();
        assert_eq!(reply.state, State::Commands);
    }

    let logs = session.logs();
    assert_eq!(logs.len(), 2);
    assert_eq!(logs[0].meal_log.as_deref(), Some("ovos\nfrango com arroz"));
    assert_eq!(logs[1].meal_log.as_deref(), Some("iogurte"));
}

#[test]
fn checkin_after_meal_keeps_the_meal() {
    let mut session = onboarded_session();
    session.submit_on(day(5), "refeição").unwrap();
    session.submit_on(day(5), "salada").unwrap();
    session.submit_on(day(5), "checkin").unwrap();
    session.submit_on(day(5), "70").unwrap();

    assert_eq!(session.logs().len(), 1);
    assert_eq!(session.logs()[0].meal_log.as_deref(), Some("salada"));
    assert_eq!(session.logs()[0].weight_kg, Some(70.0));
}

#[test]
fn weekly_plan_sends_two_messages_keyed_by_activity() {
    let mut session = onboarded_session();
    let reply = session.submit_on(day(2), "Plano Semana").unwrap();
    assert_eq!(reply.state, State::Commands);
    assert_eq!(reply.messages.len(), 2);
    assert!(reply.messages[0].contains("HIIT 20min"));
    assert!(reply.messages[0].contains("✓ 8000 passos"));
    assert_eq!(reply.messages[1], templates::PLAN_NEXT_STEP);
    let text = reply.text();
    assert!(text.contains("HIIT 20min"));
    assert!(text.ends_with(templates::PLAN_NEXT_STEP));

    // user turn + two assistant turns
    let tail = &session.transcript()[session.transcript().len() - 3..];
    assert_eq!(tail[0].role, Role::User);
    assert_eq!(tail[1].role, Role::Assistant);
    assert_eq!(tail[2].role, Role::Assistant);
}

#[test]
fn report_and_shopping_list_stay_in_commands() {
    let mut session = onboarded_session();
    let reply = session.submit_on(day(2), "relatório").unwrap();
    assert_eq!(reply.messages[0], build_report(&[]));

    let reply = session.submit_on(day(2), "lista compras").unwrap();
    assert_eq!(reply.state, State::Commands);
    assert!(reply.messages[0].starts_with("🛒 LISTA DE COMPRAS"));
}

#[test]
fn steady_loss_week_has_no_hunger_or_sleep_advice() {
    let weights = [80.0, 79.5, 79.0, 78.5, 78.3, 78.2, 78.0];
    let logs: Vec<LogEntry> = weights
        .iter()
        .zip(1..)
        .map(|(&weight, d)| {
            let mut entry = LogEntry::new(day(d));
            entry.weight_kg = Some(weight);
            entry.hunger_level = Some(if d % 2 == 0 { 7 } else { 5 });
            entry.sleep_hours = Some(if d % 2 == 0 { 7.0 } else { 8.5 });
            entry
        })
        .collect();

    let report = build_report(&logs);
    assert!(report.contains("• Média: 78.8 kg"));
    assert!(report.contains("• Variação: -2.0 kg"));
    assert!(report.contains("• Check-ins: 7"));
    assert!(report.contains("Ótimo progresso"));
    assert!(!report.contains("Fome alta"));
    assert!(!report.contains("Sono abaixo"));
}

#[test]
fn goal_review_edits_each_target_within_bounds() {
    let mut session = onboarded_session();

    let reply = session.submit_on(day(2), "meta").unwrap();
    assert_eq!(reply.state, State::GoalReview);
    assert!(reply.messages[0].contains("Meta calórica: 2156 kcal/dia"));
    assert!(reply.messages[0].contains("(~1.6g/kg)"));

    assert_eq!(session.submit_on(day(2), "sim").unwrap().state, State::GoalPickField);
    assert_eq!(session.submit_on(day(2), "sono").unwrap().state, State::GoalPickField);
    assert_eq!(session.submit_on(day(2), "calorias").unwrap().state, State::GoalSetCalories);
    assert_eq!(session.submit_on(day(2), "999").unwrap().state, State::GoalSetCalories);
    assert_eq!(session.submit_on(day(2), "1800").unwrap().state, State::Commands);
    assert_eq!(session.profile().calorie_target, Some(1800));

    session.submit_on(day(2), "meta").unwrap();
    session.submit_on(day(2), "Sim, quero").unwrap();
    session.submit_on(day(2), "proteína").unwrap();
    assert_eq!(session.submit_on(day(2), "301").unwrap().state, State::GoalSetProtein);
    session.submit_on(day(2), "130").unwrap();
    assert_eq!(session.profile().protein_target_g, Some(130));

    session.submit_on(day(2), "meta").unwrap();
    session.submit_on(day(2), "sim").unwrap();
    session.submit_on(day(2), "passos").unwrap();
    assert_eq!(session.submit_on(day(2), "500").unwrap().state, State::GoalSetSteps);
    session.submit_on(day(2), "12000").unwrap();
    assert_eq!(session.profile().step_target, Some(12000));

    session.submit_on(day(2), "meta").unwrap();
    session.submit_on(day(2), "sim").unwrap();
    session.submit_on(day(2), "abordagem").unwrap();
    assert_eq!(session.submit_on(day(2), "x").unwrap().state, State::GoalSetApproach);
    session.submit_on(day(2), "B").unwrap();
    assert_eq!(session.profile().approach, Some(Approach::PortionMethod));

    // derived targets are not recomputed by edits
    assert_eq!(session.profile().tdee, Some(2556));
}

#[test]
fn declining_goal_review_returns_to_commands() {
    let mut session = onboarded_session();
    session.submit_on(day(2), "meta").unwrap();
    let reply = session.submit_on(day(2), "não").unwrap();
    assert_eq!(reply.state, State::Commands);
    assert_eq!(reply.messages[0], templates::GOALS_KEPT);
}

#[test]
fn session_resumes_from_persisted_store() {
    let mut session = onboarded_session();
    session.submit_on(day(6), "refeicao").unwrap();
    session.submit_on(day(6), "sopa").unwrap();

    let kv = session.into_store();
    let resumed = Session::start(kv).unwrap();
    assert_eq!(resumed.state(), State::Commands);
    assert_eq!(resumed.profile().calorie_target, Some(2156));
    assert_eq!(resumed.logs()[0].meal_log.as_deref(), Some("sopa"));
}

#[test]
fn profile_json_round_trip_is_lossless() {
    let profile = UserProfile {
        age: Some(35),
        sex: Some("feminino".into()),
        height_cm: Some(168),
        weight_kg: Some(74.3),
        goal: Some("perder 6kg".into()),
        activity_level: Some(lean_coach::ActivityLevel::Light),
        dietary_restrictions: Some("sem lactose".into()),
        physical_limitations: Some("não".into()),
        tdee: Some(2090),
        calorie_deficit: Some(400),
        calorie_target: Some(1690),
        protein_target_g: Some(119),
        step_target: Some(9000),
        approach: Some(Approach::CalorieCounting),
    };
    let json = serde_json::to_string(&profile).unwrap();
    assert!(json.contains("\"activity_level\":\"light\""));
    assert!(json.contains("\"approach\":\"calorie-counting\""));
    let back: UserProfile = serde_json::from_str(&json).unwrap();
    assert_eq!(back, profile);

    let mut entry = LogEntry::new(day(9));
    entry.weight_kg = Some(74.0);
    entry.notes = Some("viagem".into());
    let json = serde_json::to_string(&vec![entry.clone()]).unwrap();
    assert!(json.contains("\"date\":\"2026-10-09\""));
    let back: Vec<LogEntry> = serde_json::from_str(&json).unwrap();
    assert_eq!(back, vec![entry]);
}

struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(anyhow!("disk full writing {key}"))
    }
}

#[test]
fn store_failures_propagate_to_the_caller() {
    let mut session = Session::start(FailingStore).unwrap();
    let err = session.submit_on(day(1), "30").unwrap_err();
    assert!(format!("{err:#}").contains("disk full"));

    // invalid input never touches the store
    let mut data = ProfileStore::load(FailingStore).unwrap();
    let reply = advance(State::Age, "200", &mut data, day(1)).unwrap();
    assert_eq!(reply.state, State::Age);
}

#[test]
fn file_backed_session_persists_under_configured_keys() {
    let dir = tempfile::tempdir().unwrap();
    let config = CoachConfig {
        data_dir: dir.path().to_path_buf(),
        ..CoachConfig::default()
    };

    let mut session = Session::open(&config).unwrap();
    assert_eq!(session.state(), State::Age);
    session.submit_on(day(1), "44").unwrap();
    session.submit_on(day(1), "checkin").unwrap();

    assert!(dir.path().join(format!("{PROFILE_KEY}.json")).exists());
    assert!(!dir.path().join(format!("{LOGS_KEY}.json")).exists());

    let reopened = Session::open(&config).unwrap();
    assert_eq!(reopened.state(), State::Commands);
    assert_eq!(reopened.profile().age, Some(44));
}
