//! Seven-day progress report built from the check-in log.

use serde::Serialize;

use crate::models::LogEntry;

/// Number of trailing log entries a report covers.
pub const REPORT_WINDOW: usize = 7;

pub const NO_DATA_REPORT: &str = "📊 RELATÓRIO\n\nAinda não há dados registrados. Faça um \"checkin\" para começar a acompanhar seu progresso!";

/// Aggregates over the report window. Averages and the weight delta are
/// rounded to one decimal, and recommendations are decided on the rounded
/// values so the text and the advice always agree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklySummary {
    pub entries: usize,
    pub meals_logged: usize,
    pub mean_weight_kg: Option<f64>,
    /// Last weight minus first weight in the window.
    pub weight_delta_kg: Option<f64>,
    pub mean_sleep_hours: Option<f64>,
    pub mean_hunger: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Recommendation {
    /// Weight did not drop: trim intake or walk more.
    CutIntake,
    /// Dropped more than 1 kg.
    GreatProgress,
    Consistent,
    HighHunger,
    LowSleep,
}

impl Recommendation {
    pub fn text(self) -> &'static str {
        match self {
            Self::CutIntake => "• Peso não caiu esta semana. Vamos reduzir 100-200 kcal/dia OU aumentar 1.000 passos diários.",
            Self::GreatProgress => "• Ótimo progresso! Continue assim. Se sentir muita fome, pode aumentar 50-100 kcal/dia.",
            Self::Consistent => "• Progresso consistente! Mantenha o plano atual.",
            Self::HighHunger => "• Fome alta. Aumente proteína e fibras. Considere adicionar 100-150 kcal de alimentos saciantes.",
            Self::LowSleep => "• Sono abaixo do ideal. Priorize dormir 7-9h - isso afeta hormônios da fome e recuperação.",
        }
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(round1(values.iter().sum::<f64>() / values.len() as f64))
}

/// Summarize the last [`REPORT_WINDOW`] entries, in collection order.
/// Returns `None` for an empty log.
pub fn summarize(logs: &[LogEntry]) -> Option<WeeklySummary> {
    if logs.is_empty() {
        return None;
    }
    let window = &logs[logs.len().saturating_sub(REPORT_WINDOW)..];

    let weights: Vec<f64> = window.iter().filter_map(|l| l.weight_kg).collect();
    let sleep: Vec<f64> = window.iter().filter_map(|l| l.sleep_hours).collect();
    let hunger: Vec<f64> = window
        .iter()
        .filter_map(|l| l.hunger_level.map(f64::from))
        .collect();

    let weight_delta_kg = match (weights.first(), weights.last()) {
        (Some(first), Some(last)) => Some(round1(last - first)),
        _ => None,
    };

    Some(WeeklySummary {
        entries: window.len(),
        meals_logged: window.iter().filter(|l| l.meal_log.is_some()).count(),
        mean_weight_kg: mean(&weights),
        weight_delta_kg,
        mean_sleep_hours: mean(&sleep),
        mean_hunger: mean(&hunger),
    })
}

impl WeeklySummary {
    pub fn recommendations(&self) -> Vec<Recommendation> {
        let mut recs = Vec::new();

        recs.push(match self.weight_delta_kg {
            Some(delta) if delta >= 0.0 => Recommendation::CutIntake,
            Some(delta) if delta < -1.0 => Recommendation::GreatProgress,
            _ => Recommendation::Consistent,
        });
        if self.mean_hunger.is_some_and(|h| h > 7.0) {
            recs.push(Recommendation::HighHunger);
        }
        if self.mean_sleep_hours.is_some_and(|s| s < 7.0) {
            recs.push(Recommendation::LowSleep);
        }

        recs
    }

    pub fn render(&self) -> String {
        let fmt = |v: Option<f64>| v.map(|v| format!("{:.1}", v)).unwrap_or_else(|| "N/A".into());

        let mut adjustments = String::from("\n📈 AJUSTES SUGERIDOS:\n");
        for rec in self.recommendations() {
            adjustments.push_str(rec.text());
            adjustments.push('\n');
        }

        format!(
            "📊 RELATÓRIO DOS ÚLTIMOS 7 DIAS\n\n⚖️ PESO:\n• Média: {} kg\n• Variação: {} kg\n\n💤 SONO:\n• Média: {}h/noite\n\n🍽️ FOME:\n• Média: {}/10\n\n📝 REGISTROS:\n• Check-ins: {}\n• Refeições registradas: {}{}\n\nPróximo passo: Faça um novo \"checkin\" ou ajuste suas \"meta\"s se necessário.",
            fmt(self.mean_weight_kg),
            fmt(self.weight_delta_kg),
            fmt(self.mean_sleep_hours),
            fmt(self.mean_hunger),
            self.entries,
            self.meals_logged,
            adjustments,
        )
    }
}

/// Render the report text for a log collection. The collection must already
/// be in chronological order.
pub fn build_report(logs: &[LogEntry]) -> String {
    match summarize(logs) {
        Some(summary) => summary.render(),
        None => NO_DATA_REPORT.to_string(),
    }
}
