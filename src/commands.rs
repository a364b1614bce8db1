/// A command typed at the `commands` hub.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    CheckIn,
    LogMeal,
    WeeklyPlan,
    ShoppingList,
    Report,
    ReviewGoals,
}

impl Command {
    /// Exact match after trimming and lowercasing. Returns `None` for
    /// anything outside the vocabulary.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "ajuda" => Some(Self::Help),
            "checkin" => Some(Self::CheckIn),
            "refeicao" | "refeição" => Some(Self::LogMeal),
            "plano semana" => Some(Self::WeeklyPlan),
            "lista compras" => Some(Self::ShoppingList),
            "relatorio" | "relatório" => Some(Self::Report),
            "meta" => Some(Self::ReviewGoals),
            _ => None,
        }
    }
}

/// Goal that can be edited from the goal review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoalField {
    Calories,
    Protein,
    Steps,
    Approach,
}

impl GoalField {
    /// Substring match on the user's pick, e.g. "quero mudar as calorias".
    pub fn pick(input: &str) -> Option<Self> {
        let input = input.to_lowercase();
        if input.contains("caloria") {
            Some(Self::Calories)
        } else if input.contains("proteina") || input.contains("proteína") {
            Some(Self::Protein)
        } else if input.contains("passo") {
            Some(Self::Steps)
        } else if input.contains("abordagem") {
            Some(Self::Approach)
        } else {
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_ignores_case_and_padding() {
        assert_eq!(Command::parse("  CHECKIN  "), Some(Command::CheckIn));
        assert_eq!(Command::parse("Refeição"), Some(Command::LogMeal));
        assert_eq!(Command::parse("RELATORIO"), Some(Command::Report));
        assert_eq!(Command::parse("plano  semana"), None);
        assert_eq!(Command::parse("check in"), None);
    }

    #[test]
    fn pick_goal_by_substring() {
        assert_eq!(GoalField::pick("Calorias"), Some(GoalField::Calories));
        assert_eq!(GoalField::pick("proteína"), Some(GoalField::Protein));
        assert_eq!(GoalField::pick("meus passos"), Some(GoalField::Steps));
        assert_eq!(GoalField::pick("abordagem"), Some(GoalField::Approach));
        assert_eq!(GoalField::pick("sono"), None);
    }
}
