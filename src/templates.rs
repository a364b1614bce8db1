//! Scripted assistant text. Everything here is a pure function of the profile
//! or of the values passed in.

use crate::metrics::CALORIE_DEFICIT;
use crate::models::{ActivityLevel, Approach, LogEntry, UserProfile};

pub const INTRO: &str = "Olá! Sou seu agente de emagrecimento. Vou te ajudar a perder gordura de forma sustentável, com foco em hábitos e consistência.\n\n⚠️ IMPORTANTE: Não sou médico nem nutricionista. Se você tem menos de 18 anos, está grávida, amamentando, tem histórico de transtorno alimentar, diabetes não controlada ou problemas cardíacos, procure um profissional de saúde antes de seguir qualquer plano.\n\nVamos começar com algumas perguntas essenciais. Primeiro:\n\n1. Qual sua idade?";

pub const WELCOME_BACK: &str = "Bem-vindo de volta! Seus dados foram carregados.\n\nComandos disponíveis:\n• checkin - Registrar peso, sono, fome e atividade\n• refeicao - Registrar uma refeição\n• plano semana - Gerar plano semanal\n• lista compras - Lista de compras baseada no plano\n• relatorio - Resumo dos últimos 7 dias\n• meta - Revisar suas metas\n• ajuda - Ver todos os comandos\n\nO que deseja fazer?";

pub const HELP: &str = "📋 COMANDOS DISPONÍVEIS:\n\n• checkin - Registrar peso, sono, fome, passos e humor\n• refeicao - Registrar uma refeição\n• plano semana - Gerar plano semanal de treino e alimentação\n• lista compras - Gerar lista de compras\n• relatorio - Ver resumo dos últimos 7 dias e tendências\n• meta - Revisar e ajustar metas\n• ajuda - Ver esta lista de comandos\n\nDigite o comando que deseja executar.";

pub const UNKNOWN_COMMAND: &str =
    "Comando não reconhecido. Digite \"ajuda\" para ver os comandos disponíveis.";

// Onboarding prompts
pub const ASK_SEX: &str = "2. Sexo (masculino/feminino - opcional, mas ajuda no cálculo)?";
pub const ASK_HEIGHT: &str = "3. Qual sua altura em cm? (ex: 170)";
pub const ASK_WEIGHT: &str = "4. Qual seu peso atual em kg? (ex: 75.5)";
pub const ASK_GOAL: &str = "5. Qual seu objetivo?\nExemplos:\n• Perder 10kg em 6 meses\n• Reduzir cintura/gordura abdominal\n• Melhorar condicionamento e perder gordura";
pub const ASK_ACTIVITY: &str = "6. Nível de atividade atual:\n• sedentário - pouco ou nenhum exercício\n• leve - exercício 1-3x/semana\n• moderado - exercício 3-5x/semana\n• alto - exercício intenso 6-7x/semana\n\nDigite uma opção:";
pub const ASK_RESTRICTIONS: &str = "7. Tem restrições alimentares? (vegetariano, vegano, sem lactose, etc)\nSe não tiver, digite \"não\".";
pub const ASK_LIMITATIONS: &str =
    "8. Tem limitações físicas ou condições médicas relevantes?\nSe não, digite \"não\".";

pub const INVALID_AGE: &str = "Por favor, digite uma idade válida (entre 10 e 100 anos).";
pub const INVALID_HEIGHT: &str = "Por favor, digite uma altura válida em cm (ex: 170).";
pub const INVALID_WEIGHT: &str = "Por favor, digite um peso válido em kg.";
pub const INVALID_ACTIVITY: &str = "Por favor, escolha: sedentário, leve, moderado ou alto.";
pub const INVALID_APPROACH: &str = "Por favor, digite A ou B.";

// Check-in prompts
pub const CHECKIN_START: &str =
    "📊 CHECKIN DIÁRIO\n\nVamos registrar seus dados de hoje.\n\n1. Qual seu peso atual (em kg)?";
pub const ASK_SLEEP: &str = "2. Quantas horas dormiu ontem? (ex: 7.5)";
pub const ASK_HUNGER: &str =
    "3. Nível de fome/vontade de comer (0-10, sendo 0=sem fome e 10=faminto)?";
pub const ASK_STEPS: &str = "4. Quantos passos deu ontem? (aproximado, se não souber digite 0)";
pub const ASK_MOOD: &str = "5. Como está seu humor/energia? (ótimo/bom/regular/ruim)";

pub const INVALID_CHECKIN_WEIGHT: &str = "Digite um peso válido em kg (ex: 75.5)";
pub const INVALID_SLEEP: &str = "Digite horas de sono válidas (0-24)";
pub const INVALID_HUNGER: &str = "Digite um número de 0 a 10";
pub const INVALID_STEPS: &str = "Digite um número de passos";

pub const MEAL_START: &str = "🍽️ REGISTRO DE REFEIÇÃO\n\nDescreva sua refeição (ex: \"2 ovos mexidos, 1 pão integral, 1 banana\")";
pub const MEAL_SAVED: &str = "✅ Refeição registrada!\n\n💡 DICA: Se estiver contando calorias, registre no seu app. Se não, avalie:\n• Tinha proteína? (carne, ovo, peixe, leguminosa)\n• Tinha vegetais/fibras?\n• Porção adequada?\n\nDigite outro comando ou \"refeicao\" para registrar outra.";

// Goal review
pub const GOALS_KEPT: &str = "Ok! Metas mantidas. Digite outro comando.";
pub const PICK_GOAL_FIELD: &str = "Qual meta deseja ajustar?\n• calorias - Ajustar meta calórica\n• proteina - Ajustar meta de proteína\n• passos - Ajustar meta de passos\n• abordagem - Mudar entre contagem e porções";
pub const INVALID_GOAL_FIELD: &str =
    "Opção inválida. Digite: calorias, proteina, passos ou abordagem";
pub const PICK_APPROACH: &str = "Escolha:\nA) Com contagem de calorias\nB) Sem contagem (porções)";
pub const INVALID_CALORIE_GOAL: &str = "Digite um valor válido (1000-4000 kcal)";
pub const INVALID_PROTEIN_GOAL: &str = "Digite um valor válido (50-300g)";
pub const INVALID_STEP_GOAL: &str = "Digite um valor válido (1000-30000 passos)";
pub const INVALID_APPROACH_GOAL: &str = "Digite A ou B";

pub const PLAN_NEXT_STEP: &str =
    "\nPróximo passo: Quer gerar a \"lista compras\" baseada neste plano?";

const COMMAND_LIST: &str = "📋 COMANDOS DISPONÍVEIS:\n• checkin - Registrar peso, sono, fome e atividade\n• refeicao - Registrar uma refeição\n• plano semana - Gerar plano semanal\n• lista compras - Lista de compras\n• relatorio - Resumo dos últimos 7 dias\n• meta - Revisar metas\n• ajuda - Ver comandos\n\nDigite um comando para começar!";

const MEALS: &str = "
EXEMPLO DE REFEIÇÕES (ajuste porções conforme sua meta):

CAFÉ DA MANHÃ:
• 2-3 ovos mexidos + 1 pão integral + 1 fruta
• Iogurte natural + aveia + frutas vermelhas + 1 colher de pasta de amendoim
• Tapioca com queijo cottage + presunto de peru

ALMOÇO/JANTAR:
• Proteína (frango, peixe, carne) + arroz integral + feijão + salada
• Macarrão integral com molho de tomate + carne moída magra + legumes
• Peixe grelhado + batata doce + brócolis

LANCHES:
• Frutas + oleaginosas (castanhas, amêndoas)
• Iogurte grego + granola
• Sanduíche natural (pão integral + peito de peru + queijo + salada)
";

const SHOPPING_LIST: &str = "🛒 LISTA DE COMPRAS SEMANAL\n\n🥚 PROTEÍNAS:\n☐ Ovos (1-2 dúzias)\n☐ Frango (peito ou coxa, 1-2kg)\n☐ Peixe (filé de tilápia/salmão, 500g-1kg)\n☐ Carne vermelha magra (patinho, 500g)\n☐ Iogurte natural/grego (2-3 potes)\n☐ Queijo cottage (1 pote)\n☐ Peito de peru fatiado (200g)\n\n🌾 CARBOIDRATOS:\n☐ Arroz integral (1 pacote)\n☐ Pão integral (1 pacote)\n☐ Aveia (1 pacote)\n☐ Batata doce (1kg)\n☐ Macarrão integral (1 pacote)\n☐ Feijão (2 latas ou 500g)\n☐ Tapioca (1 pacote)\n\n🥗 VEGETAIS:\n☐ Brócolis (2 maços)\n☐ Tomate (500g)\n☐ Alface/rúcula (2 maços)\n☐ Cenoura (500g)\n☐ Abobrinha (3 unidades)\n☐ Cebola (3 unidades)\n☐ Alho (1 cabeça)\n\n🍎 FRUTAS:\n☐ Banana (1 cacho)\n☐ Maçã (6 unidades)\n☐ Frutas vermelhas congeladas (1 pacote)\n☐ Laranja (6 unidades)\n\n🥜 GORDURAS SAUDÁVEIS:\n☐ Azeite extra virgem\n☐ Pasta de amendoim integral (1 pote)\n☐ Castanhas/amêndoas (200g)\n☐ Abacate (2 unidades)\n\n🧂 TEMPEROS/OUTROS:\n☐ Sal rosa/light\n☐ Pimenta\n☐ Orégano, alho em pó, cúrcuma\n☐ Chá verde/hibisco";

fn or_text<T: ToString>(value: Option<T>, fallback: &str) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(|| fallback.to_string())
}

/// Training block for the weekly plan.
pub fn training_week(level: Option<ActivityLevel>) -> &'static str {
    match level {
        Some(ActivityLevel::Sedentary) => "SEG: Caminhada 20min\nTER: Descanso ativo (alongamento)\nQUA: Caminhada 25min\nQUI: Descanso\nSEX: Caminhada 20min + alongamento\nSAB: Atividade livre (dança, bike, etc)\nDOM: Descanso",
        Some(ActivityLevel::Light) => "SEG: Treino A (peito, ombro, tríceps) + 15min caminhada\nTER: 30min cardio leve\nQUA: Treino B (costas, bíceps) + 15min caminhada\nQUI: Descanso ou yoga\nSEX: Treino C (pernas, abdômen)\nSAB: 40min caminhada ou atividade livre\nDOM: Descanso ativo",
        _ => "SEG: Treino A (peito, ombro, tríceps)\nTER: HIIT 20min + cardio 20min\nQUA: Treino B (costas, bíceps)\nQUI: Cardio moderado 30-40min\nSEX: Treino C (pernas, core)\nSAB: Atividade intensa (corrida, bike, esporte)\nDOM: Descanso ativo (caminhada leve)",
    }
}

pub fn weekly_plan(profile: &UserProfile) -> String {
    let habits = format!(
        "\nHÁBITOS DIÁRIOS:\n✓ Beber 2-3L de água\n✓ Dormir 7-9h por noite\n✓ {} passos\n✓ Registrar peso 2-3x/semana (mesma hora)\n✓ Fazer checkin diário no app\n",
        or_text(profile.step_target, "8.000-10.000")
    );
    format!(
        "📅 PLANO SEMANAL\n\n🏋️ TREINOS:\n{}\n{}\n{}",
        training_week(profile.activity_level),
        MEALS,
        habits
    )
}

pub fn shopping_list() -> &'static str {
    SHOPPING_LIST
}

/// Estimates shown when onboarding completes, followed by the A/B menu.
pub fn onboarding_summary(tdee: u32, calorie_target: u32, protein_target: u32) -> String {
    format!(
        "✅ Cadastro completo!\n\n📊 ESTIMATIVAS CALCULADAS:\n• TDEE (gasto diário): ~{tdee} kcal\n• Meta para déficit: ~{calorie_target} kcal/dia\n• Déficit: {CALORIE_DEFICIT} kcal/dia\n• Proteína sugerida: ~{protein_target}g/dia (~1.6g/kg)\n• Passos: 8.000-10.000/dia\n\n🎯 ESCOLHA SUA ABORDAGEM:\n\nA) COM CONTAGEM DE CALORIAS\n   • Você vai rastrear calorias e macros\n   • Mais preciso, requer app (MyFitnessPal, FatSecret)\n   • Meta: {calorie_target} kcal/dia, {protein_target}g proteína\n\nB) SEM CONTAGEM (MÉTODO POR PORÇÕES)\n   • Prato equilibrado: 1/2 vegetais, 1/4 proteína, 1/4 carboidrato\n   • Proteína do tamanho da palma em cada refeição\n   • Mais simples, flexível\n\nDigite A ou B:"
    )
}

pub fn approach_chosen(approach: Approach, profile: &UserProfile) -> String {
    let intro = match approach {
        Approach::CalorieCounting => format!(
            "Você escolheu: CONTAGEM DE CALORIAS\n\n📱 Baixe um app:\n• MyFitnessPal\n• FatSecret\n• Cronometer\n\nSua meta diária:\n• {} kcal\n• {}g proteína",
            or_text(profile.calorie_target, "?"),
            or_text(profile.protein_target_g, "?")
        ),
        Approach::PortionMethod => "Você escolheu: MÉTODO POR PORÇÕES\n\n🍽️ Regra do prato:\n• 1/2 do prato: vegetais/salada\n• 1/4 do prato: proteína (tamanho da palma)\n• 1/4 do prato: carboidrato (arroz, batata, macarrão)\n\nProteína em TODAS as refeições!".to_string(),
    };
    format!("{}\n\n✅ Configuração completa!\n\n{}", intro, COMMAND_LIST)
}

/// Current targets, shown by the `meta` command.
pub fn goal_summary(profile: &UserProfile) -> String {
    let per_kg = match (profile.weight_kg, profile.protein_target_g) {
        (Some(w), protein) if w > 0.0 => {
            (f64::from(protein.unwrap_or(0)) / w * 10.0).round() / 10.0
        }
        _ => 0.0,
    };
    let approach = profile
        .approach
        .unwrap_or(Approach::PortionMethod)
        .label();

    format!(
        "📊 SUAS METAS ATUAIS:\n\n• TDEE estimado: {} kcal/dia\n• Meta calórica: {} kcal/dia\n• Déficit: {} kcal/dia\n• Proteína: {}g/dia (~{}g/kg)\n• Passos: {}/dia\n• Abordagem: {}\n\nDeseja ajustar alguma meta? (digite \"sim\" ou \"não\")",
        or_text(profile.tdee, "não calculado"),
        or_text(profile.calorie_target, "não definida"),
        profile.calorie_deficit.unwrap_or(0),
        or_text(profile.protein_target_g, "não definida"),
        per_kg,
        or_text(profile.step_target, "8.000-10.000"),
        approach
    )
}

pub fn current_goal(value: Option<u32>, unit: &str, example: u32) -> String {
    format!(
        "Meta atual: {}{}/dia\nDigite nova meta (ex: {}):",
        or_text(value, "não definida"),
        unit,
        example
    )
}

pub fn goal_updated(value: impl std::fmt::Display, unit: &str) -> String {
    format!("✅ Meta atualizada para {}{}/dia!\n\nDigite outro comando.", value, unit)
}

pub fn approach_updated(approach: Approach) -> String {
    format!(
        "✅ Abordagem atualizada para: {}!\n\nDigite outro comando.",
        approach.label()
    )
}

/// Closing message of a check-in, with tips for the day's numbers.
pub fn checkin_feedback(entry: &LogEntry) -> String {
    let mut feedback = String::from("✅ Check-in registrado!\n\n");
    if entry.hunger_level.is_some_and(|h| h > 7) {
        feedback.push_str("⚠️ Fome alta. Considere aumentar proteína e fibras nas refeições.\n");
    }
    // 0 gets no tip, for sleep and steps alike
    if entry.sleep_hours.is_some_and(|s| s > 0.0 && s < 7.0) {
        feedback.push_str(
            "⚠️ Sono abaixo do ideal. Tente dormir 7-9h - isso afeta muito a perda de gordura.\n",
        );
    }
    if entry.steps.is_some_and(|s| (1..5000).contains(&s)) {
        feedback.push_str("💡 Poucos passos. Tente aumentar gradualmente para 8.000-10.000/dia.\n");
    }
    feedback.push_str("\nPróximo passo: Digite \"relatorio\" para ver seu progresso ou \"plano semana\" para ver seu plano de treino!");
    feedback
}
