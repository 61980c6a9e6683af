//! Assistant replies for each conversation step

use crate::conversation::response::Visualization;
use crate::output::report::{score_description, score_emoji, FinalReport};
use crate::processing::answer_scorer::AnswerAnalysis;
use crate::processing::matcher::MatchResult;
use crate::processing::questions::InterviewQuestion;
use crate::processing::skill_extractor::SkillProfile;

/// Text, suggested replies and visual payloads produced by one transition
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Reply {
    pub response: String,
    pub quick_replies: Vec<String>,
    pub visualizations: Vec<Visualization>,
}

impl Reply {
    pub fn text(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            ..Self::default()
        }
    }

    pub fn with_quick_replies(mut self, replies: &[&str]) -> Self {
        self.quick_replies = replies.iter().map(|r| r.to_string()).collect();
        self
    }

    pub fn with_visualization(mut self, visualization: Visualization) -> Self {
        self.visualizations.push(visualization);
        self
    }
}

const COMPLETED_MENU: [&str; 3] = ["🔄 Nouvelle évaluation", "📊 Voir détails", "📧 Envoyer rapport"];

pub fn welcome() -> Reply {
    Reply::text(
        "🤖 Bonjour ! Je suis **ATS Assistant**, votre conseiller IA spécialisé en recrutement.\n\n\
         ✨ Je vais analyser votre profil en 3 étapes :\n\
         • 📄 Analyse de votre CV\n\
         • 🎯 Matching avec l'offre d'emploi\n\
         • 💬 Questions personnalisées\n\n\
         Commençons cette aventure ensemble !",
    )
    .with_quick_replies(&["🚀 Commencer l'évaluation", "ℹ️ En savoir plus", "🎯 Voir un exemple"])
    .with_visualization(Visualization::Progress {
        current: 0,
        total: 3,
        steps: vec!["CV".to_string(), "Matching".to_string(), "Entretien".to_string()],
    })
}

pub fn greeting_prompt() -> Reply {
    Reply::text("👋 Salut ! Je suis votre assistant IA pour l'évaluation de candidature. Dites **'Bonjour'** pour commencer !")
}

pub fn cv_prompt() -> Reply {
    Reply::text(
        "📄 **Étape 1/3 : Analyse de votre CV**\n\n\
         Veuillez coller le texte complet de votre CV ci-dessous.\n\n\
         💡 *Astuce : Plus votre CV est détaillé, plus l'analyse sera précise !*",
    )
    .with_visualization(Visualization::step_indicator(1, "Analyse CV"))
}

pub fn example_explanation() -> Reply {
    Reply::text(
        "📋 **Exemple d'évaluation :**\n\n\
         1. **Analyse CV** : Extraction des compétences, expérience\n\
         2. **Matching** : Compatibilité avec l'offre (score sur 100)\n\
         3. **Entretien** : Questions personnalisées selon votre profil\n\n\
         Résultat : Score global + recommandations personnalisées",
    )
    .with_quick_replies(&["🚀 Commencer maintenant", "❓ Autres questions"])
}

pub fn capabilities() -> Reply {
    Reply::text(
        "🤖 Je suis un assistant IA qui évalue la compatibilité entre votre profil et une offre d'emploi.\n\n\
         **Mes capacités :**\n\
         • 🔍 Analyse sémantique de CV\n\
         • 🎯 Matching intelligent\n\
         • 💬 Questions adaptatives\n\
         • 📊 Rapports détaillés",
    )
    .with_quick_replies(&["🚀 Parfait, commençons !", "🔍 Comment ça marche ?"])
}

pub fn cv_accepted(profile: &SkillProfile) -> Reply {
    Reply::text(format!(
        "✅ **CV analysé avec succès !**\n\n\
         📊 **Aperçu de votre profil :**\n\
         • 🎯 **Compétences détectées :** {}\n\
         • 💼 **Années d'expérience :** {}\n\
         • 🎓 **Niveau :** {}\n\n\
         📋 **Étape 2/3 : Offre d'emploi**\n\
         Maintenant, collez la description du poste qui vous intéresse :",
        profile.skills.len(),
        profile.experience_years,
        profile.level
    ))
    .with_visualization(Visualization::CvAnalysis(profile.clone()))
    .with_visualization(Visualization::step_indicator(2, "Analyse Offre"))
}

pub fn cv_too_short() -> Reply {
    Reply::text(
        "📝 Votre CV semble un peu court pour une analyse complète.\n\n\
         💡 **Conseils :**\n\
         • Incluez vos expériences professionnelles\n\
         • Listez vos compétences techniques\n\
         • Mentionnez votre formation\n\
         • Ajoutez vos projets significatifs",
    )
    .with_quick_replies(&["📄 Réessayer", "💡 Voir un exemple de CV"])
}

pub fn job_matched(matching: &MatchResult, questions: &[InterviewQuestion]) -> Reply {
    let mut reply = Reply::text(format!(
        "🎯 **Analyse de compatibilité terminée !**\n\n\
         📊 **Score de matching : {}/100**\n\n\
         {} {}\n\n\
         💬 **Étape 3/3 : Entretien personnalisé**\n\
         Je vais maintenant vous poser quelques questions adaptées à votre profil pour compléter l'évaluation.",
        matching.overall_score,
        score_emoji(matching.overall_score),
        score_description(matching.overall_score)
    ))
    .with_visualization(Visualization::MatchingResults(matching.clone()));

    if let Some(first) = questions.first() {
        reply.response.push_str(&format!(
            "\n\n**Question 1/{}:**\n{}",
            questions.len(),
            first.question
        ));
        reply = reply.with_visualization(Visualization::InterviewProgress {
            current: 1,
            total: questions.len(),
        });
    }
    reply
}

pub fn job_incomplete() -> Reply {
    Reply::text(
        "📋 La description du poste semble incomplète.\n\n\
         💡 **Incluez :**\n\
         • Les missions principales\n\
         • Les compétences requises\n\
         • Le niveau d'expérience\n\
         • Les technologies utilisées",
    )
    .with_quick_replies(&["🔄 Réessayer", "📋 Voir un exemple d'offre"])
}

/// `next_index` is zero-based
pub fn answer_recorded(
    analysis: &AnswerAnalysis,
    next_index: usize,
    total: usize,
    next_question: &InterviewQuestion,
) -> Reply {
    Reply::text(format!(
        "✅ **Réponse enregistrée !**\n\n\
         📊 Score de cette réponse : {}/10\n\n\
         **Question {}/{}:**\n{}",
        format_score(analysis.score),
        next_index + 1,
        total,
        next_question.question
    ))
    .with_visualization(Visualization::AnswerFeedback(analysis.clone()))
    .with_visualization(Visualization::InterviewProgress {
        current: next_index + 1,
        total,
    })
}

pub fn final_report(report: &FinalReport) -> Reply {
    Reply::text(format!(
        "🎉 **ÉVALUATION TERMINÉE !**\n\n\
         {} **Score Final : {}/100**\n\
         📊 **Niveau : {}**\n\n\
         **📈 Détail des scores :**\n\
         • 🎯 Matching CV/Offre : {}/100\n\
         • 💬 Performance entretien : {:.1}/100\n\n\
         **⏱️ Statistiques :**\n\
         • Durée : {} minutes\n\
         • Messages échangés : {}\n\n\
         **🎯 Recommandation :**\n{}",
        score_emoji(report.final_score),
        report.final_score,
        report.level(),
        report.matching_score,
        report.interview_score,
        report.duration,
        report.message_count,
        report.recommendation
    ))
    .with_quick_replies(&COMPLETED_MENU)
    .with_visualization(Visualization::FinalResults(report.clone()))
}

pub fn detailed_report(report: &FinalReport) -> Reply {
    let bullets = |items: &[String]| {
        items
            .iter()
            .map(|item| format!("• {}", item))
            .collect::<Vec<_>>()
            .join("\n")
    };

    Reply::text(format!(
        "📊 **RAPPORT DÉTAILLÉ**\n\n\
         **💪 Points forts :**\n{}\n\n\
         **🎯 Axes d'amélioration :**\n{}\n\n\
         **📈 Analyse comportementale :**\n\
         • Sentiment général : {}\n\
         • Engagement : {}\n\
         • Temps de réflexion : {}",
        bullets(&report.strengths),
        bullets(&report.improvements),
        report.sentiment,
        if report.message_count > 10 { "Élevé" } else { "Modéré" },
        if report.duration > 10 { "Approfondi" } else { "Rapide" }
    ))
    .with_visualization(Visualization::DetailedAnalysis(report.clone()))
}

pub fn restarted() -> Reply {
    Reply::text("🔄 **Nouvelle évaluation initiée !**\n\nCommençons une nouvelle analyse. Veuillez coller votre CV :")
}

pub fn completed_menu() -> Reply {
    Reply::text(
        "✅ **Évaluation terminée !**\n\n\
         Vous pouvez :\n\
         • Commencer une nouvelle évaluation\n\
         • Consulter les détails de votre score\n\
         • Recevoir le rapport par email",
    )
    .with_quick_replies(&COMPLETED_MENU)
}

pub fn fallback() -> Reply {
    Reply::text("🤔 Je ne comprends pas. Pouvez-vous reformuler ou utiliser les suggestions ?")
        .with_quick_replies(&["🏠 Recommencer", "❓ Aide"])
}

/// Whole numbers without decimals, others with one
pub fn format_score(score: f64) -> String {
    if score.fract() == 0.0 {
        format!("{:.0}", score)
    } else {
        format!("{:.1}", score)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::processing::questions::QuestionType;
    use crate::processing::text_processor::Sentiment;

    fn report(message_count: u32, duration: i64) -> FinalReport {
        FinalReport {
            final_score: 86,
            matching_score: 90,
            interview_score: 80.0,
            duration,
            message_count,
            recommendation: "Candidature fortement recommandée.".to_string(),
            strengths: vec!["A".to_string(), "B".to_string()],
            improvements: vec!["C".to_string()],
            sentiment: Sentiment::Positive,
        }
    }

    #[test]
    fn test_welcome_offers_start() {
        let reply = welcome();
        assert!(reply.response.contains("ATS Assistant"));
        assert_eq!(reply.quick_replies.len(), 3);
        assert!(reply.quick_replies[0].contains("Commencer"));
        assert_eq!(reply.visualizations[0].kind(), "progress");
    }

    #[test]
    fn test_final_report_text() {
        let reply = final_report(&report(12, 4));
        assert!(reply.response.contains("Score Final : 86/100"));
        assert!(reply.response.contains("Niveau : Très bon"));
        assert!(reply.response.contains("Performance entretien : 80.0/100"));
        assert_eq!(reply.quick_replies, COMPLETED_MENU);
    }

    #[test]
    fn test_detailed_report_labels() {
        let engaged = detailed_report(&report(12, 15));
        assert!(engaged.response.contains("• A\n• B"));
        assert!(engaged.response.contains("Engagement : Élevé"));
        assert!(engaged.response.contains("Temps de réflexion : Approfondi"));
        assert!(engaged.response.contains("Sentiment général : positive"));

        let quick = detailed_report(&report(10, 10));
        assert!(quick.response.contains("Engagement : Modéré"));
        assert!(quick.response.contains("Temps de réflexion : Rapide"));
    }

    #[test]
    fn test_answer_recorded_numbering() {
        let analysis = AnswerAnalysis {
            score: 6.5,
            keywords: 1,
            length: 60,
            sentiment: Sentiment::Positive,
        };
        let next = InterviewQuestion {
            question: "Pourquoi ?".to_string(),
            kind: QuestionType::Motivation,
            weight: 2,
        };
        let reply = answer_recorded(&analysis, 1, 3, &next);

        assert!(reply.response.contains("6.5/10"));
        assert!(reply.response.contains("**Question 2/3:**\nPourquoi ?"));
        assert_eq!(
            reply.visualizations[1],
            Visualization::InterviewProgress { current: 2, total: 3 }
        );
    }

    #[test]
    fn test_format_score() {
        assert_eq!(format_score(7.0), "7");
        assert_eq!(format_score(8.5), "8.5");
        assert_eq!(format_score(10.0), "10");
    }
}
