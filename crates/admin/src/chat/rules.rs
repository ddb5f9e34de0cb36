//! Keyword rules behind the offline answers.
//!
//! Rules are checked in table order against the lowercased question and the
//! first match wins, so a more specific rule must sit above any broader rule
//! it overlaps. Keywords are substrings: `preven` covers both `prevenir` and
//! `prevent`.

/// A keyword test on the lowercased question.
#[derive(Debug, Clone, Copy)]
pub enum Predicate {
    /// Any keyword occurs.
    Any(&'static [&'static str]),
    /// A keyword of the first list and a keyword of the second both occur.
    AnyWithAny(&'static [&'static str], &'static [&'static str]),
}

impl Predicate {
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        let any = |words: &[&str]| words.iter().any(|w| text.contains(w));
        match self {
            Self::Any(words) => any(words),
            Self::AnyWithAny(first, second) => any(first) && any(second),
        }
    }
}

/// One canned answer and the predicates that select it.
#[derive(Debug, Clone, Copy)]
pub struct Rule {
    pub topic: &'static str,
    /// Matches when any predicate matches.
    pub when: &'static [Predicate],
    pub answer: &'static str,
}

impl Rule {
    #[must_use]
    pub fn matches(&self, text: &str) -> bool {
        self.when.iter().any(|p| p.matches(text))
    }
}

/// Answer when no rule matches.
pub const GENERIC_ANSWER: &str = "I can help with herd management, prevention, and support \
strategies without naming brands. Could you describe the problem in more detail (animal age, \
symptoms, how long it has been going on, which group is affected)?";

const PREVENTION: &[&str] = &["prevenir", "preven", "evitar", "avoid"];

pub const RULES: &[Rule] = &[
    Rule {
        topic: "ticks",
        when: &[Predicate::Any(&["carrapato", "tick"])],
        answer: "For tick control, combine environmental management (pasture rotation, clean \
facilities) with an integrated strategy. Natural and less aggressive options can be considered \
with technical guidance. Also run tests to rule out mixed infestations. See a veterinarian for a \
safe plan.",
    },
    Rule {
        topic: "worms",
        when: &[Predicate::Any(&["verme", "helminto", "worm", "helminth"])],
        answer: "For worm burdens, focus on a strategic control calendar, fecal egg counts, and \
pasture management. Less aggressive alternatives can be used preventively, always with \
veterinary follow-up and attention to withdrawal periods where they apply.",
    },
    Rule {
        topic: "calf-diarrhea",
        when: &[Predicate::Any(&["diarreia", "diarréia", "diarrhea", "diarrhoea", "scour"])],
        answer: "For calf diarrhea, prioritize hydration, shade, and correct colostrum management. \
Look for the cause (nutritional, infectious, parasitic). Supportive approaches can help, but \
call a veterinarian for severe cases.",
    },
    // Above "respiratory": a prevention question about the lungs is not a
    // treatment question.
    Rule {
        topic: "respiratory-prevention",
        when: &[Predicate::AnyWithAny(
            &["prevenir", "preven"],
            &["respirat", "pneumonia"],
        )],
        answer: "Prevent respiratory problems with ventilation, dry bedding, proper stocking \
density, and vaccination when indicated. Supportive measures can be used during high-risk \
periods.",
    },
    Rule {
        topic: "respiratory",
        when: &[Predicate::Any(&["pneumonia", "respirat"])],
        answer: "For respiratory support, reduce heat stress, avoid overcrowding, and fix dust or \
dampness in the pens. Support strategies can help recovery, but a clinical exam is essential to \
rule out bacterial or viral infection.",
    },
    Rule {
        topic: "poisoning",
        when: &[Predicate::Any(&["intoxica", "poison"])],
        answer: "If you suspect poisoning, isolate the group, provide clean water, and remove the \
likely cause (plant, feed, additive). General support can help, but poisoning needs immediate \
veterinary care.",
    },
    // Above "fertility": its keyword "cio" also sits inside "início".
    Rule {
        topic: "mastitis",
        when: &[Predicate::Any(&["mastite", "mastitis"])],
        answer: "To control mastitis, follow a pre- and post-dipping routine, dry off correctly, \
and maintain the milking equipment. Supportive approaches can help immunity, but clinical cases \
need a veterinary assessment.",
    },
    // Above "semen": "buller" contains "bull".
    Rule {
        topic: "sodomy",
        when: &[Predicate::Any(&["sodomia", "sodomy", "buller", "mounting"])],
        answer: "To control buller behavior, adjust stocking density and trough space and enrich \
the environment. If it persists, behavioral support can help. See a veterinarian to investigate \
nutritional and hormonal causes.",
    },
    Rule {
        topic: "fertility",
        when: &[Predicate::Any(&["fertilidad", "cio", "reprodu", "fertility", "in heat"])],
        answer: "To improve fertility, keep body condition right, supplement minerals, manage heat \
detection, and look after uterine health. Natural support can be used alongside good \
reproductive practice.",
    },
    Rule {
        topic: "semen",
        when: &[Predicate::Any(&["sêmen", "semen", "touro", "bull"])],
        answer: "For semen quality, focus on balanced nutrition, heat control, and breeding \
soundness exams. General support can contribute, but regular exams are essential.",
    },
    Rule {
        topic: "abortion",
        when: &[Predicate::Any(&["aborto", "abort", "miscarriage"])],
        answer: "Recurrent abortion calls for investigating infectious, nutritional, and \
management causes. General support can act as an adjunct, but collect material for diagnosis \
and consult a veterinarian.",
    },
    Rule {
        topic: "papillomatosis",
        when: &[Predicate::Any(&["papiloma", "verruga", "figueira", "papilloma", "wart"])],
        answer: "For warts (papillomatosis), keep handling hygienic, avoid injuries during \
restraint, and consider immune support. Many cases resolve on their own, but technical guidance \
helps prevent recurrence.",
    },
    Rule {
        topic: "antibiotics",
        when: &[Predicate::Any(&["antib", "antimicrob"])],
        answer: "To reduce antibiotics, invest in biosecurity, vaccination, stress management, and \
early diagnosis. Well-run prevention and support reduce the need for aggressive treatment.",
    },
    Rule {
        topic: "milk-yield",
        when: &[
            Predicate::Any(&["produção de leite", "producao de leite", "milk production", "milk yield"]),
            Predicate::AnyWithAny(&["leite", "milk"], &["aument", "increase", "boost"]),
        ],
        answer: "To raise milk production, ensure a balanced diet, thermal comfort, good water, and \
consistent milking. Natural adjuncts can help, but management and nutrition matter most.",
    },
    Rule {
        topic: "weight-gain",
        when: &[
            Predicate::Any(&["ganho de peso", "engorda", "weight gain", "fattening"]),
            Predicate::AnyWithAny(&["peso", "weight"], &["aument", "increase", "improve"]),
        ],
        answer: "For weight gain in beef cattle, adjust the nutritional plan (energy and protein), \
forage supply, and welfare. Complementary strategies can help, but nutrition and management \
have the biggest impact.",
    },
    Rule {
        topic: "meat-quality",
        when: &[
            Predicate::Any(&["qualidade da carne", "meat quality", "beef quality"]),
            Predicate::AnyWithAny(&["carne", "meat", "beef"], &["qualidade", "quality"]),
        ],
        answer: "Improve meat quality with genetics, pre-slaughter stress management, an adequate \
diet, and herd health. General support contributes through welfare and immunity.",
    },
    Rule {
        topic: "immunity",
        when: &[Predicate::Any(&["imunid", "defesa", "immun", "defense", "defence"])],
        answer: "To strengthen immunity: correct mineral supplementation, shade, clean water, \
up-to-date vaccination, and less stress. Natural support can be built into routine management.",
    },
    Rule {
        topic: "stress",
        when: &[Predicate::Any(&["estresse", "stress"])],
        answer: "Reduce stress with calm handling, proper stocking, shade, non-slip floors, and \
humane transport. Behavioral support can help with more reactive groups.",
    },
    Rule {
        topic: "internal-external-parasites",
        when: &[Predicate::AnyWithAny(
            &["parasita", "parasite"],
            &["interno", "externo", "internal", "external"],
        )],
        answer: "For internal and external parasites, use integrated management: pasture rotation, \
fecal testing, clean facilities, and physical barriers. Supportive alternatives can be combined \
with the health plan.",
    },
    // Below every disease rule: "prevent ... without chemicals" is the
    // catch-all for prevention questions no specific rule took.
    Rule {
        topic: "low-chemical-prevention",
        when: &[Predicate::AnyWithAny(
            PREVENTION,
            &["químic", "quimic", "forte", "chemical", "harsh"],
        )],
        answer: "For prevention with fewer chemicals, strengthen biosecurity, nutrition, \
vaccination, welfare, and hygiene. Natural support can be considered with technical follow-up.",
    },
];

/// The first rule matching `question`, if any.
#[must_use]
pub fn matching_rule(question: &str) -> Option<&'static Rule> {
    let text = question.to_lowercase();
    RULES.iter().find(|rule| rule.matches(&text))
}

/// The canned answer for `question`.
#[must_use]
pub fn fallback_answer(question: &str) -> &'static str {
    matching_rule(question).map_or(GENERIC_ANSWER, |rule| rule.answer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::QUICK_QUESTIONS;

    fn topic(question: &str) -> Option<&'static str> {
        matching_rule(question).map(|r| r.topic)
    }

    #[test]
    fn test_prevention_beats_general_respiratory() {
        assert_eq!(
            topic("How do I prevent respiratory disease?"),
            Some("respiratory-prevention")
        );
        assert_eq!(
            topic("O que usar para prevenir doenças respiratórias no rebanho?"),
            Some("respiratory-prevention")
        );
        assert_eq!(topic("My heifer has pneumonia"), Some("respiratory"));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(topic("MASTITE na vaca"), Some("mastitis"));
        assert_eq!(topic("Ticks everywhere"), Some("ticks"));
    }

    #[test]
    fn test_compound_predicates() {
        assert_eq!(topic("como aumentar o leite?"), Some("milk-yield"));
        assert_eq!(topic("leite"), None);
        assert_eq!(
            topic("Parasitas internos e externos"),
            Some("internal-external-parasites")
        );
        assert_eq!(
            topic("Como evitar surtos sem químicos?"),
            Some("low-chemical-prevention")
        );
    }

    #[test]
    fn test_buller_is_not_semen() {
        assert_eq!(topic("buller steers in the pen"), Some("sodomy"));
    }

    #[test]
    fn test_unmatched_gets_generic_answer() {
        assert_eq!(fallback_answer("hello there"), GENERIC_ANSWER);
        assert_eq!(fallback_answer(""), GENERIC_ANSWER);
    }

    #[test]
    fn test_mastitis_is_not_fertility() {
        assert_eq!(
            topic("Qual o início do tratamento da mastite?"),
            Some("mastitis")
        );
        assert_eq!(topic("A vaca não entra no cio"), Some("fertility"));
    }

    #[test]
    fn test_quick_questions_reach_their_topics() {
        let expected = [
            "ticks",
            "worms",
            "calf-diarrhea",
            "respiratory",
            "poisoning",
            "sodomy",
            "fertility",
            "semen",
            "abortion",
            "papillomatosis",
            "mastitis",
            "antibiotics",
            "milk-yield",
            "weight-gain",
            "meat-quality",
            "immunity",
            "stress",
            "respiratory-prevention",
            "internal-external-parasites",
            "low-chemical-prevention",
        ];
        for (question, want) in QUICK_QUESTIONS.iter().zip(expected) {
            assert_eq!(topic(question), Some(want), "{question}");
        }
    }
}
