//! Offline health guides bundled with the app.

use indexmap::IndexMap;
use serde::Serialize;

use crate::pipeline::types::CheckupKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Section {
    EmergencyProcedures,
    DailyHealth,
}

impl Section {
    pub fn title(&self) -> &'static str {
        match self {
            Section::EmergencyProcedures => "Emergency Procedures",
            Section::DailyHealth => "Daily Health & Diet",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Guide {
    pub id: &'static str,
    pub section: Section,
    pub title: &'static str,
    pub description: &'static str,
    pub steps: &'static [&'static str],
}

pub struct KnowledgeBase {
    guides: IndexMap<&'static str, Guide>,
}

impl KnowledgeBase {
    pub fn offline() -> Self {
        let guides = [
            Guide {
                id: "cpr",
                section: Section::EmergencyProcedures,
                title: "CPR (Cardiopulmonary Resuscitation)",
                description: "Life-saving technique for cardiac arrest.",
                steps: &[
                    "Check for responsiveness. Shake the person gently and shout.",
                    "Call for emergency help (108/102 in India) immediately.",
                    "Check for breathing. If not breathing, start chest compressions.",
                    "Push hard and fast in the center of the chest (100-120 compressions/minute).",
                    "Continue compressions until help arrives.",
                ],
            },
            Guide {
                id: "bleeding",
                section: Section::EmergencyProcedures,
                title: "Severe Bleeding",
                description: "How to stop heavy bleeding.",
                steps: &[
                    "Apply direct pressure on the wound with a clean cloth.",
                    "Maintain pressure for at least 10-15 minutes.",
                    "If blood soaks through, add more cloth without removing the first one.",
                    "Raise the injured part above the heart level if possible.",
                    "Keep the person warm and calm.",
                ],
            },
            Guide {
                id: "snakebite",
                section: Section::EmergencyProcedures,
                title: "Snake Bite",
                description: "Immediate actions for snake bites.",
                steps: &[
                    "Keep the person calm and still to slow the spread of venom.",
                    "Remove jewelry or tight clothing near the bite.",
                    "Position the bite below heart level.",
                    "Clean the wound with soap and water.",
                    "Do NOT cut the wound or suck out the venom. Transport to hospital immediately.",
                ],
            },
            Guide {
                id: "anemia_diet",
                section: Section::DailyHealth,
                title: "Diet for Anemia",
                description: "Iron-rich foods to boost hemoglobin.",
                steps: &[
                    "Eat Green Leafy Vegetables: Spinach, Fenugreek (Methi).",
                    "Consume Jaggery (Gud) and Peanuts daily.",
                    "Include Pulses and Lentils (Dal) in every meal.",
                    "Vitamin C (Lemon, Amla) helps absorb Iron.",
                    "Avoid tea/coffee immediately after meals.",
                ],
            },
            Guide {
                id: "hydration",
                section: Section::DailyHealth,
                title: "Hydration Tips",
                description: "Staying hydrated in hot weather.",
                steps: &[
                    "Drink at least 8-10 glasses of water daily.",
                    "Drink Coconut Water or Butter Milk (Chaas).",
                    "Eat water-rich fruits like Watermelon and Cucumber.",
                    "Carry water when going out in the sun.",
                    "Signs of dehydration: Dark urine, dry mouth, headache.",
                ],
            },
        ];

        Self {
            guides: guides.into_iter().map(|g| (g.id, g)).collect(),
        }
    }

    pub fn guide(&self, id: &str) -> Option<&Guide> {
        self.guides.get(id)
    }

    /// Guides in display order.
    pub fn guides(&self) -> impl Iterator<Item = &Guide> {
        self.guides.values()
    }

    pub fn section(&self, section: Section) -> impl Iterator<Item = &Guide> {
        self.guides.values().filter(move |g| g.section == section)
    }

    /// Follow-up reading for a screening, if there is one.
    pub fn related_to(&self, kind: CheckupKind) -> Option<&Guide> {
        match kind {
            CheckupKind::Anemia => self.guide("anemia_diet"),
            CheckupKind::Dehydration => self.guide("hydration"),
            CheckupKind::Skin | CheckupKind::Respiratory => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_display_order_within_sections() {
        let kb = KnowledgeBase::offline();
        let emergency: Vec<_> = kb
            .section(Section::EmergencyProcedures)
            .map(|g| g.id)
            .collect();
        assert_eq!(emergency, vec!["cpr", "bleeding", "snakebite"]);

        let daily: Vec<_> = kb.section(Section::DailyHealth).map(|g| g.id).collect();
        assert_eq!(daily, vec!["anemia_diet", "hydration"]);
        assert_eq!(kb.guides().count(), 5);
    }

    #[test]
    fn links_screenings_to_guides() {
        let kb = KnowledgeBase::offline();
        assert_eq!(
            kb.related_to(CheckupKind::Anemia).map(|g| g.id),
            Some("anemia_diet")
        );
        assert_eq!(
            kb.related_to(CheckupKind::Dehydration).map(|g| g.id),
            Some("hydration")
        );
        assert!(kb.related_to(CheckupKind::Skin).is_none());
        assert!(kb.guide("unknown").is_none());
    }
}
