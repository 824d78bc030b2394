//! services/tracker/src/adapters/nutrition.rs
//!
//! The canned "nutrition assistant": a keyword lookup over a fixed table of
//! answers. It implements the `NutritionResponder` port without any model
//! behind it.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fitness_tracker_core::ports::{NutritionResponder, PortResult};

struct Topic {
    name: &'static str,
    keywords: &'static [&'static str],
    answers: &'static [&'static str],
}

const TOPICS: &[Topic] = &[
    Topic {
        name: "protein",
        keywords: &["protein", "muscle", "meat", "chicken", "fish", "eggs", "beans"],
        answers: &[
            "Protein is essential for muscle building and repair. Aim for 0.8-1.2g per pound of body weight. Good sources include lean meats, fish, eggs, dairy, legumes, and plant-based proteins.",
            "For muscle growth, consume protein within 30 minutes after your workout. Whey protein, chicken breast, and Greek yogurt are excellent post-workout options.",
            "Complete proteins contain all essential amino acids. Animal sources are complete, while plant sources like quinoa, soy, and hemp seeds are also complete proteins.",
        ],
    },
    Topic {
        name: "carbs",
        keywords: &["carbohydrates", "carbs", "energy", "bread", "rice", "pasta", "fruit"],
        answers: &[
            "Carbohydrates are your body's primary energy source. Complex carbs like whole grains, fruits, and vegetables provide sustained energy for workouts.",
            "Timing matters! Eat carbs 2-3 hours before exercise for energy, and within 30 minutes after for recovery. Simple carbs post-workout help replenish glycogen.",
            "Focus on complex carbohydrates like oats, sweet potatoes, quinoa, and brown rice. These provide fiber and sustained energy release.",
        ],
    },
    Topic {
        name: "fats",
        keywords: &["fats", "fat", "healthy fats", "omega", "avocado", "nuts", "olive oil"],
        answers: &[
            "Healthy fats are crucial for hormone production and nutrient absorption. Include avocados, nuts, olive oil, and fatty fish in your diet.",
            "Omega-3 fatty acids support recovery and reduce inflammation. Eat fatty fish like salmon 2-3 times per week or consider fish oil supplements.",
            "Aim for 20-35% of your daily calories from healthy fats. Avoid trans fats and limit saturated fats from processed foods.",
        ],
    },
    Topic {
        name: "meal timing",
        keywords: &["meal timing", "when to eat", "pre workout", "post workout", "breakfast", "dinner"],
        answers: &[
            "Eat a balanced meal 2-3 hours before exercise. Post-workout, consume protein and carbs within 30 minutes for optimal recovery.",
            "Don't skip breakfast! It kickstarts your metabolism and provides energy for the day. Include protein, complex carbs, and healthy fats.",
            "Space meals 3-4 hours apart to maintain stable blood sugar and energy levels throughout the day.",
        ],
    },
    Topic {
        name: "hydration",
        keywords: &["water", "hydration", "drink", "dehydrated", "fluids"],
        answers: &[
            "Stay hydrated! Drink 8-12 cups of water daily, more if you're active. Dehydration can significantly impact workout performance.",
            "Drink 16-20 oz of water 2-3 hours before exercise, and 8-10 oz every 15-20 minutes during intense workouts.",
            "Monitor hydration by checking urine color - pale yellow is ideal. Dark urine indicates you need more water.",
        ],
    },
    Topic {
        name: "supplements",
        keywords: &["supplements", "vitamins", "creatine", "bcaa", "protein powder"],
        answers: &[
            "Focus on whole foods first, then consider supplements. Protein powder, creatine, and vitamin D are well-researched and beneficial.",
            "Creatine monohydrate is one of the most effective supplements for strength and power. Take 3-5g daily.",
            "Consult with a healthcare provider before starting any supplement regimen, especially if you have medical conditions.",
        ],
    },
    Topic {
        name: "weight loss",
        keywords: &["weight loss", "lose weight", "calorie deficit", "diet"],
        answers: &[
            "Weight loss requires a calorie deficit. Track your food intake and aim for a 300-500 calorie daily deficit for sustainable loss.",
            "Focus on nutrient-dense foods that keep you full longer. Protein and fiber help control hunger and maintain muscle mass.",
            "Combine diet with regular exercise for best results. Strength training helps preserve muscle while losing fat.",
        ],
    },
    Topic {
        name: "muscle gain",
        keywords: &["muscle gain", "bulk", "muscle building", "hypertrophy"],
        answers: &[
            "To build muscle, eat in a slight calorie surplus (200-300 calories above maintenance) with adequate protein (1.6-2.2g per kg body weight).",
            "Progressive overload in your workouts combined with proper nutrition is key for muscle growth. Focus on compound movements.",
            "Eat protein with every meal and consider casein protein before bed for overnight muscle protein synthesis.",
        ],
    },
];

const GENERAL_ANSWERS: &[&str] = &[
    "Great question! For personalized nutrition advice, consider your goals, activity level, and dietary preferences. What specific aspect of nutrition would you like to know more about?",
    "Nutrition is highly individual. I'd be happy to help you with specific questions about protein, carbs, fats, meal timing, or supplements. What's your main concern?",
    "That's an interesting nutrition question! To give you the best advice, could you tell me more about your fitness goals and current eating habits?",
    "I'm here to help with your nutrition questions! Whether it's about meal planning, supplements, or specific nutrients, just ask and I'll provide evidence-based guidance.",
];

/// Answers from the table above. The first topic with a keyword contained in
/// the lower-cased message wins; answers within a topic rotate on each reply.
#[derive(Debug, Default)]
pub struct CannedNutritionResponder {
    turn: AtomicUsize,
}

impl CannedNutritionResponder {
    pub fn new() -> Self {
        Self::default()
    }

    /// The topic a message would be answered from, if any.
    pub fn topic_of(message: &str) -> Option<&'static str> {
        find_topic(&message.to_lowercase()).map(|topic| topic.name)
    }
}

fn find_topic(lowered: &str) -> Option<&'static Topic> {
    TOPICS
        .iter()
        .find(|topic| topic.keywords.iter().any(|keyword| lowered.contains(keyword)))
}

#[async_trait]
impl NutritionResponder for CannedNutritionResponder {
    async fn respond(&self, message: &str) -> PortResult<String> {
        let answers = find_topic(&message.to_lowercase())
            .map(|topic| topic.answers)
            .unwrap_or(GENERAL_ANSWERS);
        let turn = self.turn.fetch_add(1, Ordering::Relaxed);
        Ok(answers[turn % answers.len()].to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn earlier_topics_win_over_later_ones() {
        // "muscle" belongs to protein, which is listed before muscle gain.
        assert_eq!(
            CannedNutritionResponder::topic_of("Best diet for MUSCLE gain?"),
            Some("protein")
        );
        assert_eq!(CannedNutritionResponder::topic_of("How much water?"), Some("hydration"));
        assert_eq!(CannedNutritionResponder::topic_of("hello"), None);
    }

    #[tokio::test]
    async fn replies_rotate_through_the_matching_topic() {
        let responder = CannedNutritionResponder::new();
        let first = responder.respond("creatine?").await.unwrap();
        let second = responder.respond("creatine?").await.unwrap();
        assert_ne!(first, second);
        assert!(first.starts_with("Focus on whole foods first"));

        let general = responder.respond("hi there").await.unwrap();
        assert!(GENERAL_ANSWERS.contains(&general.as_str()));
    }
}
