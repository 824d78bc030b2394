//! crates/fitness_tracker_core/src/library.rs
//!
//! The built-in exercise library and workout templates, plus exercise search.

use crate::domain::{Category, Difficulty, Exercise, SetTargets, Template, TemplateExercise};

#[allow(clippy::too_many_arguments)]
fn exercise(
    id: &str,
    name: &str,
    category: Category,
    muscle_groups: &[&str],
    difficulty: Difficulty,
    equipment: &[&str],
    instructions: &[&str],
    defaults: SetTargets,
) -> Exercise {
    let owned = |items: &[&str]| -> Vec<String> { items.iter().map(|s| (*s).to_string()).collect() };
    Exercise {
        id: id.to_string(),
        name: name.to_string(),
        category,
        muscle_groups: owned(muscle_groups),
        difficulty,
        equipment: owned(equipment),
        instructions: owned(instructions),
        defaults,
        is_custom: false,
    }
}

/// The exercises every fresh install starts with.
pub fn default_exercises() -> Vec<Exercise> {
    use Category::{Bodyweight, Strength};
    use Difficulty::{Advanced, Beginner, Intermediate};

    vec![
        exercise(
            "bench-press",
            "Bench Press",
            Strength,
            &["chest", "triceps", "shoulders"],
            Intermediate,
            &["barbell", "bench"],
            &[
                "Lie on the bench with your feet flat on the ground",
                "Grip the barbell slightly wider than shoulder width",
                "Lower the bar to your chest with control",
                "Press the bar back up to the starting position",
            ],
            SetTargets::new(3, 8, 135),
        ),
        exercise(
            "push-ups",
            "Push-ups",
            Bodyweight,
            &["chest", "triceps", "shoulders"],
            Beginner,
            &[],
            &[
                "Start in a plank position with hands slightly wider than shoulders",
                "Lower your body until your chest nearly touches the ground",
                "Push back up to the starting position",
            ],
            SetTargets::new(3, 10, 0),
        ),
        exercise(
            "pull-ups",
            "Pull-ups",
            Bodyweight,
            &["back", "biceps"],
            Intermediate,
            &["pull-up bar"],
            &[
                "Hang from the bar with an overhand grip",
                "Pull until your chin clears the bar",
                "Lower with control to a full hang",
            ],
            SetTargets::new(3, 8, 0),
        ),
        exercise(
            "overhead-press",
            "Overhead Press",
            Strength,
            &["shoulders", "triceps"],
            Intermediate,
            &["barbell"],
            &[
                "Hold the bar at shoulder height",
                "Press it overhead until your arms lock out",
                "Lower it back to your shoulders",
            ],
            SetTargets::new(3, 8, 95),
        ),
        exercise(
            "bicep-curls",
            "Bicep Curls",
            Strength,
            &["biceps"],
            Beginner,
            &["dumbbells"],
            &[
                "Stand with a dumbbell in each hand, palms forward",
                "Curl the weights toward your shoulders",
                "Lower slowly to the starting position",
            ],
            SetTargets::new(3, 12, 25),
        ),
        exercise(
            "tricep-dips",
            "Tricep Dips",
            Bodyweight,
            &["triceps", "chest"],
            Intermediate,
            &["dip bars"],
            &[
                "Support yourself on the bars with straight arms",
                "Lower until your elbows reach 90 degrees",
                "Press back up to the top",
            ],
            SetTargets::new(3, 10, 0),
        ),
        exercise(
            "squats",
            "Squats",
            Strength,
            &["quadriceps", "glutes", "hamstrings"],
            Beginner,
            &["barbell"],
            &[
                "Stand with feet shoulder width apart",
                "Lower your hips back and down as if sitting in a chair",
                "Drive through your heels to stand back up",
            ],
            SetTargets::new(3, 10, 135),
        ),
        exercise(
            "deadlift",
            "Deadlift",
            Strength,
            &["back", "hamstrings", "glutes"],
            Advanced,
            &["barbell"],
            &[
                "Stand with the bar over your midfoot",
                "Hinge at the hips and grip the bar",
                "Stand up by driving your hips forward",
                "Lower the bar along your legs",
            ],
            SetTargets::new(3, 5, 185),
        ),
        exercise(
            "lunges",
            "Lunges",
            Strength,
            &["quadriceps", "glutes", "hamstrings"],
            Beginner,
            &[],
            &[
                "Step forward with one leg",
                "Lower until both knees are bent at 90 degrees",
                "Push back to the starting position and alternate legs",
            ],
            SetTargets::new(3, 12, 0),
        ),
        exercise(
            "plank",
            "Plank",
            Bodyweight,
            &["core", "abs"],
            Beginner,
            &[],
            &[
                "Rest on your forearms and toes",
                "Keep your body in a straight line from head to heels",
                "Hold the position",
            ],
            SetTargets::new(3, 30, 0),
        ),
        exercise(
            "crunches",
            "Crunches",
            Bodyweight,
            &["abs"],
            Beginner,
            &[],
            &[
                "Lie on your back with knees bent",
                "Curl your shoulders toward your hips",
                "Lower back down with control",
            ],
            SetTargets::new(3, 15, 0),
        ),
    ]
}

/// Looks up an exercise by id.
pub fn find_exercise<'a>(exercises: &'a [Exercise], id: &str) -> Option<&'a Exercise> {
    exercises.iter().find(|e| e.id == id)
}

/// The built-in templates. Slots whose exercise is missing from the library are
/// left out.
pub fn default_templates() -> Vec<Template> {
    let library = default_exercises();
    let slots = |plan: &[(&str, u32, u32, u32)]| -> Vec<TemplateExercise> {
        plan.iter()
            .filter_map(|&(id, sets, reps, rest_secs)| {
                find_exercise(&library, id).map(|exercise| TemplateExercise {
                    exercise: exercise.clone(),
                    sets,
                    reps,
                    rest_secs,
                })
            })
            .collect()
    };

    vec![
        Template {
            id: "beginner-full-body".to_string(),
            name: "Beginner Full Body".to_string(),
            description: "Perfect for beginners starting their fitness journey".to_string(),
            difficulty: Difficulty::Beginner,
            exercises: slots(&[
                ("push-ups", 3, 8, 60),
                ("squats", 3, 12, 60),
                ("plank", 3, 30, 45),
                ("lunges", 3, 10, 60),
                ("crunches", 3, 15, 45),
            ]),
        },
        Template {
            id: "strength-upper-body".to_string(),
            name: "Upper Body Strength".to_string(),
            description: "Focus on chest, back, shoulders, and arms".to_string(),
            difficulty: Difficulty::Intermediate,
            exercises: slots(&[
                ("bench-press", 4, 8, 90),
                ("pull-ups", 3, 6, 90),
                ("overhead-press", 3, 8, 90),
                ("bicep-curls", 3, 12, 60),
                ("tricep-dips", 3, 10, 60),
            ]),
        },
        Template {
            id: "strength-lower-body".to_string(),
            name: "Lower Body Strength".to_string(),
            description: "Build strong legs and glutes".to_string(),
            difficulty: Difficulty::Intermediate,
            exercises: slots(&[
                ("squats", 4, 8, 90),
                ("deadlift", 3, 5, 120),
                ("lunges", 3, 12, 60),
                ("plank", 3, 45, 60),
            ]),
        },
    ]
}

//=========================================================================================
// Search
//=========================================================================================

/// Criteria for narrowing the exercise list. Empty / `None` criteria match
/// everything; all given criteria must match.
#[derive(Debug, Clone, Default)]
pub struct ExerciseFilter {
    pub query: String,
    pub category: Option<Category>,
    pub muscle_group: Option<String>,
    pub difficulty: Option<Difficulty>,
}

impl ExerciseFilter {
    pub fn matches(&self, exercise: &Exercise) -> bool {
        let query = self.query.trim().to_lowercase();
        let matches_query = query.is_empty()
            || exercise.name.to_lowercase().contains(&query)
            || exercise
                .muscle_groups
                .iter()
                .any(|group| group.to_lowercase().contains(&query));

        matches_query
            && self.category.map_or(true, |c| exercise.category == c)
            && self
                .muscle_group
                .as_ref()
                .map_or(true, |group| exercise.muscle_groups.contains(group))
            && self.difficulty.map_or(true, |d| exercise.difficulty == d)
    }
}

pub fn filter_exercises<'a>(exercises: &'a [Exercise], filter: &ExerciseFilter) -> Vec<&'a Exercise> {
    exercises.iter().filter(|e| filter.matches(e)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_template_slot_resolves_against_the_library() {
        for template in default_templates() {
            assert!(!template.exercises.is_empty(), "{} is empty", template.name);
        }
        let full_body = &default_templates()[0];
        assert_eq!(full_body.exercises.len(), 5);
    }

    #[test]
    fn query_matches_name_or_muscle_group_case_insensitively() {
        let library = default_exercises();
        let by_name = ExerciseFilter {
            query: "BENCH".to_string(),
            ..Default::default()
        };
        assert_eq!(filter_exercises(&library, &by_name).len(), 1);

        let by_muscle = ExerciseFilter {
            query: "glute".to_string(),
            difficulty: Some(Difficulty::Beginner),
            ..Default::default()
        };
        let names: Vec<&str> = filter_exercises(&library, &by_muscle)
            .into_iter()
            .map(|e| e.name.as_str())
            .collect();
        assert_eq!(names, vec!["Squats", "Lunges"]);
    }
}
