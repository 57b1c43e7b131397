use rand::Rng;

use crate::catalog::{Exercise, Tutor};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BotReply {
    pub text: String,
    pub exercise: Option<Exercise>,
}

/// Keyword lookup over the tutor table. Not a model: exercise replies are a
/// pure function of the input, canned replies depend only on the RNG.
pub struct Responder<'a, R: Rng> {
    tutor: &'a Tutor,
    rng: R,
}

impl<'a, R: Rng> Responder<'a, R> {
    pub fn new(tutor: &'a Tutor, rng: R) -> Self {
        Self { tutor, rng }
    }

    pub fn is_trigger(&self, text: &str) -> bool {
        let lower = text.to_lowercase();
        self.tutor.triggers.iter().any(|t| lower.contains(t.as_str()))
    }

    pub fn respond(&mut self, text: &str, exercise_index: usize) -> BotReply {
        if self.is_trigger(text) {
            if let Some(exercise) = self.exercise_at(exercise_index) {
                return exercise_reply("Excellent! Here is a present simple exercise.", exercise);
            }
        }

        let idx = self.rng.gen_range(0..self.tutor.canned_responses.len());
        BotReply {
            text: self.tutor.canned_responses[idx].clone(),
            exercise: None,
        }
    }

    /// Exercise at `index`, clamped to the last one.
    pub fn exercise_at(&self, index: usize) -> Option<&'a Exercise> {
        let exercises = &self.tutor.exercises;
        exercises.get(index.min(exercises.len().saturating_sub(1)))
    }

    pub fn exercise_count(&self) -> usize {
        self.tutor.exercises.len()
    }
}

/// Bot message carrying `exercise`, prefixed with its kind's instruction.
pub fn exercise_reply(lead: &str, exercise: &Exercise) -> BotReply {
    BotReply {
        text: format!("{lead} {}", exercise.kind.instruction()),
        exercise: Some(exercise.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn tutor() -> Tutor {
        Catalog::embedded().unwrap().tutor
    }

    #[test]
    fn trigger_at_index_zero_returns_first_exercise() {
        let tutor = tutor();
        let mut r = Responder::new(&tutor, SmallRng::seed_from_u64(7));
        let reply = r.respond("Can we practise the Present Simple?", 0);
        assert_eq!(reply.exercise.as_ref(), Some(&tutor.exercises[0]));
        assert!(reply.text.contains(tutor.exercises[0].kind.instruction()));
    }

    #[test]
    fn arabic_trigger_matches() {
        let tutor = tutor();
        let mut r = Responder::new(&tutor, SmallRng::seed_from_u64(7));
        let reply = r.respond("اشرح لي المضارع البسيط", 1);
        assert_eq!(reply.exercise.as_ref(), Some(&tutor.exercises[1]));
    }

    #[test]
    fn exercise_index_is_clamped() {
        let tutor = tutor();
        let mut r = Responder::new(&tutor, SmallRng::seed_from_u64(7));
        let reply = r.respond("present simple", 99);
        assert_eq!(reply.exercise.as_ref(), tutor.exercises.last());
    }

    #[test]
    fn other_input_returns_a_canned_response() {
        let tutor = tutor();
        let mut r = Responder::new(&tutor, SmallRng::seed_from_u64(1));
        for _ in 0..50 {
            let reply = r.respond("what is photosynthesis?", 0);
            assert!(reply.exercise.is_none());
            assert!(tutor.canned_responses.contains(&reply.text));
        }
    }

    #[test]
    fn same_seed_same_replies() {
        let tutor = tutor();
        let mut a = Responder::new(&tutor, SmallRng::seed_from_u64(42));
        let mut b = Responder::new(&tutor, SmallRng::seed_from_u64(42));
        for _ in 0..20 {
            assert_eq!(a.respond("hello", 0), b.respond("hello", 0));
        }
    }

    #[test]
    fn seeded_rng_picks_predictable_entry() {
        let tutor = tutor();
        let mut expected_rng = SmallRng::seed_from_u64(3);
        let expected = expected_rng.gen_range(0..tutor.canned_responses.len());
        let mut r = Responder::new(&tutor, SmallRng::seed_from_u64(3));
        assert_eq!(r.respond("hi", 0).text, tutor.canned_responses[expected]);
    }
}
